// src/models/mod.rs

pub mod batch;
pub mod question;
pub mod session;
pub mod user;
