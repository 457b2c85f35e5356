// src/handlers/mod.rs

pub mod admin;
pub mod auth;
pub mod batch;
pub mod profile;
pub mod quiz;
pub mod recommendation;
