// src/models/batch.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed training tracks a candidate can be allocated to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Batch {
    Java,
    DotNet,
    DataEngineer,
}

impl Batch {
    /// Allocates a batch from a declared skill or certification string.
    ///
    /// Matching is case-insensitive over the input tokens: anything
    /// mentioning Java or AWS goes to the Java batch, anything mentioning
    /// Azure or .NET goes to the .NET batch, and everything else (including
    /// empty or unrecognized input) falls back to the Data Engineer batch.
    /// Total over all inputs; never fails.
    pub fn from_skill(input: &str) -> Batch {
        let normalized = input.to_lowercase();
        let tokens: Vec<&str> = normalized
            .split(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | '/' | '&' | '+'))
            .filter(|t| !t.is_empty())
            .collect();

        if tokens.iter().any(|t| *t == "java" || *t == "aws") {
            Batch::Java
        } else if tokens.iter().any(|t| *t == "azure" || *t == ".net" || *t == "dotnet") {
            Batch::DotNet
        } else {
            Batch::DataEngineer
        }
    }

    /// The label persisted on the user record and shown to candidates.
    pub fn label(&self) -> &'static str {
        match self {
            Batch::Java => "Java Batch",
            Batch::DotNet => ".NET Batch",
            Batch::DataEngineer => "Data Engineer Batch",
        }
    }

    /// Parses a persisted label back into a batch. Unknown labels yield
    /// `None` so a corrupted record reads as "not allocated".
    pub fn parse_label(label: &str) -> Option<Batch> {
        match label {
            "Java Batch" => Some(Batch::Java),
            ".NET Batch" => Some(Batch::DotNet),
            "Data Engineer Batch" => Some(Batch::DataEngineer),
            _ => None,
        }
    }
}

impl fmt::Display for Batch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn certification_strings_map_to_fixed_batches() {
        assert_eq!(Batch::from_skill("Java and AWS"), Batch::Java);
        assert_eq!(Batch::from_skill(".NET and Azure"), Batch::DotNet);
        assert_eq!(Batch::from_skill("Python and SQL"), Batch::DataEngineer);
    }

    #[test]
    fn matching_is_case_insensitive_and_token_based() {
        assert_eq!(Batch::from_skill("aws"), Batch::Java);
        assert_eq!(Batch::from_skill("AZURE"), Batch::DotNet);
        assert_eq!(Batch::from_skill("senior java developer"), Batch::Java);
        assert_eq!(Batch::from_skill("dotnet"), Batch::DotNet);
    }

    #[test]
    fn unrecognized_or_empty_input_falls_back_to_data_engineer() {
        assert_eq!(Batch::from_skill(""), Batch::DataEngineer);
        assert_eq!(Batch::from_skill("general IT"), Batch::DataEngineer);
        // "javascript" is not the token "java"
        assert_eq!(Batch::from_skill("javascript"), Batch::DataEngineer);
    }

    #[test]
    fn labels_round_trip() {
        for batch in [Batch::Java, Batch::DotNet, Batch::DataEngineer] {
            assert_eq!(Batch::parse_label(batch.label()), Some(batch));
        }
        assert_eq!(Batch::parse_label("Cobol Batch"), None);
    }
}
