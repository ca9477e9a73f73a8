use std::path::PathBuf;

use thiserror::Error;

/// A single artifact file that could not be turned into a `PromptArtifact`.
/// The loader logs it and moves on; it never reaches a lookup caller.
#[derive(Debug, Error)]
#[error("Malformed prompt file {}: {reason}", .path.display())]
pub struct MalformedArtifactFile {
    pub path: PathBuf,
    pub reason: String,
}

/// The prompt directory is missing or cannot be listed.
#[derive(Debug, Error)]
#[error("Prompt directory {} is unavailable: {source}", .path.display())]
pub struct DirectoryUnavailable {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// No active artifact matches the lookup. An expected outcome, not a fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArtifactNotFound {
    #[error("No prompts loaded for task '{task}'")]
    Task { task: String },

    #[error("Prompt not found: {task} v{version}")]
    Version { task: String, version: String },
}

/// Rendering was attempted without a value for every placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Missing required template variable: '{missing}'. Template requires: [{}]",
    .required.join(", ")
)]
pub struct MissingTemplateVariable {
    /// First placeholder, in template order, with no supplied value.
    pub missing: String,
    /// Every placeholder the template uses, deduplicated, in order of first appearance.
    pub required: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_variable_message_lists_required() {
        let err = MissingTemplateVariable {
            missing: "patient_age".to_string(),
            required: vec!["input_text".to_string(), "patient_age".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Missing required template variable: 'patient_age'. Template requires: [input_text, patient_age]"
        );
    }

    #[test]
    fn test_not_found_messages() {
        let err = ArtifactNotFound::Version {
            task: "foo".to_string(),
            version: "9.9.9".to_string(),
        };
        assert_eq!(err.to_string(), "Prompt not found: foo v9.9.9");
        let err = ArtifactNotFound::Task {
            task: "bar".to_string(),
        };
        assert_eq!(err.to_string(), "No prompts loaded for task 'bar'");
    }
}
