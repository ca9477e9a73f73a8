use tracing::error;

use crate::prompts::models::{content_hash, hash_prefix, PromptArtifact};

/// Recomputes the artifact's content hash and compares it with the one
/// recorded at load. A mismatch is logged, never repaired.
pub fn verify_integrity(artifact: &PromptArtifact) -> bool {
    let current = content_hash(&artifact.system_prompt, &artifact.user_prompt_template);
    let is_valid = current == artifact.content_hash;

    if !is_valid {
        error!(
            "Prompt integrity check failed for {} v{}. Expected hash: {}..., Actual hash: {}...",
            artifact.task,
            artifact.version,
            artifact.hash_prefix(),
            hash_prefix(&current)
        );
    }

    is_valid
}
