use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Lifecycle of a prompt version. Only `Active` versions are ever indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleStatus {
    Active,
    Deprecated,
    Retired,
}

impl LifecycleStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(LifecycleStatus::Active),
            "deprecated" => Some(LifecycleStatus::Deprecated),
            "retired" => Some(LifecycleStatus::Retired),
            _ => None,
        }
    }
}

/// A single immutable prompt version as held by the registry.
///
/// Fields are public so consumers can read them without accessors. The
/// registry hands out `Arc<PromptArtifact>`, so the indexed copy cannot be
/// edited; an edited clone is what `verify_integrity` exists to catch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptArtifact {
    pub task: String,
    pub version: String,
    pub status: LifecycleStatus,
    pub system_prompt: String,
    pub user_prompt_template: String,
    /// SHA-256 of `system_prompt ++ user_prompt_template`, lowercase hex, fixed at load.
    pub content_hash: String,
    pub created_at: String,
    pub created_by: String,
    pub description: String,
    /// Opaque usage rules (max_tokens, temperature, ...). Never interpreted here.
    pub validation: Map<String, Value>,
    /// Opaque governance metadata (approver, regulatory status, ...).
    pub metadata: Map<String, Value>,
}

impl PromptArtifact {
    /// Short hash prefix used in every log line that mentions this artifact.
    pub fn hash_prefix(&self) -> &str {
        hash_prefix(&self.content_hash)
    }
}

/// On-disk shape of one artifact file. Everything is optional here so the
/// loader can name the missing field instead of surfacing a serde message.
///
/// Provenance keys only have to be present: `Some(None)` is a key written
/// without a value, `None` is a missing key.
#[derive(Debug, Default, Deserialize)]
pub struct ArtifactFile {
    pub version: Option<String>,
    pub task: Option<String>,
    pub status: Option<String>,
    pub system_prompt: Option<String>,
    pub user_prompt_template: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub created_at: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub created_by: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub validation: Option<Map<String, Value>>,
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

pub const HASH_PREFIX_LEN: usize = 8;

/// Content fingerprint: SHA-256 over the UTF-8 bytes of the system prompt
/// followed directly by the user template, rendered as lowercase hex.
pub fn content_hash(system_prompt: &str, user_prompt_template: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(system_prompt.as_bytes());
    hasher.update(user_prompt_template.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub fn hash_prefix(hash: &str) -> &str {
    hash.get(..HASH_PREFIX_LEN).unwrap_or(hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_64_lowercase_hex() {
        let hash = content_hash("You are a test assistant.", "Process this: {input_text}");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
    }

    #[test]
    fn test_hash_is_deterministic_and_content_sensitive() {
        let a = content_hash("sys", "user {x}");
        assert_eq!(a, content_hash("sys", "user {x}"));
        assert_ne!(a, content_hash("sys ", "user {x}"));
    }

    #[test]
    fn test_hash_is_over_plain_concatenation() {
        // No separator between the two fields.
        assert_eq!(content_hash("ab", "c"), content_hash("a", "bc"));
        assert_eq!(
            content_hash("", ""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(LifecycleStatus::parse("active"), Some(LifecycleStatus::Active));
        assert_eq!(
            LifecycleStatus::parse("deprecated"),
            Some(LifecycleStatus::Deprecated)
        );
        assert_eq!(LifecycleStatus::parse("retired"), Some(LifecycleStatus::Retired));
        assert_eq!(LifecycleStatus::parse("Active"), None);
        assert_eq!(LifecycleStatus::parse("draft"), None);
    }

    #[test]
    fn test_hash_prefix_short_input() {
        assert_eq!(hash_prefix("abc"), "abc");
        assert_eq!(hash_prefix("0123456789abcdef"), "01234567");
    }
}
