// Versioned prompt registry.
// Prompts are data: YAML artifacts, semantically versioned, content-hashed,
// reloadable without a restart. Nothing here calls a model.

pub mod error;
pub mod handlers;
pub mod index;
pub mod integrity;
pub mod loader;
pub mod models;
pub mod registry;
pub mod template;
pub mod version;

#[cfg(test)]
pub(crate) mod fixtures;

pub use error::{ArtifactNotFound, MissingTemplateVariable};
pub use models::PromptArtifact;
pub use registry::PromptRegistry;
