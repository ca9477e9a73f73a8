//! Artifact store loader: one YAML file per prompt version, one directory.
//!
//! A bad file never fails the load. It is logged and skipped, and the
//! remaining files still populate the index.

use std::path::{Path, PathBuf};

use serde_json::Map;
use tracing::{error, info, warn};

use crate::prompts::error::{DirectoryUnavailable, MalformedArtifactFile};
use crate::prompts::index::VersionIndex;
use crate::prompts::models::{content_hash, ArtifactFile, LifecycleStatus, PromptArtifact};

const ARTIFACT_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// What happened to a single file during a scan.
#[derive(Debug)]
pub enum FileOutcome {
    Loaded(PromptArtifact),
    Skipped { status: String },
}

/// Loads `directory` into a fresh index. A missing or unreadable directory
/// yields an empty index and a warning.
pub fn load(directory: &Path) -> VersionIndex {
    scan_directory(directory).unwrap_or_else(|e| {
        warn!("{e}; starting with an empty prompt index");
        VersionIndex::new()
    })
}

/// Like `load`, but reports an unavailable directory to the caller so a
/// reload can decide to keep its previous index.
pub fn scan_directory(directory: &Path) -> Result<VersionIndex, DirectoryUnavailable> {
    let paths = artifact_paths(directory)?;
    let mut index = VersionIndex::new();

    for path in paths {
        match load_file(&path) {
            Ok(FileOutcome::Loaded(artifact)) => {
                info!(
                    "Loaded prompt: {} v{} (hash: {}...)",
                    artifact.task,
                    artifact.version,
                    artifact.hash_prefix()
                );
                let (task, version) = (artifact.task.clone(), artifact.version.clone());
                if index.insert(artifact).is_some() {
                    warn!(
                        "Duplicate prompt {task} v{version}; {} replaces the earlier file",
                        path.display()
                    );
                }
            }
            Ok(FileOutcome::Skipped { status }) => {
                if LifecycleStatus::parse(&status).is_some() {
                    info!("Skipping non-active prompt ({status}): {}", path.display());
                } else {
                    warn!(
                        "Skipping prompt with unknown status '{status}': {}",
                        path.display()
                    );
                }
            }
            Err(e) => error!("Failed to load prompt: {e}"),
        }
    }

    Ok(index)
}

/// Parses a single artifact file.
pub fn load_file(path: &Path) -> Result<FileOutcome, MalformedArtifactFile> {
    let malformed = |reason: String| MalformedArtifactFile {
        path: path.to_path_buf(),
        reason,
    };

    let raw = std::fs::read_to_string(path).map_err(|e| malformed(e.to_string()))?;
    let file: ArtifactFile = serde_yaml::from_str(&raw).map_err(|e| malformed(e.to_string()))?;
    parse_artifact(file).map_err(malformed)
}

fn parse_artifact(file: ArtifactFile) -> Result<FileOutcome, String> {
    fn required<T>(field: Option<T>, name: &str) -> Result<T, String> {
        field.ok_or_else(|| format!("missing required field '{name}'"))
    }

    let version = required(file.version, "version")?;
    let task = required(file.task, "task")?;
    let status = required(file.status, "status")?;
    let system_prompt = required(file.system_prompt, "system_prompt")?;
    let user_prompt_template = required(file.user_prompt_template, "user_prompt_template")?;
    // Provenance is passed through as written; an empty value is allowed.
    let created_at = required(file.created_at, "created_at")?.unwrap_or_default();
    let created_by = required(file.created_by, "created_by")?.unwrap_or_default();
    let description = required(file.description, "description")?.unwrap_or_default();

    if LifecycleStatus::parse(&status) != Some(LifecycleStatus::Active) {
        return Ok(FileOutcome::Skipped { status });
    }

    Ok(FileOutcome::Loaded(PromptArtifact {
        content_hash: content_hash(&system_prompt, &user_prompt_template),
        task,
        version,
        status: LifecycleStatus::Active,
        system_prompt,
        user_prompt_template,
        created_at,
        created_by,
        description,
        validation: file.validation.unwrap_or_else(Map::new),
        metadata: file.metadata.unwrap_or_else(Map::new),
    }))
}

/// Artifact files directly inside `directory`, in path order so duplicate
/// keys resolve the same way on every load.
fn artifact_paths(directory: &Path) -> Result<Vec<PathBuf>, DirectoryUnavailable> {
    let unavailable = |source| DirectoryUnavailable {
        path: directory.to_path_buf(),
        source,
    };

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(directory).map_err(unavailable)? {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(e) => {
                warn!("Skipping unreadable entry in {}: {e}", directory.display());
                continue;
            }
        };
        let is_artifact = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ARTIFACT_EXTENSIONS.contains(&ext));
        if is_artifact && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}
