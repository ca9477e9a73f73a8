//! The live prompt registry shared by all request handlers.
//!
//! Readers take a cheap `Arc` snapshot of the current index and never hold a
//! lock while working with it. Reloads build a complete index off to the side
//! and swap it in with a single pointer replacement.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::prompts::error::{ArtifactNotFound, MissingTemplateVariable};
use crate::prompts::index::VersionIndex;
use crate::prompts::models::PromptArtifact;
use crate::prompts::{integrity, loader, template};

/// An immutable, fully-populated index plus when it was loaded.
#[derive(Debug)]
pub struct Snapshot {
    pub index: VersionIndex,
    pub loaded_at: DateTime<Utc>,
}

impl Snapshot {
    /// Every artifact in this snapshot whose content no longer matches its
    /// hash, ordered by task then version.
    pub fn verify_all(&self) -> Vec<IntegrityFailure> {
        let mut failures: Vec<IntegrityFailure> = self
            .index
            .iter()
            .filter(|a| !integrity::verify_integrity(a))
            .map(|a| IntegrityFailure {
                task: a.task.clone(),
                version: a.version.clone(),
            })
            .collect();
        failures.sort_by(|a, b| (&a.task, &a.version).cmp(&(&b.task, &b.version)));
        failures
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReloadSummary {
    /// False when the directory was unavailable and the previous index was kept.
    pub applied: bool,
    pub task_count: usize,
    pub artifact_count: usize,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrityFailure {
    pub task: String,
    pub version: String,
}

pub struct PromptRegistry {
    snapshot: RwLock<Arc<Snapshot>>,
    reload_lock: Mutex<()>,
}

impl PromptRegistry {
    /// Loads `directory` once. A missing directory gives an empty registry
    /// that answers "not found" to everything.
    pub fn load(directory: &Path) -> Self {
        let index = loader::load(directory);
        info!(
            "Prompt registry initialised from {}: {} prompts across {} tasks",
            directory.display(),
            index.artifact_count(),
            index.task_count()
        );
        if index.is_empty() {
            warn!("No active prompts loaded; every lookup will report not found");
        }
        Self::from_index(index)
    }

    pub fn from_index(index: VersionIndex) -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(Snapshot {
                index,
                loaded_at: Utc::now(),
            })),
            reload_lock: Mutex::new(()),
        }
    }

    /// Current index. Later reloads do not affect a snapshot already taken.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn get_artifact(
        &self,
        task: &str,
        version: Option<&str>,
    ) -> Result<Arc<PromptArtifact>, ArtifactNotFound> {
        self.snapshot().index.get(task, version).map_err(|e| {
            warn!("{e}");
            e
        })
    }

    pub fn list_versions(&self, task: &str) -> Vec<String> {
        self.snapshot().index.list_versions(task)
    }

    #[allow(dead_code)]
    pub fn list_tasks(&self) -> Vec<String> {
        self.snapshot().index.list_tasks()
    }

    pub fn render(
        &self,
        artifact: &PromptArtifact,
        variables: &HashMap<String, String>,
    ) -> Result<String, MissingTemplateVariable> {
        template::render(artifact, variables)
    }

    pub fn verify_integrity(&self, artifact: &PromptArtifact) -> bool {
        integrity::verify_integrity(artifact)
    }

    /// Rebuilds the index from `directory` and swaps it in atomically.
    ///
    /// Reloads are serialised. If the directory cannot be read the previous
    /// index stays live and the summary reports `applied: false`.
    pub fn reload(&self, directory: &Path) -> ReloadSummary {
        let _guard = self
            .reload_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        info!("Reloading prompts from {}", directory.display());

        let index = match loader::scan_directory(directory) {
            Ok(index) => index,
            Err(e) => {
                warn!("{e}; keeping the previously loaded prompts");
                let current = self.snapshot();
                return ReloadSummary {
                    applied: false,
                    task_count: current.index.task_count(),
                    artifact_count: current.index.artifact_count(),
                    loaded_at: current.loaded_at,
                };
            }
        };

        let fresh = Arc::new(Snapshot {
            index,
            loaded_at: Utc::now(),
        });
        let summary = ReloadSummary {
            applied: true,
            task_count: fresh.index.task_count(),
            artifact_count: fresh.index.artifact_count(),
            loaded_at: fresh.loaded_at,
        };

        *self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner) = fresh;

        info!("Reloaded {} prompts", summary.artifact_count);
        summary
    }
}
