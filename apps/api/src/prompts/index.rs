use std::collections::HashMap;
use std::sync::Arc;

use crate::prompts::error::ArtifactNotFound;
use crate::prompts::models::PromptArtifact;
use crate::prompts::version;

/// Task → version → artifact. Built once by the loader and then only read.
#[derive(Debug, Default, Clone)]
pub struct VersionIndex {
    tasks: HashMap<String, HashMap<String, Arc<PromptArtifact>>>,
}

impl VersionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts under `(task, version)`, returning whatever was there before.
    pub fn insert(&mut self, artifact: PromptArtifact) -> Option<Arc<PromptArtifact>> {
        self.tasks
            .entry(artifact.task.clone())
            .or_default()
            .insert(artifact.version.clone(), Arc::new(artifact))
    }

    /// Exact version when given, otherwise the highest registered version.
    pub fn get(
        &self,
        task: &str,
        version: Option<&str>,
    ) -> Result<Arc<PromptArtifact>, ArtifactNotFound> {
        let versions = self
            .tasks
            .get(task)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ArtifactNotFound::Task {
                task: task.to_string(),
            })?;

        let key = match version {
            Some(v) => v,
            None => version::latest(versions.keys().map(String::as_str)).ok_or_else(|| {
                ArtifactNotFound::Task {
                    task: task.to_string(),
                }
            })?,
        };

        versions
            .get(key)
            .cloned()
            .ok_or_else(|| ArtifactNotFound::Version {
                task: task.to_string(),
                version: key.to_string(),
            })
    }

    /// Versions for `task`, newest first. Empty for unknown tasks.
    pub fn list_versions(&self, task: &str) -> Vec<String> {
        let mut versions: Vec<String> = self
            .tasks
            .get(task)
            .map(|v| v.keys().cloned().collect())
            .unwrap_or_default();
        version::sort_descending(&mut versions);
        versions
    }

    /// Task names in alphabetical order.
    pub fn list_tasks(&self) -> Vec<String> {
        let mut tasks: Vec<String> = self
            .tasks
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(t, _)| t.clone())
            .collect();
        tasks.sort();
        tasks
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<PromptArtifact>> {
        self.tasks.values().flat_map(|v| v.values())
    }

    pub fn task_count(&self) -> usize {
        self.tasks.values().filter(|v| !v.is_empty()).count()
    }

    pub fn artifact_count(&self) -> usize {
        self.tasks.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.artifact_count() == 0
    }
}
