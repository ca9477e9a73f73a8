use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::prompts::index::VersionIndex;
use crate::prompts::registry::{IntegrityFailure, ReloadSummary};
use crate::prompts::PromptArtifact;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct VersionQuery {
    pub version: Option<String>,
}

#[derive(Serialize)]
pub struct TaskSummary {
    pub task: String,
    pub latest_version: String,
    pub versions: Vec<String>,
}

#[derive(Serialize)]
pub struct VersionListResponse {
    pub task: String,
    pub versions: Vec<String>,
}

#[derive(Deserialize)]
pub struct RenderRequest {
    pub version: Option<String>,
    #[serde(default)]
    pub variables: HashMap<String, String>,
}

/// The rendered pair handed to the LLM client, plus what it needs for its audit trail.
#[derive(Serialize)]
pub struct RenderResponse {
    pub audit_id: Uuid,
    pub task: String,
    pub version: String,
    pub content_hash: String,
    pub system_prompt: String,
    pub user_prompt: String,
}

#[derive(Serialize)]
pub struct IntegrityReport {
    pub checked: usize,
    pub passed: bool,
    pub failures: Vec<IntegrityFailure>,
}

/// Looks up an artifact and refuses to hand out one whose content no longer
/// matches its hash.
fn resolve(
    state: &AppState,
    task: &str,
    version: Option<&str>,
) -> Result<Arc<PromptArtifact>, AppError> {
    let artifact = state.registry.get_artifact(task, version)?;
    if !state.registry.verify_integrity(&artifact) {
        return Err(AppError::PromptNotConfigured(format!(
            "Prompt {} v{} failed its integrity check",
            artifact.task, artifact.version
        )));
    }
    Ok(artifact)
}

/// One entry per task in `index`, each with its versions newest first.
fn task_summaries(index: &VersionIndex) -> Vec<TaskSummary> {
    index
        .list_tasks()
        .into_iter()
        .filter_map(|task| {
            let versions = index.list_versions(&task);
            let latest_version = versions.first()?.clone();
            Some(TaskSummary {
                task,
                latest_version,
                versions,
            })
        })
        .collect()
}

/// GET /api/v1/prompts
pub async fn handle_list_prompts(State(state): State<AppState>) -> Json<Vec<TaskSummary>> {
    let snapshot = state.registry.snapshot();
    Json(task_summaries(&snapshot.index))
}

/// GET /api/v1/prompts/:task
pub async fn handle_get_prompt(
    State(state): State<AppState>,
    Path(task): Path<String>,
    Query(params): Query<VersionQuery>,
) -> Result<Json<PromptArtifact>, AppError> {
    let artifact = resolve(&state, &task, params.version.as_deref())?;
    Ok(Json(artifact.as_ref().clone()))
}

/// GET /api/v1/prompts/:task/versions
pub async fn handle_list_versions(
    State(state): State<AppState>,
    Path(task): Path<String>,
) -> Json<VersionListResponse> {
    let versions = state.registry.list_versions(&task);
    Json(VersionListResponse { task, versions })
}

/// POST /api/v1/prompts/:task/render
pub async fn handle_render(
    State(state): State<AppState>,
    Path(task): Path<String>,
    Json(req): Json<RenderRequest>,
) -> Result<Json<RenderResponse>, AppError> {
    let limit = state.config.max_variable_length;
    if let Some((name, _)) = req.variables.iter().find(|(_, v)| v.len() > limit) {
        return Err(AppError::Validation(format!(
            "Variable '{name}' exceeds maximum length of {limit}"
        )));
    }

    let artifact = resolve(&state, &task, req.version.as_deref())?;
    let user_prompt = state.registry.render(&artifact, &req.variables)?;

    let audit_id = Uuid::new_v4();
    let variable_lengths: HashMap<&str, usize> = req
        .variables
        .iter()
        .map(|(k, v)| (k.as_str(), v.len()))
        .collect();
    info!(
        %audit_id,
        task = %artifact.task,
        version = %artifact.version,
        prompt_hash = artifact.hash_prefix(),
        ?variable_lengths,
        "Rendered prompt"
    );

    Ok(Json(RenderResponse {
        audit_id,
        task: artifact.task.clone(),
        version: artifact.version.clone(),
        content_hash: artifact.content_hash.clone(),
        system_prompt: artifact.system_prompt.clone(),
        user_prompt,
    }))
}

/// POST /api/v1/prompts/reload
pub async fn handle_reload(State(state): State<AppState>) -> Result<Json<ReloadSummary>, AppError> {
    let registry = Arc::clone(&state.registry);
    let dir = state.config.prompts_dir.clone();
    let summary = tokio::task::spawn_blocking(move || registry.reload(&dir))
        .await
        .map_err(anyhow::Error::from)?;
    Ok(Json(summary))
}

/// GET /api/v1/prompts/integrity
pub async fn handle_integrity(State(state): State<AppState>) -> Json<IntegrityReport> {
    let snapshot = state.registry.snapshot();
    let failures = snapshot.verify_all();
    Json(IntegrityReport {
        checked: snapshot.index.artifact_count(),
        passed: failures.is_empty(),
        failures,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::fixtures::write_prompt;
    use crate::prompts::registry::PromptRegistry;
    use tempfile::TempDir;

    #[test]
    fn test_summaries_come_from_one_snapshot() {
        let dir = TempDir::new().unwrap();
        write_prompt(dir.path(), "foo_1.yaml", "foo", "1.0.0", "active");
        write_prompt(dir.path(), "foo_2.yaml", "foo", "1.1.0", "active");
        let registry = PromptRegistry::load(dir.path());
        let held = registry.snapshot();

        std::fs::remove_file(dir.path().join("foo_1.yaml")).unwrap();
        std::fs::remove_file(dir.path().join("foo_2.yaml")).unwrap();
        write_prompt(dir.path(), "bar.yaml", "bar", "2.0.0", "active");
        assert!(registry.reload(dir.path()).applied);

        let summaries = task_summaries(&held.index);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].task, "foo");
        assert_eq!(summaries[0].latest_version, "1.1.0");
        assert_eq!(summaries[0].versions, vec!["1.1.0", "1.0.0"]);

        let live = task_summaries(&registry.snapshot().index);
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].task, "bar");
        assert_eq!(live[0].versions, vec!["2.0.0"]);
    }

    #[test]
    fn test_integrity_counts_match_failures_snapshot() {
        let dir = TempDir::new().unwrap();
        write_prompt(dir.path(), "a.yaml", "foo", "1.0.0", "active");
        let registry = PromptRegistry::load(dir.path());
        let held = registry.snapshot();

        write_prompt(dir.path(), "b.yaml", "foo", "1.1.0", "active");
        registry.reload(dir.path());

        assert_eq!(held.index.artifact_count(), 1);
        assert!(held.verify_all().is_empty());
        assert_eq!(registry.snapshot().index.artifact_count(), 2);
    }
}
