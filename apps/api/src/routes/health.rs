use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status plus the size and age of the live prompt index.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let snapshot = state.registry.snapshot();
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "promptreg",
        "prompts": {
            "tasks": snapshot.index.task_count(),
            "artifacts": snapshot.index.artifact_count(),
            "loaded_at": snapshot.loaded_at,
        }
    }))
}
