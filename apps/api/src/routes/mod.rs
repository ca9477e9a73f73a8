pub mod health;

use std::time::Instant;

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};

use crate::prompts::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Prompt registry
        .route("/api/v1/prompts", get(handlers::handle_list_prompts))
        .route("/api/v1/prompts/reload", post(handlers::handle_reload))
        .route("/api/v1/prompts/integrity", get(handlers::handle_integrity))
        .route("/api/v1/prompts/:task", get(handlers::handle_get_prompt))
        .route(
            "/api/v1/prompts/:task/versions",
            get(handlers::handle_list_versions),
        )
        .route(
            "/api/v1/prompts/:task/render",
            post(handlers::handle_render),
        )
        .layer(middleware::from_fn(process_time))
        .with_state(state)
}

/// Adds `X-Process-Time`: seconds spent handling the request.
async fn process_time(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let mut response = next.run(req).await;
    let elapsed = start.elapsed().as_secs_f64();
    if let Ok(value) = HeaderValue::from_str(&format!("{elapsed:.6}")) {
        response.headers_mut().insert("x-process-time", value);
    }
    response
}
