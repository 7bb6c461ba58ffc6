use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::search::{SimilarityEngine, SimilarityOutcome};
use crate::templates::IndexTemplate;

#[derive(Clone)]
struct AppState {
    engine: Arc<SimilarityEngine>,
}

#[derive(Debug, Deserialize)]
struct SimilarityForm {
    user_input: Option<String>,
}

#[derive(Debug, Serialize)]
struct SimilarityResponse {
    user_input: String,
    results: SimilarityOutcome,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    verses: usize,
    clusters: usize,
}

pub fn router(engine: Arc<SimilarityEngine>) -> Router {
    let state = AppState { engine };

    Router::new()
        .route("/", get(index_handler).post(index_submit_handler))
        .route("/api/similarity", post(similarity_handler))
        .route("/api/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, engine: Arc<SimilarityEngine>) -> anyhow::Result<()> {
    let app = router(engine);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("🚀 Server listening on http://{}", addr);
    tracing::info!("🔍 Similarity API available at http://{}/api/similarity", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn render(template: IndexTemplate<'_>) -> Result<Html<String>, StatusCode> {
    template.render().map(Html).map_err(|e| {
        tracing::error!("Template error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

async fn index_handler() -> Result<Html<String>, StatusCode> {
    render(IndexTemplate::blank())
}

async fn index_submit_handler(
    State(state): State<AppState>,
    Form(form): Form<SimilarityForm>,
) -> Result<Html<String>, StatusCode> {
    let user_input = form.user_input.ok_or(StatusCode::BAD_REQUEST)?;

    let start = std::time::Instant::now();
    let outcome = state.engine.find(&user_input);
    tracing::info!(
        "Form query of {} chars answered in {}ms",
        user_input.chars().count(),
        start.elapsed().as_millis()
    );

    render(IndexTemplate::with_outcome(&user_input, &outcome))
}

async fn similarity_handler(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let user_input = match body.get("user_input").and_then(|v| v.as_str()) {
        Some(input) if !input.is_empty() => input.to_string(),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "No input provided".to_string(),
                }),
            )
                .into_response();
        }
    };

    let start = std::time::Instant::now();
    let results = state.engine.find(&user_input);
    tracing::info!(
        "API query of {} chars answered in {}ms",
        user_input.chars().count(),
        start.elapsed().as_millis()
    );

    Json(SimilarityResponse {
        user_input,
        results,
    })
    .into_response()
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        verses: state.engine.verse_count(),
        clusters: state.engine.cluster_count(),
    })
}
