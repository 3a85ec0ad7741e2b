//! HTTP front door for Castwise.
//!
//! - `POST /agent/run`: run the podcast agent for one objective
//! - `GET  /health`: liveness probe
//!
//! Each request gets its own run (memory, counter, action record) against
//! one shared, immutable agent. Aborted runs are reported as a generic
//! failure; the diagnostic only goes to the log.

use axum::extract::DefaultBodyLimit;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{
    Router,
    extract::State,
    response::Json,
    routing::{get, post},
};
use castwise_agent::{LoopState, PodcastAgent};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{error, info, warn};

/// Request body size limit.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Shared application state for the gateway.
pub struct GatewayState {
    pub agent: PodcastAgent,
}

type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
///
/// Layers: CORS limited to `allowed_origins`, 1 MB body limit, HTTP
/// trace logging.
pub fn build_router(state: SharedState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/agent/run", post(run_handler))
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors_layer(allowed_origins))
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600))
}

/// Start the gateway HTTP server.
pub async fn start(config: castwise_config::AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let agent = PodcastAgent::from_config(&config)?;
    let state = Arc::new(GatewayState { agent });
    let app = build_router(state, &config.gateway.allowed_origins);

    info!(addr = %addr, origins = ?config.gateway.allowed_origins, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Deserialize)]
struct RunRequest {
    #[serde(default)]
    objective: Option<String>,
}

#[derive(Serialize)]
struct RunResponse {
    result: Option<String>,
    status: &'static str,
    actions: u32,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
}

fn error_response(status: StatusCode, error: &'static str) -> Response {
    (status, Json(ErrorResponse { error })).into_response()
}

async fn run_handler(
    State(state): State<SharedState>,
    payload: Result<Json<RunRequest>, JsonRejection>,
) -> Response {
    let objective = match payload {
        Ok(Json(RunRequest {
            objective: Some(objective),
        })) if !objective.trim().is_empty() => objective,
        Ok(_) => return error_response(StatusCode::BAD_REQUEST, "Objective is required"),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            return rejection.into_response();
        }
        Err(rejection) => {
            warn!(error = %rejection, "Rejected agent run request");
            return error_response(StatusCode::BAD_REQUEST, "Objective is required");
        }
    };

    info!(objective_len = objective.len(), "Agent run requested");
    let outcome = state.agent.run(&objective).await;

    if let LoopState::Aborted(e) = &outcome.state {
        error!(run_id = %outcome.run_id, error = %e, "Agent run aborted");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to run agent");
    }

    Json(RunResponse {
        status: outcome.state.label(),
        actions: outcome.actions_taken,
        result: outcome.memory.final_answer,
    })
    .into_response()
}
