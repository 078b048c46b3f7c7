//! HTTP route handlers for the tool API.

use axum::Router;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use serde_json::Value;
use siteops::actions::{CallError, ToolOutput, ToolSpec};
use tracing::{error, info};

use crate::state::AppState;

type ApiError = (StatusCode, String);

/// Build the API router.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/tools", get(list_tools))
        .route("/tools/{name}", post(call_tool))
}

async fn health() -> &'static str {
    "ok"
}

/// GET /api/tools - tool descriptors, same shape as MCP `tools/list`.
async fn list_tools(State(state): State<AppState>) -> Json<Vec<ToolSpec>> {
    Json(state.registry.tools())
}

/// POST /api/tools/{name} - run one tool. An empty body means no arguments.
///
/// Actions block on child processes, so they run on the blocking pool.
async fn call_tool(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Json<ToolOutput>, ApiError> {
    let arguments = read_arguments(&body)?;
    info!(tool = %name, "http tool call");

    let registry = state.registry.clone();
    let result = tokio::task::spawn_blocking(move || registry.invoke(&name, arguments))
        .await
        .map_err(|err| {
            error!(err = %err, "tool task failed to complete");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "tool task failed to complete".to_string(),
            )
        })?;

    match result {
        Ok(output) => Ok(Json(output)),
        Err(err @ CallError::UnknownTool(_)) => Err((StatusCode::NOT_FOUND, err.to_string())),
        Err(err @ CallError::InvalidArguments { .. }) => {
            Err((StatusCode::UNPROCESSABLE_ENTITY, err.to_string()))
        }
        Err(CallError::Failed(err)) => Ok(Json(ToolOutput::failure(&err))),
    }
}

fn read_arguments(body: &[u8]) -> Result<Value, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body)
        .map_err(|err| (StatusCode::BAD_REQUEST, format!("invalid JSON body: {err}")))
}
