//! Request handlers.

use axum::{
    Json,
    body::Bytes,
    http::{StatusCode, Uri},
    response::IntoResponse,
};
use serde_json::json;

use super::AppState;
use super::error::ApiError;
use crate::commands::{self, CommandCatalog};
use crate::protocol::{CommandSpec, encode_body};

/// Decode, validate and write one external command.
///
/// Nothing reaches the channel unless the body encodes cleanly.
pub async fn submit_command(
    state: AppState,
    spec: &'static CommandSpec,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let line = match encode_body(spec, &body, state.clock.now_unix()) {
        Ok(line) => line,
        Err(err) => {
            tracing::warn!(command = spec.name, error = %err, "rejected command");
            return Err(err.into());
        }
    };

    if let Err(err) = state.writer.write(line).await {
        tracing::error!(command = spec.name, error = %err, "failed to write command");
        return Err(err.into());
    }

    tracing::info!(command = spec.name, "accepted command");
    Ok(StatusCode::OK)
}

/// List the supported commands.
pub async fn list_commands() -> Json<CommandCatalog> {
    Json(commands::list_commands())
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn not_found(uri: Uri) -> impl IntoResponse {
    (StatusCode::NOT_FOUND, format!("No route for {}", uri.path()))
}
