//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::{TargetedSignal, UserId},
    infrastructure::dto::http::{PresenceSnapshotDto, SignalRequestDto, SignalResponseDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Send a targeted signal to one user's live connection
///
/// Responds `202 Accepted` whether or not the user is online; `delivered` tells which.
/// Blank event names and the relay's own event names are refused with `400`.
pub async fn post_signal(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(body): Json<SignalRequestDto>,
) -> Result<(StatusCode, Json<SignalResponseDto>), StatusCode> {
    let user_id = UserId::try_from(user_id).map_err(|e| {
        tracing::warn!("Invalid user id for signal: {}", e);
        StatusCode::BAD_REQUEST
    })?;
    let signal = TargetedSignal::new(body.event, body.payload).map_err(|e| {
        tracing::warn!("Refusing signal for '{}': {}", user_id, e);
        StatusCode::BAD_REQUEST
    })?;
    let delivered = state.signal_user_usecase.execute(&user_id, signal).await;

    Ok((StatusCode::ACCEPTED, Json(SignalResponseDto { delivered })))
}

/// Debug endpoint: online users and room occupants
pub async fn debug_presence(State(state): State<Arc<AppState>>) -> Json<PresenceSnapshotDto> {
    let snapshot = state.get_presence_snapshot_usecase.execute().await;
    Json(snapshot.into())
}
