//! HTTP API request/response DTOs.

use serde::{Deserialize, Serialize};

/// `POST /api/users/{user_id}/signals` request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRequestDto {
    pub event: String,
    #[serde(default)]
    pub payload: Option<serde_json::Value>,
}

/// `POST /api/users/{user_id}/signals` response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalResponseDto {
    pub delivered: bool,
}

/// Occupants of one room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomOccupancyDto {
    pub chat_id: String,
    pub occupants: Vec<String>,
}

/// `GET /debug/presence` response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceSnapshotDto {
    pub online_users: Vec<String>,
    pub rooms: Vec<RoomOccupancyDto>,
}
