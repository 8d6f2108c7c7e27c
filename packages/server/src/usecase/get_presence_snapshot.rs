//! UseCase: 在室状態のスナップショット取得（デバッグ用）

use std::sync::Arc;

use crate::domain::{PresenceSnapshot, RoomPresenceTracker, SessionRegistry};

pub struct GetPresenceSnapshotUseCase {
    session_registry: Arc<dyn SessionRegistry>,
    room_presence: Arc<dyn RoomPresenceTracker>,
}

impl GetPresenceSnapshotUseCase {
    pub fn new(
        session_registry: Arc<dyn SessionRegistry>,
        room_presence: Arc<dyn RoomPresenceTracker>,
    ) -> Self {
        Self {
            session_registry,
            room_presence,
        }
    }

    pub async fn execute(&self) -> PresenceSnapshot {
        let mut online_users = self.session_registry.online_users().await;
        online_users.sort();
        PresenceSnapshot {
            online_users,
            rooms: self.room_presence.snapshot().await,
        }
    }
}
