//! Shared application state.

use std::sync::Arc;

use crate::usecase::{
    ConnectSessionUseCase, DisconnectSessionUseCase, GetPresenceSnapshotUseCase,
    JoinChatRoomUseCase, LeaveChatRoomUseCase, SendMessageUseCase, SignalUserUseCase,
};

/// Shared application state
pub struct AppState {
    /// ConnectSessionUseCase（認証とセッション登録）
    pub connect_session_usecase: Arc<ConnectSessionUseCase>,
    /// DisconnectSessionUseCase（切断と `leave` インテント）
    pub disconnect_session_usecase: Arc<DisconnectSessionUseCase>,
    /// JoinChatRoomUseCase（ルーム入室）
    pub join_chat_room_usecase: Arc<JoinChatRoomUseCase>,
    /// LeaveChatRoomUseCase（ルーム退室）
    pub leave_chat_room_usecase: Arc<LeaveChatRoomUseCase>,
    /// SendMessageUseCase（メッセージ送信）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// SignalUserUseCase（ターゲットシグナル）
    pub signal_user_usecase: Arc<SignalUserUseCase>,
    /// GetPresenceSnapshotUseCase（デバッグ用スナップショット）
    pub get_presence_snapshot_usecase: Arc<GetPresenceSnapshotUseCase>,
}
