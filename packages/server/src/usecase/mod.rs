//! UseCase 層
//!
//! 接続ごとのインテント（入室・退室・送信）と、接続のライフサイクル、
//! ターゲットシグナルを扱うアプリケーションロジック。

pub mod connect_session;
pub mod disconnect_session;
pub mod error;
pub mod get_presence_snapshot;
pub mod join_chat_room;
pub mod leave_chat_room;
pub mod send_message;
pub mod signal_user;

pub use connect_session::ConnectSessionUseCase;
pub use disconnect_session::DisconnectSessionUseCase;
pub use error::{ConnectError, JoinRoomError, SendMessageError};
pub use get_presence_snapshot::GetPresenceSnapshotUseCase;
pub use join_chat_room::JoinChatRoomUseCase;
pub use leave_chat_room::LeaveChatRoomUseCase;
pub use send_message::{SendMessageUseCase, SendOutcome};
pub use signal_user::SignalUserUseCase;
