//! Infrastructure 層
//!
//! ドメイン層の trait の具体的な実装と、ワイヤ形式（DTO）への変換を提供します。

pub mod auth;
pub mod dto;
pub mod repository;
pub mod seed;
pub mod session_registry;
