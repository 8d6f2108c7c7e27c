//! 接続時の資格情報検証の実装

pub mod jwt;

pub use jwt::{Claims, JwtTokenVerifier};
