//! Utilities shared by the relay packages: logging setup and clock helpers.

pub mod logger;
pub mod time;
