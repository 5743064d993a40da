//! Telegram adapter (grammers/MTProto).
//!
//! This crate implements the `tsw-core` session port over the user-account
//! API; story endpoints (view counters, read markers, story reactions) do
//! not exist on the Bot API.

pub mod auth;
pub mod transport;
pub mod updates;

pub use transport::TelegramSession;

pub(crate) fn transport_err(e: impl std::fmt::Display) -> tsw_core::Error {
    tsw_core::Error::Transport(e.to_string())
}
