//! Error types raised by session stores.

use thiserror::Error;

use crate::record::SessionId;

/// Errors surfaced by session stores and token parsing.
///
/// A rejected choice is not an error at this layer: the compare-and-swap
/// reports it as `Ok(false)` so the caller can tell "slot already taken"
/// apart from a store failure.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No record exists for the given session code.
    #[error("session not found: {0}")]
    UnknownSession(SessionId),

    /// The value is not one of the three zone tokens.
    #[error("invalid zone {0:?}: expected head, torso or legs")]
    InvalidZone(String),

    /// The value is not one of the two side tokens.
    #[error("invalid side {0:?}: expected left or right")]
    InvalidSide(String),

    /// The value does not name a player slot.
    #[error("invalid slot {0:?}: expected 1 or 2")]
    InvalidSlot(String),

    /// The value is not a six-digit session code.
    #[error("invalid session code {0:?}: expected 6 digits")]
    InvalidSessionId(String),

    /// Another writer held the session lock for the whole wait budget.
    #[error("session {id} is busy: lock not acquired within {waited_ms} ms")]
    Busy {
        /// Session whose lock could not be acquired.
        id: SessionId,
        /// How long the store waited before giving up.
        waited_ms: u64,
    },

    /// Every generated code collided with an existing session.
    #[error("no free session code after {0} attempts")]
    CodesExhausted(u32),

    /// An in-process lock was poisoned by a panicking writer.
    #[error("session store lock was poisoned")]
    LockPoisoned,

    /// Filesystem failure in the file-backed store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored record could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;
