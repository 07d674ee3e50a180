//! Errors raised while driving a match.

use feint_session::{SessionError, Slot};
use thiserror::Error;

/// Errors returned by [`crate::TurnController`] and [`crate::MatchHost`].
///
/// None of these are fatal to the match: each is reported to whichever
/// party caused it and the turn state is left untouched.
#[derive(Debug, Error)]
pub enum TurnError {
    /// The slot already holds a choice for this turn.
    #[error("choice already made for player {slot}")]
    ChoiceRejected {
        /// Slot that was already filled.
        slot: Slot,
    },

    /// The match has ended; only a reset reopens it.
    #[error("the match is over")]
    MatchOver,

    /// The shared session store failed.
    #[error(transparent)]
    Session(#[from] SessionError),
}
