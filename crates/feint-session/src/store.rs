//! The session store contract.

use crate::error::{Result, SessionError};
use crate::record::{ParticipantId, SessionId, SessionRecord};
use crate::zone::{Side, Slot, Zone};

/// How many fresh codes [`SessionStore::create_session`] draws before giving up.
pub const MAX_CODE_ATTEMPTS: u32 = 64;

/// Shared, externally visible turn state of every active session.
///
/// Implementations must make each mutating method atomic with respect to
/// every other caller on the same session: the predicate a mutation depends
/// on (slot empty, record absent) is evaluated under the same lock or
/// transaction as the write itself. A separate read followed by a separate
/// write is never correct here.
///
/// Different sessions are isolated from each other; nothing is promised
/// across sessions.
pub trait SessionStore: Send + Sync {
    /// Inserts `record` unless a session with the same code exists.
    ///
    /// Returns whether the record was inserted.
    fn insert_if_absent(&self, record: SessionRecord) -> Result<bool>;

    /// Inserts `record`, replacing any existing session with the same code.
    fn insert_session(&self, record: SessionRecord) -> Result<()>;

    /// Compare-and-swap on one slot: writes `zone` only if the slot is empty.
    ///
    /// Returns `Ok(false)` without waiting when the slot is already filled.
    ///
    /// # Errors
    ///
    /// [`SessionError::UnknownSession`] if no record exists for `id`.
    fn try_set_choice(&self, id: &SessionId, slot: Slot, zone: Zone) -> Result<bool>;

    /// One consistent copy of the record.
    ///
    /// # Errors
    ///
    /// [`SessionError::UnknownSession`] if no record exists for `id`.
    fn snapshot(&self, id: &SessionId) -> Result<SessionRecord>;

    /// Empties both slots and publishes `next_attacker` in one step.
    ///
    /// Only the authoritative process calls this, and only after it has
    /// consumed both choices into a resolution.
    fn clear_and_rotate(&self, id: &SessionId, next_attacker: Side) -> Result<()>;

    /// Records the remote participant speaking for `slot`.
    fn bind_participant(&self, id: &SessionId, slot: Slot, participant: ParticipantId)
        -> Result<()>;

    /// Allocates a session under a fresh code with both slots empty.
    ///
    /// # Errors
    ///
    /// [`SessionError::CodesExhausted`] if every drawn code was taken.
    fn create_session(&self, attacker_side: Side) -> Result<SessionId> {
        let mut rng = rand::thread_rng();
        for _ in 0..MAX_CODE_ATTEMPTS {
            let id = SessionId::generate(&mut rng);
            if self.insert_if_absent(SessionRecord::new(id.clone(), attacker_side))? {
                tracing::info!(session = %id, %attacker_side, "session created");
                return Ok(id);
            }
        }
        Err(SessionError::CodesExhausted(MAX_CODE_ATTEMPTS))
    }

    /// Whether a record exists for `id`.
    fn exists(&self, id: &SessionId) -> Result<bool> {
        match self.snapshot(id) {
            Ok(_) => Ok(true),
            Err(SessionError::UnknownSession(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
