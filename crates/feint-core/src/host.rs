//! Per-frame driver tying the turn controller to a shared session store.
//!
//! The host is the only process that resolves exchanges. Every frame it:
//!
//! 1. re-publishes a rotation that failed to reach the store last frame
//! 2. snapshots the session record
//! 3. merges every filled store slot into the controller
//! 4. advances once the *store* shows both slots filled
//! 5. clears both store slots and publishes the next attacker side, unless
//!    the exchange ended the match
//!
//! Advancing only on a full store record matters: while both slots are filled
//! the store refuses every write, so the clear in step 5 can never drop a
//! choice the store already accepted.

use std::sync::Arc;

use feint_session::{SessionId, SessionRecord, SessionStore, Side, Slot, Zone};

use crate::error::TurnError;
use crate::summary::MatchSummary;
use crate::turn::{Resolution, TurnController};

/// Hosts one match on a session.
pub struct MatchHost {
    controller: TurnController,
    store: Arc<dyn SessionStore>,
    session: SessionId,
    /// Attacker side still to be published with a slot clear.
    pending_publish: Option<Side>,
}

impl MatchHost {
    /// Creates a fresh session for `controller` and starts hosting it.
    ///
    /// # Errors
    ///
    /// Any [`feint_session::SessionError`] from session creation.
    pub fn start(
        controller: TurnController,
        store: Arc<dyn SessionStore>,
    ) -> Result<Self, TurnError> {
        let session = store.create_session(controller.attacker_side())?;
        tracing::info!(session = %session, seed = controller.seed(), "hosting match");
        Ok(Self {
            controller,
            store,
            session,
            pending_publish: None,
        })
    }

    /// Code remote players use to reach this match.
    #[must_use]
    pub fn session_id(&self) -> &SessionId {
        &self.session
    }

    /// The authoritative controller.
    #[must_use]
    pub fn controller(&self) -> &TurnController {
        &self.controller
    }

    /// The shared store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Submits a choice made at this process's own input.
    ///
    /// Goes through the store first, so a local player and a remote writer
    /// for the same slot race under the same compare-and-swap. Returns
    /// whether the choice was accepted.
    ///
    /// # Errors
    ///
    /// - [`TurnError::MatchOver`] once the match has ended
    /// - [`TurnError::Session`] if the store fails
    pub fn submit_local(&mut self, slot: Slot, zone: Zone) -> Result<bool, TurnError> {
        if self.controller.is_over() {
            return Err(TurnError::MatchOver);
        }
        self.flush_publish()?;

        if !self.store.try_set_choice(&self.session, slot, zone)? {
            tracing::debug!(%slot, "local choice lost to an earlier write");
            return Ok(false);
        }
        self.controller.submit_choice(slot, zone)?;
        Ok(true)
    }

    /// Runs one frame.
    ///
    /// Returns the resolution when an exchange was resolved this frame.
    ///
    /// # Errors
    ///
    /// [`TurnError::Session`] if the store cannot be read, or if a rotation
    /// left over from an earlier frame still cannot be published.
    pub fn tick(&mut self) -> Result<Option<Resolution>, TurnError> {
        self.flush_publish()?;
        if self.controller.is_over() {
            return Ok(None);
        }

        let record = self.store.snapshot(&self.session)?;
        self.merge(&record)?;
        if !record.both_filled() {
            return Ok(None);
        }

        let Some(resolution) = self.controller.try_advance() else {
            return Ok(None);
        };

        // A knockout leaves both store slots filled, so every write made
        // before the rematch is rejected rather than silently dropped.
        if resolution.match_over {
            return Ok(Some(resolution));
        }

        self.pending_publish = Some(self.controller.attacker_side());
        if let Err(e) = self.flush_publish() {
            tracing::warn!(session = %self.session, "rotation not published, retrying next frame: {e}");
        }
        Ok(Some(resolution))
    }

    /// Starts a rematch on the same session.
    ///
    /// Clears the final exchange's choices, which stay in the store while the
    /// match is over, and publishes the new opening side.
    ///
    /// # Errors
    ///
    /// [`TurnError::Session`] if the store cannot be updated; the rematch
    /// is still started and the clear is retried on the next frame.
    pub fn reset_match(&mut self) -> Result<(), TurnError> {
        self.controller.reset_match();
        self.pending_publish = Some(self.controller.attacker_side());
        self.flush_publish()
    }

    /// End-of-match summary, once the match is over.
    #[must_use]
    pub fn summary(&self) -> Option<MatchSummary> {
        self.controller.summary()
    }

    fn flush_publish(&mut self) -> Result<(), TurnError> {
        if let Some(side) = self.pending_publish {
            self.store.clear_and_rotate(&self.session, side)?;
            self.pending_publish = None;
        }
        Ok(())
    }

    fn merge(&mut self, record: &SessionRecord) -> Result<(), TurnError> {
        for slot in Slot::BOTH {
            let Some(zone) = record.choice(slot) else {
                continue;
            };
            match self.controller.pending(slot) {
                None => self.controller.submit_choice(slot, zone)?,
                Some(local) if local != zone => {
                    tracing::warn!(%slot, %local, stored = %zone, "store and controller disagree, keeping controller");
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for MatchHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchHost")
            .field("session", &self.session)
            .field("controller", &self.controller)
            .field("pending_publish", &self.pending_publish)
            .finish_non_exhaustive()
    }
}
