//! Session identifiers and the shared per-match record.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SessionError;
use crate::zone::{Side, Slot, SlotPair, Zone};

/// Number of digits in a session code.
pub const SESSION_CODE_LEN: usize = 6;

// =============================================================================
// SessionId
// =============================================================================

/// Six-digit numeric code identifying a session.
///
/// The code is the only credential a remote participant needs to target a
/// match. It is generated locally and shown to the players out of band.
///
/// # Example
///
/// ```
/// use feint_session::SessionId;
///
/// let id: SessionId = "042917".parse().unwrap();
/// assert_eq!(id.as_str(), "042917");
/// assert!("12345".parse::<SessionId>().is_err());
/// assert!("12a456".parse::<SessionId>().is_err());
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    /// Validates and wraps a session code.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidSessionId`] unless `code` is exactly six
    /// ASCII digits.
    pub fn new(code: impl Into<String>) -> Result<Self, SessionError> {
        let code = code.into();
        if code.len() == SESSION_CODE_LEN && code.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(code))
        } else {
            Err(SessionError::InvalidSessionId(code))
        }
    }

    /// Draws a fresh code in `100000..=999999`.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.gen_range(100_000..1_000_000u32).to_string())
    }

    /// The code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionId({})", self.0)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SessionId {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.trim())
    }
}

impl TryFrom<String> for SessionId {
    type Error = SessionError;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        Self::new(code)
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

/// Opaque identifier of a remote participant (for example a chat user id).
///
/// Recorded for bookkeeping only; it grants nothing.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(i64);

impl ParticipantId {
    /// Wraps a raw participant identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// SessionRecord
// =============================================================================

/// Shared turn state of one match.
///
/// The local authoritative process owns `attacker_side` and the
/// clear-and-rotate transition. Remote writers only ever move a single slot
/// from empty to filled.
///
/// On disk the record is one flat row:
///
/// ```json
/// {"session_id":"123456","attacker_side":"left","p1_choice":"head","p2_choice":null,"p1_id":null,"p2_id":null}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RecordRow", into = "RecordRow")]
pub struct SessionRecord {
    id: SessionId,
    attacker_side: Side,
    choices: SlotPair<Option<Zone>>,
    participants: SlotPair<Option<ParticipantId>>,
}

impl SessionRecord {
    /// Creates a record with both slots empty.
    #[must_use]
    pub fn new(id: SessionId, attacker_side: Side) -> Self {
        Self {
            id,
            attacker_side,
            choices: SlotPair::default(),
            participants: SlotPair::default(),
        }
    }

    /// The session code.
    #[must_use]
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Side of the player currently attacking.
    #[must_use]
    pub fn attacker_side(&self) -> Side {
        self.attacker_side
    }

    /// The committed zone in `slot`, if any.
    #[must_use]
    pub fn choice(&self, slot: Slot) -> Option<Zone> {
        self.choices[slot]
    }

    /// Both slots.
    #[must_use]
    pub fn choices(&self) -> SlotPair<Option<Zone>> {
        self.choices
    }

    /// True once both players have committed for this turn.
    #[must_use]
    pub fn both_filled(&self) -> bool {
        self.choices.iter().all(|(_, choice)| choice.is_some())
    }

    /// True if `slot` currently holds the attacker role.
    #[must_use]
    pub fn holds_attack(&self, slot: Slot) -> bool {
        slot.side() == self.attacker_side
    }

    /// Remote participant bound to `slot`, if any.
    #[must_use]
    pub fn participant(&self, slot: Slot) -> Option<ParticipantId> {
        self.participants[slot]
    }

    /// Write-once transition: fills `slot` only if it is empty.
    ///
    /// Returns whether the write happened. Stores call this while holding
    /// the record's lock; it is the only path that sets a choice.
    pub fn try_fill(&mut self, slot: Slot, zone: Zone) -> bool {
        if self.choices[slot].is_some() {
            return false;
        }
        self.choices[slot] = Some(zone);
        true
    }

    /// Empties both slots and publishes the next attacker side.
    pub fn clear_and_rotate(&mut self, next_attacker: Side) {
        self.choices = SlotPair::default();
        self.attacker_side = next_attacker;
    }

    /// Records which remote participant speaks for `slot`.
    pub fn bind(&mut self, slot: Slot, participant: ParticipantId) {
        self.participants[slot] = Some(participant);
    }
}

/// Flat column layout of a persisted record.
#[derive(Serialize, Deserialize)]
struct RecordRow {
    session_id: SessionId,
    attacker_side: Side,
    p1_choice: Option<Zone>,
    p2_choice: Option<Zone>,
    #[serde(default)]
    p1_id: Option<ParticipantId>,
    #[serde(default)]
    p2_id: Option<ParticipantId>,
}

impl From<RecordRow> for SessionRecord {
    fn from(row: RecordRow) -> Self {
        Self {
            id: row.session_id,
            attacker_side: row.attacker_side,
            choices: SlotPair::new(row.p1_choice, row.p2_choice),
            participants: SlotPair::new(row.p1_id, row.p2_id),
        }
    }
}

impl From<SessionRecord> for RecordRow {
    fn from(record: SessionRecord) -> Self {
        Self {
            session_id: record.id,
            attacker_side: record.attacker_side,
            p1_choice: record.choices[Slot::One],
            p2_choice: record.choices[Slot::Two],
            p1_id: record.participants[Slot::One],
            p2_id: record.participants[Slot::Two],
        }
    }
}
