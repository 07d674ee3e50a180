//! Zone, side and slot vocabulary shared by the session record and the engine.
//!
//! - [`Zone`]: the three body regions a player can attack or defend
//! - [`Side`]: the two fixed positions, published as the attacker label
//! - [`Slot`]: the two per-player choice slots of a session
//! - [`SlotPair`]: a typed two-slot container indexed by [`Slot`]

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use crate::error::SessionError;

// =============================================================================
// Zone
// =============================================================================

/// Body region used as both an attack target and a defense target.
///
/// Serialized as the lowercase tokens `head`, `torso` and `legs`. Parsing is
/// case-insensitive.
///
/// # Example
///
/// ```
/// use feint_session::Zone;
///
/// let zone: Zone = "TORSO".parse().unwrap();
/// assert_eq!(zone, Zone::Torso);
/// assert_eq!(zone.to_string(), "torso");
/// assert!("arms".parse::<Zone>().is_err());
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    /// Head.
    Head,
    /// Torso.
    Torso,
    /// Legs.
    Legs,
}

impl Zone {
    /// Number of zones.
    pub const COUNT: usize = 3;

    /// All zones in display order. Ties in per-zone tallies resolve to the
    /// earliest zone in this order.
    pub const ALL: [Zone; Zone::COUNT] = [Zone::Head, Zone::Torso, Zone::Legs];

    /// Dense index of this zone, in `0..Zone::COUNT`.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Head => 0,
            Self::Torso => 1,
            Self::Legs => 2,
        }
    }

    /// The wire token for this zone.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Torso => "torso",
            Self::Legs => "legs",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Zone {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Zone::ALL
            .into_iter()
            .find(|zone| zone.token().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| SessionError::InvalidZone(s.to_owned()))
    }
}

// =============================================================================
// Side
// =============================================================================

/// One of the two fixed positions in a duel.
///
/// The session record publishes the attacker's side so that a remote
/// participant can work out which role their slot currently holds.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Left position, owned by player 1.
    Left,
    /// Right position, owned by player 2.
    Right,
}

impl Side {
    /// The other side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// The wire token for this side.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Side {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            _ => Err(SessionError::InvalidSide(s.to_owned())),
        }
    }
}

// =============================================================================
// Slot
// =============================================================================

/// A player's choice slot within a session.
///
/// Player 1 always stands on the left and player 2 on the right; a slot holds
/// the attacker role when the session's attacker side equals the slot's side.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Slot {
    /// Player 1.
    One,
    /// Player 2.
    Two,
}

impl Slot {
    /// Both slots, player 1 first.
    pub const BOTH: [Slot; 2] = [Slot::One, Slot::Two];

    /// The side this slot's player stands on.
    #[must_use]
    pub const fn side(self) -> Side {
        match self {
            Self::One => Side::Left,
            Self::Two => Side::Right,
        }
    }

    /// The slot whose player stands on `side`.
    #[must_use]
    pub const fn from_side(side: Side) -> Self {
        match side {
            Side::Left => Self::One,
            Side::Right => Self::Two,
        }
    }

    /// The opposing slot.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }

    /// Player number, 1 or 2.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

impl FromStr for Slot {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Self::One),
            "2" => Ok(Self::Two),
            _ => Err(SessionError::InvalidSlot(s.to_owned())),
        }
    }
}

// =============================================================================
// SlotPair
// =============================================================================

/// Two values, one per [`Slot`].
///
/// # Example
///
/// ```
/// use feint_session::{Slot, SlotPair};
///
/// let mut pair = SlotPair::new(0, 0);
/// pair[Slot::Two] += 5;
/// assert_eq!(pair[Slot::One], 0);
/// assert_eq!(pair[Slot::Two], 5);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotPair<T> {
    one: T,
    two: T,
}

impl<T> SlotPair<T> {
    /// Creates a pair from the values for player 1 and player 2.
    #[must_use]
    pub const fn new(one: T, two: T) -> Self {
        Self { one, two }
    }

    /// Iterates `(slot, value)` in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Slot, &T)> {
        [(Slot::One, &self.one), (Slot::Two, &self.two)].into_iter()
    }

    /// Mutable references to both values: `first`'s value, then the other's.
    pub fn split_mut(&mut self, first: Slot) -> (&mut T, &mut T) {
        match first {
            Slot::One => (&mut self.one, &mut self.two),
            Slot::Two => (&mut self.two, &mut self.one),
        }
    }

    /// Applies `f` to both values.
    #[must_use]
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> SlotPair<U> {
        SlotPair {
            one: f(self.one),
            two: f(self.two),
        }
    }
}

impl<T> Index<Slot> for SlotPair<T> {
    type Output = T;

    fn index(&self, slot: Slot) -> &T {
        match slot {
            Slot::One => &self.one,
            Slot::Two => &self.two,
        }
    }
}

impl<T> IndexMut<Slot> for SlotPair<T> {
    fn index_mut(&mut self, slot: Slot) -> &mut T {
        match slot {
            Slot::One => &mut self.one,
            Slot::Two => &mut self.two,
        }
    }
}
