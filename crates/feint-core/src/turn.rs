//! The authoritative turn state machine.
//!
//! # States
//!
//! ```text
//!                  submit_choice (fills an empty slot)
//!                 ┌──────────────┐
//!                 ▼              │
//!   ──► AwaitingChoices ─────────┘
//!          │      ▲
//!          │      │ defender still standing: swap roles
//!          ▼      │
//!     try_advance (both slots filled: resolve, apply, clear)
//!          │
//!          │ defender health <= 0
//!          ▼
//!       MatchOver ──── reset_match ───► AwaitingChoices
//! ```
//!
//! Resolving happens inside a single `try_advance` call and is never
//! observable from outside.
//!
//! # Invariants
//!
//! - A filled slot is never overwritten before both slots are cleared.
//! - Only the defender's health changes in an exchange, so the match cannot
//!   end in a double knockout: the winner is the attacker of the final
//!   exchange.

use feint_session::{Side, Slot, SlotPair, Zone};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::combatant::Combatant;
use crate::error::TurnError;
use crate::resolver::{CombatResolver, Outcome};
use crate::summary::MatchSummary;

/// Log line shown before the first exchange.
pub const OPENING_LOG: &str = "THE BATTLE BEGINS!";

/// A fighter's role in the current turn.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Picks the zone to strike.
    Attacker,
    /// Picks the zone to guard.
    Defender,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attacker => write!(f, "attack"),
            Self::Defender => write!(f, "defense"),
        }
    }
}

/// Observable state of a match.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Waiting for one or both choices of the current turn.
    AwaitingChoices,
    /// Terminal until [`TurnController::reset_match`].
    MatchOver {
        /// The fighter left standing.
        winner: Slot,
    },
}

/// Everything that happened in one resolved exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    /// 1-based turn number within the match.
    pub turn: u32,
    /// Who attacked.
    pub attacker: Slot,
    /// Who defended.
    pub defender: Slot,
    /// Zone the attacker struck.
    pub attack_zone: Zone,
    /// Zone the defender guarded.
    pub defense_zone: Zone,
    /// Block or hit.
    pub outcome: Outcome,
    /// Defender's health after the exchange (unclamped).
    pub defender_health: f64,
    /// Whether this exchange ended the match.
    pub match_over: bool,
}

/// Drives a match between two fighters.
///
/// Not shared across threads: the host's frame loop is the only caller and
/// serializes every submission and advance.
#[derive(Debug, Clone)]
pub struct TurnController {
    fighters: SlotPair<Combatant>,
    attacker: Slot,
    /// Who opened the current match; the next match opens with the other.
    opening_attacker: Slot,
    pending: SlotPair<Option<Zone>>,
    phase: MatchPhase,
    resolver: CombatResolver,
    rng: ChaCha8Rng,
    seed: u64,
    turn: u32,
    last_log: String,
}

impl TurnController {
    /// Creates a controller with both fighters at full health.
    ///
    /// `one` must answer to [`Slot::One`] and `two` to [`Slot::Two`]. The RNG
    /// is seeded from `seed`, so identical choices replay identically.
    #[must_use]
    pub fn new(one: Combatant, two: Combatant, opening_attacker: Slot, seed: u64) -> Self {
        debug_assert_eq!(one.slot(), Slot::One);
        debug_assert_eq!(two.slot(), Slot::Two);

        Self {
            fighters: SlotPair::new(one, two),
            attacker: opening_attacker,
            opening_attacker,
            pending: SlotPair::default(),
            phase: MatchPhase::AwaitingChoices,
            resolver: CombatResolver::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            turn: 0,
            last_log: OPENING_LOG.to_owned(),
        }
    }

    /// The fighter in `slot`.
    #[must_use]
    pub fn fighter(&self, slot: Slot) -> &Combatant {
        &self.fighters[slot]
    }

    /// Both fighters.
    #[must_use]
    pub fn fighters(&self) -> &SlotPair<Combatant> {
        &self.fighters
    }

    /// Slot currently attacking.
    #[must_use]
    pub fn attacker(&self) -> Slot {
        self.attacker
    }

    /// Slot currently defending.
    #[must_use]
    pub fn defender(&self) -> Slot {
        self.attacker.other()
    }

    /// Side label of the current attacker, as published to remote writers.
    #[must_use]
    pub fn attacker_side(&self) -> Side {
        self.attacker.side()
    }

    /// The slot holding `role` this turn.
    #[must_use]
    pub fn slot_for(&self, role: Role) -> Slot {
        match role {
            Role::Attacker => self.attacker,
            Role::Defender => self.defender(),
        }
    }

    /// The role `slot` holds this turn.
    #[must_use]
    pub fn role_of(&self, slot: Slot) -> Role {
        if slot == self.attacker {
            Role::Attacker
        } else {
            Role::Defender
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    /// True once the match has ended.
    #[must_use]
    pub fn is_over(&self) -> bool {
        matches!(self.phase, MatchPhase::MatchOver { .. })
    }

    /// The winner, once the match has ended.
    #[must_use]
    pub fn winner(&self) -> Option<Slot> {
        match self.phase {
            MatchPhase::MatchOver { winner } => Some(winner),
            MatchPhase::AwaitingChoices => None,
        }
    }

    /// The choice committed in `slot` for this turn.
    #[must_use]
    pub fn pending(&self, slot: Slot) -> Option<Zone> {
        self.pending[slot]
    }

    /// Seed the RNG was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of exchanges resolved in the current match.
    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Combat-log line describing the last exchange.
    #[must_use]
    pub fn last_log(&self) -> &str {
        &self.last_log
    }

    /// Commits `zone` for `slot` if the slot is still empty this turn.
    ///
    /// # Errors
    ///
    /// - [`TurnError::MatchOver`] once the match has ended
    /// - [`TurnError::ChoiceRejected`] if the slot is already filled
    pub fn submit_choice(&mut self, slot: Slot, zone: Zone) -> Result<(), TurnError> {
        if self.is_over() {
            return Err(TurnError::MatchOver);
        }
        if self.pending[slot].is_some() {
            return Err(TurnError::ChoiceRejected { slot });
        }
        self.pending[slot] = Some(zone);
        tracing::debug!(%slot, role = %self.role_of(slot), "choice committed");
        Ok(())
    }

    /// Commits `zone` for whichever slot holds `role` this turn.
    ///
    /// # Errors
    ///
    /// Same as [`TurnController::submit_choice`].
    pub fn submit_role_choice(&mut self, role: Role, zone: Zone) -> Result<(), TurnError> {
        self.submit_choice(self.slot_for(role), zone)
    }

    /// Resolves the turn if both slots are filled.
    ///
    /// Applies the outcome, clears both slots, then either ends the match or
    /// swaps attacker and defender. Returns `None` when the turn is not yet
    /// advanceable or the match is over.
    pub fn try_advance(&mut self) -> Option<Resolution> {
        if self.is_over() {
            return None;
        }
        let attacker_slot = self.attacker;
        let defender_slot = attacker_slot.other();
        let attack_zone = self.pending[attacker_slot]?;
        let defense_zone = self.pending[defender_slot]?;

        let (attacker, defender) = self.fighters.split_mut(attacker_slot);
        let outcome = self.resolver.resolve(
            attacker.stats(),
            defender.stats(),
            attack_zone,
            defense_zone,
            &mut self.rng,
        );

        match outcome {
            Outcome::Blocked { zone } => defender.record_mut().record_block(zone),
            Outcome::Hit { zone, damage, crit } => {
                attacker.record_mut().record_hit(zone, damage, crit);
                defender.take_damage(damage);
            }
        }
        let defender_health = defender.health();
        let match_over = defender.is_defeated();

        self.pending = SlotPair::default();
        self.turn += 1;
        self.last_log = outcome.to_string();

        tracing::debug!(
            turn = self.turn,
            attacker = %attacker_slot,
            %attack_zone,
            %defense_zone,
            defender_health,
            "{}",
            self.last_log
        );

        if match_over {
            self.phase = MatchPhase::MatchOver {
                winner: attacker_slot,
            };
            tracing::info!(
                winner = %attacker_slot,
                turns = self.turn,
                "match over"
            );
        } else {
            self.attacker = defender_slot;
        }

        Some(Resolution {
            turn: self.turn,
            attacker: attacker_slot,
            defender: defender_slot,
            attack_zone,
            defense_zone,
            outcome,
            defender_health,
            match_over,
        })
    }

    /// Starts a new match with the same fighters.
    ///
    /// Health and statistics are restored, pending choices dropped, and the
    /// opening attacker rotates relative to the previous match. The RNG
    /// stream continues rather than restarting.
    pub fn reset_match(&mut self) {
        for slot in Slot::BOTH {
            self.fighters[slot].reset();
        }
        self.opening_attacker = self.opening_attacker.other();
        self.attacker = self.opening_attacker;
        self.pending = SlotPair::default();
        self.phase = MatchPhase::AwaitingChoices;
        self.turn = 0;
        self.last_log = OPENING_LOG.to_owned();
        tracing::info!(opening_attacker = %self.attacker, "match reset");
    }

    /// End-of-match summary, once the match is over.
    #[must_use]
    pub fn summary(&self) -> Option<MatchSummary> {
        self.winner()
            .map(|winner| MatchSummary::new(winner, &self.fighters, self.turn))
    }
}
