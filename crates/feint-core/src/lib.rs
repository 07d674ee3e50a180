//! # Feint Core
//!
//! Turn-based zone-guessing duel engine.
//!
//! Each turn one fighter attacks and the other defends. Both secretly commit
//! a body zone; equal zones block, different zones land a hit that may crit.
//! Roles swap after every exchange until one fighter's health reaches zero.
//!
//! ## Architecture
//!
//! - **Stats** ([`stats`]): effective stats derived once from base stats and
//!   equipment
//! - **Resolver** ([`resolver`]): pure outcome of one exchange given one draw
//! - **Turn control** ([`turn`]): the authoritative state machine owning both
//!   fighters and the pending-choice slots
//! - **Host** ([`host`]): per-frame driver merging local input with remote
//!   choices from a shared [`feint_session::SessionStore`]
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use feint_core::{DuelConfig, MatchHost};
//! use feint_core::feint_session::{MemorySessionStore, SessionStore, Slot, Zone};
//!
//! let config = DuelConfig::default();
//! let store = Arc::new(MemorySessionStore::new());
//! let mut host = MatchHost::start(config.build_controller(42), store.clone()).unwrap();
//!
//! // Player 1 chooses locally, player 2 through the shared store.
//! host.submit_local(Slot::One, Zone::Head).unwrap();
//! store.try_set_choice(host.session_id(), Slot::Two, Zone::Torso).unwrap();
//!
//! let resolution = host.tick().unwrap().expect("both slots filled");
//! println!("{}", resolution.outcome);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export the session substrate
pub use feint_session;

pub mod combatant;
pub mod config;
pub mod error;
pub mod host;
pub mod resolver;
pub mod stats;
pub mod summary;
pub mod turn;

pub use combatant::{CombatRecord, Combatant, ZoneTally};
pub use config::{ConfigError, DuelConfig, FighterConfig};
pub use error::TurnError;
pub use host::MatchHost;
pub use resolver::{round_tenths, CombatResolver, Outcome};
pub use stats::{derive_stats, BaseStats, EffectiveStats, Equipment};
pub use summary::{FighterSummary, MatchSummary};
pub use turn::{MatchPhase, Resolution, Role, TurnController};

#[cfg(test)]
mod tests;
