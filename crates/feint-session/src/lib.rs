//! # Feint Session
//!
//! Shared turn-session records for Feint duels.
//!
//! A session is the one piece of state that the authoritative match process
//! and a remote participant both touch. Each turn, every player commits
//! exactly one [`Zone`] into their own slot; the authoritative process reads
//! both slots, resolves the exchange, then clears the slots and publishes
//! which [`Side`] attacks next.
//!
//! ## Protocol
//!
//! - [`SessionStore::try_set_choice`] is a compare-and-swap: it writes only if
//!   the slot is empty, and the emptiness check happens under the same lock
//!   as the write.
//! - [`SessionStore::snapshot`] returns one consistent copy of the record.
//! - [`SessionStore::clear_and_rotate`] empties both slots and publishes the
//!   next attacker side in one step. Only the authoritative process calls it.
//!
//! No operation waits for the other player: a rejected write returns
//! immediately, and a missing choice just means the turn cannot advance yet.
//!
//! ## Stores
//!
//! - [`MemorySessionStore`]: lock-guarded map for a single process.
//! - [`FileSessionStore`]: one JSON record per session on disk, shared between
//!   processes through per-session lock files.
//!
//! ## Quick Start
//!
//! ```
//! use feint_session::{MemorySessionStore, SessionStore, Side, Slot, Zone};
//!
//! let store = MemorySessionStore::new();
//! let id = store.create_session(Side::Left).unwrap();
//!
//! assert!(store.try_set_choice(&id, Slot::One, Zone::Head).unwrap());
//! // The slot is write-once until the turn is cleared.
//! assert!(!store.try_set_choice(&id, Slot::One, Zone::Legs).unwrap());
//!
//! let record = store.snapshot(&id).unwrap();
//! assert_eq!(record.choice(Slot::One), Some(Zone::Head));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod file;
pub mod memory;
pub mod record;
pub mod store;
pub mod zone;

// Re-exports for convenience
pub use error::{Result, SessionError};
pub use file::FileSessionStore;
pub use memory::MemorySessionStore;
pub use record::{ParticipantId, SessionId, SessionRecord};
pub use store::SessionStore;
pub use zone::{Side, Slot, SlotPair, Zone};
