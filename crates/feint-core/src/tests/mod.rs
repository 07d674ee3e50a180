//! Cross-module tests for the duel engine.
//!
//! - `determinism.rs`: same seed and same choices replay identically
//! - `integration.rs`: hosted matches over memory and file session stores
//! - `properties.rs`: proptest checks of resolver and turn-loop rules
//! - `helpers.rs`: fixtures and scripted-turn utilities

mod helpers;
mod integration;

pub use helpers::*;
