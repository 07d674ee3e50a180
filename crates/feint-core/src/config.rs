//! Duel configuration: roster, timing and session storage.
//!
//! Layers, lowest precedence first:
//!
//! 1. [`DuelConfig::default`], the stock two-fighter roster
//! 2. a JSON file ([`DuelConfig::load`]); missing fields keep their defaults
//! 3. environment variables ([`DuelConfig::apply_env`]):
//!    - `FEINT_SEED` - RNG seed for reproducible matches
//!    - `FEINT_SESSION_DIR` - directory of the file-backed session store
//!    - `FEINT_FRAME_MS` - poll interval of the host loop
//!    - `FEINT_LOCK_TIMEOUT_MS` - wait budget for a session lock

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use feint_session::{FileSessionStore, SessionError, Side, Slot};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::combatant::Combatant;
use crate::stats::{BaseStats, Equipment};
use crate::turn::TurnController;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Offending file.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The config file is not valid JSON for [`DuelConfig`].
    #[error("failed to parse config {path}: {source}")]
    Json {
        /// Offending file.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },

    /// A fighter entry cannot produce a playable combatant.
    #[error("fighter {name:?}: {reason}")]
    InvalidFighter {
        /// Fighter name.
        name: String,
        /// What is wrong.
        reason: String,
    },
}

/// One fighter of the roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FighterConfig {
    /// Display name.
    pub name: String,
    /// Starting health.
    pub max_health: f64,
    /// Stats before equipment.
    #[serde(flatten)]
    pub base: BaseStats,
    /// Equipped item.
    pub equipment: Equipment,
}

impl FighterConfig {
    /// Stock player 1: sword fighter.
    #[must_use]
    pub fn player_one() -> Self {
        Self {
            name: "Player 1".to_owned(),
            max_health: 100.0,
            base: BaseStats {
                damage: 15.0,
                armor: 3.0,
                crit_chance: 0.3,
                crit_multiplier: 2.0,
            },
            equipment: Equipment::new("Sword", 5.0, 0.1, 1.0),
        }
    }

    /// Stock player 2: knife fighter.
    #[must_use]
    pub fn player_two() -> Self {
        Self {
            name: "Player 2".to_owned(),
            max_health: 100.0,
            base: BaseStats {
                damage: 10.0,
                armor: 5.0,
                crit_chance: 0.35,
                crit_multiplier: 1.9,
            },
            equipment: Equipment::new("Knife", 3.0, 0.3, 0.8),
        }
    }

    /// Checks that the entry can produce a playable combatant.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidFighter`] for an empty name, non-positive max
    /// health, or any non-finite number.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidFighter {
            name: self.name.clone(),
            reason: reason.to_owned(),
        };

        if self.name.trim().is_empty() {
            return Err(invalid("name is empty"));
        }
        if !(self.max_health.is_finite() && self.max_health > 0.0) {
            return Err(invalid("max_health must be a positive number"));
        }
        let numbers = [
            self.base.damage,
            self.base.armor,
            self.base.crit_chance,
            self.base.crit_multiplier,
            self.equipment.damage_bonus,
            self.equipment.crit_chance_bonus,
            self.equipment.crit_multiplier_bonus,
        ];
        if numbers.iter().any(|n| !n.is_finite()) {
            return Err(invalid("stats must be finite numbers"));
        }
        Ok(())
    }

    /// Builds the combatant for `slot`.
    #[must_use]
    pub fn build(&self, slot: Slot) -> Combatant {
        Combatant::new(
            self.name.clone(),
            slot,
            self.max_health,
            &self.base,
            self.equipment.clone(),
        )
    }
}

/// Full configuration of a hosted duel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuelConfig {
    /// Fighter in slot 1 (left side).
    pub player_one: FighterConfig,
    /// Fighter in slot 2 (right side).
    pub player_two: FighterConfig,
    /// Side attacking first.
    pub opening_attacker: Side,
    /// RNG seed; drawn at random when absent.
    pub seed: Option<u64>,
    /// Poll interval of the host loop.
    pub frame_interval_ms: u64,
    /// Directory of the file-backed session store.
    pub session_dir: PathBuf,
    /// Wait budget for a session lock.
    pub lock_timeout_ms: u64,
}

impl Default for DuelConfig {
    fn default() -> Self {
        Self {
            player_one: FighterConfig::player_one(),
            player_two: FighterConfig::player_two(),
            opening_attacker: Side::Left,
            seed: None,
            frame_interval_ms: 16,
            session_dir: PathBuf::from("sessions"),
            lock_timeout_ms: 2_000,
        }
    }
}

impl DuelConfig {
    /// Reads a JSON config file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] or [`ConfigError::Json`] naming `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Applies `FEINT_*` environment overrides.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from `lookup`, keyed like the environment variables.
    ///
    /// Values that fail to parse are ignored with a warning.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(seed) = read_override(&lookup, "FEINT_SEED") {
            self.seed = Some(seed);
        }
        if let Some(dir) = lookup("FEINT_SESSION_DIR") {
            self.session_dir = PathBuf::from(dir);
        }
        if let Some(ms) = read_override::<u64>(&lookup, "FEINT_FRAME_MS") {
            self.frame_interval_ms = ms.max(1);
        }
        if let Some(ms) = read_override(&lookup, "FEINT_LOCK_TIMEOUT_MS") {
            self.lock_timeout_ms = ms;
        }
    }

    /// Validates both fighters.
    ///
    /// # Errors
    ///
    /// The first [`ConfigError::InvalidFighter`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.player_one.validate()?;
        self.player_two.validate()
    }

    /// Poll interval of the host loop.
    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    /// The configured seed, or a fresh random one.
    ///
    /// A drawn seed is logged so the match can be replayed.
    #[must_use]
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            let seed = rand::random();
            tracing::info!(seed, "no seed configured, drew one");
            seed
        })
    }

    /// Builds a controller for a new match seeded with `seed`.
    #[must_use]
    pub fn build_controller(&self, seed: u64) -> TurnController {
        TurnController::new(
            self.player_one.build(Slot::One),
            self.player_two.build(Slot::Two),
            Slot::from_side(self.opening_attacker),
            seed,
        )
    }

    /// Opens the file-backed session store described by this config.
    ///
    /// # Errors
    ///
    /// [`SessionError::Io`] if the directory cannot be created.
    pub fn open_file_store(&self) -> Result<FileSessionStore, SessionError> {
        Ok(FileSessionStore::new(&self.session_dir)?
            .with_lock_timeout(Duration::from_millis(self.lock_timeout_ms)))
    }
}

fn read_override<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparsable override");
            None
        }
    }
}
