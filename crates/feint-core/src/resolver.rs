//! Combat resolver: the outcome of one attack/defense exchange.
//!
//! The resolver is a pure function of both stat blocks, both zones and a
//! single uniform draw. It never touches a [`crate::Combatant`]; applying the
//! outcome is the turn controller's job.
//!
//! # Rules
//!
//! - Attack zone equals defense zone: **blocked**, no damage, no crit roll.
//! - Otherwise one draw in `[0, 1)`; the hit crits iff `draw < crit_chance`.
//!   Damage is `damage * (crit ? crit_multiplier : 1) - armor`, floored at
//!   zero and rounded to tenths.
//!
//! # Rounding
//!
//! [`round_tenths`] rounds half away from zero. The rounded value is what is
//! logged, subtracted from health and added to the attacker's total.

use feint_session::Zone;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::stats::EffectiveStats;

/// Rounds to one decimal place, half away from zero.
///
/// # Example
///
/// ```
/// use feint_core::round_tenths;
///
/// assert_eq!(round_tenths(12.25), 12.3);
/// assert_eq!(round_tenths(44.96), 45.0);
/// ```
#[must_use]
pub fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Result of one exchange.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    /// The defender guarded the attacked zone.
    Blocked {
        /// The zone attacked and defended.
        zone: Zone,
    },
    /// The attack landed.
    Hit {
        /// The zone struck.
        zone: Zone,
        /// Damage dealt, non-negative and rounded to tenths.
        damage: f64,
        /// Whether the crit multiplier applied.
        crit: bool,
    },
}

impl Outcome {
    /// The attacked zone.
    #[must_use]
    pub const fn zone(&self) -> Zone {
        match self {
            Self::Blocked { zone } | Self::Hit { zone, .. } => *zone,
        }
    }

    /// Damage dealt; zero for a block.
    #[must_use]
    pub const fn damage(&self) -> f64 {
        match self {
            Self::Blocked { .. } => 0.0,
            Self::Hit { damage, .. } => *damage,
        }
    }

    /// True for a block.
    #[must_use]
    pub const fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked { .. })
    }

    /// True for a critical hit.
    #[must_use]
    pub const fn is_crit(&self) -> bool {
        matches!(self, Self::Hit { crit: true, .. })
    }
}

/// Combat-log line for the outcome.
impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blocked { zone } => write!(f, "BLOCKED! ({zone})"),
            Self::Hit { zone, damage, crit } => {
                if *crit {
                    f.write_str("CRIT! ")?;
                }
                write!(f, "HIT! ({zone}) -{damage:.1} HP")
            }
        }
    }
}

/// Resolves exchanges.
///
/// # Example
///
/// ```
/// use feint_core::{CombatResolver, EffectiveStats, Outcome};
/// use feint_core::feint_session::Zone;
///
/// let attacker = EffectiveStats { damage: 25.0, armor: 0.0, crit_chance: 1.0, crit_multiplier: 2.0 };
/// let defender = EffectiveStats { damage: 10.0, armor: 5.0, crit_chance: 0.0, crit_multiplier: 1.5 };
///
/// let outcome = CombatResolver::new().resolve_with_draw(&attacker, &defender, Zone::Head, Zone::Torso, 0.5);
/// assert_eq!(outcome, Outcome::Hit { zone: Zone::Head, damage: 45.0, crit: true });
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CombatResolver;

impl CombatResolver {
    /// Creates a resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Resolves an exchange, drawing from `rng` only when the attack is not
    /// blocked.
    pub fn resolve<R: Rng + ?Sized>(
        &self,
        attacker: &EffectiveStats,
        defender: &EffectiveStats,
        attack_zone: Zone,
        defense_zone: Zone,
        rng: &mut R,
    ) -> Outcome {
        if attack_zone == defense_zone {
            return Outcome::Blocked { zone: attack_zone };
        }
        let draw: f64 = rng.gen();
        self.resolve_with_draw(attacker, defender, attack_zone, defense_zone, draw)
    }

    /// Resolves an exchange with an explicit draw in `[0, 1)`.
    ///
    /// The draw is ignored for a block.
    #[must_use]
    pub fn resolve_with_draw(
        &self,
        attacker: &EffectiveStats,
        defender: &EffectiveStats,
        attack_zone: Zone,
        defense_zone: Zone,
        draw: f64,
    ) -> Outcome {
        if attack_zone == defense_zone {
            return Outcome::Blocked { zone: attack_zone };
        }

        let crit = draw < attacker.crit_chance;
        let multiplier = if crit { attacker.crit_multiplier } else { 1.0 };
        let raw = attacker.damage * multiplier - defender.armor;

        Outcome::Hit {
            zone: attack_zone,
            damage: round_tenths(raw.max(0.0)),
            crit,
        }
    }
}
