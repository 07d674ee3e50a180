//! Stat derivation: base stats plus equipment.
//!
//! Equipment is folded in exactly once, when a [`crate::Combatant`] is
//! created. Nothing here holds state.

use serde::{Deserialize, Serialize};

/// An equipped item and the bonuses it grants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    /// Display name.
    pub name: String,
    /// Added to base damage.
    pub damage_bonus: f64,
    /// Added to base crit chance (a probability).
    pub crit_chance_bonus: f64,
    /// Added to the base crit multiplier.
    pub crit_multiplier_bonus: f64,
}

impl Equipment {
    /// Creates an item.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        damage_bonus: f64,
        crit_chance_bonus: f64,
        crit_multiplier_bonus: f64,
    ) -> Self {
        Self {
            name: name.into(),
            damage_bonus,
            crit_chance_bonus,
            crit_multiplier_bonus,
        }
    }

    /// An item granting no bonuses.
    #[must_use]
    pub fn bare_hands() -> Self {
        Self::new("Bare hands", 0.0, 0.0, 0.0)
    }
}

/// A fighter's stats before equipment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseStats {
    /// Damage dealt by a plain hit.
    pub damage: f64,
    /// Flat reduction applied to every hit taken.
    pub armor: f64,
    /// Probability that a hit crits.
    pub crit_chance: f64,
    /// Damage multiplier on a crit.
    pub crit_multiplier: f64,
}

/// Stats used by the resolver, with equipment folded in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectiveStats {
    /// Damage dealt by a plain hit.
    pub damage: f64,
    /// Flat reduction applied to every hit taken.
    pub armor: f64,
    /// Probability that a hit crits, always within `[0, 1]`.
    pub crit_chance: f64,
    /// Damage multiplier on a crit.
    pub crit_multiplier: f64,
}

/// Folds `equipment` into `base`.
///
/// Damage and crit multiplier are plain sums. Crit chance is a sum clamped to
/// `[0, 1]`, so extreme bonuses give a guaranteed or impossible crit rather
/// than an out-of-range probability.
///
/// # Example
///
/// ```
/// use feint_core::{derive_stats, BaseStats, Equipment};
///
/// let base = BaseStats { damage: 15.0, armor: 3.0, crit_chance: 0.3, crit_multiplier: 2.0 };
/// let sword = Equipment::new("Sword", 5.0, 0.1, 1.0);
///
/// let stats = derive_stats(&base, &sword);
/// assert_eq!(stats.damage, 20.0);
/// assert_eq!(stats.crit_multiplier, 3.0);
/// assert!((stats.crit_chance - 0.4).abs() < 1e-12);
/// ```
#[must_use]
pub fn derive_stats(base: &BaseStats, equipment: &Equipment) -> EffectiveStats {
    let raw_crit_chance = base.crit_chance + equipment.crit_chance_bonus;
    let crit_chance = raw_crit_chance.clamp(0.0, 1.0);
    if (crit_chance - raw_crit_chance).abs() > f64::EPSILON {
        tracing::warn!(
            item = %equipment.name,
            raw = raw_crit_chance,
            clamped = crit_chance,
            "crit chance out of range"
        );
    }

    EffectiveStats {
        damage: base.damage + equipment.damage_bonus,
        armor: base.armor,
        crit_chance,
        crit_multiplier: base.crit_multiplier + equipment.crit_multiplier_bonus,
    }
}
