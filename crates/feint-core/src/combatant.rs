//! Fighters and their running match statistics.

use feint_session::{Side, Slot, Zone};
use serde::{Deserialize, Serialize};
use std::ops::Index;

use crate::resolver::round_tenths;
use crate::stats::{derive_stats, BaseStats, EffectiveStats, Equipment};

// =============================================================================
// ZoneTally
// =============================================================================

/// A counter per [`Zone`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneTally([u32; Zone::COUNT]);

impl ZoneTally {
    /// Adds one to `zone`.
    pub fn increment(&mut self, zone: Zone) {
        self.0[zone.index()] += 1;
    }

    /// Sum over all zones.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    /// The zone with the highest count, or `None` if nothing was counted.
    ///
    /// Ties go to the earliest zone in [`Zone::ALL`] order.
    #[must_use]
    pub fn leader(&self) -> Option<Zone> {
        if self.total() == 0 {
            return None;
        }
        Zone::ALL
            .into_iter()
            .fold(None, |best: Option<Zone>, zone| match best {
                Some(b) if self[b] >= self[zone] => Some(b),
                _ => Some(zone),
            })
    }
}

impl Index<Zone> for ZoneTally {
    type Output = u32;

    fn index(&self, zone: Zone) -> &u32 {
        &self.0[zone.index()]
    }
}

// =============================================================================
// CombatRecord
// =============================================================================

/// Running statistics of one fighter over a match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombatRecord {
    /// Total damage dealt, kept rounded to tenths.
    pub damage_dealt: f64,
    /// Number of crits landed.
    pub crit_count: u32,
    /// Hits landed, by target zone.
    pub hits_by_zone: ZoneTally,
    /// Successful blocks, by defended zone.
    pub blocks_by_zone: ZoneTally,
}

impl CombatRecord {
    /// Counts a landed hit.
    pub fn record_hit(&mut self, zone: Zone, damage: f64, crit: bool) {
        self.damage_dealt = round_tenths(self.damage_dealt + damage);
        if crit {
            self.crit_count += 1;
        }
        self.hits_by_zone.increment(zone);
    }

    /// Counts a successful block.
    pub fn record_block(&mut self, zone: Zone) {
        self.blocks_by_zone.increment(zone);
    }
}

// =============================================================================
// Combatant
// =============================================================================

/// One side of a duel.
///
/// Effective stats are derived once at construction. After that only
/// `health` and the [`CombatRecord`] change, until [`Combatant::reset`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    name: String,
    slot: Slot,
    max_health: f64,
    /// May go negative; clamp only for display.
    health: f64,
    equipment: Equipment,
    stats: EffectiveStats,
    record: CombatRecord,
}

impl Combatant {
    /// Creates a fighter at full health with `equipment` folded into `base`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        slot: Slot,
        max_health: f64,
        base: &BaseStats,
        equipment: Equipment,
    ) -> Self {
        let stats = derive_stats(base, &equipment);
        Self {
            name: name.into(),
            slot,
            max_health,
            health: max_health,
            equipment,
            stats,
            record: CombatRecord::default(),
        }
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The player slot this fighter answers to.
    #[must_use]
    pub fn slot(&self) -> Slot {
        self.slot
    }

    /// The side this fighter stands on.
    #[must_use]
    pub fn side(&self) -> Side {
        self.slot.side()
    }

    /// Health at the start of a match.
    #[must_use]
    pub fn max_health(&self) -> f64 {
        self.max_health
    }

    /// Current health; negative after an overkill.
    #[must_use]
    pub fn health(&self) -> f64 {
        self.health
    }

    /// Current health clamped at zero.
    #[must_use]
    pub fn display_health(&self) -> f64 {
        self.health.max(0.0)
    }

    /// Remaining health as a fraction of max health, in `[0, 1]`.
    #[must_use]
    pub fn health_fraction(&self) -> f64 {
        if self.max_health <= 0.0 {
            return 0.0;
        }
        (self.display_health() / self.max_health).min(1.0)
    }

    /// True once health is at or below zero.
    #[must_use]
    pub fn is_defeated(&self) -> bool {
        self.health <= 0.0
    }

    /// The equipped item.
    #[must_use]
    pub fn equipment(&self) -> &Equipment {
        &self.equipment
    }

    /// Effective stats.
    #[must_use]
    pub fn stats(&self) -> &EffectiveStats {
        &self.stats
    }

    /// Running statistics.
    #[must_use]
    pub fn record(&self) -> &CombatRecord {
        &self.record
    }

    /// Restores full health and zeroes the running statistics.
    pub fn reset(&mut self) {
        self.health = self.max_health;
        self.record = CombatRecord::default();
    }

    pub(crate) fn take_damage(&mut self, amount: f64) {
        self.health -= amount;
    }

    pub(crate) fn record_mut(&mut self) -> &mut CombatRecord {
        &mut self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fighter() -> Combatant {
        Combatant::new(
            "Player 1",
            Slot::One,
            100.0,
            &BaseStats {
                damage: 15.0,
                armor: 3.0,
                crit_chance: 0.3,
                crit_multiplier: 2.0,
            },
            Equipment::new("Sword", 5.0, 0.1, 1.0),
        )
    }

    mod zone_tally_tests {
        use super::*;

        #[test]
        fn empty_tally_has_no_leader() {
            assert_eq!(ZoneTally::default().leader(), None);
        }

        #[test]
        fn leader_is_highest_count() {
            let mut tally = ZoneTally::default();
            tally.increment(Zone::Legs);
            tally.increment(Zone::Legs);
            tally.increment(Zone::Head);
            assert_eq!(tally.leader(), Some(Zone::Legs));
            assert_eq!(tally.total(), 3);
        }

        #[test]
        fn ties_go_to_earliest_zone() {
            let mut tally = ZoneTally::default();
            tally.increment(Zone::Legs);
            tally.increment(Zone::Torso);
            assert_eq!(tally.leader(), Some(Zone::Torso));
        }
    }

    mod combatant_tests {
        use super::*;

        #[test]
        fn equipment_is_folded_in_at_creation() {
            let f = fighter();
            assert!((f.stats().damage - 20.0).abs() < 1e-12);
            assert!((f.stats().crit_multiplier - 3.0).abs() < 1e-12);
            assert_eq!(f.side(), Side::Left);
        }

        #[test]
        fn health_may_go_negative_but_displays_clamped() {
            let mut f = fighter();
            f.take_damage(130.0);
            assert!((f.health() + 30.0).abs() < 1e-12);
            assert_eq!(f.display_health(), 0.0);
            assert_eq!(f.health_fraction(), 0.0);
            assert!(f.is_defeated());
        }

        #[test]
        fn reset_restores_health_and_zeroes_record() {
            let mut f = fighter();
            f.take_damage(40.0);
            f.record_mut().record_hit(Zone::Head, 17.0, true);
            f.record_mut().record_block(Zone::Legs);

            f.reset();

            assert_eq!(f.health(), 100.0);
            assert_eq!(f.record(), &CombatRecord::default());
            // Derived stats survive a reset untouched.
            assert!((f.stats().damage - 20.0).abs() < 1e-12);
        }
    }

    mod record_tests {
        use super::*;

        #[test]
        fn damage_total_stays_on_tenths() {
            let mut record = CombatRecord::default();
            for _ in 0..10 {
                record.record_hit(Zone::Torso, 0.1, false);
            }
            assert_eq!(record.damage_dealt, 1.0);
            assert_eq!(record.hits_by_zone[Zone::Torso], 10);
            assert_eq!(record.crit_count, 0);
        }
    }
}
