//! End-of-match summary.

use feint_session::{Slot, SlotPair, Zone};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::combatant::Combatant;

/// Per-fighter row of the summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FighterSummary {
    /// Display name.
    pub name: String,
    /// Total damage dealt.
    pub damage_dealt: f64,
    /// Crits landed.
    pub crit_count: u32,
    /// Zone hit most often, if any hit landed.
    pub favourite_zone: Option<Zone>,
    /// Zone blocked most often, if any block happened.
    pub best_defense: Option<Zone>,
}

impl FighterSummary {
    fn from_combatant(fighter: &Combatant) -> Self {
        let record = fighter.record();
        Self {
            name: fighter.name().to_owned(),
            damage_dealt: record.damage_dealt,
            crit_count: record.crit_count,
            favourite_zone: record.hits_by_zone.leader(),
            best_defense: record.blocks_by_zone.leader(),
        }
    }
}

/// Result of a finished match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    /// The fighter left standing.
    pub winner: Slot,
    /// Exchanges resolved.
    pub turns: u32,
    /// Both rows.
    pub fighters: SlotPair<FighterSummary>,
}

impl MatchSummary {
    /// Builds the summary from the final fighter state.
    #[must_use]
    pub fn new(winner: Slot, fighters: &SlotPair<Combatant>, turns: u32) -> Self {
        Self {
            winner,
            turns,
            fighters: SlotPair::new(
                FighterSummary::from_combatant(&fighters[Slot::One]),
                FighterSummary::from_combatant(&fighters[Slot::Two]),
            ),
        }
    }

    /// Name of the winner.
    #[must_use]
    pub fn winner_name(&self) -> &str {
        &self.fighters[self.winner].name
    }
}

fn zone_or_dash(zone: Option<Zone>) -> String {
    zone.map_or_else(|| "—".to_owned(), |z| z.to_string().to_uppercase())
}

/// Plain-text results table.
impl fmt::Display for MatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let one = &self.fighters[Slot::One];
        let two = &self.fighters[Slot::Two];

        writeln!(
            f,
            "BATTLE RESULTS. WINNER: {} ({} turns)",
            self.winner_name().to_uppercase(),
            self.turns
        )?;
        writeln!(
            f,
            "{:<16}{:>16}{:>16}",
            "",
            one.name.to_uppercase(),
            two.name.to_uppercase()
        )?;
        writeln!(
            f,
            "{:<16}{:>16.1}{:>16.1}",
            "DAMAGE", one.damage_dealt, two.damage_dealt
        )?;
        writeln!(f, "{:<16}{:>16}{:>16}", "CRITS", one.crit_count, two.crit_count)?;
        writeln!(
            f,
            "{:<16}{:>16}{:>16}",
            "FAVOURITE ZONE",
            zone_or_dash(one.favourite_zone),
            zone_or_dash(two.favourite_zone)
        )?;
        write!(
            f,
            "{:<16}{:>16}{:>16}",
            "BEST DEFENSE",
            zone_or_dash(one.best_defense),
            zone_or_dash(two.best_defense)
        )
    }
}
