//! Fixtures shared by the cross-module tests.

use feint_session::{Slot, Zone};

use crate::combatant::Combatant;
use crate::stats::{BaseStats, EffectiveStats, Equipment};
use crate::turn::{Resolution, Role, TurnController};

// =============================================================================
// Fighters
// =============================================================================

/// A bare-handed fighter with the given stats and 100 health.
pub fn spawn_fighter(slot: Slot, damage: f64, armor: f64, crit_chance: f64) -> Combatant {
    Combatant::new(
        format!("Player {}", slot.number()),
        slot,
        100.0,
        &BaseStats {
            damage,
            armor,
            crit_chance,
            crit_multiplier: 2.0,
        },
        Equipment::bare_hands(),
    )
}

/// Effective stats literal.
pub fn stats(damage: f64, armor: f64, crit_chance: f64, crit_multiplier: f64) -> EffectiveStats {
    EffectiveStats {
        damage,
        armor,
        crit_chance,
        crit_multiplier,
    }
}

/// A controller with player 1 hitting for 20 through armor and player 2
/// hitting for 5, neither able to crit. Player 1 opens.
pub fn lopsided_controller(seed: u64) -> TurnController {
    TurnController::new(
        spawn_fighter(Slot::One, 25.0, 0.0, 0.0),
        spawn_fighter(Slot::Two, 10.0, 5.0, 0.0),
        Slot::One,
        seed,
    )
}

// =============================================================================
// Scripted turns
// =============================================================================

/// Commits both choices by role and advances.
pub fn play_turn(controller: &mut TurnController, attack: Zone, defense: Zone) -> Resolution {
    controller
        .submit_role_choice(Role::Attacker, attack)
        .expect("attacker slot empty");
    controller
        .submit_role_choice(Role::Defender, defense)
        .expect("defender slot empty");
    controller.try_advance().expect("both slots filled")
}

/// Deterministic zone sequence derived from the turn index.
pub fn scripted_zones(turn: usize) -> (Zone, Zone) {
    (Zone::ALL[turn % 3], Zone::ALL[(turn * 7 + 1) % 3])
}

/// Plays scripted turns until the match ends or `max_turns` pass.
pub fn play_scripted(controller: &mut TurnController, max_turns: usize) -> Vec<Resolution> {
    let mut log = Vec::new();
    for turn in 0..max_turns {
        if controller.is_over() {
            break;
        }
        let (attack, defense) = scripted_zones(turn);
        log.push(play_turn(controller, attack, defense));
    }
    log
}
