//! End-to-end tests: a hosted match fed by local input and remote store writes.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use feint_session::{
    FileSessionStore, MemorySessionStore, ParticipantId, SessionStore, Side, Slot, Zone,
};
use tempfile::TempDir;

use crate::host::MatchHost;
use crate::turn::{MatchPhase, Role};

use super::helpers::lopsided_controller;

// =============================================================================
// Memory store
// =============================================================================

#[test]
fn full_match_over_the_store() {
    let store = Arc::new(MemorySessionStore::new());
    let mut host = MatchHost::start(lopsided_controller(9), store.clone()).unwrap();
    let id = host.session_id().clone();

    let mut resolutions = Vec::new();
    while !host.controller().is_over() {
        // The attacker always aims at the head; player 2 always guards legs.
        let attacker = host.controller().slot_for(Role::Attacker);
        let local_zone = if attacker == Slot::One { Zone::Head } else { Zone::Legs };
        assert!(host.submit_local(Slot::One, local_zone).unwrap());
        assert!(store.try_set_choice(&id, Slot::Two, Zone::Legs).unwrap());

        let resolution = host.tick().unwrap().expect("both slots filled");
        resolutions.push(resolution);
        assert!(resolutions.len() < 20, "match should end quickly");
    }

    // Player 1 lands 20 a turn; player 2's attacks are always blocked.
    assert_eq!(host.controller().winner(), Some(Slot::One));
    assert_eq!(resolutions.len(), 9);
    assert!(resolutions.last().unwrap().match_over);

    let summary = host.summary().unwrap();
    assert_eq!(summary.winner_name(), "Player 1");
    assert_eq!(summary.fighters[Slot::One].damage_dealt, 100.0);
    assert_eq!(summary.fighters[Slot::One].favourite_zone, Some(Zone::Head));
    assert_eq!(summary.fighters[Slot::One].best_defense, Some(Zone::Legs));
    assert_eq!(summary.fighters[Slot::Two].favourite_zone, None);

    // The knockout is not cleared: the final choices stay until a rematch.
    let record = store.snapshot(&id).unwrap();
    assert!(record.both_filled());
    assert_eq!(record.choice(Slot::One), Some(Zone::Head));
    assert_eq!(record.attacker_side(), Side::Left);
}

#[test]
fn late_write_is_rejected_until_rotation() {
    let store = Arc::new(MemorySessionStore::new());
    let mut host = MatchHost::start(lopsided_controller(1), store.clone()).unwrap();
    let id = host.session_id().clone();

    host.submit_local(Slot::One, Zone::Torso).unwrap();
    store.try_set_choice(&id, Slot::Two, Zone::Head).unwrap();

    // Both filled: a straggler for either slot bounces.
    assert!(!store.try_set_choice(&id, Slot::Two, Zone::Legs).unwrap());
    assert!(!host.submit_local(Slot::One, Zone::Legs).unwrap());

    let resolution = host.tick().unwrap().unwrap();
    assert_eq!(resolution.attack_zone, Zone::Torso);
    assert_eq!(resolution.defense_zone, Zone::Head);

    // After rotation the slot is open again for the next turn.
    assert!(store.try_set_choice(&id, Slot::Two, Zone::Legs).unwrap());
    assert_eq!(store.snapshot(&id).unwrap().attacker_side(), Side::Right);
}

#[test]
fn remote_only_turn_resolves() {
    let store = Arc::new(MemorySessionStore::new());
    let mut host = MatchHost::start(lopsided_controller(2), store.clone()).unwrap();
    let id = host.session_id().clone();

    store
        .bind_participant(&id, Slot::Two, ParticipantId::new(77))
        .unwrap();
    store.try_set_choice(&id, Slot::One, Zone::Legs).unwrap();
    assert!(host.tick().unwrap().is_none());
    store.try_set_choice(&id, Slot::Two, Zone::Torso).unwrap();

    let resolution = host.tick().unwrap().unwrap();
    assert_eq!(resolution.outcome.damage(), 20.0);
    assert_eq!(
        store.snapshot(&id).unwrap().participant(Slot::Two),
        Some(ParticipantId::new(77))
    );
}

#[test]
fn rematch_after_knockout() {
    let store = Arc::new(MemorySessionStore::new());
    let mut host = MatchHost::start(lopsided_controller(4), store.clone()).unwrap();
    let id = host.session_id().clone();

    while !host.controller().is_over() {
        host.submit_local(Slot::One, Zone::Head).unwrap();
        host.submit_local(Slot::Two, Zone::Torso).unwrap();
        host.tick().unwrap();
    }
    // Remote writes after the knockout bounce, like local ones do.
    assert!(!store.try_set_choice(&id, Slot::One, Zone::Legs).unwrap());
    assert!(!store.try_set_choice(&id, Slot::Two, Zone::Legs).unwrap());
    assert!(host.tick().unwrap().is_none());

    host.reset_match().unwrap();

    assert_eq!(host.controller().phase(), MatchPhase::AwaitingChoices);
    let record = store.snapshot(&id).unwrap();
    assert_eq!(record.choice(Slot::One), None);
    assert_eq!(record.choice(Slot::Two), None);
    assert_eq!(record.attacker_side(), host.controller().attacker_side());

    // The first write of the rematch is accepted and reaches the controller.
    assert!(store.try_set_choice(&id, Slot::Two, Zone::Head).unwrap());
    host.tick().unwrap();
    assert_eq!(host.controller().pending(Slot::Two), Some(Zone::Head));
}

// =============================================================================
// File store
// =============================================================================

#[test]
fn hosted_match_with_remote_process_on_file_store() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FileSessionStore::new(dir.path()).unwrap());
    let mut host = MatchHost::start(lopsided_controller(6), store.clone()).unwrap();
    let id = host.session_id().clone();

    // A second handle on the same directory stands in for the remote writer.
    let remote = FileSessionStore::new(dir.path()).unwrap();
    let writer = thread::spawn(move || {
        for _ in 0..3 {
            loop {
                if remote.try_set_choice(&id, Slot::Two, Zone::Legs).unwrap() {
                    break;
                }
                thread::sleep(Duration::from_millis(1));
            }
        }
    });

    let mut resolved = 0;
    let mut frames = 0;
    while resolved < 3 {
        if host.controller().pending(Slot::One).is_none() {
            host.submit_local(Slot::One, Zone::Head).unwrap();
        }
        if host.tick().unwrap().is_some() {
            resolved += 1;
        }
        frames += 1;
        assert!(frames < 10_000, "remote writer never got through");
        thread::sleep(Duration::from_millis(1));
    }
    writer.join().unwrap();

    assert_eq!(host.controller().turn(), 3);
}
