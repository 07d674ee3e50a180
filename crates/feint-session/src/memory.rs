//! In-memory session store for a single process.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{Result, SessionError};
use crate::record::{ParticipantId, SessionId, SessionRecord};
use crate::store::SessionStore;
use crate::zone::{Side, Slot, Zone};

/// Lock-guarded map of session records.
///
/// Every mutation runs its check and its write under one write guard;
/// snapshots take a read guard and clone, so a reader never observes a
/// half-applied update.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<SessionId, SessionRecord>>,
}

impl MemorySessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions held.
    pub fn len(&self) -> Result<usize> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| SessionError::LockPoisoned)?;
        Ok(sessions.len())
    }

    /// Whether the store holds no sessions.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Runs `f` on the record for `id` under the write guard.
    fn update<T>(&self, id: &SessionId, f: impl FnOnce(&mut SessionRecord) -> T) -> Result<T> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| SessionError::LockPoisoned)?;
        let record = sessions
            .get_mut(id)
            .ok_or_else(|| SessionError::UnknownSession(id.clone()))?;
        Ok(f(record))
    }
}

impl SessionStore for MemorySessionStore {
    fn insert_if_absent(&self, record: SessionRecord) -> Result<bool> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| SessionError::LockPoisoned)?;
        if sessions.contains_key(record.id()) {
            return Ok(false);
        }
        sessions.insert(record.id().clone(), record);
        Ok(true)
    }

    fn insert_session(&self, record: SessionRecord) -> Result<()> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| SessionError::LockPoisoned)?;
        sessions.insert(record.id().clone(), record);
        Ok(())
    }

    fn try_set_choice(&self, id: &SessionId, slot: Slot, zone: Zone) -> Result<bool> {
        let accepted = self.update(id, |record| record.try_fill(slot, zone))?;
        tracing::debug!(session = %id, %slot, %zone, accepted, "choice submitted");
        Ok(accepted)
    }

    fn snapshot(&self, id: &SessionId) -> Result<SessionRecord> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| SessionError::LockPoisoned)?;
        sessions
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::UnknownSession(id.clone()))
    }

    fn clear_and_rotate(&self, id: &SessionId, next_attacker: Side) -> Result<()> {
        self.update(id, |record| record.clear_and_rotate(next_attacker))
    }

    fn bind_participant(
        &self,
        id: &SessionId,
        slot: Slot,
        participant: ParticipantId,
    ) -> Result<()> {
        self.update(id, |record| record.bind(slot, participant))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Barrier};
    use std::thread;

    fn unknown_id() -> SessionId {
        SessionId::new("000000").unwrap()
    }

    mod protocol_tests {
        use super::*;

        #[test]
        fn create_session_starts_empty() {
            let store = MemorySessionStore::new();
            let id = store.create_session(Side::Right).unwrap();

            let record = store.snapshot(&id).unwrap();
            assert_eq!(record.attacker_side(), Side::Right);
            assert_eq!(record.choice(Slot::One), None);
            assert_eq!(record.choice(Slot::Two), None);
            assert_eq!(store.len().unwrap(), 1);
            assert!(!store.is_empty().unwrap());
        }

        #[test]
        fn create_session_allocates_distinct_codes() {
            let store = MemorySessionStore::new();
            let a = store.create_session(Side::Left).unwrap();
            let b = store.create_session(Side::Left).unwrap();
            assert_ne!(a, b);
        }

        #[test]
        fn second_write_to_slot_is_rejected() {
            let store = MemorySessionStore::new();
            let id = store.create_session(Side::Left).unwrap();

            assert!(store.try_set_choice(&id, Slot::Two, Zone::Head).unwrap());
            assert!(!store.try_set_choice(&id, Slot::Two, Zone::Legs).unwrap());
            assert_eq!(store.snapshot(&id).unwrap().choice(Slot::Two), Some(Zone::Head));
        }

        #[test]
        fn clear_and_rotate_reopens_slots() {
            let store = MemorySessionStore::new();
            let id = store.create_session(Side::Left).unwrap();
            store.try_set_choice(&id, Slot::One, Zone::Head).unwrap();
            store.try_set_choice(&id, Slot::Two, Zone::Torso).unwrap();

            store.clear_and_rotate(&id, Side::Right).unwrap();

            let record = store.snapshot(&id).unwrap();
            assert!(!record.both_filled());
            assert_eq!(record.attacker_side(), Side::Right);
            assert!(store.try_set_choice(&id, Slot::One, Zone::Legs).unwrap());
        }

        #[test]
        fn insert_session_replaces_wholesale() {
            let store = MemorySessionStore::new();
            let id = store.create_session(Side::Left).unwrap();
            store.try_set_choice(&id, Slot::One, Zone::Head).unwrap();

            store
                .insert_session(SessionRecord::new(id.clone(), Side::Right))
                .unwrap();

            let record = store.snapshot(&id).unwrap();
            assert_eq!(record.choice(Slot::One), None);
            assert_eq!(record.attacker_side(), Side::Right);
        }

        #[test]
        fn bind_participant_is_recorded() {
            let store = MemorySessionStore::new();
            let id = store.create_session(Side::Left).unwrap();
            store
                .bind_participant(&id, Slot::One, ParticipantId::new(99))
                .unwrap();
            assert_eq!(
                store.snapshot(&id).unwrap().participant(Slot::One),
                Some(ParticipantId::new(99))
            );
        }
    }

    mod unknown_session_tests {
        use super::*;

        #[test]
        fn every_operation_reports_unknown_session() {
            let store = MemorySessionStore::new();
            let id = unknown_id();

            assert!(matches!(
                store.try_set_choice(&id, Slot::One, Zone::Head),
                Err(SessionError::UnknownSession(_))
            ));
            assert!(matches!(
                store.snapshot(&id),
                Err(SessionError::UnknownSession(_))
            ));
            assert!(matches!(
                store.clear_and_rotate(&id, Side::Left),
                Err(SessionError::UnknownSession(_))
            ));
            assert!(!store.exists(&id).unwrap());
            assert!(store.is_empty().unwrap());
        }
    }

    mod concurrency_tests {
        use super::*;

        #[test]
        fn racing_writers_on_one_slot_have_exactly_one_winner() {
            const WRITERS: usize = 16;

            for _ in 0..50 {
                let store = Arc::new(MemorySessionStore::new());
                let id = store.create_session(Side::Left).unwrap();
                let barrier = Arc::new(Barrier::new(WRITERS));

                let handles: Vec<_> = (0..WRITERS)
                    .map(|i| {
                        let store = Arc::clone(&store);
                        let barrier = Arc::clone(&barrier);
                        let id = id.clone();
                        thread::spawn(move || {
                            let zone = Zone::ALL[i % Zone::COUNT];
                            barrier.wait();
                            store
                                .try_set_choice(&id, Slot::One, zone)
                                .unwrap()
                                .then_some(zone)
                        })
                    })
                    .collect();

                let winners: Vec<Zone> = handles
                    .into_iter()
                    .filter_map(|h| h.join().unwrap())
                    .collect();

                assert_eq!(winners.len(), 1);
                let record = store.snapshot(&id).unwrap();
                assert_eq!(record.choice(Slot::One), Some(winners[0]));
                assert_eq!(record.choice(Slot::Two), None);
            }
        }

        #[test]
        fn writers_on_different_slots_never_conflict() {
            let store = Arc::new(MemorySessionStore::new());
            let id = store.create_session(Side::Left).unwrap();
            let barrier = Arc::new(Barrier::new(2));

            let handles: Vec<_> = Slot::BOTH
                .into_iter()
                .map(|slot| {
                    let store = Arc::clone(&store);
                    let barrier = Arc::clone(&barrier);
                    let id = id.clone();
                    thread::spawn(move || {
                        barrier.wait();
                        store.try_set_choice(&id, slot, Zone::Torso).unwrap()
                    })
                })
                .collect();

            for handle in handles {
                assert!(handle.join().unwrap());
            }
            assert!(store.snapshot(&id).unwrap().both_filled());
        }
    }
}
