//! File-backed session store shared between processes.
//!
//! # Layout
//!
//! Each session lives in its own directory entry:
//!
//! - `session_<code>.json`: the record, one flat JSON row
//! - `session_<code>.lock`: lock target for writers; its contents are unused
//!
//! # Atomicity
//!
//! Mutations take an exclusive OS advisory lock on the session's lock file
//! and hold it for the whole read-check-write. Under the lock the writer
//! re-reads the record, evaluates its predicate, writes a temp file and
//! renames it over the record. Readers never take the lock: the rename is
//! atomic, so a snapshot sees the record entirely before or entirely after
//! any write.
//!
//! Lock acquisition is bounded by `lock_timeout` and fails with
//! [`SessionError::Busy`] instead of waiting forever. The OS drops the lock
//! when its holder exits, so a crashed writer never wedges a session.

use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use fs2::FileExt;

use crate::error::{Result, SessionError};
use crate::record::{ParticipantId, SessionId, SessionRecord};
use crate::store::SessionStore;
use crate::zone::{Side, Slot, Zone};

/// Default wait budget for acquiring a session lock.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(2);

/// Pause between lock attempts.
const LOCK_RETRY_INTERVAL: Duration = Duration::from_millis(2);

/// Session store persisting one JSON record per session in a directory.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    base_dir: PathBuf,
    lock_timeout: Duration,
}

impl FileSessionStore {
    /// Opens a store rooted at `base_dir`, creating the directory if needed.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self {
            base_dir,
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        })
    }

    /// Sets how long a mutation waits for the session lock.
    #[must_use]
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Directory holding the session files.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn record_path(&self, id: &SessionId) -> PathBuf {
        self.base_dir.join(format!("session_{id}.json"))
    }

    fn lock_path(&self, id: &SessionId) -> PathBuf {
        self.base_dir.join(format!("session_{id}.lock"))
    }

    fn lock(&self, id: &SessionId) -> Result<SessionLock> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.lock_path(id))?;
        let contended = fs2::lock_contended_error().raw_os_error();
        let started = Instant::now();

        loop {
            match file.try_lock_exclusive() {
                Ok(()) => return Ok(SessionLock { file }),
                Err(e) if e.raw_os_error() == contended => {
                    if started.elapsed() >= self.lock_timeout {
                        return Err(SessionError::Busy {
                            id: id.clone(),
                            waited_ms: u64::try_from(started.elapsed().as_millis())
                                .unwrap_or(u64::MAX),
                        });
                    }
                    thread::sleep(LOCK_RETRY_INTERVAL);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn read_record(&self, id: &SessionId) -> Result<Option<SessionRecord>> {
        match fs::read(self.record_path(id)) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Replaces the record file. Callers hold the session lock.
    fn write_record(&self, record: &SessionRecord) -> Result<()> {
        let path = self.record_path(record.id());
        let temp_path = path.with_extension("json.tmp");

        let bytes = serde_json::to_vec(record)?;
        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &path)?;

        tracing::trace!(session = %record.id(), "wrote {}", path.display());
        Ok(())
    }

    /// Runs `f` on the record under the session lock, persisting any change.
    fn update<T>(&self, id: &SessionId, f: impl FnOnce(&mut SessionRecord) -> T) -> Result<T> {
        let _lock = self.lock(id)?;
        let mut record = self
            .read_record(id)?
            .ok_or_else(|| SessionError::UnknownSession(id.clone()))?;
        let before = record.clone();
        let value = f(&mut record);
        if record != before {
            self.write_record(&record)?;
        }
        Ok(value)
    }
}

impl SessionStore for FileSessionStore {
    fn insert_if_absent(&self, record: SessionRecord) -> Result<bool> {
        let _lock = self.lock(record.id())?;
        if self.read_record(record.id())?.is_some() {
            return Ok(false);
        }
        self.write_record(&record)?;
        Ok(true)
    }

    fn insert_session(&self, record: SessionRecord) -> Result<()> {
        let _lock = self.lock(record.id())?;
        self.write_record(&record)
    }

    fn try_set_choice(&self, id: &SessionId, slot: Slot, zone: Zone) -> Result<bool> {
        let accepted = self.update(id, |record| record.try_fill(slot, zone))?;
        tracing::debug!(session = %id, %slot, %zone, accepted, "choice submitted");
        Ok(accepted)
    }

    fn snapshot(&self, id: &SessionId) -> Result<SessionRecord> {
        self.read_record(id)?
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

/// Exclusive lock on a session's lock file; released on drop.
#[derive(Debug)]
struct SessionLock {
    file: File,
}

impl Drop for SessionLock {
    fn drop(&mut self) {
        // Closing the file releases the lock as well; unlock eagerly anyway.
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!("failed to release session lock: {e}");
        }
    }
}
