//! File-backed talent store.
//!
//! [`FileTalentStore`] persists the full mapping as a single JSON snapshot:
//!
//! ```text
//! {
//!   "version": 1,
//!   "records": {
//!     "<64 hex caller id>": { "personal_identifier": ..., ... }
//!   }
//! }
//! ```
//!
//! The snapshot is written to a temporary file in the target directory and
//! renamed over the previous one, so the file on disk is always either the
//! old or the new snapshot.
//!
//! Several handles, in one process or many (a running `tal serve` and a
//! one-shot `tal create`, say), may share a snapshot. Every operation takes
//! an advisory lock on a sibling `<snapshot>.lock` file and reads the
//! snapshot from disk under it: shared for reads, exclusive for the whole
//! read-modify-write of a `put`. No handle ever writes back a stale map.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use fs4::fs_std::FileExt;
use serde::{Deserialize, Serialize};
use tal_types::{CallerId, Record};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::traits::{Presence, TalentStore};

/// Current on-disk snapshot format.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize)]
struct SnapshotOut<'a> {
    version: u32,
    records: &'a BTreeMap<CallerId, Record>,
}

#[derive(Deserialize)]
struct SnapshotIn {
    version: u32,
    records: BTreeMap<CallerId, Record>,
}

/// A [`TalentStore`] persisted as a JSON snapshot file.
#[derive(Debug)]
pub struct FileTalentStore {
    path: PathBuf,
    lock_path: PathBuf,
}

impl FileTalentStore {
    /// Open the store at `path`, checking the existing snapshot if present.
    ///
    /// A missing file opens as an empty store; the file is created on the
    /// first `put`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut lock_path = OsString::from(path.as_os_str());
        lock_path.push(".lock");
        let store = Self {
            path,
            lock_path: PathBuf::from(lock_path),
        };

        let records = store.read_snapshot()?;
        debug!(path = %store.path.display(), records = records.len(), "opened talent store");
        Ok(store)
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Open the lock file. The advisory lock is released when it is dropped.
    fn lock_file(&self) -> Result<File> {
        Ok(OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&self.lock_path)?)
    }

    /// Current snapshot, read under a shared lock.
    fn read_snapshot(&self) -> Result<BTreeMap<CallerId, Record>> {
        // Nothing to lock against before the first write creates the directory.
        if !self.dir().exists() {
            return Ok(BTreeMap::new());
        }
        let lock = self.lock_file()?;
        FileExt::lock_shared(&lock)?;
        self.load()
    }

    fn load(&self) -> Result<BTreeMap<CallerId, Record>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        let snapshot: SnapshotIn = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| StoreError::Corrupt(format!("{}: {e}", self.path.display())))?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(StoreError::Corrupt(format!(
                "{}: unsupported snapshot version {}",
                self.path.display(),
                snapshot.version
            )));
        }
        Ok(snapshot.records)
    }

    /// Reload, check `expect`, insert and persist, all under the exclusive lock.
    fn write_locked(
        &self,
        caller: &CallerId,
        record: &Record,
        expect: Option<Presence>,
    ) -> Result<bool> {
        fs::create_dir_all(self.dir())?;
        let lock = self.lock_file()?;
        FileExt::lock_exclusive(&lock)?;

        let mut records = self.load()?;
        if let Some(expect) = expect {
            if !expect.holds(records.contains_key(caller)) {
                debug!(caller = %caller, ?expect, "conditional write skipped");
                return Ok(false);
            }
        }
        records.insert(caller.clone(), record.clone());
        self.write_snapshot(&records)?;
        Ok(true)
    }

    fn write_snapshot(&self, records: &BTreeMap<CallerId, Record>) -> Result<()> {
        let mut tmp = NamedTempFile::new_in(self.dir())?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer_pretty(
                &mut writer,
                &SnapshotOut {
                    version: SNAPSHOT_VERSION,
                    records,
                },
            )
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;

        debug!(path = %self.path.display(), records = records.len(), "snapshot persisted");
        Ok(())
    }
}

impl TalentStore for FileTalentStore {
    fn get(&self, caller: &CallerId) -> Result<Option<Record>> {
        Ok(self.read_snapshot()?.remove(caller))
    }

    fn put(&self, caller: &CallerId, record: &Record) -> Result<()> {
        self.write_locked(caller, record, None).map(|_| ())
    }

    fn put_if(&self, caller: &CallerId, record: &Record, expect: Presence) -> Result<bool> {
        self.write_locked(caller, record, Some(expect))
    }

    fn contains(&self, caller: &CallerId) -> Result<bool> {
        Ok(self.read_snapshot()?.contains_key(caller))
    }
}
