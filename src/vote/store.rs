//! Vote Store: one JSON file per request id under `<goo home>/votes`.
//!
//! The file shape (`request_id`, `value`, `salt`, `hash`, `timestamp`) is
//! shared with earlier releases of the tool and must not change. Writes go
//! to `<id>.json.tmp`, are fsynced, then renamed over `<id>.json` while an
//! exclusive advisory lock is held on `<votes>/.lock`.

use crate::core::error::GooError;
use crate::core::store::Store;
use crate::core::time;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const LOCK_FILE_NAME: &str = ".lock";
const RECORD_EXT: &str = "json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCommitment {
    pub request_id: String,
    pub value: String,
    pub salt: String,
    /// Empty in records written without one.
    #[serde(default)]
    pub hash: String,
    /// RFC 3339 time of the commit.
    #[serde(default)]
    pub timestamp: String,
}

#[derive(Debug, Clone)]
pub struct VoteStore {
    dir: PathBuf,
}

/// Held for the duration of a write; the OS lock is released on drop.
struct DirLock {
    file: File,
}

impl DirLock {
    fn acquire(dir: &Path) -> Result<Self, GooError> {
        let path = dir.join(LOCK_FILE_NAME);
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)?;
        file.lock_exclusive()
            .map_err(|e| GooError::LockError(format!("{}: {}", path.display(), e)))?;
        Ok(DirLock { file })
    }

    fn acquire_if_present(dir: &Path) -> Result<Option<Self>, GooError> {
        if dir.is_dir() {
            DirLock::acquire(dir).map(Some)
        } else {
            Ok(None)
        }
    }
}

impl Drop for DirLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

/// Request ids become file names, so they must stay inside the votes dir.
pub fn validate_request_id(request_id: &str) -> Result<(), GooError> {
    let invalid = |reason: &str| {
        Err(GooError::ValidationError(format!(
            "invalid request id '{}': {}",
            request_id.escape_debug(),
            reason
        )))
    };
    if request_id.trim().is_empty() {
        return invalid("empty");
    }
    if request_id.contains(['/', '\\', '\0']) {
        return invalid("contains a path separator or NUL");
    }
    if request_id == "." || request_id.contains("..") {
        return invalid("contains '..'");
    }
    Ok(())
}

impl VoteStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        VoteStore { dir: dir.into() }
    }

    pub fn open(store: &Store) -> Self {
        VoteStore::new(store.votes_dir())
    }

    /// `~/.goo/votes`, or `$GOO_HOME/votes`.
    pub fn open_default() -> Result<Self, GooError> {
        Ok(VoteStore::open(&Store::resolve()?))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, request_id: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", request_id, RECORD_EXT))
    }

    /// Persist a commitment, replacing any earlier one for the same id.
    pub fn save(
        &self,
        request_id: &str,
        value: &str,
        salt: &str,
        hash: &str,
    ) -> Result<VoteCommitment, GooError> {
        validate_request_id(request_id)?;
        fs::create_dir_all(&self.dir)?;

        let record = VoteCommitment {
            request_id: request_id.to_string(),
            value: value.to_string(),
            salt: salt.to_string(),
            hash: hash.to_string(),
            timestamp: time::now_rfc3339(),
        };
        let data = serde_json::to_string_pretty(&record)?;

        let _lock = DirLock::acquire(&self.dir)?;
        let path = self.path_for(request_id);
        let tmp = path.with_extension(format!("{}.tmp", RECORD_EXT));
        {
            let mut file = secret_file(&tmp)?;
            file.write_all(data.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &path)?;
        debug!(request_id, path = %path.display(), "vote commitment saved");
        Ok(record)
    }

    pub fn get(&self, request_id: &str) -> Result<VoteCommitment, GooError> {
        validate_request_id(request_id)?;
        let path = self.path_for(request_id);
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(GooError::NotFound(format!(
                    "no vote data for request {} at {} (did you commit a vote for this request?)",
                    request_id,
                    path.display()
                )));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&data)?)
    }

    /// The `(value, salt)` pair needed to reveal.
    pub fn load(&self, request_id: &str) -> Result<(String, String), GooError> {
        let record = self.get(request_id)?;
        if record.value.is_empty() || record.salt.is_empty() {
            return Err(GooError::Incomplete(request_id.to_string()));
        }
        Ok((record.value, record.salt))
    }

    /// All readable commitments, sorted by request id.
    pub fn list(&self) -> Result<Vec<VoteCommitment>, GooError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXT) {
                continue;
            }
            let parsed = fs::read_to_string(&path)
                .map_err(GooError::from)
                .and_then(|data| Ok(serde_json::from_str::<VoteCommitment>(&data)?));
            match parsed {
                Ok(record) => records.push(record),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable vote file"),
            }
        }
        records.sort_by(|a, b| a.request_id.cmp(&b.request_id));
        Ok(records)
    }

    pub fn delete(&self, request_id: &str) -> Result<(), GooError> {
        validate_request_id(request_id)?;
        let path = self.path_for(request_id);
        let _lock = DirLock::acquire_if_present(&self.dir)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(request_id, "vote commitment deleted");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(GooError::NotFound(format!(
                "no vote data for request {}",
                request_id
            ))),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(unix)]
fn secret_file(path: &Path) -> Result<File, GooError> {
    use std::os::unix::fs::OpenOptionsExt;
    Ok(OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?)
}

#[cfg(not(unix))]
fn secret_file(path: &Path) -> Result<File, GooError> {
    Ok(File::create(path)?)
}
