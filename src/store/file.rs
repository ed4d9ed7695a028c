//! Append-only JSON lines store
//!
//! Line format: `<crc32 hex> {"principal":"...","record":{...}}`
//!
//! - Appends are synced before `insert` returns
//! - Every `list` verifies every line; one bad line fails the read
//! - `clear` rewrites the file through a temporary sibling and a rename
//! - A missing file reads as empty

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::checksum::{open_line, seal_line};
use super::errors::{StoreError, StoreResult};
use super::{validate_principal, RecordStore};
use crate::observability::{log_event_with_fields, Event};

#[derive(Serialize, Deserialize)]
struct Envelope<T> {
    principal: String,
    record: T,
}

/// File-backed record store
#[derive(Debug)]
pub struct FileStore<T> {
    path: PathBuf,
    /// Serializes writers within this process
    write_lock: Mutex<()>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> FileStore<T> {
    /// Opens a store at `path`, creating parent directories if needed.
    ///
    /// The file itself is created on first insert.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
            _marker: PhantomData,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn guard(&self) -> StoreResult<std::sync::MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| StoreError::Internal("file store lock poisoned".into()))
    }

    /// Reads all verified lines as `(line number, payload)`.
    fn read_payloads(&self) -> StoreResult<Vec<(usize, String)>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut payloads = Vec::new();
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            let line_no = idx + 1;
            if line.trim().is_empty() {
                continue;
            }
            match open_line(&line) {
                Some(payload) => payloads.push((line_no, payload.to_string())),
                None => {
                    let line_field = line_no.to_string();
                    let path_field = self.path.display().to_string();
                    log_event_with_fields(
                        Event::StoreCorruption,
                        &[("line", line_field.as_str()), ("path", path_field.as_str())],
                    );
                    return Err(StoreError::ChecksumMismatch(line_no));
                }
            }
        }
        Ok(payloads)
    }
}

fn decode<T: DeserializeOwned>(line: usize, payload: &str) -> StoreResult<Envelope<T>> {
    serde_json::from_str(payload).map_err(|e| StoreError::CorruptRecord {
        line,
        reason: e.to_string(),
    })
}

impl<T> RecordStore<T> for FileStore<T>
where
    T: Serialize + DeserializeOwned,
{
    fn insert(&self, principal: &str, record: &T) -> StoreResult<()> {
        validate_principal(principal)?;
        let payload = serde_json::to_string(&Envelope {
            principal: principal.to_string(),
            record,
        })?;

        let _guard = self.guard()?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(seal_line(&payload).as_bytes())?;
        file.write_all(b"\n")?;
        file.sync_all()?;
        Ok(())
    }

    fn list(&self, principal: &str) -> StoreResult<Vec<T>> {
        validate_principal(principal)?;
        let _guard = self.guard()?;
        let mut records = Vec::new();
        for (line, payload) in self.read_payloads()? {
            let envelope: Envelope<T> = decode(line, &payload)?;
            if envelope.principal == principal {
                records.push(envelope.record);
            }
        }
        Ok(records)
    }

    fn clear(&self, principal: &str) -> StoreResult<usize> {
        validate_principal(principal)?;
        let _guard = self.guard()?;

        let mut kept = Vec::new();
        let mut removed = 0;
        for (line, payload) in self.read_payloads()? {
            let envelope: Envelope<serde_json::Value> = decode(line, &payload)?;
            if envelope.principal == principal {
                removed += 1;
            } else {
                kept.push(payload);
            }
        }

        if removed == 0 {
            return Ok(0);
        }

        replace_file(&self.path, &kept)?;
        Ok(removed)
    }
}

/// Rewrites `path` with `payloads` through a `.tmp` sibling and a rename.
///
/// The sibling is removed if any step fails.
fn replace_file(path: &Path, payloads: &[String]) -> StoreResult<()> {
    let tmp_path = path.with_extension("tmp");
    let result = write_sealed(&tmp_path, payloads)
        .and_then(|()| fs::rename(&tmp_path, path).map_err(StoreError::from));
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

fn write_sealed(path: &Path, payloads: &[String]) -> StoreResult<()> {
    let mut file = File::create(path)?;
    for payload in payloads {
        file.write_all(seal_line(payload).as_bytes())?;
        file.write_all(b"\n")?;
    }
    file.sync_all()?;
    Ok(())
}
