//! Persisted key-value state.
//!
//! `SavedState` keeps a small map of string keys to string values that
//! survives restarts. File-backed state is JSON:
//!
//! ```json
//! { "version": 1, "values": { "QUERY": "lamp" } }
//! ```
//!
//! Every `set` rewrites the file through a temporary file in the same
//! directory followed by a rename, so a crash never leaves a torn file.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use vitrine_core::{Error, Result};
use vitrine_reactive::Observable;

const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StateFile {
    version: u32,
    values: BTreeMap<String, String>,
}

/// Restartable string state.
pub struct SavedState {
    path: Option<PathBuf>,
    values: RefCell<BTreeMap<String, String>>,
    live: RefCell<HashMap<String, Observable<Option<String>>>>,
}

impl SavedState {
    /// State that lives only as long as this value.
    pub fn in_memory() -> Self {
        Self::from_parts(None, BTreeMap::new())
    }

    /// Opens file-backed state. A missing file is empty state.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(text) => decode(&path, &text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no saved state yet");
                BTreeMap::new()
            }
            Err(e) => return Err(Error::io(&path, e)),
        };
        tracing::debug!(path = %path.display(), keys = values.len(), "opened saved state");
        Ok(Self::from_parts(Some(path), values))
    }

    fn from_parts(path: Option<PathBuf>, values: BTreeMap<String, String>) -> Self {
        Self {
            path,
            values: RefCell::new(values),
            live: RefCell::new(HashMap::new()),
        }
    }

    /// The backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    /// Stores `value` under `key` (`None` deletes it) and persists.
    ///
    /// Nothing changes in memory if persisting fails.
    pub fn set(&self, key: &str, value: Option<String>) -> Result<()> {
        let mut next = self.values.borrow().clone();
        let previous = match &value {
            Some(v) => next.insert(key.to_string(), v.clone()),
            None => next.remove(key),
        };
        if previous == value {
            return Ok(());
        }

        if let Some(path) = &self.path {
            persist(path, &next)?;
            tracing::debug!(path = %path.display(), key, "persisted saved state");
        }
        *self.values.borrow_mut() = next;

        let live = self.live.borrow().get(key).cloned();
        if let Some(live) = live {
            live.set(value);
        }
        Ok(())
    }

    /// An observable that always holds the current value of `key`.
    ///
    /// Every call for the same key returns the same cell.
    pub fn live(&self, key: &str) -> Observable<Option<String>> {
        if let Some(live) = self.live.borrow().get(key) {
            return live.clone();
        }
        let live = Observable::with_value(self.get(key));
        self.live
            .borrow_mut()
            .insert(key.to_string(), live.clone());
        live
    }
}

fn decode(path: &Path, text: &str) -> Result<BTreeMap<String, String>> {
    let file: StateFile =
        serde_json::from_str(text).map_err(|e| Error::state(path, e.to_string()))?;
    if file.version != FORMAT_VERSION {
        return Err(Error::state(
            path,
            format!("unsupported version {}", file.version),
        ));
    }
    Ok(file.values)
}

fn persist(path: &Path, values: &BTreeMap<String, String>) -> Result<()> {
    let file = StateFile {
        version: FORMAT_VERSION,
        values: values.clone(),
    };
    let json =
        serde_json::to_vec_pretty(&file).map_err(|e| Error::state(path, e.to_string()))?;

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".vitrine-state.")
        .suffix(".json")
        .tempfile_in(dir)
        .map_err(|e| Error::io(dir, e))?;
    tmp.write_all(&json).map_err(|e| Error::io(tmp.path(), e))?;
    tmp.flush().map_err(|e| Error::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| Error::io(path, e.error))?;
    Ok(())
}
