//! Snapshot persistence.
//!
//! The whole editor state is saved as one JSON document under a single key:
//! project metadata, placed items, stage size and custom icons. Interaction
//! state and the admin flag are never part of it.
//!
//! DESIGN
//! ======
//! `Storage` is the port. The browser build writes to `localStorage`
//! (`BrowserStorage`); tests and native hosts use `MemoryStorage`. Loading is
//! forgiving: missing fields take defaults, out-of-range items are
//! normalized, and an invalid stage size falls back to the default instead of
//! discarding the plot.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::cell::RefCell;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use wasm_bindgen::JsValue;

use crate::catalog::CustomIcon;
use crate::consts::{SNAPSHOT_SCHEMA_VERSION, STORAGE_KEY};
use crate::doc::{Project, StageItem, StageSize};

/// Errors from loading or saving a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage write failed: {0}")]
    Write(String),
    #[error("stored snapshot is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("snapshot schema version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
}

/// The persisted document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub project: Project,
    #[serde(default, deserialize_with = "lenient_list")]
    pub stage_items: Vec<StageItem>,
    #[serde(default, deserialize_with = "lenient_stage_size")]
    pub stage_size: StageSize,
    #[serde(default, deserialize_with = "lenient_list")]
    pub custom_icons: Vec<CustomIcon>,
}

fn default_schema_version() -> u32 {
    SNAPSHOT_SCHEMA_VERSION
}

fn lenient_stage_size<'de, D>(deserializer: D) -> Result<StageSize, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match serde_json::from_value::<StageSize>(value) {
        Ok(size) => Ok(size),
        Err(e) => {
            log::warn!("stored stage size rejected, using default: {e}");
            Ok(StageSize::default())
        }
    }
}

/// A list where each unreadable entry is dropped on its own, so one bad item
/// never costs the rest of the plot.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let serde_json::Value::Array(values) = serde_json::Value::deserialize(deserializer)? else {
        log::warn!("stored list is not an array, ignoring it");
        return Ok(Vec::new());
    };
    let mut out = Vec::with_capacity(values.len());
    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value(value) {
            Ok(entry) => out.push(entry),
            Err(e) => log::warn!("skipping unreadable stored entry {index}: {e}"),
        }
    }
    Ok(out)
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            project: Project::default(),
            stage_items: Vec::new(),
            stage_size: StageSize::default(),
            custom_icons: Vec::new(),
        }
    }
}

impl Snapshot {
    /// Parse and normalize a stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Corrupt`] for invalid JSON and
    /// [`StorageError::UnsupportedVersion`] for snapshots from a newer build.
    pub fn from_json(raw: &str) -> Result<Self, StorageError> {
        let snapshot: Snapshot = serde_json::from_str(raw)?;
        if snapshot.schema_version > SNAPSHOT_SCHEMA_VERSION {
            return Err(StorageError::UnsupportedVersion {
                found: snapshot.schema_version,
                supported: SNAPSHOT_SCHEMA_VERSION,
            });
        }
        Ok(snapshot.normalized())
    }

    /// Serialize at the current schema version.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Corrupt`] if serialization fails.
    pub fn to_json(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Clamp item positions and scales, and stamp the current schema version.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.schema_version = SNAPSHOT_SCHEMA_VERSION;
        self.stage_items = self.stage_items.into_iter().map(StageItem::normalized).collect();
        self
    }
}

/// Where snapshots live.
pub trait Storage {
    /// Read the last saved snapshot. `Ok(None)` means nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend can't be read or holds an
    /// unreadable snapshot.
    fn load(&self) -> Result<Option<Snapshot>, StorageError>;

    /// Replace the saved snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend rejects the write.
    fn save(&self, snapshot: &Snapshot) -> Result<(), StorageError>;
}

impl<S: Storage + ?Sized> Storage for Rc<S> {
    fn load(&self) -> Result<Option<Snapshot>, StorageError> {
        (**self).load()
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        (**self).save(snapshot)
    }
}

/// In-process storage holding the serialized snapshot text.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    raw: RefCell<Option<String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with raw text, as if written by an earlier session.
    #[must_use]
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self { raw: RefCell::new(Some(raw.into())) }
    }

    /// The stored text, if any.
    #[must_use]
    pub fn raw(&self) -> Option<String> {
        self.raw.borrow().clone()
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<Option<Snapshot>, StorageError> {
        self.raw.borrow().as_deref().map(Snapshot::from_json).transpose()
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        let raw = snapshot.to_json()?;
        *self.raw.borrow_mut() = Some(raw);
        Ok(())
    }
}

/// `window.localStorage`, under [`STORAGE_KEY`].
#[derive(Debug, Clone)]
pub struct BrowserStorage {
    key: String,
}

impl Default for BrowserStorage {
    fn default() -> Self {
        Self { key: STORAGE_KEY.to_owned() }
    }
}

/// Readable text for a thrown JS value (usually a `DOMException`).
fn js_message(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

impl BrowserStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn backend(&self) -> Result<web_sys::Storage, StorageError> {
        let window = web_sys::window().ok_or_else(|| StorageError::Unavailable("no window".into()))?;
        window
            .local_storage()
            .map_err(|e| StorageError::Unavailable(js_message(&e)))?
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".into()))
    }
}

impl Storage for BrowserStorage {
    fn load(&self) -> Result<Option<Snapshot>, StorageError> {
        let raw = self
            .backend()?
            .get_item(&self.key)
            .map_err(|e| StorageError::Unavailable(js_message(&e)))?;
        raw.as_deref().map(Snapshot::from_json).transpose()
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        let raw = snapshot.to_json()?;
        self.backend()?
            .set_item(&self.key, &raw)
            .map_err(|e| StorageError::Write(js_message(&e)))
    }
}
