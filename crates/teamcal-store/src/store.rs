//! Event snapshot store.
//!
//! The store holds the full event collection under one well-known
//! namespace and only supports wholesale reads and writes: every mutation
//! is a read-modify-write of the entire snapshot. The engine is agnostic to
//! how the snapshot is transported or encoded; these implementations cover
//! in-memory hosts and a JSON file on disk.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use teamcal_core::Event;

use crate::error::StoreResult;

/// Wholesale event snapshot storage.
pub trait EventStore {
    /// Loads the full event snapshot.
    fn load_events(&self) -> StoreResult<Vec<Event>>;

    /// Overwrites the full event snapshot.
    ///
    /// There are no partial or patch semantics at the store level.
    fn save_events(&mut self, events: &[Event]) -> StoreResult<()>;
}

/// An in-memory snapshot store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    events: Vec<Event>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with the given events.
    pub fn with_events(events: Vec<Event>) -> Self {
        Self { events }
    }

    /// Returns the number of stored records.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventStore for MemoryStore {
    fn load_events(&self) -> StoreResult<Vec<Event>> {
        Ok(self.events.clone())
    }

    fn save_events(&mut self, events: &[Event]) -> StoreResult<()> {
        trace!(count = events.len(), "Saving snapshot to memory store");
        self.events = events.to_vec();
        Ok(())
    }
}

/// A snapshot store backed by one JSON file per namespace.
///
/// Writes go to a temporary sibling file first and are renamed into place,
/// so a crashed write never leaves a truncated snapshot behind.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    /// Well-known snapshot namespace, used as the default file stem.
    pub const NAMESPACE: &'static str = "calendar_events";

    /// Creates a store at the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store under `dir` using the well-known namespace.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(format!("{}.json", Self::NAMESPACE)))
    }

    /// Returns the snapshot file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventStore for JsonStore {
    fn load_events(&self) -> StoreResult<Vec<Event>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "Snapshot file absent; empty snapshot");
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&self.path)?;
        let events: Vec<Event> = serde_json::from_str(&data)?;
        debug!(path = %self.path.display(), count = events.len(), "Loaded snapshot");
        Ok(events)
    }

    fn save_events(&mut self, events: &[Event]) -> StoreResult<()> {
        let data = serde_json::to_string_pretty(events)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), count = events.len(), "Saved snapshot");
        Ok(())
    }
}
