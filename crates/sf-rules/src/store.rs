//! Storage port and backends
//!
//! The rule layer never touches storage directly; it goes through a
//! [`StoragePort`] injected at construction time. The port is a flat
//! key-to-JSON-value map, which keeps the stored layout identical no matter
//! which backend sits behind it. A missing key reads as absent and the
//! caller substitutes its default.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

// =============================================================================
// Errors
// =============================================================================

/// Error type for rule storage and management.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage I/O failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored data is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("URL is not blockable (only https:// is eligible): {0}")]
    IneligibleUrl(String),
    #[error("rule already exists: {0}")]
    DuplicateRule(String),
    #[error("focus group already exists: {0}")]
    DuplicateGroup(String),
    #[error("focus group not found: {0}")]
    GroupNotFound(String),
}

// =============================================================================
// Storage Port
// =============================================================================

/// Key-value storage seam between the rule layer and its backend.
pub trait StoragePort {
    /// Read the value stored under `key`, or `None` when absent.
    fn read(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn write(&mut self, key: &str, value: Value) -> Result<(), StoreError>;
}

// =============================================================================
// In-Memory Backend
// =============================================================================

/// Volatile backend used by tests and short-lived evaluations.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StoragePort for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

// =============================================================================
// JSON File Backend
// =============================================================================

/// Backend persisting the whole key space as one JSON document.
///
/// Every write rewrites the file, which is fine at the scale of a personal
/// rule list and keeps the document readable by hand.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    doc: serde_json::Map<String, Value>,
}

impl JsonFileStore {
    /// Open a store at `path`, loading the existing document when present.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let doc = if path.exists() {
            let text = fs::read_to_string(&path)?;
            if text.trim().is_empty() {
                serde_json::Map::new()
            } else {
                serde_json::from_str(&text)?
            }
        } else {
            serde_json::Map::new()
        };
        log::debug!("opened rule store at {} ({} keys)", path.display(), doc.len());
        Ok(Self { path, doc })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(&Value::Object(self.doc.clone()))?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

impl StoragePort for JsonFileStore {
    fn read(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.doc.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.doc.insert(key.to_string(), value);
        self.persist()
    }
}
