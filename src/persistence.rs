use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::document::Document;
use crate::error::{Result, StoreError, WhiteboardError};

/// Durable string-keyed storage the document is written to
pub trait KeyValueStore {
    fn read(&self, key: &str) -> std::result::Result<Option<String>, StoreError>;
    fn write(&mut self, key: &str, value: String) -> std::result::Result<(), StoreError>;
}

/// In-process store. Can be told to reject writes, like a full quota.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    reject_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: impl Into<String>) -> Self {
        let mut store = Self::new();
        store.values.insert(key.to_owned(), value.into());
        store
    }

    pub fn set_reject_writes(&mut self, reject: bool) {
        self.reject_writes = reject;
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> std::result::Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: String) -> std::result::Result<(), StoreError> {
        if self.reject_writes {
            return Err(StoreError::Rejected("quota exceeded".to_owned()));
        }
        self.values.insert(key.to_owned(), value);
        Ok(())
    }
}

/// One `{key}.json` file per key inside a state directory
#[derive(Debug, Clone)]
pub struct FileStore {
    state_dir: PathBuf,
}

impl FileStore {
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            state_dir: state_dir.into(),
        }
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.state_dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> std::result::Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, key: &str, value: String) -> std::result::Result<(), StoreError> {
        fs::create_dir_all(&self.state_dir)?;
        // write-then-rename so a crash never leaves half a document behind
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(tmp, path)?;
        Ok(())
    }
}

/// Borrowed eframe app storage, as handed to [`eframe::App::save`]
pub struct EframeStore<'a>(pub &'a mut dyn eframe::Storage);

impl KeyValueStore for EframeStore<'_> {
    fn read(&self, key: &str) -> std::result::Result<Option<String>, StoreError> {
        Ok(self.0.get_string(key))
    }

    fn write(&mut self, key: &str, value: String) -> std::result::Result<(), StoreError> {
        self.0.set_string(key, value);
        self.0.flush();
        Ok(())
    }
}

/// Reads and writes the [`Document`] under one storage key
#[derive(Debug, Clone)]
pub struct PersistenceGateway {
    key: String,
}

impl PersistenceGateway {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn encode(document: &Document) -> Result<String> {
        serde_json::to_string(document).map_err(|e| WhiteboardError::PersistenceWriteFailure(e.to_string()))
    }

    pub fn decode(json: &str) -> Result<Document> {
        serde_json::from_str::<Document>(json)
            .map_err(|e| WhiteboardError::PersistenceReadFailure(e.to_string()))?
            .validated()
    }

    /// Read the stored document. `Ok(None)` means nothing was stored yet.
    pub fn try_load(&self, store: &dyn KeyValueStore) -> Result<Option<Document>> {
        let stored = store
            .read(&self.key)
            .map_err(|e| WhiteboardError::PersistenceReadFailure(e.to_string()))?;
        stored.as_deref().map(Self::decode).transpose()
    }

    /// Read the stored document, synthesizing the default one when nothing
    /// usable is stored
    pub fn load(&self, store: &dyn KeyValueStore) -> Document {
        match self.try_load(store) {
            Ok(Some(document)) => {
                log::debug!("Loaded document with {} notebooks", document.notebooks().len());
                document
            }
            Ok(None) => {
                log::debug!("No stored document under {:?}; starting fresh", self.key);
                Document::default()
            }
            Err(e) => {
                log::warn!("{e}; starting with a fresh document");
                Document::default()
            }
        }
    }

    /// Copy `fallback` into `store` when the store holds nothing under the
    /// key yet. Returns whether anything was written.
    pub fn seed(&self, store: &mut dyn KeyValueStore, fallback: Option<String>) -> bool {
        let Some(json) = fallback else {
            return false;
        };
        match store.read(&self.key) {
            Ok(None) => {}
            Ok(Some(_)) => return false,
            Err(e) => {
                log::warn!("Not seeding {:?}: {e}", self.key);
                return false;
            }
        }
        if let Err(e) = Self::decode(&json) {
            log::warn!("Ignoring fallback document: {e}");
            return false;
        }
        match store.write(&self.key, json) {
            Ok(()) => {
                log::info!("Seeded {:?} from fallback storage", self.key);
                true
            }
            Err(e) => {
                log::warn!("Failed to seed {:?}: {e}", self.key);
                false
            }
        }
    }

    pub fn try_save(&self, store: &mut dyn KeyValueStore, document: &Document) -> Result<()> {
        let json = Self::encode(document)?;
        store
            .write(&self.key, json)
            .map_err(|e| WhiteboardError::PersistenceWriteFailure(e.to_string()))
    }

    /// Fire-and-forget save: failures are logged and otherwise ignored, the
    /// in-memory document stays authoritative. Returns whether it succeeded.
    pub fn save(&self, store: &mut dyn KeyValueStore, document: &Document) -> bool {
        match self.try_save(store, document) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("{e}; continuing with unsaved changes");
                false
            }
        }
    }
}
