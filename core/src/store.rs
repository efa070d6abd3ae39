//! Persistence of the user's raw character data.
//!
//! Backends:
//! - `MemoryStore`: a map, for tests and one-off runs
//! - `RedbStore`: `redb`-backed store that survives restarts

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::error::{Error, Result};

/// Key under which the raw character data is stored.
pub const RAW_DATA_KEY: &str = "rawData";

/// String key-value store.
pub trait CharacterStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

impl<T: CharacterStore + ?Sized> CharacterStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

/// Thread-safe in-memory store. Clones share the same data.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with one entry.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        if let Ok(mut map) = store.inner.write() {
            map.insert(key.to_string(), value.to_string());
        }
        store
    }
}

impl CharacterStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let map = self
            .inner
            .read()
            .map_err(|_| Error::Storage("memory store lock poisoned".into()))?;
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| Error::Storage("memory store lock poisoned".into()))?;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Redb-backed store: one table of string keys to string values.
pub struct RedbStore {
    db: redb::Database,
    path: PathBuf,
}

impl RedbStore {
    const TABLE_DEF: redb::TableDefinition<'static, &'static str, &'static str> =
        redb::TableDefinition::new("settings");

    /// Create or open a database at `path`, creating parent directories.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Storage(format!("create {}: {}", parent.display(), e)))?;
        }
        let db = redb::Database::create(path)?;

        // make sure the table exists so read transactions can open it
        let write_txn = db.begin_write()?;
        write_txn.open_table(Self::TABLE_DEF)?;
        write_txn.commit()?;

        Ok(Self {
            db,
            path: path.to_path_buf(),
        })
    }

    /// Default location: `~/.purpleculture/store.redb`.
    pub fn default_path() -> PathBuf {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".purpleculture").join("store.redb")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CharacterStore for RedbStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(Self::TABLE_DEF)?;
        let value = table.get(key)?.map(|v| v.value().to_string());
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(Self::TABLE_DEF)?;
            table.insert(key, value)?;
        }
        write_txn.commit()?;
        Ok(())
    }
}
