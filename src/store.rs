#[cfg(test)]
use std::collections::HashMap;
use std::error::Error;
use std::fmt;

use rusqlite::Connection;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::db;
use crate::domain::task::Task;

pub const TASKS_KEY: &str = "tasks";
pub const ACTIVITY_KEY: &str = "activity";

/// Durable string-to-string storage the task state is written through to.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Writes all entries together; later entries win on duplicate keys.
    fn set_many(&mut self, entries: &[(&str, String)]) -> Result<(), StoreError>;
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let conn = db::open_connection(path)?;
        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(db::get_value(&self.conn, key)?)
    }

    fn set_many(&mut self, entries: &[(&str, String)]) -> Result<(), StoreError> {
        Ok(db::set_values(&mut self.conn, entries)?)
    }
}

#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    fail_writes: bool,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.entries.insert(key.to_string(), value.to_string());
        store
    }

    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set_many(&mut self, entries: &[(&str, String)]) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Db(rusqlite::Error::InvalidQuery));
        }
        for (key, value) in entries {
            self.entries.insert((*key).to_string(), value.clone());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredState {
    pub tasks: Vec<Task>,
    pub activity: Vec<String>,
}

/// Typed view over a [`KeyValueStore`] holding the `tasks` and `activity` sequences.
pub struct PersistentStore<S> {
    backend: S,
}

impl<S: KeyValueStore> PersistentStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    /// Never fails: a missing or unparsable value loads as an empty sequence,
    /// and array entries that do not decode are skipped one by one.
    pub fn load(&self) -> StoredState {
        StoredState {
            tasks: self.load_sequence(TASKS_KEY),
            activity: self.load_sequence(ACTIVITY_KEY),
        }
    }

    pub fn save(&mut self, tasks: &[Task], activity: &[String]) -> Result<(), StoreError> {
        let entries = [
            (TASKS_KEY, encode(tasks)?),
            (ACTIVITY_KEY, encode(activity)?),
        ];
        self.backend.set_many(&entries)
    }

    #[cfg(test)]
    pub fn backend(&self) -> &S {
        &self.backend
    }

    #[cfg(test)]
    pub fn backend_mut(&mut self) -> &mut S {
        &mut self.backend
    }

    fn load_sequence<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let raw = match self.backend.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                tracing::warn!(key, error = %err, "storage read failed; starting empty");
                return Vec::new();
            }
        };
        let entries = match serde_json::from_str::<Option<Vec<serde_json::Value>>>(&raw) {
            Ok(entries) => entries.unwrap_or_default(),
            Err(err) => {
                tracing::warn!(key, error = %err, "stored value is not parsable; starting empty");
                return Vec::new();
            }
        };
        entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value::<T>(entry) {
                Ok(value) => Some(value),
                Err(err) => {
                    tracing::warn!(key, index, error = %err, "skipping unreadable stored entry");
                    None
                }
            })
            .collect()
    }
}

fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String, StoreError> {
    Ok(serde_json::to_string(value)?)
}

#[derive(Debug)]
pub enum StoreError {
    Db(rusqlite::Error),
    Json(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Db(err) => write!(f, "storage database error: {}", err),
            StoreError::Json(err) => write!(f, "storage serialization error: {}", err),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StoreError::Db(err) => Some(err),
            StoreError::Json(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        StoreError::Db(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        StoreError::Json(value)
    }
}
