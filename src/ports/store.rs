/* splashgate - server-driven startup screens for mobile clients
 * Copyright (C) 2024 Withings
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published
 * by the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>. */

use crate::ports::{KeyValueStore, PersistenceError};

use std::collections::HashMap;
use std::fmt::Display;
use std::path::PathBuf;
use std::sync::Arc;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use serde_json;
use log;

/// Key under which the last display time is stored
pub const LAST_SHOWN_KEY: &str = "startup_screen_last_shown";

/// Keeps everything in memory, forgets it all on exit
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Display for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        f.write_str("memory")
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.values.lock().await.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A JSON object in a file, rewritten as a whole on every set
pub struct FileStore {
    path: PathBuf,
    /// Serialises read-modify-write cycles
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path, lock: Mutex::new(()) }
    }

    /// Reads the whole file, a missing file is an empty store
    async fn load(&self) -> Result<HashMap<String, String>, PersistenceError> {
        let path_str = self.path.display().to_string();
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| PersistenceError::Read(path_str, e.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(PersistenceError::Read(path_str, e.to_string())),
        }
    }
}

impl Display for FileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        write!(f, "file:{}", self.path.display())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let _guard = self.lock.lock().await;
        let path_str = self.path.display().to_string();
        let write_error = |e: String| PersistenceError::Write(path_str.clone(), e);

        /* An unreadable file gets replaced rather than blocking writes forever */
        let mut values = self.load().await.unwrap_or_else(|e| {
            log::warn!("discarding unreadable store: {}", e);
            HashMap::new()
        });
        values.insert(key.to_string(), value.to_string());
        let payload = serde_json::to_vec_pretty(&values).map_err(|e| write_error(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| write_error(e.to_string()))?;
        }

        /* Write then rename, so that a crash never leaves half a file behind */
        let temporary = self.path.with_extension("tmp");
        tokio::fs::write(&temporary, payload).await.map_err(|e| write_error(e.to_string()))?;
        tokio::fs::rename(&temporary, &self.path).await.map_err(|e| write_error(e.to_string()))?;
        Ok(())
    }
}

/// The single "last shown" timestamp, on top of any key-value store
#[derive(Clone)]
pub struct ShownRecord {
    store: Arc<dyn KeyValueStore>,
}

impl ShownRecord {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Last display time, None if never shown or if it cannot be read
    pub async fn load(&self) -> Option<DateTime<Utc>> {
        let stored = match self.store.get(LAST_SHOWN_KEY).await {
            Ok(s) => s?,
            Err(e) => {
                log::warn!("error getting last shown time from {}: {}", self.store, e);
                return None;
            }
        };

        match DateTime::parse_from_rfc3339(&stored) {
            Ok(t) => Some(t.with_timezone(&Utc)),
            Err(e) => {
                log::warn!("ignoring unparseable last shown time {:?}: {}", stored, e);
                None
            }
        }
    }

    /// Overwrites the last display time
    pub async fn record(&self, now: DateTime<Utc>) -> Result<(), PersistenceError> {
        self.store.set(LAST_SHOWN_KEY, &now.to_rfc3339()).await
    }
}
