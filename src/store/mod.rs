//! Runtime settings with an injected persistence backend and change
//! notifications.
//!
//! The UI this service fronts keeps its API key in client-side storage and
//! broadcasts changes across tabs. Server-side that becomes an explicit
//! observable store: persistence is a capability handed in at construction,
//! and observers subscribe to a watch channel instead of listening for
//! ad-hoc events.

use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::errors::GuardianError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

pub trait SettingsBackend: Send + Sync {
    fn load(&self) -> Result<Option<Settings>, GuardianError>;
    fn save(&self, settings: &Settings) -> Result<(), GuardianError>;
}

/// Backend that keeps settings for the lifetime of the process only.
#[derive(Default)]
pub struct MemoryBackend {
    inner: Mutex<Option<Settings>>,
}

impl SettingsBackend for MemoryBackend {
    fn load(&self) -> Result<Option<Settings>, GuardianError> {
        Ok(self
            .inner
            .lock()
            .map_err(|_| GuardianError::Internal("Settings lock poisoned".into()))?
            .clone())
    }

    fn save(&self, settings: &Settings) -> Result<(), GuardianError> {
        *self
            .inner
            .lock()
            .map_err(|_| GuardianError::Internal("Settings lock poisoned".into()))? =
            Some(settings.clone());
        Ok(())
    }
}

/// Backend that persists settings as a JSON file.
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SettingsBackend for FileBackend {
    fn load(&self) -> Result<Option<Settings>, GuardianError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn save(&self, settings: &Settings) -> Result<(), GuardianError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(settings)?)?;
        Ok(())
    }
}

pub struct SettingsStore {
    backend: Box<dyn SettingsBackend>,
    tx: watch::Sender<Settings>,
    // Serializes read-modify-write cycles in `update`.
    write_lock: Mutex<()>,
}

impl SettingsStore {
    pub fn new(backend: Box<dyn SettingsBackend>) -> Result<Self, GuardianError> {
        let initial = backend.load()?.unwrap_or_default();
        let (tx, _rx) = watch::channel(initial);
        Ok(Self { backend, tx, write_lock: Mutex::new(()) })
    }

    pub fn in_memory() -> Self {
        let (tx, _rx) = watch::channel(Settings::default());
        Self {
            backend: Box::new(MemoryBackend::default()),
            tx,
            write_lock: Mutex::new(()),
        }
    }

    pub fn current(&self) -> Settings {
        self.tx.borrow().clone()
    }

    /// Apply a mutation, persist it, then notify subscribers.
    pub fn update(
        &self,
        mutate: impl FnOnce(&mut Settings),
    ) -> Result<Settings, GuardianError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| GuardianError::Internal("Settings lock poisoned".into()))?;
        let mut next = self.current();
        mutate(&mut next);
        next.updated_at = Some(Utc::now());
        self.backend.save(&next)?;
        self.tx.send_replace(next.clone());
        Ok(next)
    }

    /// Change feed for observers. Receivers see the value at subscription
    /// time and every update after it.
    pub fn subscribe(&self) -> watch::Receiver<Settings> {
        self.tx.subscribe()
    }

    pub fn api_key(&self) -> Option<String> {
        self.tx.borrow().api_key.clone().filter(|k| !k.is_empty())
    }

    pub fn model(&self) -> Option<String> {
        self.tx.borrow().model.clone().filter(|m| !m.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_and_read_back() {
        let store = SettingsStore::in_memory();
        store.update(|s| s.api_key = Some("AIzaSyTest".into())).unwrap();
        assert_eq!(store.api_key().as_deref(), Some("AIzaSyTest"));
        assert!(store.current().updated_at.is_some());
    }

    #[test]
    fn test_empty_key_reads_as_none() {
        let store = SettingsStore::in_memory();
        store.update(|s| s.api_key = Some(String::new())).unwrap();
        assert!(store.api_key().is_none());
    }

    #[test]
    fn test_subscribers_observe_updates() {
        let store = SettingsStore::in_memory();
        let mut rx = store.subscribe();
        assert!(rx.borrow().model.is_none());

        store.update(|s| s.model = Some("gemini-2.5-pro".into())).unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().model.as_deref(), Some("gemini-2.5-pro"));
    }

    #[test]
    fn test_file_backend_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let store = SettingsStore::new(Box::new(FileBackend::new(path.clone()))).unwrap();
        store.update(|s| s.api_key = Some("AIzaSyPersisted".into())).unwrap();

        // A fresh store over the same file sees the persisted value.
        let reloaded = SettingsStore::new(Box::new(FileBackend::new(path))).unwrap();
        assert_eq!(reloaded.api_key().as_deref(), Some("AIzaSyPersisted"));
    }

    #[test]
    fn test_file_backend_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(Box::new(FileBackend::new(
            dir.path().join("absent.json"),
        )))
        .unwrap();
        assert!(store.api_key().is_none());
    }
}
