//! Best-score persistence
//!
//! A run only ever needs one number: the best floored score so far. Stores
//! hide where it lives (memory, a JSON file, or LocalStorage on the web).

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("high score I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("high score record is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Storage collaborator for the single best score
pub trait HighScoreStore {
    /// Stored best, or 0 when nothing has been saved yet
    fn load(&self) -> Result<u64, StoreError>;
    fn save(&mut self, score: u64) -> Result<(), StoreError>;
}

/// Best score, degrading to 0 when the store cannot be read
pub fn load_or_zero(store: &dyn HighScoreStore) -> u64 {
    match store.load() {
        Ok(score) => score,
        Err(e) => {
            log::warn!("Could not read high score, starting from 0: {}", e);
            0
        }
    }
}

/// On-disk / LocalStorage record
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct HighScoreRecord {
    high_score: u64,
}

/// Volatile store for tests and headless runs
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    score: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_score(score: u64) -> Self {
        Self { score }
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> Result<u64, StoreError> {
        Ok(self.score)
    }

    fn save(&mut self, score: u64) -> Result<(), StoreError> {
        self.score = score;
        Ok(())
    }
}

/// JSON file on disk (native only)
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStore {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl HighScoreStore for FileStore {
    fn load(&self) -> Result<u64, StoreError> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };
        let record: HighScoreRecord = serde_json::from_str(&json)?;
        Ok(record.high_score)
    }

    fn save(&mut self, score: u64) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(&HighScoreRecord { high_score: score })?;
        std::fs::write(&self.path, json)?;
        log::info!("High score {} saved to {}", score, self.path.display());
        Ok(())
    }
}

/// Browser LocalStorage (wasm32 only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    const STORAGE_KEY: &'static str = "road_rush_high_score";

    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| StoreError::Unavailable("LocalStorage".to_string()))
    }
}

#[cfg(target_arch = "wasm32")]
impl HighScoreStore for LocalStorageStore {
    fn load(&self) -> Result<u64, StoreError> {
        let storage = Self::storage()?;
        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => {
                let record: HighScoreRecord = serde_json::from_str(&json)?;
                Ok(record.high_score)
            }
            Ok(None) => Ok(0),
            Err(_) => Err(StoreError::Unavailable("LocalStorage read".to_string())),
        }
    }

    fn save(&mut self, score: u64) -> Result<(), StoreError> {
        let storage = Self::storage()?;
        let json = serde_json::to_string(&HighScoreRecord { high_score: score })?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|_| StoreError::Unavailable("LocalStorage write".to_string()))?;
        log::info!("High score {} saved", score);
        Ok(())
    }
}
