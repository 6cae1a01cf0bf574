//! Persistence of the single high score value.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use bevy_ecs::resource::Resource;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::ScoreError;

/// Somewhere the high score survives between runs of the process.
pub trait HighScoreStore: Send + Sync {
    /// # Errors
    ///
    /// `ScoreError::Io` for unreadable storage, `ScoreError::Corrupt` for unparsable contents.
    /// A store that has never been written returns `Ok(0)`.
    fn load(&self) -> Result<u32, ScoreError>;

    /// # Errors
    ///
    /// `ScoreError::Io` if the value couldn't be written.
    fn save(&self, high_score: u32) -> Result<(), ScoreError>;
}

impl<T: HighScoreStore + ?Sized> HighScoreStore for Arc<T> {
    fn load(&self) -> Result<u32, ScoreError> {
        (**self).load()
    }

    fn save(&self, high_score: u32) -> Result<(), ScoreError> {
        (**self).save(high_score)
    }
}

/// Stores the high score as a decimal integer in a text file.
#[derive(Debug, Clone)]
pub struct FileHighScoreStore {
    path: PathBuf,
}

impl FileHighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl HighScoreStore for FileHighScoreStore {
    fn load(&self) -> Result<u32, ScoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let trimmed = contents.trim();
        trimmed.parse().map_err(|_| ScoreError::Corrupt(trimmed.to_string()))
    }

    fn save(&self, high_score: u32) -> Result<(), ScoreError> {
        fs::write(&self.path, high_score.to_string())?;
        Ok(())
    }
}

/// Keeps the last value in memory; used by tests and when no file is wanted.
#[derive(Debug, Default)]
pub struct MemoryHighScoreStore {
    value: Mutex<Option<u32>>,
    saves: Mutex<u32>,
}

impl MemoryHighScoreStore {
    pub fn with_value(value: u32) -> Self {
        Self {
            value: Mutex::new(Some(value)),
            saves: Mutex::new(0),
        }
    }

    pub fn value(&self) -> Option<u32> {
        *self.value.lock()
    }

    /// How many times `save` has been called.
    pub fn saves(&self) -> u32 {
        *self.saves.lock()
    }
}

impl HighScoreStore for MemoryHighScoreStore {
    fn load(&self) -> Result<u32, ScoreError> {
        Ok(self.value.lock().unwrap_or(0))
    }

    fn save(&self, high_score: u32) -> Result<(), ScoreError> {
        *self.value.lock() = Some(high_score);
        *self.saves.lock() += 1;
        Ok(())
    }
}

/// ECS handle to the configured store, remembering a write that still needs to happen.
#[derive(Resource)]
pub struct HighScoreStorage {
    store: Box<dyn HighScoreStore>,
    pending: Option<u32>,
}

impl HighScoreStorage {
    pub fn new(store: impl HighScoreStore + 'static) -> Self {
        Self {
            store: Box::new(store),
            pending: None,
        }
    }

    /// Reads the stored high score; any failure counts as no prior high score.
    pub fn load_or_default(&self) -> u32 {
        match self.store.load() {
            Ok(value) => {
                debug!(high_score = value, "Loaded high score");
                value
            }
            Err(error) => {
                warn!(%error, "Could not read high score, starting from 0");
                0
            }
        }
    }

    /// Persists `high_score`; on failure the value is kept for a later [`Self::flush`].
    pub fn save(&mut self, high_score: u32) {
        match self.store.save(high_score) {
            Ok(()) => {
                debug!(high_score, "Saved high score");
                self.pending = None;
            }
            Err(error) => {
                warn!(%error, high_score, "Could not save high score, will retry on exit");
                self.pending = Some(high_score);
            }
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.pending.is_some()
    }

    /// Retries a failed write, if any.
    pub fn flush(&mut self) {
        if let Some(high_score) = self.pending {
            self.save(high_score);
        }
    }
}
