//! Level file storage.
//!
//! DESIGN
//! ======
//! Each level is one pretty-printed JSON file, `<levels_dir>/<name>.json`,
//! holding `{ objects, dimensions }`. The file stem is the level name. There
//! is no index file: listing reads the directory every time.
//!
//! Writes go to a hidden temp file next to the target and are renamed into
//! place, so a concurrent list never sees a half-written level. Concurrent
//! saves of the same name race; the last rename wins.
//!
//! ERROR HANDLING
//! ==============
//! Listing is best effort. A missing directory lists as empty, and files that
//! cannot be read or parsed are skipped with a warning so one bad file does
//! not hide every other level. Saving reports every failure.

#[cfg(test)]
#[path = "levels_test.rs"]
mod levels_test;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use editor::doc::{Level, Levels};
use tracing::{info, warn};

const LEVEL_EXT: &str = "json";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("invalid level name: {0:?}")]
    InvalidName(String),
    #[error("level storage error: {0}")]
    Io(#[from] std::io::Error),
    #[error("level encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Directory-backed level store. Cheap to clone.
#[derive(Debug, Clone)]
pub struct LevelStore {
    dir: PathBuf,
}

// =============================================================================
// NAMES
// =============================================================================

/// Check that `name` can be used as a file stem inside the levels directory.
///
/// # Errors
///
/// Rejects empty names, names with path separators or `..`, names starting
/// with a dot, and names containing NUL.
pub fn validate_name(name: &str) -> Result<&str, LevelError> {
    let bad = name.trim().is_empty()
        || name.contains(['/', '\\', '\0'])
        || name.contains("..")
        || name.starts_with('.');
    if bad {
        return Err(LevelError::InvalidName(name.to_owned()));
    }
    Ok(name)
}

// =============================================================================
// STORE
// =============================================================================

impl LevelStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn level_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{LEVEL_EXT}"))
    }

    /// Read every `*.json` level in the directory, keyed by file stem.
    ///
    /// # Errors
    ///
    /// Returns [`LevelError::Io`] only when the directory exists but cannot be
    /// listed.
    pub async fn list(&self) -> Result<Levels, LevelError> {
        let mut levels = Levels::new();
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(levels),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(LEVEL_EXT) {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            match read_level(&path).await {
                Ok(level) => {
                    levels.insert(name.to_owned(), level);
                }
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable level file"),
            }
        }

        info!(count = levels.len(), dir = %self.dir.display(), "levels listed");
        Ok(levels)
    }

    /// Write `level` as `<name>.json`, creating the directory when needed.
    ///
    /// # Errors
    ///
    /// Fails on an invalid name, a serialization error, or any filesystem error.
    pub async fn save(&self, name: &str, level: &Level) -> Result<PathBuf, LevelError> {
        let name = validate_name(name)?;
        let body = serde_json::to_string_pretty(level)?;

        tokio::fs::create_dir_all(&self.dir).await?;
        let target = self.level_path(name);
        let tmp = self.dir.join(format!(".{name}.{LEVEL_EXT}.tmp"));

        tokio::fs::write(&tmp, body).await?;
        if let Err(e) = tokio::fs::rename(&tmp, &target).await {
            if let Err(cleanup) = tokio::fs::remove_file(&tmp).await {
                warn!(path = %tmp.display(), error = %cleanup, "failed to remove temp level file");
            }
            return Err(e.into());
        }

        info!(%name, objects = level.objects.len(), "level saved");
        Ok(target)
    }
}

async fn read_level(path: &Path) -> Result<Level, LevelError> {
    let raw = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&raw)?)
}
