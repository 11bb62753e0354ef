// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! History persistence under the repository's control directory
//!
//! Layout:
//! - current: `<git-dir>/gw/history.json`
//! - legacy:  `<git-dir>/gw-undo/history.json`, moved on first load

use crate::history::OperationLog;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const HISTORY_FILE: &str = "history.json";
const HISTORY_DIR: &str = "gw";
const LEGACY_DIR: &str = "gw-undo";

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("failed to access {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("corrupt history file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to encode history: {0}")]
    Encode(#[from] serde_json::Error),
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> HistoryError + '_ {
    move |source| HistoryError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Reads and writes the operation log of one repository
#[derive(Debug, Clone)]
pub struct HistoryStore {
    git_dir: PathBuf,
}

impl HistoryStore {
    pub fn new(git_dir: impl Into<PathBuf>) -> Self {
        Self {
            git_dir: git_dir.into(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.git_dir.join(HISTORY_DIR).join(HISTORY_FILE)
    }

    fn legacy_dir(&self) -> PathBuf {
        self.git_dir.join(LEGACY_DIR)
    }

    /// Load the log. A missing file is an empty log; a corrupt one is an error.
    pub fn load(&self) -> Result<OperationLog, HistoryError> {
        self.migrate_legacy()?;

        let path = self.path();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no history yet");
                return Ok(OperationLog::default());
            }
            Err(e) => return Err(io_err(&path)(e)),
        };

        let log: OperationLog =
            serde_json::from_str(&content).map_err(|source| HistoryError::Corrupt {
                path: path.clone(),
                source,
            })?;
        tracing::debug!(path = %path.display(), entries = log.len(), "loaded history");
        Ok(log)
    }

    /// Write the log, replacing the file atomically
    pub fn save(&self, log: &OperationLog) -> Result<(), HistoryError> {
        let path = self.path();
        let dir = self.git_dir.join(HISTORY_DIR);
        fs::create_dir_all(&dir).map_err(io_err(&dir))?;

        let json = serde_json::to_string_pretty(log)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(io_err(&tmp))?;
        fs::rename(&tmp, &path).map_err(io_err(&path))?;

        tracing::debug!(path = %path.display(), entries = log.len(), "saved history");
        Ok(())
    }

    /// Move a history file left at the legacy location
    fn migrate_legacy(&self) -> Result<(), HistoryError> {
        let legacy_dir = self.legacy_dir();
        let legacy = legacy_dir.join(HISTORY_FILE);
        if !legacy.exists() {
            return Ok(());
        }

        let dest = self.path();
        if dest.exists() {
            tracing::warn!(
                legacy = %legacy.display(),
                "history exists at both legacy and current location, keeping current"
            );
        } else {
            let dir = self.git_dir.join(HISTORY_DIR);
            fs::create_dir_all(&dir).map_err(io_err(&dir))?;
            fs::rename(&legacy, &dest).map_err(io_err(&legacy))?;
            tracing::info!(from = %legacy.display(), to = %dest.display(), "migrated history");
        }

        match fs::remove_dir(&legacy_dir) {
            Ok(()) => Ok(()),
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::DirectoryNotEmpty | io::ErrorKind::NotFound
                ) =>
            {
                Ok(())
            }
            Err(e) => Err(io_err(&legacy_dir)(e)),
        }
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
