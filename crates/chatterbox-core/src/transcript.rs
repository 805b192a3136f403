//! Write-once files for downloading finished responses.
//!
//! Every file a [`TranscriptStore`] writes is tracked, and
//! [`TranscriptStore::shutdown`] removes them again. Call it from your
//! application's shutdown path.
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{
        Mutex, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
};

use tracing::{debug, warn};

use crate::{error::Result, generic::Snapshot};

#[derive(Debug)]
pub struct TranscriptStore {
    dir: PathBuf,
    written: Mutex<Vec<PathBuf>>,
    sequence: AtomicUsize,
}

impl TranscriptStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Mutex::new(Vec::new()),
            sequence: AtomicUsize::new(0),
        }
    }

    /// Store files under the system temp directory.
    pub fn in_temp_dir() -> Self {
        Self::new(std::env::temp_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist the answer of a successful final snapshot.
    ///
    /// Returns the written path, or `None` for snapshots that are partial or
    /// carry an error.
    pub async fn save(&self, snapshot: &Snapshot) -> Result<Option<PathBuf>> {
        if !snapshot.is_success() {
            return Ok(None);
        }

        tokio::fs::create_dir_all(&self.dir).await?;

        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        let name = format!(
            "response-{}-{sequence}.md",
            chrono::Utc::now().format("%Y%m%d-%H%M%S")
        );
        let path = self.dir.join(name);

        tokio::fs::write(&path, snapshot.answer_text.as_bytes()).await?;
        debug!(path = %path.display(), bytes = snapshot.answer_text.len(), "saved transcript");

        self.written
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.clone());

        Ok(Some(path))
    }

    /// Files written so far and not yet cleaned up.
    pub fn files(&self) -> Vec<PathBuf> {
        self.written
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Delete every file this store wrote. Returns how many were removed.
    ///
    /// Files that are already gone are skipped. Other failures are logged and
    /// the file is forgotten.
    pub async fn shutdown(&self) -> usize {
        let files = {
            let mut written = self.written.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::take(&mut *written)
        };

        let mut removed = 0;
        for path in files {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => removed += 1,
                Err(err) if err.kind() == ErrorKind::NotFound => {}
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "failed to remove transcript");
                }
            }
        }
        removed
    }
}
