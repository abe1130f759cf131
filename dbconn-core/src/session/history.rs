//! Persisted connection history.
//!
//! The history file holds one URL per line. Lines starting with `#` and
//! blank lines are ignored on load. Whenever a new URL is added the whole
//! file is rewritten, sorted ascending. Credentials are never written.

use crate::{Result, error::DbConnError};
use std::path::{Path, PathBuf};

/// Default history file name, resolved against the working directory.
pub const DEFAULT_HISTORY_FILE: &str = "connhistory.txt";

/// Insertion-ordered set of unique connection URLs backed by a file.
#[derive(Debug, Clone)]
pub struct ConnectionHistory {
    path: PathBuf,
    urls: Vec<String>,
}

impl ConnectionHistory {
    /// An empty history that will persist to `path`.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            urls: Vec::new(),
        }
    }

    /// Loads the history file. A missing file yields an empty history.
    ///
    /// # Errors
    /// Returns error if the file exists but cannot be read
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No history file at {}", path.display());
                return Ok(Self::empty(path));
            }
            Err(e) => {
                return Err(DbConnError::io(
                    format!("Failed to read history file {}", path.display()),
                    e,
                ));
            }
        };

        let mut history = Self::empty(path);
        for line in contents.lines() {
            let url = line.trim();
            if url.is_empty() || url.starts_with('#') || history.contains(url) {
                continue;
            }
            history.urls.push(url.to_string());
        }

        tracing::debug!(
            "Loaded {} history entries from {}",
            history.urls.len(),
            history.path.display()
        );
        Ok(history)
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// URLs in insertion order.
    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    /// URL at a 1-based position in insertion order.
    pub fn get(&self, position: usize) -> Option<&str> {
        position
            .checked_sub(1)
            .and_then(|index| self.urls.get(index))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.iter().any(|known| known == url)
    }

    /// Adds a URL and rewrites the file when the URL is new.
    ///
    /// Returns whether the URL was new. Blank URLs are never recorded.
    ///
    /// # Errors
    /// Returns error if the file cannot be written; the entry stays in memory
    pub async fn add(&mut self, url: &str) -> Result<bool> {
        let url = url.trim();
        if url.is_empty() || self.contains(url) {
            return Ok(false);
        }

        self.urls.push(url.to_string());
        self.persist().await?;
        Ok(true)
    }

    /// Rewrites the whole file with the URLs sorted ascending.
    ///
    /// # Errors
    /// Returns error if the file cannot be written
    pub async fn persist(&self) -> Result<()> {
        tokio::fs::write(&self.path, self.render())
            .await
            .map_err(|e| {
                DbConnError::io(
                    format!("Failed to write history file {}", self.path.display()),
                    e,
                )
            })
    }

    fn render(&self) -> String {
        let mut sorted: Vec<&str> = self.urls.iter().map(String::as_str).collect();
        sorted.sort_unstable();

        let mut contents = sorted.join("\n");
        if !contents.is_empty() {
            contents.push('\n');
        }
        contents
    }
}
