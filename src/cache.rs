//! First-page cache capability.
//!
//! The loader shows the cached first page immediately on construction and
//! overwrites it after every successful refresh. Cache failures are logged
//! and never fail a page.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Persists the first page of a paged list.
pub trait PageCache<I>: Send + Sync {
    fn save_first_page(&self, items: &[I]);

    /// Returns an empty vec when nothing is cached.
    fn load_first_page(&self) -> Vec<I>;
}

/// In-process cache.
#[derive(Debug)]
pub struct MemoryCache<I> {
    page: Mutex<Vec<I>>,
}

impl<I> MemoryCache<I> {
    pub fn new() -> Self {
        Self {
            page: Mutex::new(Vec::new()),
        }
    }
}

impl<I> Default for MemoryCache<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Clone + Send> PageCache<I> for MemoryCache<I> {
    fn save_first_page(&self, items: &[I]) {
        *self.page.lock() = items.to_vec();
    }

    fn load_first_page(&self) -> Vec<I> {
        self.page.lock().clone()
    }
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cache file '{path}' is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Cache backed by a JSON file.
///
/// Readers take a shared lock and writers an exclusive one, so several
/// processes can share the file.
#[derive(Debug)]
pub struct JsonFileCache<I> {
    path: PathBuf,
    _items: PhantomData<fn() -> I>,
}

impl<I> JsonFileCache<I> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _items: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> CacheError {
        CacheError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl<I: Serialize + DeserializeOwned> JsonFileCache<I> {
    pub fn try_save(&self, items: &[I]) -> Result<(), CacheError> {
        let json = serde_json::to_vec(items).map_err(|source| CacheError::Json {
            path: self.path.clone(),
            source,
        })?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;
        file.lock_exclusive().map_err(|e| self.io_error(e))?;
        let written = file
            .set_len(0)
            .and_then(|_| file.write_all(&json))
            .and_then(|_| file.flush());
        let _ = file.unlock();
        written.map_err(|e| self.io_error(e))
    }

    /// Returns `Ok(None)` when the file does not exist.
    pub fn try_load(&self) -> Result<Option<Vec<I>>, CacheError> {
        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        file.lock_shared().map_err(|e| self.io_error(e))?;
        let mut content = Vec::new();
        let read = file.read_to_end(&mut content);
        let _ = file.unlock();
        read.map_err(|e| self.io_error(e))?;

        if content.is_empty() {
            return Ok(None);
        }
        serde_json::from_slice(&content)
            .map(Some)
            .map_err(|source| CacheError::Json {
                path: self.path.clone(),
                source,
            })
    }
}

impl<I: Serialize + DeserializeOwned> PageCache<I> for JsonFileCache<I> {
    fn save_first_page(&self, items: &[I]) {
        if let Err(e) = self.try_save(items) {
            tracing::warn!(error = %e, "Failed to save first page");
        }
    }

    fn load_first_page(&self) -> Vec<I> {
        match self.try_load() {
            Ok(items) => items.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load cached first page");
                Vec::new()
            }
        }
    }
}
