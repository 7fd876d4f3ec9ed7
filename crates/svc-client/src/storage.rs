//! Session storage collaborators.
//!
//! The client stores the signed session verbatim and resends it on every
//! authed call. Two implementations are provided: process memory, and a file
//! for command line tools that sign in once and reuse the session.

use crate::errors::StorageError;
use parking_lot::RwLock;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Where the client keeps its signed session.
pub trait SessionStorage: Send + Sync {
    fn save(&self, token: &str) -> Result<(), StorageError>;

    /// The stored session, or `None` when signed out.
    fn load(&self) -> Result<Option<String>, StorageError>;

    fn clear(&self) -> Result<(), StorageError>;
}

impl<S: SessionStorage + ?Sized> SessionStorage for Arc<S> {
    fn save(&self, token: &str) -> Result<(), StorageError> {
        (**self).save(token)
    }

    fn load(&self) -> Result<Option<String>, StorageError> {
        (**self).load()
    }

    fn clear(&self) -> Result<(), StorageError> {
        (**self).clear()
    }
}

/// Session held in process memory.
#[derive(Debug, Default)]
pub struct InMemorySessionStorage {
    token: RwLock<Option<String>>,
}

impl InMemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for InMemorySessionStorage {
    fn save(&self, token: &str) -> Result<(), StorageError> {
        *self.token.write() = Some(token.to_string());
        Ok(())
    }

    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.token.read().clone())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.token.write() = None;
        Ok(())
    }
}

/// Session persisted in a single file.
///
/// A missing or empty file means signed out.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl SessionStorage for FileSessionStorage {
    fn save(&self, token: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        fs::write(&self.path, token).map_err(|e| self.io_error(e))?;

        // Owner read/write only.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))
                .map_err(|e| self.io_error(e))?;
        }

        debug!(path = %self.path.display(), "Saved session");
        Ok(())
    }

    fn load(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "Cleared session");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}
