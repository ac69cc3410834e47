//! File-backed reset marker.
//!
//! The marker's presence means "factory reset on next start-up"; its
//! content is irrelevant. Creation goes through a temporary sibling and a
//! rename, so the marker either exists completely or not at all.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use log::info;

use crate::app::ports::ResetMarker;
use crate::error::MarkerError;

pub struct FileResetMarker {
    path: PathBuf,
}

impl FileResetMarker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the directory that holds the marker, if missing.
    pub fn ensure_dir(&self) -> io::Result<()> {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir),
            _ => Ok(()),
        }
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ResetMarker for FileResetMarker {
    fn exists(&self) -> Result<bool, MarkerError> {
        Ok(self.path.try_exists()?)
    }

    fn create(&mut self) -> Result<(), MarkerError> {
        let staging = self.staging_path();
        File::create(&staging)?.sync_all()?;
        fs::rename(&staging, &self.path)?;
        info!("reset marker written: {}", self.path.display());
        Ok(())
    }

    fn delete(&mut self) -> Result<(), MarkerError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!("reset marker removed: {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
