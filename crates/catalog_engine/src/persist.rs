use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use catalog_core::{render_catalog, ArtifactStyle, Catalog};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("catalog could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    Ok(())
}

/// Writes the catalog artifact to a fixed path, all or nothing.
///
/// Content goes to a temp file next to the target and is renamed over it, so
/// an existing artifact is either fully replaced or left untouched.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    target: PathBuf,
    style: ArtifactStyle,
}

impl ArtifactWriter {
    pub fn new(target: impl Into<PathBuf>, style: ArtifactStyle) -> Self {
        Self {
            target: target.into(),
            style,
        }
    }

    pub fn write_catalog(&self, catalog: &Catalog) -> Result<PathBuf, PersistError> {
        let content = render_catalog(catalog, self.style)?;
        self.write(&content)
    }

    fn write(&self, content: &str) -> Result<PathBuf, PersistError> {
        let dir = match self.target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        ensure_output_dir(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        tmp.persist(&self.target).map_err(|e| PersistError::Io(e.error))?;
        Ok(self.target.clone())
    }
}
