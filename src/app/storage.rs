//! On-disk artifact layout and atomic file operations
//!
//! All artifacts live under a single data root:
//!
//! ```text
//! <root>/json/accessions.json
//! <root>/json/markers/<accession id>.json
//! ```
//!
//! Writes go to a sibling temp file first and are renamed into place, so a
//! crash mid-write never leaves a truncated artifact behind.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::fs;
use tracing::{debug, error};

use crate::constants::files;
use crate::errors::{StorageError, StorageResult};

/// Fixed artifact paths rooted at a data directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    root: PathBuf,
}

impl Default for StorageLayout {
    fn default() -> Self {
        Self::new(files::DEFAULT_DATA_ROOT)
    }
}

impl StorageLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn json_dir(&self) -> PathBuf {
        self.root.join(files::JSON_DIR)
    }

    pub fn markers_dir(&self) -> PathBuf {
        self.json_dir().join(files::MARKERS_DIR)
    }

    pub fn accessions_path(&self) -> PathBuf {
        self.json_dir().join(files::ACCESSIONS_FILE_NAME)
    }

    /// Path of the marker artifact for an accession
    pub fn marker_path(&self, accession_id: &str) -> PathBuf {
        // Accession ids contain a version dot (NC_000001.10), so the extension
        // is appended rather than set.
        self.markers_dir().join(format!(
            "{}.{}",
            accession_id,
            files::MARKER_FILE_EXTENSION
        ))
    }

    /// Create every directory the artifacts need, if absent
    pub async fn ensure_directories(&self) -> StorageResult<()> {
        for dir in [self.root.clone(), self.json_dir(), self.markers_dir()] {
            fs::create_dir_all(&dir).await.map_err(|source| {
                error!("Failed to create storage directory {}: {}", dir.display(), source);
                StorageError::DirectoryNotAccessible {
                    path: dir.clone(),
                    source,
                }
            })?;
        }
        debug!("Storage layout ready under {}", self.root.display());
        Ok(())
    }
}

/// Read an artifact, returning `None` if it does not exist
pub async fn read_optional(path: &Path) -> StorageResult<Option<Vec<u8>>> {
    match fs::read(path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StorageError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Read an artifact that must exist
pub async fn read(path: &Path) -> StorageResult<Vec<u8>> {
    fs::read(path).await.map_err(|source| StorageError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Temp path used while writing `path`
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(files::TEMP_FILE_SUFFIX);
    path.with_file_name(name)
}

/// Replace the file at `path` with `content` using temp file + rename
pub async fn write_atomic(path: &Path, content: &[u8]) -> StorageResult<()> {
    let temp_path = temp_path_for(path);

    fs::write(&temp_path, content).await.map_err(|source| {
        error!("Failed to write temporary file {}: {}", temp_path.display(), source);
        StorageError::Write {
            path: temp_path.clone(),
            source,
        }
    })?;

    if let Err(source) = fs::rename(&temp_path, path).await {
        error!("Failed to rename temporary file: {}", source);
        let _ = fs::remove_file(&temp_path).await;
        return Err(StorageError::AtomicOperationFailed {
            temp_path,
            final_path: path.to_path_buf(),
            source,
        });
    }

    debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

/// Serialize `value` as compact JSON and write it atomically
pub async fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> StorageResult<()> {
    let content = serde_json::to_vec(value).map_err(|source| StorageError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    write_atomic(path, &content).await
}
