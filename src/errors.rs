//! Error types surfaced by the asset cache.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, AssetCacheError>;

/// Failures that abort a cache run.
#[derive(Error, Debug)]
pub enum AssetCacheError {
  /// The document is not well-formed XML.
  #[error("XML parse error at byte {position}: {message}")]
  Parse {
    /// Byte offset reported by the reader.
    position: u64,
    /// Reader diagnostic.
    message: String,
  },

  /// A referenced asset does not exist where it was resolved to.
  #[error("asset '{raw}' not found at {}", source_path.display())]
  MissingAsset {
    /// Reference exactly as it appeared in the document.
    raw: String,
    /// Filesystem location the reference resolved to.
    source_path: PathBuf,
  },

  /// Two distinct references flatten to the same cache location.
  #[error("'{first}' and '{second}' both flatten to '{flattened}'")]
  Collision {
    /// Shared flattened location.
    flattened: String,
    /// Reference that claimed the location first.
    first: String,
    /// Later reference that landed on the same location.
    second: String,
  },

  /// Reading, writing or copying a file failed.
  #[error("I/O error accessing '{}': {source}", path.display())]
  Io {
    /// Path involved in the failing operation.
    path: PathBuf,
    /// Underlying I/O error.
    #[source]
    source: std::io::Error,
  },

  /// A configuration file could not be used.
  #[error("invalid configuration in {}: {message}", path.display())]
  Config {
    /// Configuration file that was rejected.
    path: PathBuf,
    /// Why it was rejected.
    message: String,
  },
}

impl AssetCacheError {
  /// Wrap an I/O error with the path it concerns.
  pub fn io(source: std::io::Error, path: impl AsRef<Path>) -> Self {
    Self::Io {
      path: path.as_ref().to_path_buf(),
      source,
    }
  }
}
