//! Caller-supplied settings for a cache run.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::{AssetCacheError, Result};
use crate::models::MaxDepth;
use crate::xml::{AttributeRule, AttributeTable};

const DEFAULT_CACHE_DIR: &str = "./asset_cache";
const DEFAULT_OUTPUT_PREFIX: &str = "transformed_";

/// What to do when two distinct references flatten to the same location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionPolicy {
    /// Log a warning and keep the computed locations.
    #[default]
    Warn,
    /// Abort before anything is written.
    Fail,
}

/// What to do when a referenced asset does not exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingAssetPolicy {
    /// Abort before anything is written.
    #[default]
    Fail,
    /// Log a warning, skip the copy and keep the original reference in the document.
    Skip,
}

/// How assets are placed into the cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CopyMode {
    /// Copy file contents.
    #[default]
    Copy,
    /// Hard-link to the source, falling back to a copy across filesystems.
    HardLink,
}

/// Settings for a cache run, loadable from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Root directory receiving flattened assets and rewritten documents.
    pub cache_dir: PathBuf,
    /// Base directory for relative references; defaults to the document's directory.
    pub asset_dir: Option<PathBuf>,
    /// Directory levels to preserve; absent keeps only the immediate parent.
    pub max_depth: Option<usize>,
    /// Handling of flattened path collisions.
    pub collision_policy: CollisionPolicy,
    /// Handling of references whose source file is missing.
    pub missing_assets: MissingAssetPolicy,
    /// Copy or hard-link assets into the cache.
    pub copy_mode: CopyMode,
    /// Prefix prepended to the rewritten document's file name.
    pub output_prefix: String,
    /// Attribute rules checked in addition to the built-in MJCF table.
    pub extra_attributes: Vec<AttributeRule>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            asset_dir: None,
            max_depth: None,
            collision_policy: CollisionPolicy::default(),
            missing_assets: MissingAssetPolicy::default(),
            copy_mode: CopyMode::default(),
            output_prefix: DEFAULT_OUTPUT_PREFIX.into(),
            extra_attributes: Vec::new(),
        }
    }
}

impl CacheConfig {
    /// Read configuration from a specific JSON file.
    ///
    /// Missing keys fall back to [`CacheConfig::default`]; an unreadable or malformed file is
    /// an error since the caller asked for it explicitly.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|err| AssetCacheError::io(err, path))?;
        serde_json::from_str(&content).map_err(|err| AssetCacheError::Config {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    /// Depth policy derived from [`CacheConfig::max_depth`].
    pub fn depth(&self) -> MaxDepth {
        MaxDepth::from(self.max_depth)
    }

    /// Built-in MJCF rules followed by [`CacheConfig::extra_attributes`].
    pub fn attribute_table(&self) -> AttributeTable {
        let mut table = AttributeTable::mjcf();
        table.extend(self.extra_attributes.iter().cloned());
        table
    }

    /// Directory relative references resolve against for `xml_file`.
    pub fn source_root(&self, xml_file: &Path) -> PathBuf {
        match &self.asset_dir {
            Some(dir) => dir.clone(),
            None => xml_file
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
        }
    }
}
