//! Command-line arguments for the `asset-cache` binary.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{CacheConfig, CollisionPolicy, CopyMode, MissingAssetPolicy};
use crate::errors::Result;

/// Cache assets referenced by an XML scene file under flattened names.
///
/// Every file referenced by the document is copied into the cache directory with its
/// directory structure folded into the file name, and a rewritten copy of the document
/// pointing at the cached files is written next to them.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
  /// Path to the XML file containing asset references.
  pub xml_file: PathBuf,

  /// Directory to store cached assets [default: ./asset_cache].
  #[arg(long, value_name = "DIR")]
  pub cache_dir: Option<PathBuf>,

  /// Base directory for resolving relative paths [default: the XML file's directory].
  #[arg(long, value_name = "DIR")]
  pub asset_dir: Option<PathBuf>,

  /// Number of leading directories to preserve; omit to keep only the immediate parent.
  #[arg(long, value_name = "N")]
  pub max_depth: Option<usize>,

  /// JSON file with cache settings; flags given here take precedence.
  #[arg(long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Keep references to missing files instead of failing.
  #[arg(long)]
  pub skip_missing: bool,

  /// Fail when two different files flatten to the same name.
  #[arg(long)]
  pub strict_collisions: bool,

  /// Hard-link assets into the cache instead of copying them.
  #[arg(long)]
  pub hard_link: bool,

  /// Log every copied asset.
  #[arg(short, long)]
  pub verbose: bool,
}

impl Cli {
  /// Merge the optional configuration file with the flags on the command line.
  pub fn to_config(&self) -> Result<CacheConfig> {
    let mut config = match &self.config {
      Some(path) => CacheConfig::from_path(path)?,
      None => CacheConfig::default(),
    };

    if let Some(dir) = &self.cache_dir {
      config.cache_dir = dir.clone();
    }
    if let Some(dir) = &self.asset_dir {
      config.asset_dir = Some(dir.clone());
    }
    if self.max_depth.is_some() {
      config.max_depth = self.max_depth;
    }
    if self.skip_missing {
      config.missing_assets = MissingAssetPolicy::Skip;
    }
    if self.strict_collisions {
      config.collision_policy = CollisionPolicy::Fail;
    }
    if self.hard_link {
      config.copy_mode = CopyMode::HardLink;
    }

    Ok(config)
  }
}
