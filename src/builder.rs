//! Cache orchestrator: extract, flatten, copy and rewrite a single document.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use same_file::is_same_file;

use crate::asset_paths::flatten_paths;
use crate::config::{CacheConfig, CollisionPolicy, CopyMode, MissingAssetPolicy};
use crate::errors::{AssetCacheError, Result};
use crate::models::{CacheReport, CachedAsset, CopyStatus, PathMapping};
use crate::xml::{extract_asset_paths, rewrite_asset_references};

/// Builds the cache for one document according to a [`CacheConfig`].
pub struct AssetCacheBuilder<'a> {
  config: &'a CacheConfig,
}

impl<'a> AssetCacheBuilder<'a> {
  /// Create a builder for the provided configuration.
  pub fn new(config: &'a CacheConfig) -> Self {
    Self { config }
  }

  /// Cache `xml_file` directly into the configured cache directory.
  pub fn build(&self, xml_file: &Path) -> Result<CacheReport> {
    self.build_into(xml_file, &self.config.cache_dir)
  }

  /// Cache `xml_file` into `output_dir`.
  ///
  /// The mapping and every copy source are settled before the filesystem is touched, so
  /// parse errors, strict collisions and missing assets under the `fail` policy leave no
  /// partial output behind.
  pub fn build_into(&self, xml_file: &Path, output_dir: &Path) -> Result<CacheReport> {
    log::info!(
      "creating asset cache for {} in {}",
      xml_file.display(),
      output_dir.display()
    );

    let xml = fs::read_to_string(xml_file).map_err(|err| AssetCacheError::io(err, xml_file))?;
    let table = self.config.attribute_table();
    let paths = extract_asset_paths(&xml, &table)?;
    log::info!("found {} asset reference(s) in {}", paths.len(), xml_file.display());

    let mapping = flatten_paths(&paths, self.config.asset_dir.as_deref(), self.config.depth());
    self.check_collisions(&mapping)?;

    let planned = self.plan_assets(xml_file, &mapping)?;
    let assets = self.install_assets(output_dir, &mapping, planned)?;

    let replacements: BTreeMap<String, String> = assets
      .iter()
      .filter(|asset| asset.status != CopyStatus::SkippedMissing)
      .map(|asset| (asset.raw.clone(), asset.flattened.to_string()))
      .collect();
    let rewritten = rewrite_asset_references(&xml, &table, &replacements)?;

    let xml_path = output_dir.join(self.output_file_name(xml_file));
    fs::write(&xml_path, rewritten).map_err(|err| AssetCacheError::io(err, &xml_path))?;
    log::info!("wrote rewritten document to {}", xml_path.display());

    Ok(CacheReport {
      xml_path,
      mapping,
      assets,
    })
  }

  fn check_collisions(&self, mapping: &PathMapping) -> Result<()> {
    let strict = self.config.collision_policy == CollisionPolicy::Fail;
    let fatal = mapping
      .collisions()
      .iter()
      .find(|collision| strict || !collision.is_recoverable());

    match fatal {
      Some(collision) => Err(AssetCacheError::Collision {
        flattened: collision.flattened.clone(),
        first: collision.first.clone(),
        second: collision.second.clone(),
      }),
      None => Ok(()),
    }
  }

  fn plan_assets(&self, xml_file: &Path, mapping: &PathMapping) -> Result<Vec<CachedAsset>> {
    let source_root = self.config.source_root(xml_file);
    let mut planned = Vec::with_capacity(mapping.len());

    for entry in mapping.entries() {
      let source = resolve_source(&source_root, &entry.raw);
      let status = if source.is_file() {
        CopyStatus::Copied
      } else {
        match self.config.missing_assets {
          MissingAssetPolicy::Fail => {
            return Err(AssetCacheError::MissingAsset {
              raw: entry.raw.clone(),
              source_path: source,
            });
          }
          MissingAssetPolicy::Skip => {
            log::warn!(
              "could not find source file {}, keeping original path '{}'",
              source.display(),
              entry.raw
            );
            CopyStatus::SkippedMissing
          }
        }
      };

      planned.push(CachedAsset {
        raw: entry.raw.clone(),
        flattened: entry.flattened.clone(),
        source,
        status,
      });
    }

    Ok(planned)
  }

  fn install_assets(
    &self,
    output_dir: &Path,
    mapping: &PathMapping,
    mut planned: Vec<CachedAsset>,
  ) -> Result<Vec<CachedAsset>> {
    fs::create_dir_all(output_dir).map_err(|err| AssetCacheError::io(err, output_dir))?;
    for dir in mapping.materialized_dirs() {
      let dir = output_dir.join(dir);
      fs::create_dir_all(&dir).map_err(|err| AssetCacheError::io(err, &dir))?;
    }

    for asset in planned
      .iter_mut()
      .filter(|asset| asset.status != CopyStatus::SkippedMissing)
    {
      let destination = output_dir.join(asset.flattened.to_relative_path());
      asset.status = install_asset(&asset.source, &destination, self.config.copy_mode)
        .map_err(|err| AssetCacheError::io(err, &destination))?;
      log::debug!(
        "{:?} {} to {}",
        asset.status,
        asset.source.display(),
        destination.display()
      );
    }

    Ok(planned)
  }

  fn output_file_name(&self, xml_file: &Path) -> String {
    let name = xml_file
      .file_name()
      .map(|name| name.to_string_lossy().into_owned())
      .unwrap_or_else(|| "document.xml".to_string());
    format!("{}{}", self.config.output_prefix, name)
  }
}

/// Cache root that keeps every processed document in its own subdirectory.
pub struct AssetCache {
  config: CacheConfig,
}

impl AssetCache {
  /// Create the cache root described by `config`.
  pub fn new(config: CacheConfig) -> Result<Self> {
    fs::create_dir_all(&config.cache_dir)
      .map_err(|err| AssetCacheError::io(err, &config.cache_dir))?;
    log::info!("initialized asset cache in {}", config.cache_dir.display());
    Ok(Self { config })
  }

  /// Root directory of the cache.
  pub fn cache_dir(&self) -> &Path {
    &self.config.cache_dir
  }

  /// Cache `xml_file` into `<cache_dir>/<document stem>/`.
  pub fn process_xml(&self, xml_file: &Path) -> Result<CacheReport> {
    let stem = xml_file
      .file_stem()
      .map(|stem| stem.to_string_lossy().into_owned())
      .unwrap_or_else(|| "document".to_string());
    let output_dir = self.config.cache_dir.join(stem);
    AssetCacheBuilder::new(&self.config).build_into(xml_file, &output_dir)
  }
}

fn resolve_source(source_root: &Path, raw: &str) -> PathBuf {
  let native = if std::path::MAIN_SEPARATOR == '/' {
    raw.replace('\\', "/")
  } else {
    raw.to_string()
  };
  let path = PathBuf::from(native);
  if path.is_absolute() {
    path
  } else {
    source_root.join(path)
  }
}

fn install_asset(source: &Path, destination: &Path, mode: CopyMode) -> std::io::Result<CopyStatus> {
  if destination.exists() {
    if is_same_file(source, destination)? {
      return Ok(CopyStatus::AlreadyPresent);
    }
    fs::remove_file(destination)?;
  }

  if mode == CopyMode::HardLink {
    match fs::hard_link(source, destination) {
      Ok(()) => return Ok(CopyStatus::Linked),
      Err(err) if err.kind() == ErrorKind::AlreadyExists => return Ok(CopyStatus::AlreadyPresent),
      Err(err) => log::debug!("hard link to {} failed ({err}), copying", destination.display()),
    }
  }

  fs::copy(source, destination)?;
  Ok(CopyStatus::Copied)
}
