//! Data structures produced while flattening asset references into a cache.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

/// How many leading directory segments of an asset path survive as real directories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MaxDepth {
  /// Legacy behaviour: keep only the immediate parent, folded into the file name.
  #[default]
  Unset,
  /// Keep the first `k` directory segments and fold the rest into the file name.
  Depth(usize),
}

impl From<Option<usize>> for MaxDepth {
  fn from(value: Option<usize>) -> Self {
    value.map_or(Self::Unset, Self::Depth)
  }
}

impl fmt::Display for MaxDepth {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Unset => f.write_str("unset"),
      Self::Depth(depth) => write!(f, "{depth}"),
    }
  }
}

/// Location of an asset relative to the cache root.
///
/// The directory segments are kept verbatim from the original reference; the file name
/// carries every folded directory joined by underscores in front of the original name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FlattenedPath {
  dirs: Vec<String>,
  file_name: String,
}

impl FlattenedPath {
  /// Build a flattened path from preserved directories and the composed file name.
  pub fn new(dirs: Vec<String>, file_name: impl Into<String>) -> Self {
    Self {
      dirs,
      file_name: file_name.into(),
    }
  }

  /// Directory segments materialised under the cache root.
  pub fn dirs(&self) -> &[String] {
    &self.dirs
  }

  /// Composed file name placed inside [`FlattenedPath::dirs`].
  pub fn file_name(&self) -> &str {
    &self.file_name
  }

  /// Forward-slash directory prefix, or `None` when the file sits at the cache root.
  pub fn parent(&self) -> Option<String> {
    (!self.dirs.is_empty()).then(|| self.dirs.join("/"))
  }

  /// Native relative path for filesystem operations below the cache root.
  pub fn to_relative_path(&self) -> PathBuf {
    let mut path: PathBuf = self.dirs.iter().collect();
    path.push(&self.file_name);
    path
  }
}

impl fmt::Display for FlattenedPath {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for dir in &self.dirs {
      write!(f, "{dir}/")?;
    }
    f.write_str(&self.file_name)
  }
}

/// One original reference and the cache location it was assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
  /// Reference exactly as it appeared in the document.
  pub raw: String,
  /// Flattened location relative to the cache root.
  pub flattened: FlattenedPath,
}

/// How two references compete for one location below the cache root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionKind {
  /// Both references flatten to the same file.
  SameFile,
  /// One reference's file sits where the other needs a directory.
  FileAndDirectory,
}

/// Two distinct references that were assigned the same flattened location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
  /// Flattened location both references map to.
  pub flattened: String,
  /// Reference that claimed the location first.
  pub first: String,
  /// Later reference that landed on the same location.
  pub second: String,
  /// Whether the location is contested as a file or as a file and a directory.
  pub kind: CollisionKind,
}

impl Collision {
  /// Whether the cache can still be laid out, with the later file overwriting the first.
  pub fn is_recoverable(&self) -> bool {
    self.kind == CollisionKind::SameFile
  }
}

impl fmt::Display for Collision {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.kind {
      CollisionKind::SameFile => write!(
        f,
        "'{}' and '{}' both flatten to '{}'",
        self.first, self.second, self.flattened
      ),
      CollisionKind::FileAndDirectory => write!(
        f,
        "'{}' and '{}' both flatten to '{}', once as a file and once as a directory",
        self.first, self.second, self.flattened
      ),
    }
  }
}

/// Ordered, one-to-one association from original references to flattened locations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathMapping {
  entries: Vec<MappingEntry>,
  index: BTreeMap<String, usize>,
  collisions: Vec<Collision>,
}

impl PathMapping {
  /// Record a mapping, keeping the first assignment when the reference was already seen.
  pub(crate) fn insert(&mut self, raw: String, flattened: FlattenedPath) -> bool {
    if self.index.contains_key(&raw) {
      return false;
    }
    self.index.insert(raw.clone(), self.entries.len());
    self.entries.push(MappingEntry { raw, flattened });
    true
  }

  pub(crate) fn record_collision(&mut self, collision: Collision) {
    self.collisions.push(collision);
  }

  /// Number of distinct references in the mapping.
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// Returns `true` when no references were mapped.
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Flattened location assigned to `raw`, if any.
  pub fn get(&self, raw: &str) -> Option<&FlattenedPath> {
    self
      .index
      .get(raw)
      .map(|&position| &self.entries[position].flattened)
  }

  /// Entries in the order the references were first encountered.
  pub fn entries(&self) -> &[MappingEntry] {
    &self.entries
  }

  /// Collisions detected while the mapping was built.
  pub fn collisions(&self) -> &[Collision] {
    &self.collisions
  }

  /// Every directory prefix that must exist below the cache root before copying.
  ///
  /// Parents are listed before their children since the set is ordered lexically.
  pub fn materialized_dirs(&self) -> BTreeSet<String> {
    let mut dirs = BTreeSet::new();
    for entry in &self.entries {
      let segments = entry.flattened.dirs();
      for end in 1..=segments.len() {
        dirs.insert(segments[..end].join("/"));
      }
    }
    dirs
  }

  /// Forward-slash replacement table suitable for rewriting a document.
  pub fn to_replacements(&self) -> BTreeMap<String, String> {
    self
      .entries
      .iter()
      .map(|entry| (entry.raw.clone(), entry.flattened.to_string()))
      .collect()
  }
}

/// Outcome of installing a single asset into the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyStatus {
  /// Source bytes were copied to the destination.
  Copied,
  /// Destination was hard-linked to the source.
  Linked,
  /// Destination already referred to the source file.
  AlreadyPresent,
  /// Source did not exist; the reference keeps its original value.
  SkippedMissing,
}

/// Asset tracked through a single cache run.
#[derive(Debug, Clone)]
pub struct CachedAsset {
  /// Reference exactly as it appeared in the document.
  pub raw: String,
  /// Location assigned below the cache root.
  pub flattened: FlattenedPath,
  /// Resolved location the asset was read from.
  pub source: PathBuf,
  /// What happened when the asset was installed.
  pub status: CopyStatus,
}

/// Summary returned after a document has been cached.
#[derive(Debug, Clone)]
pub struct CacheReport {
  /// Path of the rewritten document.
  pub xml_path: PathBuf,
  /// Mapping computed for every reference in the document.
  pub mapping: PathMapping,
  /// Per-asset installation results, in document order.
  pub assets: Vec<CachedAsset>,
}

impl CacheReport {
  /// Number of assets that now exist below the cache root.
  pub fn installed_count(&self) -> usize {
    self
      .assets
      .iter()
      .filter(|asset| asset.status != CopyStatus::SkippedMissing)
      .count()
  }
}
