#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod asset_paths;
pub mod builder;
pub mod cli;
pub mod config;
pub mod errors;
pub mod models;
pub mod xml;

pub use asset_paths::flatten_paths;
pub use builder::{AssetCache, AssetCacheBuilder};
pub use config::{CacheConfig, CollisionPolicy, CopyMode, MissingAssetPolicy};
pub use errors::{AssetCacheError, Result};
pub use models::{
  CacheReport, CachedAsset, Collision, CollisionKind, CopyStatus, FlattenedPath, MaxDepth,
  PathMapping,
};
pub use xml::{AttributeTable, ReferenceLookup, extract_paths, rewrite_asset_references};
