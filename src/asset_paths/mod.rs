//! Helpers for normalising asset references and flattening them into cache locations.
//!
//! Segment normalisation and the depth rule live in separate submodules so that separator
//! handling can be tested apart from the flattening policy that builds on it.

mod flatten;
mod segments;

pub use flatten::{flatten_paths, flatten_segments};
pub use segments::PathSegments;
