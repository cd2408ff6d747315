use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::path::Path;

use crate::asset_paths::segments::PathSegments;
use crate::models::{Collision, CollisionKind, FlattenedPath, MaxDepth, PathMapping};

/// Compute the cache location for every reference in `paths`.
///
/// References are processed in order and repeated strings keep their first assignment.
/// Relative references that start with `base_dir` have that prefix removed before
/// flattening; nothing is ever joined onto them. Distinct references that land on the same
/// location are reported through [`PathMapping::collisions`] and a warning, but their
/// locations are left as computed. Two references are the same file only when they agree on
/// root, leading `..` climbs and resolved segments. A file landing on a directory another
/// reference needs is reported as a [`CollisionKind::FileAndDirectory`] collision.
pub fn flatten_paths<S: AsRef<str>>(
    paths: &[S],
    base_dir: Option<&Path>,
    max_depth: MaxDepth,
) -> PathMapping {
    let base = base_dir.map(|dir| PathSegments::parse(&dir.to_string_lossy()));
    let mut mapping = PathMapping::default();
    let mut files: BTreeMap<String, (String, PathSegments)> = BTreeMap::new();
    let mut dirs: BTreeMap<String, String> = BTreeMap::new();

    for raw in paths {
        let raw = raw.as_ref();
        if mapping.get(raw).is_some() {
            continue;
        }

        let identity = PathSegments::parse(raw);
        let mut segments = identity.clone();
        if let Some(base) = &base {
            segments.strip_base(base);
        }
        let flattened = flatten_segments(&segments, max_depth);
        let location = flattened.to_string();

        match files.entry(location.clone()) {
            Entry::Vacant(slot) => {
                slot.insert((raw.to_string(), identity));
            }
            Entry::Occupied(slot) => {
                let (first, first_identity) = slot.get();
                if *first_identity == identity {
                    log::debug!("'{raw}' is an alias of '{first}'");
                } else {
                    report(&mut mapping, location.clone(), first, raw, CollisionKind::SameFile);
                }
            }
        }

        if let Some(owner) = dirs.get(&location) {
            let kind = CollisionKind::FileAndDirectory;
            report(&mut mapping, location.clone(), owner, raw, kind);
        }
        for end in 1..=flattened.dirs().len() {
            let prefix = flattened.dirs()[..end].join("/");
            if let Some((owner, _)) = files.get(&prefix) {
                let kind = CollisionKind::FileAndDirectory;
                report(&mut mapping, prefix.clone(), owner, raw, kind);
            }
            dirs.entry(prefix).or_insert_with(|| raw.to_string());
        }

        mapping.insert(raw.to_string(), flattened);
    }

    mapping
}

fn report(
    mapping: &mut PathMapping,
    flattened: String,
    first: &str,
    second: &str,
    kind: CollisionKind,
) {
    let collision = Collision {
        flattened,
        first: first.to_string(),
        second: second.to_string(),
        kind,
    };
    log::warn!("flattened path collision: {collision}");
    mapping.record_collision(collision);
}

/// Apply the depth rule to a single normalised reference.
pub fn flatten_segments(segments: &PathSegments, max_depth: MaxDepth) -> FlattenedPath {
    let (dirs, file_name) = segments.split_file();

    match max_depth {
        MaxDepth::Unset => match dirs.split_last() {
            Some((parent, _)) => {
                FlattenedPath::new(Vec::new(), fold(std::slice::from_ref(parent), file_name))
            }
            None => FlattenedPath::new(Vec::new(), file_name),
        },
        MaxDepth::Depth(depth) if dirs.len() <= depth => {
            FlattenedPath::new(dirs.to_vec(), file_name)
        }
        MaxDepth::Depth(depth) => {
            let (kept, folded) = dirs.split_at(depth);
            FlattenedPath::new(kept.to_vec(), fold(folded, file_name))
        }
    }
}

fn fold(dirs: &[String], file_name: &str) -> String {
    format!("{}_{}", dirs.join("_"), file_name)
}
