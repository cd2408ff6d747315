use regex::Regex;

fn drive_prefix() -> &'static Regex {
    use std::sync::OnceLock;

    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z]:(?:[\\/]|$)").expect("invalid drive regex"))
}

/// Separator-agnostic view of an asset reference.
///
/// Both `/` and `\` split segments so references authored on either platform produce the
/// same sequence. Root and drive markers only set [`PathSegments::is_absolute`], empty and
/// `.` segments are dropped, and `..` is resolved lexically so that no segment sequence can
/// climb above its own root. Leading `..` segments of a relative reference are not part of
/// [`PathSegments::parts`] but are counted in [`PathSegments::climbs`], so two values
/// compare equal only when they name the same file relative to the same root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegments {
    absolute: bool,
    climbs: usize,
    parts: Vec<String>,
}

impl PathSegments {
    /// Split a raw reference into normalised segments.
    pub fn parse(raw: &str) -> Self {
        let (absolute, rest) = match drive_prefix().find(raw) {
            Some(marker) => (true, &raw[marker.end()..]),
            None => (raw.starts_with(['/', '\\']), raw),
        };

        let mut climbs = 0;
        let mut parts: Vec<String> = Vec::new();
        for segment in rest.split(['/', '\\']) {
            match segment {
                "" | "." => {}
                ".." => {
                    if parts.pop().is_none() && !absolute {
                        climbs += 1;
                    }
                }
                other => parts.push(other.to_string()),
            }
        }

        Self {
            absolute,
            climbs,
            parts,
        }
    }

    /// Whether the reference started at a filesystem root or drive.
    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    /// Number of leading `..` segments a relative reference starts with after resolution.
    pub fn climbs(&self) -> usize {
        self.climbs
    }

    /// Normalised segments, the last one being the file name.
    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// Drop `base` from the front of the directory segments when it is a proper prefix.
    ///
    /// The file name itself is never consumed, and a relative base never strips an absolute
    /// reference (or the reverse).
    pub fn strip_base(&mut self, base: &PathSegments) {
        if base.parts.is_empty() || self.absolute != base.absolute || self.climbs != base.climbs {
            return;
        }
        let dir_count = self.parts.len().saturating_sub(1);
        if base.parts.len() <= dir_count && self.parts.starts_with(&base.parts) {
            self.parts.drain(..base.parts.len());
        }
    }

    /// Split into directory segments and the trailing file name.
    pub fn split_file(&self) -> (&[String], &str) {
        match self.parts.split_last() {
            Some((file_name, dirs)) => (dirs, file_name.as_str()),
            None => (&[], ""),
        }
    }
}
