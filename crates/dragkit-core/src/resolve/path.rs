//! Active-path addressing.
//!
//! Grammar, one segment per composite node on the way to the live leaf:
//! - nearest-of: `closest/<index>`
//! - layered fallback: `foreground` or `background`
//! - continuous leaf: `vary`
//! - fixed leaf, chained, metric override: no segment

use serde::{Deserialize, Serialize};
use std::fmt;

pub const SEGMENT_CLOSEST: &str = "closest";
pub const SEGMENT_FOREGROUND: &str = "foreground";
pub const SEGMENT_BACKGROUND: &str = "background";
pub const SEGMENT_VARY: &str = "vary";

/// Slash-delimited address of the live node in a spec tree, e.g. `closest/2/vary`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivePath(String);

impl ActivePath {
    /// The path of the root node (empty).
    pub fn root() -> Self {
        Self::default()
    }

    fn push(&self, segment: &str) -> Self {
        if self.0.is_empty() {
            Self(segment.to_string())
        } else {
            Self(format!("{}/{}", self.0, segment))
        }
    }

    pub fn closest(&self, index: usize) -> Self {
        self.push(SEGMENT_CLOSEST).push(&index.to_string())
    }

    pub fn foreground(&self) -> Self {
        self.push(SEGMENT_FOREGROUND)
    }

    pub fn background(&self) -> Self {
        self.push(SEGMENT_BACKGROUND)
    }

    pub fn vary(&self) -> Self {
        self.push(SEGMENT_VARY)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|segment| !segment.is_empty())
    }

    /// Whether `self` addresses `ancestor` or a node below it.
    pub fn is_within(&self, ancestor: &ActivePath) -> bool {
        ancestor.is_root()
            || self.0 == ancestor.0
            || (self.0.starts_with(&ancestor.0) && self.0[ancestor.0.len()..].starts_with('/'))
    }
}

impl fmt::Display for ActivePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for ActivePath {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ActivePath {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_building_paths() {
        let path = ActivePath::root().closest(1).background().closest(0).vary();
        assert_eq!(path, "closest/1/background/closest/0/vary");
        assert_eq!(
            path.segments().collect::<Vec<_>>(),
            vec!["closest", "1", "background", "closest", "0", "vary"]
        );
        assert!(ActivePath::root().is_root());
        assert_eq!(ActivePath::root().to_string(), "");
    }

    #[test]
    fn test_is_within() {
        let leaf = ActivePath::root().closest(1).foreground();
        assert!(leaf.is_within(&ActivePath::root()));
        assert!(leaf.is_within(&ActivePath::root().closest(1)));
        assert!(leaf.is_within(&leaf));
        assert!(!leaf.is_within(&ActivePath::root().closest(0)));
        // Prefix of the text but not of the segments.
        let eleven = ActivePath::root().closest(11);
        assert!(!eleven.is_within(&ActivePath::root().closest(1)));
    }
}
