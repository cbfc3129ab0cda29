//! JSON Pointer paths and their structural algebra.
//!
//! A [`Path`] is an immutable sequence of unescaped segments. Every
//! structural operation returns a new value; the transform engine uses them
//! to decide whether two operations touch the same subtree and to shift
//! array indices when elements are inserted or removed ahead of a target.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserialize, Deserializer};
use serde::{Serialize, Serializer};

use jsonpatch_ot_pointer::{format_json_pointer, parse_index, parse_json_pointer, JsonPointerError};

/// An address into a JSON tree. The empty path is the document root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path(Vec<String>);

impl Path {
    pub fn root() -> Self {
        Path(Vec::new())
    }

    /// Parse a JSON Pointer string such as `/a/0/b`.
    pub fn parse(pointer: &str) -> Result<Self, JsonPointerError> {
        parse_json_pointer(pointer).map(Path)
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Path(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The last segment, or `None` at the root.
    pub fn name(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// True when the last segment is a canonical array index.
    pub fn is_array_element(&self) -> bool {
        self.array_index().is_some()
    }

    pub fn array_index(&self) -> Option<usize> {
        self.name().and_then(parse_index)
    }

    /// The path of the array containing this element.
    pub fn array_path(&self) -> Option<Path> {
        if self.is_array_element() {
            self.parent()
        } else {
            None
        }
    }

    pub fn parent(&self) -> Option<Path> {
        self.0
            .split_last()
            .map(|(_, rest)| Path(rest.to_vec()))
    }

    pub fn child(&self, segment: impl Into<String>) -> Path {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Path(segments)
    }

    /// Every non-root prefix of this path, outermost first, ending with the
    /// path itself. `/a/0/b` yields `/a`, `/a/0`, `/a/0/b`.
    pub fn names(&self) -> Vec<Path> {
        (1..=self.0.len()).map(|n| Path(self.0[..n].to_vec())).collect()
    }

    /// Segment-wise prefix test (a path starts with itself).
    pub fn starts_with(&self, prefix: &Path) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// True when `self` is `other` or lies inside the subtree at `other`.
    pub fn intersects(&self, other: &Path) -> bool {
        self.starts_with(other)
    }

    /// Strict ancestor test.
    pub fn is_ancestor_of(&self, other: &Path) -> bool {
        self.0.len() < other.0.len() && other.starts_with(self)
    }

    /// True when both paths address array elements and one element's array
    /// lies inside the other's.
    pub fn has_same_array_path(&self, other: &Path) -> bool {
        match (self.array_path(), other.array_path()) {
            (Some(mine), Some(theirs)) => mine.starts_with(&theirs) || theirs.starts_with(&mine),
            _ => false,
        }
    }

    /// Re-root this path from the subtree at `from` onto `to`.
    ///
    /// Returns `None` when the path is not inside `from`.
    pub fn rebase(&self, from: &Path, to: &Path) -> Option<Path> {
        if !self.starts_with(from) {
            return None;
        }
        let mut segments = to.0.clone();
        segments.extend_from_slice(&self.0[from.len()..]);
        Some(Path(segments))
    }

    /// Shift the array index this path holds at the depth of `accepted`'s
    /// last segment.
    ///
    /// `accepted` must address an array element and share this path's
    /// prefix up to that element; otherwise the path is returned unchanged.
    /// With `increment`, an index `>=` the accepted index moves up by one
    /// (an element was inserted at or before it). Without it, an index `>`
    /// the accepted index moves down by one (an element before it was
    /// removed). Descendants of the shifted element follow it.
    pub fn replace_path_indices(&self, accepted: &Path, increment: bool) -> Path {
        let Some(index) = accepted.array_index() else {
            return self.clone();
        };
        let depth = accepted.len() - 1;
        if self.0.len() <= depth || self.0[..depth] != accepted.0[..depth] {
            return self.clone();
        }
        let Some(current) = parse_index(&self.0[depth]) else {
            return self.clone();
        };
        let shifted = match increment {
            // An index at usize::MAX never resolves; leave it as it is.
            true if current >= index => match current.checked_add(1) {
                Some(next) => next,
                None => return self.clone(),
            },
            false if current > index => current - 1,
            _ => return self.clone(),
        };
        let mut segments = self.0.clone();
        segments[depth] = shifted.to_string();
        Path(segments)
    }

    pub fn to_pointer(&self) -> String {
        format_json_pointer(&self.0)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_pointer())
    }
}

impl FromStr for Path {
    type Err = JsonPointerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Path::parse(s)
    }
}

impl AsRef<[String]> for Path {
    fn as_ref(&self) -> &[String] {
        &self.0
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_pointer())
    }
}

impl<'de> Deserialize<'de> for Path {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pointer = String::deserialize(deserializer)?;
        Path::parse(&pointer).map_err(de::Error::custom)
    }
}
