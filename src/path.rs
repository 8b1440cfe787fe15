//! A canonical representation of a path into a container tree.
//!
//! A path is an ordered chain of segments. Each segment names a map key and
//! may carry a bracketed position (`items[2]`) denoting an element of the
//! sequence stored under that key. Paths are immutable once constructed, and
//! construction never fails: a segment whose bracket suffix does not parse as
//! a non-negative integer is kept as a plain key.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of a path: a map key, optionally indexed into a sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub key: String,
    pub index: Option<usize>,
}

impl Segment {
    /// Parses a segment of the form `key` or `key[index]`.
    pub fn parse(raw: &str) -> Self {
        if raw.ends_with(']') {
            if let Some(open) = raw.find('[') {
                let inner = &raw[open + 1..raw.len() - 1];
                if let Ok(index) = inner.parse::<usize>() {
                    return Segment {
                        key: raw[..open].to_string(),
                        index: Some(index),
                    };
                }
            }
        }
        Segment {
            key: raw.to_string(),
            index: None,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(inx) => write!(f, "{}[{}]", self.key, inx),
            None => write!(f, "{}", self.key),
        }
    }
}

/// An ordered chain of [`Segment`]s locating a value inside a tree.
///
/// The empty path denotes the root of the tree.
///
/// # Examples
///
/// ```rust
/// use burrow::Path;
/// let path = Path::parse("a.b[1].c");
/// assert_eq!(path.to_string(), "a.b[1].c");
/// assert_eq!(path.segments().len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Path(Vec<Segment>);

impl Path {
    /// The empty path (the root of a tree).
    pub fn root() -> Self {
        Path(Vec::new())
    }

    /// Builds a path from pre-split segment strings.
    pub fn from_keys<S: AsRef<str>>(keys: &[S]) -> Self {
        Path(keys.iter().map(|k| Segment::parse(k.as_ref())).collect())
    }

    /// Parses a dot-joined chain such as `"a.b[1].c"`.
    ///
    /// Dot-joining is a convenience layer only; keys containing literal `.`
    /// must be supplied through [`Path::from_keys`].
    pub fn parse(chain: &str) -> Self {
        if chain.is_empty() {
            return Path::root();
        }
        Path(chain.split('.').map(Segment::parse).collect())
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for seg in &self.0 {
            if !first {
                write!(f, ".")?;
            }
            write!(f, "{}", seg)?;
            first = false;
        }
        Ok(())
    }
}

impl From<Vec<Segment>> for Path {
    fn from(segments: Vec<Segment>) -> Self {
        Path(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_chain() {
        let path = Path::parse("a.b.c");
        assert_eq!(path.len(), 3);
        assert_eq!(path.segments()[1].key, "b");
        assert_eq!(path.segments()[1].index, None);
    }

    #[test]
    fn parse_bracketed_segment() {
        let seg = Segment::parse("items[12]");
        assert_eq!(seg.key, "items");
        assert_eq!(seg.index, Some(12));
    }

    #[test]
    fn malformed_bracket_is_a_plain_key() {
        assert_eq!(Segment::parse("a[x]").index, None);
        assert_eq!(Segment::parse("a[x]").key, "a[x]");
        assert_eq!(Segment::parse("a[-1]").index, None);
        assert_eq!(Segment::parse("a[]").index, None);
        assert_eq!(Segment::parse("]").index, None);
    }

    #[test]
    fn display_round_trip() {
        for chain in ["a", "a.b[0]", "x.y.z[3]"] {
            assert_eq!(Path::parse(chain).to_string(), chain);
        }
    }

    #[test]
    fn empty_chain_is_root() {
        assert!(Path::parse("").is_empty());
        assert_eq!(Path::root().to_string(), "");
    }
}
