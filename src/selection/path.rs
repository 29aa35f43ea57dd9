use std::fmt;

/// An ordered sequence of field names from the root of a selection down to a
/// position inside it.
///
/// Paths key selection lookups and act as the deduplication identity during
/// type synthesis. List positions don't contribute a segment: every element of
/// a list shares its field's path. Decoding never consults paths except for
/// error messages.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// The path of the selection root.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn push(&mut self, segment: &str) {
        self.segments.push(segment.to_string());
    }

    pub fn pop(&mut self) -> Option<String> {
        self.segments.pop()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The dotted rendering used as a lookup and identity key, e.g.
    /// `"hero.friends"`. The root path renders as the empty string.
    pub fn key(&self) -> String {
        self.segments.join(".")
    }
}

impl From<&str> for FieldPath {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            return Self::root();
        }
        Self {
            segments: value.split('.').map(str::to_string).collect(),
        }
    }
}

impl<const N: usize> From<[&str; N]> for FieldPath {
    fn from(segments: [&str; N]) -> Self {
        Self {
            segments: segments.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}
