use std::fmt;

/// One newline-delimited record of input, either a plain text line or a CSV
/// row. The wrapper keeps lines from being mixed up with arbitrary strings;
/// ordering between lines only exists through a [`Comparator`].
///
/// Equality and hashing are by exact text, which is what the chunk buffer
/// uses to bound itself to distinct lines.
///
/// [`Comparator`]: crate::compare::Comparator
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Line(String);

impl Line {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for Line {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
