//! Command payload fed to the remote shell.

/// Newline used to join payload lines.
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";
/// Newline used to join payload lines.
#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";

/// An ordered list of command lines.
///
/// A single string is a one-line payload; it is not split on embedded
/// newlines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload {
    lines: Vec<String>,
}

impl Payload {
    /// Returns the individual lines.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Joins the lines with [`LINE_ENDING`].
    #[must_use]
    pub fn body(&self) -> String {
        self.lines.join(LINE_ENDING)
    }

    /// Returns `true` if any line of the joined body equals `delimiter`.
    ///
    /// Embedded newlines inside a single entry are honoured, since the remote
    /// shell sees the body and not the entries.
    pub(crate) fn contains_line(&self, delimiter: &str) -> bool {
        self.lines
            .iter()
            .flat_map(|entry| entry.lines())
            .any(|line| line == delimiter)
    }
}

impl From<&str> for Payload {
    fn from(line: &str) -> Self {
        Self {
            lines: vec![line.to_string()],
        }
    }
}

impl From<String> for Payload {
    fn from(line: String) -> Self {
        Self { lines: vec![line] }
    }
}

impl From<&String> for Payload {
    fn from(line: &String) -> Self {
        Self::from(line.as_str())
    }
}

impl From<Vec<String>> for Payload {
    fn from(lines: Vec<String>) -> Self {
        Self { lines }
    }
}

impl From<Vec<&str>> for Payload {
    fn from(lines: Vec<&str>) -> Self {
        lines.into_iter().collect()
    }
}

impl From<&[&str]> for Payload {
    fn from(lines: &[&str]) -> Self {
        lines.iter().copied().collect()
    }
}

impl From<&[String]> for Payload {
    fn from(lines: &[String]) -> Self {
        lines.iter().collect()
    }
}

impl<const N: usize> From<[&str; N]> for Payload {
    fn from(lines: [&str; N]) -> Self {
        lines.into_iter().collect()
    }
}

impl<S: AsRef<str>> FromIterator<S> for Payload {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().map(|s| s.as_ref().to_string()).collect(),
        }
    }
}
