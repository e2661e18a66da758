use serde::{Deserialize, Serialize};

/// A document held entirely in memory as an ordered sequence of lines.
/// The `id` is an opaque source identifier (usually a path) owned by the
/// caller; the engine never touches storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: String,
    pub lines: Vec<String>,
}

impl Document {
    /// Split raw text into lines. A trailing newline becomes a trailing
    /// empty line, so `to_text` restores the input byte-for-byte.
    pub fn from_text(id: impl Into<String>, text: &str) -> Self {
        Self {
            id: id.into(),
            lines: text.split('\n').map(str::to_string).collect(),
        }
    }

    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

/// A spot a rule could not safely auto-apply, surfaced for human review.
/// Line numbers are 1-based and in *current* coordinates: the state of the
/// document when the flagging rule ran, after earlier rules' edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Name of the rule that flagged this spot
    pub rule: String,
    /// 1-based line number at the time the rule ran
    pub line: usize,
    /// The raw line text as the rule saw it
    pub text: String,
    /// What the rule could not resolve on its own
    pub note: String,
}

/// Output of one conversion: the transformed document plus its review log.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub document: Document,
    pub log: Vec<LogEntry>,
}

impl Conversion {
    pub fn flag_count(&self) -> usize {
        self.log.len()
    }
}
