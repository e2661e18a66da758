use thiserror::Error;

/// Fatal, per-document errors. Anything else a rule cannot resolve degrades
/// to a [`crate::types::LogEntry`] and the conversion continues.
///
/// Marker names in nesting errors are reported as they appear in the source,
/// not as their rename target.
#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("unmatched closing marker </{marker}> at line {line}")]
    UnmatchedClose { marker: String, line: usize },

    #[error("marker <{marker}> opened at line {line} is never closed")]
    UnclosedOpen { marker: String, line: usize },

    #[error("nested <{marker}> region at line {line}")]
    NestedRegion { marker: String, line: usize },

    #[error("pipeline names an unknown rule: {0}")]
    UnknownRule(String),

    #[error("invalid flag pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
