// Docshift Core Library
//
// Rule-based document rewriting with an ordered, idempotent pipeline.
// Main interface for converting markdown/MDX documents between dialects.

pub mod config;
pub mod error;
pub mod rules;
pub mod types;

// Re-export main types and functions for easy use
pub use config::{PipelineConfig, RewriteConfig, RuleConfig};
pub use error::RewriteError;
pub use rules::engine::{RewriteRule, Rewriter};
pub use types::{Conversion, Document, LogEntry};
