use anyhow::Result;
use chrono::{DateTime, Utc};
use docshift_core::LogEntry;
use serde::Serialize;
use std::fs;

/// Per-batch summary handed to whoever reviews the conversion. A fatal
/// document contributes no output file, so the report is the only record
/// of why it was excluded.
#[derive(Debug, Serialize)]
pub struct BatchReport {
    pub created_at: DateTime<Utc>,
    pub converted: usize,
    pub fatal: usize,
    pub total_flags: usize,
    pub documents: Vec<DocumentOutcome>,
}

#[derive(Debug, Serialize)]
pub struct DocumentOutcome {
    pub id: String,
    pub status: OutcomeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<LogEntry>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Converted,
    Fatal,
}

impl DocumentOutcome {
    pub fn converted(id: String, flags: Vec<LogEntry>) -> Self {
        Self {
            id,
            status: OutcomeStatus::Converted,
            error: None,
            flags,
        }
    }

    pub fn fatal(id: String, error: String) -> Self {
        Self {
            id,
            status: OutcomeStatus::Fatal,
            error: Some(error),
            flags: Vec::new(),
        }
    }
}

impl BatchReport {
    pub fn new(documents: Vec<DocumentOutcome>) -> Self {
        let converted = documents
            .iter()
            .filter(|d| d.status == OutcomeStatus::Converted)
            .count();
        let fatal = documents.len() - converted;
        let total_flags = documents.iter().map(|d| d.flags.len()).sum();
        Self {
            created_at: Utc::now(),
            converted,
            fatal,
            total_flags,
            documents,
        }
    }

    pub fn write_json(&self, path: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
