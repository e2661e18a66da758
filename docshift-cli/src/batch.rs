use std::fs;
use std::path::Path;

use docshift_core::{Conversion, Document, RewriteConfig, Rewriter};

use crate::report::DocumentOutcome;

/// Read and convert one document. Failures never escape: an unreadable
/// source file and a malformed document both become a fatal outcome, so
/// the caller moves on to the rest of the batch.
pub fn convert_path(path: &Path, config: &RewriteConfig) -> (DocumentOutcome, Option<Conversion>) {
    let id = path.display().to_string();
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            return (
                DocumentOutcome::fatal(id, format!("could not read source: {e}")),
                None,
            )
        }
    };

    let document = Document::from_text(id.as_str(), &text);
    match Rewriter::convert(&document, config) {
        Ok(conversion) => (
            DocumentOutcome::converted(id, conversion.log.clone()),
            Some(conversion),
        ),
        Err(e) => (DocumentOutcome::fatal(id, e.to_string()), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{BatchReport, OutcomeStatus};
    use std::env;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(format!("docshift-batch-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_unreadable_input_is_fatal_without_stopping_the_batch() {
        let good = temp_path("good.md");
        let bad = temp_path("bad.md");
        fs::write(&good, "~> **Note:** fine\n").unwrap();
        fs::write(&bad, [0xffu8, 0xfe]).unwrap(); // not UTF-8

        let config = RewriteConfig::default();
        let (good_outcome, good_conversion) = convert_path(&good, &config);
        let (bad_outcome, bad_conversion) = convert_path(&bad, &config);
        fs::remove_file(&good).ok();
        fs::remove_file(&bad).ok();

        assert_eq!(good_outcome.status, OutcomeStatus::Converted);
        assert!(good_conversion.is_some());
        assert_eq!(bad_outcome.status, OutcomeStatus::Fatal);
        assert!(bad_outcome.error.is_some());
        assert!(bad_conversion.is_none());

        let report = BatchReport::new(vec![good_outcome, bad_outcome]);
        assert_eq!(report.converted, 1);
        assert_eq!(report.fatal, 1);
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let (outcome, conversion) = convert_path(
            Path::new("/nonexistent/docshift-missing.md"),
            &RewriteConfig::default(),
        );
        assert_eq!(outcome.status, OutcomeStatus::Fatal);
        assert!(conversion.is_none());
    }
}
