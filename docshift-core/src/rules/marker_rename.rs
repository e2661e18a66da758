use super::engine::RewriteRule;
use super::scan::{close_marker, indent_of, open_marker, FenceTracker};
use crate::config::MarkerRenameConfig;
use crate::error::RewriteError;
use crate::types::LogEntry;

/// Renames configured open/close tag pairs while validating region nesting.
/// This is the only rule that can fail a document: an unmatched close, an
/// open marker never closed, or a same-kind region nested inside itself.
/// A close marker always pairs with the most recently opened region (LIFO).
pub struct MarkerRenameRule<'a> {
    config: &'a MarkerRenameConfig,
}

impl<'a> MarkerRenameRule<'a> {
    pub fn new(config: &'a MarkerRenameConfig) -> Self {
        Self { config }
    }

    /// Canonical (target) name when `tag` is a recognized marker, either
    /// side of a rename pair. Recognizing the target side keeps nesting
    /// validation alive on already-converted documents.
    fn canonical(&self, tag: &str) -> Option<&str> {
        self.config
            .pairs
            .iter()
            .find(|pair| tag == pair.from || tag == pair.to)
            .map(|pair| pair.to.as_str())
    }
}

impl RewriteRule for MarkerRenameRule<'_> {
    fn apply(&self, lines: Vec<String>, _log: &mut Vec<LogEntry>) -> Result<Vec<String>, RewriteError> {
        let mut out = Vec::with_capacity(lines.len());
        // (canonical name, name as written, open line number)
        let mut stack: Vec<(String, String, usize)> = Vec::new();
        let mut fences = FenceTracker::default();

        for (index, line) in lines.into_iter().enumerate() {
            let number = index + 1;
            if fences.verbatim(&line) {
                out.push(line);
                continue;
            }

            let trimmed = line.trim();
            if let Some(tag) = open_marker(trimmed) {
                if let Some(target) = self.canonical(tag) {
                    if stack.iter().any(|(canon, _, _)| canon == target) {
                        return Err(RewriteError::NestedRegion {
                            marker: tag.to_string(),
                            line: number,
                        });
                    }
                    let rewritten = format!("{}<{}>", indent_of(&line), target);
                    stack.push((target.to_string(), tag.to_string(), number));
                    out.push(rewritten);
                    continue;
                }
            } else if let Some(tag) = close_marker(trimmed) {
                if let Some(target) = self.canonical(tag) {
                    match stack.pop() {
                        Some((canon, _, _)) if canon == target => {
                            out.push(format!("{}</{}>", indent_of(&line), target));
                            continue;
                        }
                        _ => {
                            return Err(RewriteError::UnmatchedClose {
                                marker: tag.to_string(),
                                line: number,
                            })
                        }
                    }
                }
            }
            out.push(line);
        }

        if let Some((_, seen, line)) = stack.pop() {
            return Err(RewriteError::UnclosedOpen { marker: seen, line });
        }
        Ok(out)
    }

    fn name(&self) -> &str {
        "MarkerRename"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(lines: &[&str]) -> Result<Vec<String>, RewriteError> {
        let config = MarkerRenameConfig::default();
        let rule = MarkerRenameRule::new(&config);
        let mut log = Vec::new();
        rule.apply(lines.iter().map(|l| l.to_string()).collect(), &mut log)
    }

    #[test]
    fn test_rename_preserves_indentation() {
        let out = apply(&["  <CodeTabs>", "  </CodeTabs>"]).unwrap();
        assert_eq!(out, vec!["  <CodeGroup>", "  </CodeGroup>"]);
    }

    #[test]
    fn test_marker_inside_fence_ignored() {
        let out = apply(&["```md", "<CodeTabs>", "```"]).unwrap();
        assert_eq!(out[1], "<CodeTabs>");
    }

    #[test]
    fn test_target_marker_still_validated() {
        // Already-converted doc with a stray close is still malformed
        let err = apply(&["</CodeGroup>"]).unwrap_err();
        match err {
            RewriteError::UnmatchedClose { marker, line } => {
                assert_eq!(marker, "CodeGroup");
                assert_eq!(line, 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_mixed_source_and_target_nesting_is_fatal() {
        let err = apply(&["<CodeTabs>", "<CodeGroup>", "</CodeGroup>", "</CodeTabs>"]).unwrap_err();
        assert!(matches!(err, RewriteError::NestedRegion { line: 2, .. }));
    }
}
