use super::engine::RewriteRule;
use super::scan::FenceTracker;
use crate::config::LineDeleteConfig;
use crate::error::RewriteError;
use crate::types::LogEntry;

/// Deletes lines matching configured exact or prefix patterns. A match
/// removes that line only; the line after it is never consumed.
pub struct LineDeleteRule<'a> {
    config: &'a LineDeleteConfig,
}

impl<'a> LineDeleteRule<'a> {
    pub fn new(config: &'a LineDeleteConfig) -> Self {
        Self { config }
    }

    fn matches(&self, trimmed: &str) -> bool {
        self.config.exact.iter().any(|exact| exact == trimmed)
            || self
                .config
                .prefixes
                .iter()
                .any(|prefix| trimmed.starts_with(prefix.as_str()))
    }
}

impl RewriteRule for LineDeleteRule<'_> {
    fn apply(&self, lines: Vec<String>, _log: &mut Vec<LogEntry>) -> Result<Vec<String>, RewriteError> {
        let mut out = Vec::with_capacity(lines.len());
        let mut fences = FenceTracker::default();

        for line in lines {
            if fences.verbatim(&line) {
                out.push(line);
                continue;
            }
            if !self.matches(line.trim()) {
                out.push(line);
            }
        }
        Ok(out)
    }

    fn name(&self) -> &str {
        "LineDelete"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deletes_only_the_matching_line() {
        let config = LineDeleteConfig::default();
        let rule = LineDeleteRule::new(&config);
        let mut log = Vec::new();
        let out = rule
            .apply(
                vec![
                    "<!-- #NEXT_CODE_BLOCK_SOURCE:main.ts -->".to_string(),
                    "```ts".to_string(),
                    "const x = 1;".to_string(),
                    "```".to_string(),
                ],
                &mut log,
            )
            .unwrap();
        assert_eq!(out, vec!["```ts", "const x = 1;", "```"]);
    }
}
