use super::engine::RewriteRule;
use super::scan::FenceTracker;
use crate::config::LineRewriteConfig;
use crate::error::RewriteError;
use crate::types::LogEntry;

/// Literal substring find/replace applied per line, outside fences.
/// Replacements whose output contains their own search text would break
/// pipeline idempotence; the config documents that invariant.
pub struct LineRewriteRule<'a> {
    config: &'a LineRewriteConfig,
}

impl<'a> LineRewriteRule<'a> {
    pub fn new(config: &'a LineRewriteConfig) -> Self {
        Self { config }
    }
}

impl RewriteRule for LineRewriteRule<'_> {
    fn apply(&self, lines: Vec<String>, _log: &mut Vec<LogEntry>) -> Result<Vec<String>, RewriteError> {
        let mut out = Vec::with_capacity(lines.len());
        let mut fences = FenceTracker::default();

        for line in lines {
            if fences.verbatim(&line) {
                out.push(line);
                continue;
            }
            let mut rewritten = line;
            for replacement in &self.config.replacements {
                if rewritten.contains(replacement.find.as_str()) {
                    rewritten = rewritten.replace(replacement.find.as_str(), &replacement.replace);
                }
            }
            out.push(rewritten);
        }
        Ok(out)
    }

    fn name(&self) -> &str {
        "LineRewrite"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_path_rewrite() {
        let config = LineRewriteConfig::default();
        let rule = LineRewriteRule::new(&config);
        let mut log = Vec::new();
        let out = rule
            .apply(vec!["![diagram](/img/arch.png)".to_string()], &mut log)
            .unwrap();
        assert_eq!(out, vec!["![diagram](/images/arch.png)"]);
    }
}
