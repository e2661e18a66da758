use super::engine::RewriteRule;
use crate::config::FrontmatterConfig;
use crate::error::RewriteError;
use crate::types::LogEntry;

/// Renames keys inside the leading `---` frontmatter region and drops the
/// duplicate H1 that repeats the title right after it.
///
/// The H1 is only dropped when its text equals the frontmatter title, which
/// is what makes a second pass a no-op even when the document body happens
/// to start with some other heading. Frontmatter that never closes is
/// flagged, not fatal: the tag-region nesting rules do not apply to it.
pub struct FrontmatterRewriteRule<'a> {
    config: &'a FrontmatterConfig,
}

impl<'a> FrontmatterRewriteRule<'a> {
    pub fn new(config: &'a FrontmatterConfig) -> Self {
        Self { config }
    }
}

fn unquote(value: &str) -> &str {
    let value = value.trim();
    for quote in ['"', '\''] {
        if let Some(stripped) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return stripped;
        }
    }
    value
}

impl RewriteRule for FrontmatterRewriteRule<'_> {
    fn apply(&self, mut lines: Vec<String>, log: &mut Vec<LogEntry>) -> Result<Vec<String>, RewriteError> {
        if lines.first().map(|l| l.trim()) != Some("---") {
            return Ok(lines);
        }
        let Some(close) = lines[1..].iter().position(|l| l.trim() == "---").map(|p| p + 1) else {
            log.push(LogEntry {
                rule: self.name().to_string(),
                line: 1,
                text: lines[0].clone(),
                note: "frontmatter opened but never closed".to_string(),
            });
            return Ok(lines);
        };

        for line in &mut lines[1..close] {
            let renamed = self.config.rename_keys.iter().find_map(|key| {
                line.strip_prefix(format!("{}:", key.from).as_str())
                    .map(|rest| format!("{}:{rest}", key.to))
            });
            if let Some(renamed) = renamed {
                *line = renamed;
            }
        }

        if self.config.drop_duplicate_h1 {
            let title = lines[1..close].iter().find_map(|line| {
                line.strip_prefix("title:").map(|v| unquote(v).to_string())
            });
            if let Some(title) = title {
                let mut heading = close + 1;
                while heading < lines.len() && lines[heading].trim().is_empty() {
                    heading += 1;
                }
                let duplicates_title = lines
                    .get(heading)
                    .and_then(|l| l.strip_prefix("# "))
                    .map(|text| text.trim() == title)
                    .unwrap_or(false);
                if duplicates_title {
                    // Replace blank run + H1 (+ one trailing blank) with a
                    // single blank line after the frontmatter.
                    let mut end = heading + 1;
                    if end < lines.len() && lines[end].trim().is_empty() {
                        end += 1;
                    }
                    lines.splice(close + 1..end, [String::new()]);
                }
            }
        }

        Ok(lines)
    }

    fn name(&self) -> &str {
        "FrontmatterRewrite"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(lines: &[&str]) -> (Vec<String>, Vec<LogEntry>) {
        let config = FrontmatterConfig::default();
        let rule = FrontmatterRewriteRule::new(&config);
        let mut log = Vec::new();
        let out = rule
            .apply(lines.iter().map(|l| l.to_string()).collect(), &mut log)
            .unwrap();
        (out, log)
    }

    #[test]
    fn test_key_rename_and_duplicate_h1_drop() {
        let (out, log) = apply(&[
            "---",
            "page_title: Constructs",
            "---",
            "",
            "# Constructs",
            "",
            "Body text.",
        ]);
        assert_eq!(
            out,
            vec!["---", "title: Constructs", "---", "", "Body text."]
        );
        assert!(log.is_empty());
    }

    #[test]
    fn test_h1_differing_from_title_stays() {
        let (out, _) = apply(&["---", "page_title: Constructs", "---", "", "# Overview"]);
        assert_eq!(out[4], "# Overview");
    }

    #[test]
    fn test_quoted_title_matches_heading() {
        let (out, _) = apply(&["---", "page_title: \"Constructs\"", "---", "", "# Constructs"]);
        assert_eq!(out.len(), 4);
        assert_eq!(out[1], "title: \"Constructs\"");
    }

    #[test]
    fn test_no_frontmatter_is_a_noop() {
        let (out, log) = apply(&["# Just a heading", "body"]);
        assert_eq!(out, vec!["# Just a heading", "body"]);
        assert!(log.is_empty());
    }

    #[test]
    fn test_unclosed_frontmatter_flagged() {
        let (out, log) = apply(&["---", "page_title: X"]);
        assert_eq!(out[1], "page_title: X"); // untouched
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].line, 1);
    }
}
