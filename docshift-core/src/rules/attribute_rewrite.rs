use super::engine::RewriteRule;
use super::scan::{indent_of, scan_attributes, FenceTracker};
use crate::config::{AttributeRewriteConfig, TagAttributeConfig};
use crate::error::RewriteError;
use crate::types::LogEntry;

/// Rewrites attributes on configured tagged lines: rename keeps the value
/// under the new name, drop removes the attribute, anything unrecognized is
/// kept in place and flagged. A line only matches while a rename-source
/// attribute is still present, so rewritten lines never match again.
pub struct AttributeRewriteRule<'a> {
    config: &'a AttributeRewriteConfig,
}

impl<'a> AttributeRewriteRule<'a> {
    pub fn new(config: &'a AttributeRewriteConfig) -> Self {
        Self { config }
    }

    fn rewrite_line(
        &self,
        tag: &TagAttributeConfig,
        line: &str,
        number: usize,
        log: &mut Vec<LogEntry>,
    ) -> Option<String> {
        let trimmed = line.trim();
        let prefix = format!("<{} ", tag.tag);
        let body = trimmed.strip_prefix(prefix.as_str())?;
        if !trimmed.ends_with('>') {
            return None;
        }

        let (attrs, suffix) = match scan_attributes(body) {
            Some(scanned) => scanned,
            None => {
                log.push(LogEntry {
                    rule: self.name().to_string(),
                    line: number,
                    text: line.to_string(),
                    note: format!("could not parse attributes on <{}>", tag.tag),
                });
                return None;
            }
        };
        // Trailing content after the closing bracket means this is not a
        // bare tag line; leave it alone.
        if suffix != ">" && suffix != "/>" {
            return None;
        }

        // Matcher keys on the rename source; its absence means the line is
        // already in target form.
        if !attrs.iter().any(|(key, _)| tag.rename.contains_key(key)) {
            return None;
        }

        let mut rendered = format!("{}<{}", indent_of(line), tag.tag);
        for (key, value) in &attrs {
            if let Some(new_key) = tag.rename.get(key) {
                rendered.push_str(&format!(" {new_key}=\"{value}\""));
            } else if tag.drop.iter().any(|dropped| dropped == key) {
                // dropped entirely
            } else {
                log.push(LogEntry {
                    rule: self.name().to_string(),
                    line: number,
                    text: line.to_string(),
                    note: format!("unrecognized attribute `{key}` on <{}> kept", tag.tag),
                });
                rendered.push_str(&format!(" {key}=\"{value}\""));
            }
        }
        if suffix == "/>" {
            rendered.push_str(" />");
        } else {
            rendered.push('>');
        }
        Some(rendered)
    }
}

impl RewriteRule for AttributeRewriteRule<'_> {
    fn apply(&self, lines: Vec<String>, log: &mut Vec<LogEntry>) -> Result<Vec<String>, RewriteError> {
        let mut out = Vec::with_capacity(lines.len());
        let mut fences = FenceTracker::default();

        for (index, line) in lines.into_iter().enumerate() {
            let number = index + 1;
            if fences.verbatim(&line) {
                out.push(line);
                continue;
            }

            let rewritten = self
                .config
                .tags
                .iter()
                .find_map(|tag| self.rewrite_line(tag, &line, number, log));
            match rewritten {
                Some(new_line) => out.push(new_line),
                None => out.push(line),
            }
        }
        Ok(out)
    }

    fn name(&self) -> &str {
        "AttributeRewrite"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(line: &str) -> (String, Vec<LogEntry>) {
        let config = AttributeRewriteConfig::default();
        let rule = AttributeRewriteRule::new(&config);
        let mut log = Vec::new();
        let out = rule.apply(vec![line.to_string()], &mut log).unwrap();
        (out.into_iter().next().unwrap(), log)
    }

    #[test]
    fn test_rename_and_drop() {
        let (out, log) = apply(r#"<Tab heading="TypeScript" group="lang">"#);
        assert_eq!(out, r#"<Tab title="TypeScript">"#);
        assert!(log.is_empty());
    }

    #[test]
    fn test_attribute_order_does_not_matter() {
        let (out, log) = apply(r#"<Tab group="lang" heading="Go">"#);
        assert_eq!(out, r#"<Tab title="Go">"#);
        assert!(log.is_empty());
    }

    #[test]
    fn test_unrecognized_attribute_kept_and_flagged() {
        let (out, log) = apply(r#"<Tab heading="Go" data-x="1">"#);
        assert_eq!(out, r#"<Tab title="Go" data-x="1">"#);
        assert_eq!(log.len(), 1);
        assert!(log[0].note.contains("data-x"));
    }

    #[test]
    fn test_converted_line_no_longer_matches() {
        let (out, log) = apply(r#"<Tab title="Go">"#);
        assert_eq!(out, r#"<Tab title="Go">"#);
        assert!(log.is_empty());
    }

    #[test]
    fn test_escaped_quotes_survive() {
        let (out, _) = apply(r#"<Tab heading="a \"b\"">"#);
        assert_eq!(out, r#"<Tab title="a \"b\"">"#);
    }

    #[test]
    fn test_trailing_content_after_bracket_untouched() {
        let (out, log) = apply(r#"<Tab heading="Go">inline</Tab>"#);
        assert_eq!(out, r#"<Tab heading="Go">inline</Tab>"#);
        assert!(log.is_empty());
    }

    #[test]
    fn test_malformed_attributes_flagged_not_rewritten() {
        let (out, log) = apply(r#"<Tab heading='single'>"#);
        assert_eq!(out, r#"<Tab heading='single'>"#);
        assert_eq!(log.len(), 1);
    }
}
