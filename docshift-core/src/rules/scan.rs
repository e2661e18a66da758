// Small line scanners shared across rules. Each rule kind gets its own
// matcher instead of one generic regex, so edge cases (escaped quotes,
// tight arrows, indented markers) stay independently testable.

/// Tracks fenced code blocks so line-oriented rules treat fence interiors
/// as opaque. Delimiter lines themselves count as verbatim.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    in_fence: bool,
}

impl FenceTracker {
    /// Observe one line in document order. Returns true when the line is
    /// verbatim fence content and must not be rewritten. An open fence
    /// closes only on a bare ``` delimiter; info-stringed lines inside it
    /// are content.
    pub fn verbatim(&mut self, line: &str) -> bool {
        if self.in_fence {
            if line.trim() == "```" {
                self.in_fence = false;
            }
            return true;
        }
        if line.trim_start().starts_with("```") {
            self.in_fence = true;
            return true;
        }
        false
    }
}

/// `<Name>` on a line of its own (ignoring indentation) → `Name`
pub(crate) fn open_marker(trimmed: &str) -> Option<&str> {
    let inner = trimmed.strip_prefix('<')?.strip_suffix('>')?;
    is_marker_name(inner).then_some(inner)
}

/// `</Name>` on a line of its own (ignoring indentation) → `Name`
pub(crate) fn close_marker(trimmed: &str) -> Option<&str> {
    let inner = trimmed.strip_prefix("</")?.strip_suffix('>')?;
    is_marker_name(inner).then_some(inner)
}

fn is_marker_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Leading whitespace of a line, preserved when a marker is rewritten.
pub(crate) fn indent_of(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}

/// Parse a leading bolded label: `**Note:** rest` or `**Note**: rest`.
/// The label keeps no trailing colon; the text after the closing `**`
/// loses one optional leading colon and surrounding whitespace.
pub(crate) fn parse_bold_label(input: &str) -> Option<(&str, &str)> {
    let body = input.strip_prefix("**")?;
    let close = body.find("**")?;
    let label = body[..close].trim().trim_end_matches(':').trim_end();
    if label.is_empty() {
        return None;
    }
    let mut text = &body[close + 2..];
    text = text.strip_prefix(':').unwrap_or(text).trim();
    Some((label, text))
}

/// Permissive `key="value"` attribute scanner. Attributes may appear in any
/// order, be omitted entirely, or contain `\"` escapes inside values (kept
/// raw). Returns the scanned pairs plus the unconsumed suffix (`>` or `/>`),
/// or None when the input does not scan cleanly.
pub(crate) fn scan_attributes(input: &str) -> Option<(Vec<(String, String)>, &str)> {
    let mut attrs = Vec::new();
    let mut rest = input.trim_start();
    loop {
        if rest.starts_with('>') || rest.starts_with("/>") {
            return Some((attrs, rest));
        }
        let key_end = rest.find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))?;
        if key_end == 0 {
            return None;
        }
        let key = &rest[..key_end];
        rest = rest[key_end..].trim_start();
        rest = rest.strip_prefix('=')?.trim_start();
        rest = rest.strip_prefix('"')?;

        let mut value_end = None;
        let mut escaped = false;
        for (i, c) in rest.char_indices() {
            if escaped {
                escaped = false;
                continue;
            }
            match c {
                '\\' => escaped = true,
                '"' => {
                    value_end = Some(i);
                    break;
                }
                _ => {}
            }
        }
        let end = value_end?;
        attrs.push((key.to_string(), rest[..end].to_string()));
        rest = rest[end + 1..].trim_start();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_detection() {
        assert_eq!(open_marker("<CodeTabs>"), Some("CodeTabs"));
        assert_eq!(close_marker("</CodeTabs>"), Some("CodeTabs"));
        assert_eq!(open_marker("</CodeTabs>"), None);
        assert_eq!(open_marker("<Tab title=\"x\">"), None); // attributes → not a bare marker
        assert_eq!(open_marker("<>"), None);
    }

    #[test]
    fn test_bold_label_variants() {
        assert_eq!(parse_bold_label("**Note:** text"), Some(("Note", "text")));
        assert_eq!(parse_bold_label("**Note**: text"), Some(("Note", "text")));
        assert_eq!(parse_bold_label("**Note:**"), Some(("Note", "")));
        assert_eq!(parse_bold_label("plain text"), None);
        assert_eq!(parse_bold_label("**:** x"), None);
    }

    #[test]
    fn test_attribute_scan_any_order() {
        let (attrs, suffix) = scan_attributes(r#"group="lang" heading="Go">"#).unwrap();
        assert_eq!(
            attrs,
            vec![
                ("group".to_string(), "lang".to_string()),
                ("heading".to_string(), "Go".to_string()),
            ]
        );
        assert_eq!(suffix, ">");
    }

    #[test]
    fn test_attribute_scan_escaped_quotes() {
        let (attrs, _) = scan_attributes(r#"heading="a \"b\"">"#).unwrap();
        assert_eq!(attrs[0].1, r#"a \"b\""#);
    }

    #[test]
    fn test_attribute_scan_self_closing() {
        let (attrs, suffix) = scan_attributes(r#"heading="x" />"#).unwrap();
        assert_eq!(attrs.len(), 1);
        assert_eq!(suffix, "/>");
    }

    #[test]
    fn test_attribute_scan_malformed() {
        assert!(scan_attributes(r#"heading="unterminated>"#).is_none());
        assert!(scan_attributes(r#"heading='single'>"#).is_none());
        assert!(scan_attributes("heading").is_none());
    }

    #[test]
    fn test_fence_tracker() {
        let mut fences = FenceTracker::default();
        assert!(fences.verbatim("```ts"));
        assert!(fences.verbatim("<CodeTabs>")); // inside the fence
        assert!(fences.verbatim("```"));
        assert!(!fences.verbatim("<CodeTabs>"));
    }

    #[test]
    fn test_fence_opener_inside_fence_is_content() {
        // A markdown sample quoting another fence opener must not close
        // the enclosing fence.
        let mut fences = FenceTracker::default();
        assert!(fences.verbatim("```md"));
        assert!(fences.verbatim("```ts"));
        assert!(fences.verbatim("const x = 1;"));
        assert!(fences.verbatim("```"));
        assert!(!fences.verbatim("after"));
    }
}
