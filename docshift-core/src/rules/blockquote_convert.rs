use super::engine::RewriteRule;
use super::scan::{parse_bold_label, FenceTracker};
use crate::config::BlockquoteConvertConfig;
use crate::error::RewriteError;
use crate::types::LogEntry;

/// Converts blockquote callouts: consecutive `> ...` lines merge into one
/// logical unit (continuations joined with a single space) before the bold
/// label is looked up, and the whole run is rewritten to one wrapped line.
/// The unit ends at the first non-blockquote line; an empty `>` line also
/// ends it. Plain blockquotes without a bold label pass through untouched.
pub struct BlockquoteConvertRule<'a> {
    config: &'a BlockquoteConvertConfig,
}

impl<'a> BlockquoteConvertRule<'a> {
    pub fn new(config: &'a BlockquoteConvertConfig) -> Self {
        Self { config }
    }

    fn lookup(&self, label: &str) -> Option<&str> {
        self.config
            .labels
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(label))
            .map(|(_, tag)| tag.as_str())
    }
}

/// `> content` → `content`, None for non-quote lines and empty `>` lines
fn quote_content(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('>')?.trim();
    (!rest.is_empty()).then_some(rest)
}

impl RewriteRule for BlockquoteConvertRule<'_> {
    fn apply(&self, lines: Vec<String>, log: &mut Vec<LogEntry>) -> Result<Vec<String>, RewriteError> {
        let mut out = Vec::with_capacity(lines.len());
        let mut fences = FenceTracker::default();
        let mut i = 0;

        while i < lines.len() {
            let line = &lines[i];
            if fences.verbatim(line) {
                out.push(line.clone());
                i += 1;
                continue;
            }

            let Some(first) = quote_content(line) else {
                out.push(line.clone());
                i += 1;
                continue;
            };

            // Collect the rest of the run. Quote lines cannot toggle fence
            // state, so the tracker stays consistent without observing them.
            let start = i;
            let mut parts = vec![first];
            let mut end = i + 1;
            while end < lines.len() {
                match quote_content(&lines[end]) {
                    Some(content) => {
                        parts.push(content);
                        end += 1;
                    }
                    None => break,
                }
            }
            let merged = parts.join(" ");

            let converted = match parse_bold_label(&merged) {
                Some((label, text)) => match self.lookup(label) {
                    Some(tag) if !text.is_empty() => Some(format!("<{tag}>{text}</{tag}>")),
                    Some(_) => {
                        log.push(LogEntry {
                            rule: self.name().to_string(),
                            line: start + 1,
                            text: lines[start].clone(),
                            note: format!("blockquote label `{label}` has no text after it"),
                        });
                        None
                    }
                    None => {
                        log.push(LogEntry {
                            rule: self.name().to_string(),
                            line: start + 1,
                            text: lines[start].clone(),
                            note: format!("no blockquote mapping for label `{label}`"),
                        });
                        None
                    }
                },
                None => None, // plain blockquote, not a callout
            };

            match converted {
                Some(wrapped) => out.push(wrapped),
                None => out.extend(lines[start..end].iter().cloned()),
            }
            i = end;
        }
        Ok(out)
    }

    fn name(&self) -> &str {
        "BlockquoteConvert"
    }
}
