use super::engine::RewriteRule;
use super::scan::{parse_bold_label, FenceTracker};
use crate::config::{CalloutConvertConfig, CalloutMarker};
use crate::error::RewriteError;
use crate::types::LogEntry;

/// Converts prefix-marker callout lines (`~> **Warning:** text`) into
/// single-line wrapped blocks chosen by the (marker, label) lookup table.
/// Unrecognized (marker, label) pairs and label-less text are flagged,
/// never guessed and never deleted. Markers only count at column 0.
pub struct CalloutConvertRule<'a> {
    /// Markers sorted longest-first so `+->` wins over `->`
    ordered: Vec<&'a CalloutMarker>,
}

impl<'a> CalloutConvertRule<'a> {
    pub fn new(config: &'a CalloutConvertConfig) -> Self {
        let mut ordered: Vec<&CalloutMarker> = config.markers.iter().collect();
        ordered.sort_by(|a, b| b.marker.len().cmp(&a.marker.len()));
        Self { ordered }
    }

    fn lookup<'m>(marker: &'m CalloutMarker, label: &str) -> Option<&'m str> {
        marker
            .labels
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(label))
            .map(|(_, tag)| tag.as_str())
    }

    fn convert_line(&self, line: &str, number: usize, log: &mut Vec<LogEntry>) -> Option<String> {
        let marker = self
            .ordered
            .iter()
            .find(|m| line.starts_with(m.marker.as_str()))?;
        let rest = line[marker.marker.len()..].trim_start();

        let mut flag = |note: String| {
            log.push(LogEntry {
                rule: self.name().to_string(),
                line: number,
                text: line.to_string(),
                note,
            });
        };

        if let Some((label, text)) = parse_bold_label(rest) {
            match Self::lookup(marker, label) {
                Some(tag) if !text.is_empty() => Some(format!("<{tag}>{text}</{tag}>")),
                Some(_) => {
                    flag(format!("callout label `{label}` has no text after it"));
                    None
                }
                None => {
                    flag(format!(
                        "no callout mapping for (`{}`, `{label}`)",
                        marker.marker
                    ));
                    None
                }
            }
        } else if let Some(tag) = &marker.default_tag {
            let text = rest.trim();
            if text.is_empty() {
                flag("callout marker without text".to_string());
                None
            } else {
                Some(format!("<{tag}>{text}</{tag}>"))
            }
        } else {
            flag(format!(
                "callout marker `{}` without a bold label",
                marker.marker
            ));
            None
        }
    }
}

impl RewriteRule for CalloutConvertRule<'_> {
    fn apply(&self, lines: Vec<String>, log: &mut Vec<LogEntry>) -> Result<Vec<String>, RewriteError> {
        let mut out = Vec::with_capacity(lines.len());
        let mut fences = FenceTracker::default();

        for (index, line) in lines.into_iter().enumerate() {
            let number = index + 1;
            if fences.verbatim(&line) {
                out.push(line);
                continue;
            }
            match self.convert_line(&line, number, log) {
                Some(converted) => out.push(converted),
                None => out.push(line),
            }
        }
        Ok(out)
    }

    fn name(&self) -> &str {
        "CalloutConvert"
    }
}
