use super::engine::RewriteRule;
use super::scan::{close_marker, indent_of, open_marker};
use crate::config::FenceAnnotateConfig;
use crate::error::RewriteError;
use crate::types::LogEntry;

/// Appends display titles to fence openers inside recognized regions.
/// A fence whose info string is exactly one known language identifier gets
/// the configured title; anything already carrying a second token is left
/// untouched (that is the idempotence guard), and unknown identifiers are
/// flagged rather than guessed. Fence interiors are opaque.
///
/// Regions are matched by their post-rename tag, which is why MarkerRename
/// must run before this rule: on a not-yet-renamed document no region
/// opens and no fence is annotated.
pub struct FenceAnnotateRule<'a> {
    config: &'a FenceAnnotateConfig,
}

impl<'a> FenceAnnotateRule<'a> {
    pub fn new(config: &'a FenceAnnotateConfig) -> Self {
        Self { config }
    }

    fn recognized(&self, tag: &str) -> bool {
        self.config.regions.iter().any(|region| region == tag)
    }
}

impl RewriteRule for FenceAnnotateRule<'_> {
    fn apply(&self, lines: Vec<String>, log: &mut Vec<LogEntry>) -> Result<Vec<String>, RewriteError> {
        let mut out = Vec::with_capacity(lines.len());
        let mut region_stack: Vec<(String, usize)> = Vec::new();
        let mut in_fence = false;

        for (index, line) in lines.into_iter().enumerate() {
            let number = index + 1;
            let trimmed = line.trim();

            if in_fence {
                if trimmed == "```" {
                    in_fence = false;
                }
                out.push(line);
                continue;
            }

            if let Some(info) = trimmed.strip_prefix("```") {
                in_fence = true;
                if !region_stack.is_empty() {
                    let mut tokens = info.split_whitespace();
                    if let (Some(lang), None) = (tokens.next(), tokens.next()) {
                        match self.config.titles.get(lang) {
                            Some(title) => {
                                out.push(format!("{}```{} {}", indent_of(&line), lang, title));
                            }
                            None => {
                                log.push(LogEntry {
                                    rule: self.name().to_string(),
                                    line: number,
                                    text: line.clone(),
                                    note: format!("no display title for language `{lang}`"),
                                });
                                out.push(line);
                            }
                        }
                        continue;
                    }
                }
                out.push(line);
                continue;
            }

            // Region bookkeeping; validation here only matters when this
            // rule runs without MarkerRename in the pipeline.
            if let Some(tag) = open_marker(trimmed) {
                if self.recognized(tag) {
                    if region_stack.iter().any(|(open, _)| open == tag) {
                        return Err(RewriteError::NestedRegion {
                            marker: tag.to_string(),
                            line: number,
                        });
                    }
                    region_stack.push((tag.to_string(), number));
                }
            } else if let Some(tag) = close_marker(trimmed) {
                if self.recognized(tag) {
                    match region_stack.pop() {
                        Some((open, _)) if open == tag => {}
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

        if let Some((marker, line)) = region_stack.pop() {
            return Err(RewriteError::UnclosedOpen { marker, line });
        }
        Ok(out)
    }

    fn name(&self) -> &str {
        "FenceAnnotate"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(lines: &[&str]) -> (Vec<String>, Vec<LogEntry>) {
        let config = FenceAnnotateConfig::default();
        let rule = FenceAnnotateRule::new(&config);
        let mut log = Vec::new();
        let out = rule
            .apply(lines.iter().map(|l| l.to_string()).collect(), &mut log)
            .unwrap();
        (out, log)
    }

    #[test]
    fn test_annotates_known_language_in_region() {
        let (out, log) = apply(&["<CodeGroup>", "```ts", "x", "```", "</CodeGroup>"]);
        assert_eq!(out[1], "```ts TypeScript");
        assert!(log.is_empty());
    }

    #[test]
    fn test_titled_fence_left_untouched() {
        let (out, log) = apply(&["<CodeGroup>", "```ts TypeScript", "x", "```", "</CodeGroup>"]);
        assert_eq!(out[1], "```ts TypeScript");
        assert!(log.is_empty());
    }

    #[test]
    fn test_fence_outside_region_untouched() {
        let (out, log) = apply(&["```ts", "x", "```"]);
        assert_eq!(out[0], "```ts");
        assert!(log.is_empty());
    }

    #[test]
    fn test_bare_fence_in_region_untouched() {
        let (out, log) = apply(&["<CodeGroup>", "```", "x", "```", "</CodeGroup>"]);
        assert_eq!(out[1], "```");
        assert!(log.is_empty());
    }
}
