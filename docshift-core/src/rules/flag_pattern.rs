use super::engine::RewriteRule;
use crate::config::FlagPatternConfig;
use crate::error::RewriteError;
use crate::types::LogEntry;
use regex::Regex;

/// Flags lines matching configured regexes for human review. This rule
/// never modifies the document; it scans fence interiors too, since a
/// flagged link inside a code sample still needs a human decision.
pub struct FlagPatternRule {
    patterns: Vec<(Regex, String)>,
}

impl FlagPatternRule {
    pub fn new(config: &FlagPatternConfig) -> Result<Self, RewriteError> {
        let mut patterns = Vec::with_capacity(config.patterns.len());
        for flag in &config.patterns {
            let regex = Regex::new(&flag.pattern).map_err(|source| RewriteError::InvalidPattern {
                pattern: flag.pattern.clone(),
                source,
            })?;
            patterns.push((regex, flag.note.clone()));
        }
        Ok(Self { patterns })
    }
}

impl RewriteRule for FlagPatternRule {
    fn apply(&self, lines: Vec<String>, log: &mut Vec<LogEntry>) -> Result<Vec<String>, RewriteError> {
        for (index, line) in lines.iter().enumerate() {
            for (regex, note) in &self.patterns {
                if regex.is_match(line) {
                    log.push(LogEntry {
                        rule: self.name().to_string(),
                        line: index + 1,
                        text: line.clone(),
                        note: note.clone(),
                    });
                }
            }
        }
        Ok(lines)
    }

    fn name(&self) -> &str {
        "FlagPattern"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_without_modifying() {
        let config = FlagPatternConfig::default();
        let rule = FlagPatternRule::new(&config).unwrap();
        let mut log = Vec::new();
        let lines = vec![
            "See [the docs](/terraform/cdktf/install) for setup.".to_string(),
            "Normal prose.".to_string(),
        ];
        let out = rule.apply(lines.clone(), &mut log).unwrap();
        assert_eq!(out, lines);
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].line, 1);
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        let config = FlagPatternConfig {
            patterns: vec![crate::config::FlagPattern {
                pattern: "[unclosed".to_string(),
                note: "broken".to_string(),
            }],
        };
        assert!(matches!(
            FlagPatternRule::new(&config),
            Err(RewriteError::InvalidPattern { .. })
        ));
    }
}
