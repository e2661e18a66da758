use crate::config::RewriteConfig;
use crate::error::RewriteError;
use crate::types::{Conversion, Document, LogEntry};

use super::attribute_rewrite::AttributeRewriteRule;
use super::blockquote_convert::BlockquoteConvertRule;
use super::callout_convert::CalloutConvertRule;
use super::fence_annotate::FenceAnnotateRule;
use super::flag_pattern::FlagPatternRule;
use super::frontmatter::FrontmatterRewriteRule;
use super::line_delete::LineDeleteRule;
use super::line_rewrite::LineRewriteRule;
use super::marker_rename::MarkerRenameRule;

/// One pass of one rule over the document's current lines.
///
/// Rules must never match text they themselves produced; that property,
/// held by every built-in rule, is what makes the whole pipeline a no-op
/// on already-converted output.
pub trait RewriteRule {
    fn apply(&self, lines: Vec<String>, log: &mut Vec<LogEntry>) -> Result<Vec<String>, RewriteError>;
    fn name(&self) -> &str;
}

/// Sequential pipeline driver. Stateless: the rule table is an explicit
/// immutable value per call, and the working buffer is exclusively owned
/// by that call, so documents convert independently and in parallel with
/// no coordination.
pub struct Rewriter;

impl Rewriter {
    /// Apply the configured rules in declaration order. Fails only on
    /// malformed region nesting (or a broken pipeline config); everything
    /// else degrades to a log entry and the conversion continues.
    pub fn convert(document: &Document, config: &RewriteConfig) -> Result<Conversion, RewriteError> {
        let mut lines = document.lines.clone();
        let mut log = Vec::new();

        for rule in &config.pipeline.rules {
            if !rule.enabled {
                continue;
            }
            lines = Self::apply_rule_by_name(&rule.name, lines, config, &mut log)?;
        }

        Ok(Conversion {
            document: Document {
                id: document.id.clone(),
                lines,
            },
            log,
        })
    }

    fn apply_rule_by_name(
        name: &str,
        lines: Vec<String>,
        config: &RewriteConfig,
        log: &mut Vec<LogEntry>,
    ) -> Result<Vec<String>, RewriteError> {
        match name {
            "FrontmatterRewrite" => FrontmatterRewriteRule::new(&config.frontmatter).apply(lines, log),
            "LineDelete" => LineDeleteRule::new(&config.line_delete).apply(lines, log),
            "MarkerRename" => MarkerRenameRule::new(&config.marker_rename).apply(lines, log),
            "FenceAnnotate" => FenceAnnotateRule::new(&config.fence_annotate).apply(lines, log),
            "AttributeRewrite" => AttributeRewriteRule::new(&config.attribute_rewrite).apply(lines, log),
            "CalloutConvert" => CalloutConvertRule::new(&config.callout_convert).apply(lines, log),
            "BlockquoteConvert" => BlockquoteConvertRule::new(&config.blockquote_convert).apply(lines, log),
            "LineRewrite" => LineRewriteRule::new(&config.line_rewrite).apply(lines, log),
            "FlagPattern" => FlagPatternRule::new(&config.flag_pattern)?.apply(lines, log),
            _ => Err(RewriteError::UnknownRule(name.to_string())),
        }
    }
}
