// Sequential rewrite rule pipeline. Each rule is one left-to-right pass
// over the document's current lines; later rules see earlier rules' output.

pub mod attribute_rewrite;
pub mod blockquote_convert;
pub mod callout_convert;
pub mod engine;
pub mod fence_annotate;
pub mod flag_pattern;
pub mod frontmatter;
pub mod line_delete;
pub mod line_rewrite;
pub mod marker_rename;
pub(crate) mod scan;

pub use engine::{RewriteRule, Rewriter};
