use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;

// Default value functions for serde
fn default_true() -> bool {
    true
}

/// Full rule-table configuration for one conversion.
///
/// The pipeline drives which rules run and in what order; each rule reads
/// its own sub-config. Reordering rules or changing lookup tables is a
/// configuration change, never an engine change. The config is an immutable
/// value passed into every `convert` call, so concurrent conversions with
/// different rule sets never interfere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewriteConfig {
    /// Which rules to run and in what order
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub frontmatter: FrontmatterConfig,
    #[serde(default)]
    pub line_delete: LineDeleteConfig,
    #[serde(default)]
    pub marker_rename: MarkerRenameConfig,
    #[serde(default)]
    pub fence_annotate: FenceAnnotateConfig,
    #[serde(default)]
    pub attribute_rewrite: AttributeRewriteConfig,
    #[serde(default)]
    pub callout_convert: CalloutConvertConfig,
    #[serde(default)]
    pub blockquote_convert: BlockquoteConvertConfig,
    #[serde(default)]
    pub line_rewrite: LineRewriteConfig,
    #[serde(default)]
    pub flag_pattern: FlagPatternConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// List of rules to run in order
    pub rules: Vec<RuleConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Name of the rule
    pub name: String,
    /// Whether this rule is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl RuleConfig {
    pub fn enabled(name: &str) -> Self {
        Self {
            name: name.to_string(),
            enabled: true,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        // Order is load-bearing: LineDelete runs early so later rules see
        // post-deletion line numbers; MarkerRename runs before FenceAnnotate
        // and AttributeRewrite because those match children of the *target*
        // marker.
        Self {
            rules: vec![
                RuleConfig::enabled("FrontmatterRewrite"),
                RuleConfig::enabled("LineDelete"),
                RuleConfig::enabled("MarkerRename"),
                RuleConfig::enabled("FenceAnnotate"),
                RuleConfig::enabled("AttributeRewrite"),
                RuleConfig::enabled("CalloutConvert"),
                RuleConfig::enabled("BlockquoteConvert"),
                RuleConfig::enabled("LineRewrite"),
                RuleConfig::enabled("FlagPattern"),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontmatterConfig {
    /// Key renames applied inside the leading `---` frontmatter region
    #[serde(default = "default_frontmatter_renames")]
    pub rename_keys: Vec<KeyRename>,
    /// Drop an H1 right after the frontmatter when it repeats the title
    #[serde(default = "default_true")]
    pub drop_duplicate_h1: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyRename {
    pub from: String,
    pub to: String,
}

fn default_frontmatter_renames() -> Vec<KeyRename> {
    vec![KeyRename {
        from: "page_title".to_string(),
        to: "title".to_string(),
    }]
}

impl Default for FrontmatterConfig {
    fn default() -> Self {
        Self {
            rename_keys: default_frontmatter_renames(),
            drop_duplicate_h1: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineDeleteConfig {
    /// Delete lines whose trimmed text equals one of these
    #[serde(default)]
    pub exact: Vec<String>,
    /// Delete lines whose trimmed text starts with one of these
    #[serde(default = "default_delete_prefixes")]
    pub prefixes: Vec<String>,
}

fn default_delete_prefixes() -> Vec<String> {
    vec!["<!-- #NEXT_CODE_BLOCK_SOURCE:".to_string()]
}

impl Default for LineDeleteConfig {
    fn default() -> Self {
        Self {
            exact: Vec::new(),
            prefixes: default_delete_prefixes(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerRenameConfig {
    /// Open/close tag pairs to rename. Both the `from` and `to` names are
    /// recognized as region markers, so already-converted documents still
    /// get nesting validation without being rewritten again.
    #[serde(default = "default_marker_pairs")]
    pub pairs: Vec<MarkerPair>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerPair {
    pub from: String,
    pub to: String,
}

fn default_marker_pairs() -> Vec<MarkerPair> {
    vec![MarkerPair {
        from: "CodeTabs".to_string(),
        to: "CodeGroup".to_string(),
    }]
}

impl Default for MarkerRenameConfig {
    fn default() -> Self {
        Self {
            pairs: default_marker_pairs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FenceAnnotateConfig {
    /// Region tags whose direct fence entries get display titles.
    /// Named by their post-rename (target) tag.
    #[serde(default = "default_fence_regions")]
    pub regions: Vec<String>,
    /// Language identifier → display title. Unknown identifiers are
    /// flagged, never guessed.
    #[serde(default = "default_language_titles")]
    pub titles: HashMap<String, String>,
}

fn default_fence_regions() -> Vec<String> {
    vec!["CodeGroup".to_string()]
}

fn default_language_titles() -> HashMap<String, String> {
    [
        ("ts", "TypeScript"),
        ("typescript", "TypeScript"),
        ("python", "Python"),
        ("java", "Java"),
        ("csharp", "C#"),
        ("go", "Go"),
        ("shell-session", "Shell"),
        ("shell", "Shell"),
        ("bash", "Bash"),
        ("json", "JSON"),
        ("hcl", "HCL"),
        ("terraform", "HCL"),
    ]
    .into_iter()
    .map(|(lang, title)| (lang.to_string(), title.to_string()))
    .collect()
}

impl Default for FenceAnnotateConfig {
    fn default() -> Self {
        Self {
            regions: default_fence_regions(),
            titles: default_language_titles(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeRewriteConfig {
    #[serde(default = "default_attribute_tags")]
    pub tags: Vec<TagAttributeConfig>,
}

/// Attribute handling for one tag. Attributes found in `rename` keep their
/// value under the new name, attributes in `drop` are removed, anything else
/// is kept as-is and flagged. A line only matches while at least one
/// rename-source attribute is present, which is what makes a second pass
/// a no-op.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagAttributeConfig {
    pub tag: String,
    #[serde(default)]
    pub rename: HashMap<String, String>,
    #[serde(default)]
    pub drop: Vec<String>,
}

fn default_attribute_tags() -> Vec<TagAttributeConfig> {
    vec![TagAttributeConfig {
        tag: "Tab".to_string(),
        rename: [("heading".to_string(), "title".to_string())]
            .into_iter()
            .collect(),
        drop: vec!["group".to_string()],
    }]
}

impl Default for AttributeRewriteConfig {
    fn default() -> Self {
        Self {
            tags: default_attribute_tags(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalloutConvertConfig {
    #[serde(default = "default_callout_markers")]
    pub markers: Vec<CalloutMarker>,
}

/// One prefix marker denoting a callout severity. `labels` maps the bolded
/// label after the marker to the wrapping tag; `default_tag`, when set,
/// wraps label-less lines. Label comparison is case-insensitive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalloutMarker {
    pub marker: String,
    #[serde(default)]
    pub labels: HashMap<String, String>,
    #[serde(default)]
    pub default_tag: Option<String>,
}

fn default_callout_markers() -> Vec<CalloutMarker> {
    vec![
        CalloutMarker {
            marker: "~>".to_string(),
            labels: [("Note", "Note"), ("Warning", "Warning"), ("Important", "Warning")]
                .into_iter()
                .map(|(label, tag)| (label.to_string(), tag.to_string()))
                .collect(),
            default_tag: None,
        },
        CalloutMarker {
            marker: "->".to_string(),
            labels: [("Note".to_string(), "Note".to_string())]
                .into_iter()
                .collect(),
            default_tag: None,
        },
        CalloutMarker {
            marker: "+->".to_string(),
            labels: [("Note".to_string(), "Tip".to_string())]
                .into_iter()
                .collect(),
            default_tag: Some("Tip".to_string()),
        },
    ]
}

impl Default for CalloutConvertConfig {
    fn default() -> Self {
        Self {
            markers: default_callout_markers(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockquoteConvertConfig {
    /// Bolded label at the start of a blockquote paragraph → wrapping tag.
    /// Comparison is case-insensitive. Blockquotes without a bold label
    /// pass through untouched.
    #[serde(default = "default_blockquote_labels")]
    pub labels: HashMap<String, String>,
}

fn default_blockquote_labels() -> HashMap<String, String> {
    [
        ("Note", "Note"),
        ("Hands-on", "Tip"),
        ("Hands On", "Tip"),
    ]
    .into_iter()
    .map(|(label, tag)| (label.to_string(), tag.to_string()))
    .collect()
}

impl Default for BlockquoteConvertConfig {
    fn default() -> Self {
        Self {
            labels: default_blockquote_labels(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineRewriteConfig {
    /// Literal substring replacements applied per line. A replacement must
    /// not contain its own search text, or a second pass would match again.
    #[serde(default = "default_replacements")]
    pub replacements: Vec<Replacement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Replacement {
    pub find: String,
    pub replace: String,
}

fn default_replacements() -> Vec<Replacement> {
    vec![Replacement {
        find: "(/img/".to_string(),
        replace: "(/images/".to_string(),
    }]
}

impl Default for LineRewriteConfig {
    fn default() -> Self {
        Self {
            replacements: default_replacements(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlagPatternConfig {
    #[serde(default = "default_flag_patterns")]
    pub patterns: Vec<FlagPattern>,
}

/// A regex that only ever produces log entries; the document text is never
/// modified by this rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlagPattern {
    pub pattern: String,
    pub note: String,
}

fn default_flag_patterns() -> Vec<FlagPattern> {
    vec![
        FlagPattern {
            pattern: "<!-- This file is generated".to_string(),
            note: "generated file comment; upstream owns this file".to_string(),
        },
        FlagPattern {
            pattern: r"\]\(/terraform/[^)]*\)".to_string(),
            note: "internal link needs a manual path mapping".to_string(),
        },
    ]
}

impl Default for FlagPatternConfig {
    fn default() -> Self {
        Self {
            patterns: default_flag_patterns(),
        }
    }
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            pipeline: PipelineConfig::default(),
            frontmatter: FrontmatterConfig::default(),
            line_delete: LineDeleteConfig::default(),
            marker_rename: MarkerRenameConfig::default(),
            fence_annotate: FenceAnnotateConfig::default(),
            attribute_rewrite: AttributeRewriteConfig::default(),
            callout_convert: CalloutConvertConfig::default(),
            blockquote_convert: BlockquoteConvertConfig::default(),
            line_rewrite: LineRewriteConfig::default(),
            flag_pattern: FlagPatternConfig::default(),
        }
    }
}

impl RewriteConfig {
    /// Load config from file path (YAML, or JSON for `.json` paths)
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: RewriteConfig = if path.ends_with(".json") {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };
        Ok(config)
    }

    /// Load config with fallback to default
    pub fn load_with_fallback(path: Option<&str>) -> Self {
        match path {
            Some(p) => Self::load_from_file(p).unwrap_or_else(|_| {
                eprintln!("⚠️  Failed to load config from {}, using defaults", p);
                Self::default()
            }),
            None => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pipeline_order() {
        let config = RewriteConfig::default();
        let names: Vec<&str> = config
            .pipeline
            .rules
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        let rename = names.iter().position(|n| *n == "MarkerRename").unwrap();
        let annotate = names.iter().position(|n| *n == "FenceAnnotate").unwrap();
        let attrs = names.iter().position(|n| *n == "AttributeRewrite").unwrap();
        assert!(rename < annotate, "rename must run before fence annotation");
        assert!(rename < attrs, "rename must run before attribute rewriting");
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = RewriteConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: RewriteConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.pipeline.rules.len(), config.pipeline.rules.len());
        assert_eq!(parsed.fence_annotate.titles.get("ts").unwrap(), "TypeScript");
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = "pipeline:\n  rules:\n    - name: MarkerRename\n";
        let config: RewriteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.pipeline.rules.len(), 1);
        assert!(config.pipeline.rules[0].enabled);
        // Untouched sections come from defaults
        assert_eq!(config.marker_rename.pairs[0].from, "CodeTabs");
    }
}
