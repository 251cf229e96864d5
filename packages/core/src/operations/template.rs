//! Batch Template Expander
//!
//! Turns `BatchSettings` into one `NodeDescriptor` per index of the inclusive
//! range `start_index..=end_index`, in ascending order.
//!
//! # Placeholder Syntax
//!
//! - `{i}` is replaced by the decimal index (`Sensor_{i}` → `Sensor_7`)
//! - `{i:0N}` is replaced by the index zero-padded to width N, `N` being one or
//!   two digits (`Tag{i:03}` → `Tag007`)
//!
//! Every occurrence in a template is substituted. The value template uses the
//! same substitution, textually; without a placeholder its literal is reused for
//! every node. A name or ID template without a placeholder is legal and produces
//! identical names/IDs, which the batch validator reports as duplicates.
//!
//! Expansion is pure and deterministic: no I/O, no shared state.
//!
//! ```rust
//! use opcsim_core::models::BatchSettings;
//! use opcsim_core::operations::expand_batch;
//!
//! let settings = BatchSettings::new("Tag{i:03}", "ns=2;s=Tag{i}", 9, 10);
//! let nodes = expand_batch(&settings);
//! let names: Vec<_> = nodes.iter().map(|n| n.descriptor.name.as_str()).collect();
//! assert_eq!(names, ["Tag009", "Tag010"]);
//! ```

use crate::models::{BatchSettings, NodeDescriptor, NodeKind, NodeType, VariableSpec};
use regex::Regex;
use std::sync::OnceLock;

/// `{i}` or `{i:0N}` with a one- or two-digit width
const PLACEHOLDER_PATTERN: &str = r"\{i(?::0(\d{1,2}))?\}";

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER_REGEX.get_or_init(|| Regex::new(PLACEHOLDER_PATTERN).unwrap())
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Index { width: usize },
}

/// A parsed name, ID or value template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Parse a template string. Text that is not a placeholder is kept literally.
    pub fn parse(template: &str) -> Self {
        let mut segments = Vec::new();
        let mut last = 0;

        for caps in placeholder_regex().captures_iter(template) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            if whole.start() > last {
                segments.push(Segment::Literal(template[last..whole.start()].to_string()));
            }
            let width = caps
                .get(1)
                .and_then(|w| w.as_str().parse::<usize>().ok())
                .unwrap_or(0);
            segments.push(Segment::Index { width });
            last = whole.end();
        }

        if last < template.len() {
            segments.push(Segment::Literal(template[last..].to_string()));
        }

        Self { segments }
    }

    /// Whether the template contains at least one placeholder
    pub fn has_placeholder(&self) -> bool {
        self.segments
            .iter()
            .any(|segment| matches!(segment, Segment::Index { .. }))
    }

    /// Substitute `index` at every placeholder
    pub fn render(&self, index: i64) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Index { width } => {
                    out.push_str(&format!("{:0width$}", index, width = *width))
                }
            }
        }
        out
    }
}

/// One descriptor produced by expansion, tagged with its index
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedNode {
    pub index: i64,
    pub descriptor: NodeDescriptor,
}

/// Expand batch settings into descriptors, ascending by index.
///
/// An inverted range (`start_index > end_index`) yields nothing; callers are
/// expected to have rejected it through the batch validator.
pub fn expand_batch(settings: &BatchSettings) -> Vec<GeneratedNode> {
    if !settings.has_valid_range() {
        return Vec::new();
    }

    let name_template = Template::parse(&settings.name_template);
    let node_id_template = Template::parse(&settings.node_id_template);
    let value_template = Template::parse(&settings.value_template);
    let variation = settings.variation();

    let nodes: Vec<GeneratedNode> = (settings.start_index..=settings.end_index)
        .map(|index| {
            let kind = match settings.node_type {
                NodeType::Variable => NodeKind::Variable(VariableSpec {
                    data_type: settings.data_type,
                    value: value_template.render(index),
                    variation: variation.clone(),
                    decimal_places: settings.decimal_places,
                }),
                NodeType::Object => NodeKind::Object,
                NodeType::Method => NodeKind::Method,
            };

            GeneratedNode {
                index,
                descriptor: NodeDescriptor {
                    id: None,
                    name: name_template.render(index),
                    node_id: node_id_template.render(index),
                    description: None,
                    kind,
                },
            }
        })
        .collect();

    tracing::debug!(
        "Expanded batch '{}' over {}..={} into {} node(s)",
        settings.node_id_template,
        settings.start_index,
        settings.end_index,
        nodes.len()
    );

    nodes
}
