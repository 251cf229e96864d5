//! Batch Validator
//!
//! Runs every batch check, expanding the templates to inspect the generated
//! set, and reports all failures together:
//!
//! - name and node-ID templates must be non-empty
//! - `start_index <= end_index`, and the batch must not exceed the size limit
//! - for variables: a value template is required, every expanded value must fit
//!   the data type, and the variation policy must be complete
//! - no generated node ID may repeat within the batch or collide with an
//!   existing node ID
//!
//! Validation is pure and idempotent. The expansion is computed whenever the
//! range is well-formed, even if another check fails.

use crate::behaviors::{validate_decimal_places, validate_variation};
use crate::models::{BatchSettings, NodeType};
use crate::operations::error::BatchErrors;
use crate::operations::template::{expand_batch, GeneratedNode, Template};
use std::collections::{HashMap, HashSet};

/// Default upper bound on nodes generated by one batch
pub const DEFAULT_MAX_BATCH_SIZE: u64 = 10_000;

/// Outcome of checking one batch: the expansion plus any errors
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    /// Generated nodes; empty when the range is inverted or oversized
    pub nodes: Vec<GeneratedNode>,
    pub errors: BatchErrors,
}

impl BatchReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Generated nodes if every check passed
    pub fn into_result(self) -> Result<Vec<GeneratedNode>, BatchErrors> {
        if self.errors.is_empty() {
            Ok(self.nodes)
        } else {
            Err(self.errors)
        }
    }
}

/// Validates batch settings against a snapshot of existing node IDs
#[derive(Debug, Clone)]
pub struct BatchValidator {
    max_batch_size: u64,
}

impl Default for BatchValidator {
    fn default() -> Self {
        Self {
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
        }
    }
}

impl BatchValidator {
    pub fn new(max_batch_size: u64) -> Self {
        Self { max_batch_size }
    }

    pub fn max_batch_size(&self) -> u64 {
        self.max_batch_size
    }

    /// Run every check and return the expansion together with the errors
    pub fn check(&self, settings: &BatchSettings, existing_ids: &HashSet<String>) -> BatchReport {
        let mut errors = BatchErrors::default();

        if settings.name_template.trim().is_empty() {
            errors.name_template = Some("Name template is required".to_string());
        }
        if settings.node_id_template.trim().is_empty() {
            errors.node_id_template = Some("Node ID template is required".to_string());
        }

        let nodes = if !settings.has_valid_range() {
            errors.range = Some(format!(
                "Start index ({}) must not be greater than end index ({})",
                settings.start_index, settings.end_index
            ));
            Vec::new()
        } else if settings.len() > self.max_batch_size {
            errors.range = Some(format!(
                "Batch of {} nodes exceeds the maximum of {}",
                settings.len(),
                self.max_batch_size
            ));
            Vec::new()
        } else {
            expand_batch(settings)
        };

        if settings.node_type == NodeType::Variable {
            errors.value = check_values(settings, &nodes);
            errors.variation = validate_variation(&settings.variation()).err();
            errors.decimal_places = validate_decimal_places(settings.decimal_places).err();
        }

        if errors.node_id_template.is_none() {
            errors.duplicates = find_duplicates(&nodes, existing_ids);
        }

        if errors.is_empty() {
            tracing::debug!(
                "Batch '{}' passed validation with {} node(s)",
                settings.node_id_template,
                nodes.len()
            );
        } else {
            tracing::debug!("Batch '{}' rejected: {}", settings.node_id_template, errors);
        }

        BatchReport { nodes, errors }
    }

    /// Validate and return the generated nodes, or every error found
    pub fn validate(
        &self,
        settings: &BatchSettings,
        existing_ids: &HashSet<String>,
    ) -> Result<Vec<GeneratedNode>, BatchErrors> {
        self.check(settings, existing_ids).into_result()
    }
}

/// First value problem in the batch, if any
fn check_values(settings: &BatchSettings, nodes: &[GeneratedNode]) -> Option<String> {
    if settings.value_template.trim().is_empty() {
        return Some("Value template is required".to_string());
    }

    if !settings.data_type.is_numeric() {
        return None;
    }

    // Without a placeholder every node shares the literal; one check suffices.
    if !Template::parse(&settings.value_template).has_placeholder() {
        return settings
            .data_type
            .check_value(&settings.value_template)
            .err()
            .map(|err| err.to_string());
    }

    nodes.iter().find_map(|node| {
        let spec = node.descriptor.as_variable()?;
        settings
            .data_type
            .check_value(&spec.value)
            .err()
            .map(|err| format!("index {}: {}", node.index, err))
    })
}

/// Node IDs that repeat within the batch or already exist, once each, in
/// first-seen order
fn find_duplicates(nodes: &[GeneratedNode], existing_ids: &HashSet<String>) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for node in nodes {
        *counts.entry(node.descriptor.node_id.as_str()).or_default() += 1;
    }

    let mut reported = HashSet::new();
    nodes
        .iter()
        .map(|node| node.descriptor.node_id.as_str())
        .filter(|id| counts[id] > 1 || existing_ids.contains(*id))
        .filter(|id| reported.insert(*id))
        .map(str::to_string)
        .collect()
}
