//! Single-node validator
//!
//! Rules are independent; every failing field is reported:
//!
//! - `name` and `node_id` must be non-empty
//! - a variable's `value` must be non-empty and, for numeric data types, parse to
//!   a number inside the type's range
//! - a variable's variation policy must carry the parameters its kind needs
//!
//! ```rust
//! use opcsim_core::behaviors::{validate_node, NodeField};
//! use opcsim_core::models::{DataType, NodeDescriptor, VariableSpec};
//!
//! let spec = VariableSpec::new(DataType::Int32, "2147483648");
//! let node = NodeDescriptor::variable("", "ns=2;s=X", spec);
//! let errors = validate_node(&node).unwrap_err();
//! assert!(errors.get(NodeField::Name).is_some());
//! assert!(errors.get(NodeField::Value).is_some());
//! assert!(errors.get(NodeField::NodeId).is_none());
//! ```

use crate::models::{
    DataType, NodeDescriptor, ValueError, Variation, VariationType, MAX_DECIMAL_PLACES,
};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Form field a validation message belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeField {
    Name,
    NodeId,
    Value,
    Variation,
    DecimalPlaces,
}

impl NodeField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::NodeId => "node_id",
            Self::Value => "value",
            Self::Variation => "variation",
            Self::DecimalPlaces => "decimal_places",
        }
    }
}

impl std::fmt::Display for NodeField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn summarize(errors: &BTreeMap<NodeField, String>) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{}: {}", field, message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Per-field validation messages
#[derive(Error, Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[error("Node validation failed: {}", summarize(.errors))]
#[serde(transparent)]
pub struct FieldErrors {
    errors: BTreeMap<NodeField, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for `field`, replacing any earlier one
    pub fn insert(&mut self, field: NodeField, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    pub fn get(&self, field: NodeField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeField, &str)> {
        self.errors.iter().map(|(field, message)| (*field, message.as_str()))
    }

    /// `Ok(())` when no field failed
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// Validate one node descriptor.
///
/// Returns `Ok(())` or the full set of field errors. Never panics.
pub fn validate_node(node: &NodeDescriptor) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    if node.name.trim().is_empty() {
        errors.insert(NodeField::Name, "Name is required");
    }

    if node.node_id.trim().is_empty() {
        errors.insert(NodeField::NodeId, "Node ID is required");
    }

    if let Some(spec) = node.as_variable() {
        if let Err(err) = validate_value(spec.data_type, &spec.value) {
            errors.insert(NodeField::Value, err.to_string());
        }
        if let Err(message) = validate_variation(&spec.variation) {
            errors.insert(NodeField::Variation, message);
        }
        if let Err(message) = validate_decimal_places(spec.decimal_places) {
            errors.insert(NodeField::DecimalPlaces, message);
        }
    }

    if !errors.is_empty() {
        tracing::debug!(
            "Validation rejected node '{}': {}",
            node.node_id,
            summarize(&errors.errors)
        );
    }

    errors.into_result()
}

/// Check a variable's raw value against its data type
pub fn validate_value(data_type: DataType, value: &str) -> Result<(), ValueError> {
    data_type.check_value(value)
}

/// Check the display precision of a floating value
pub fn validate_decimal_places(places: u32) -> Result<(), String> {
    if places > MAX_DECIMAL_PLACES {
        return Err(format!(
            "Decimal places must be at most {}, got {}",
            MAX_DECIMAL_PLACES, places
        ));
    }
    Ok(())
}

/// Check that a variation policy carries the parameters its kind needs.
///
/// - `random` needs min and max
/// - `linear` needs min, max and step
/// - `discrete` needs a non-empty value list
/// - `cycle` needs a non-empty value list or all of min, max and step
///
/// Independently of the kind, the interval must be positive, `min <= max` when
/// both are set, and a set step must be positive.
pub fn validate_variation(variation: &Variation) -> Result<(), String> {
    if variation.interval_ms == 0 {
        return Err("Variation interval must be greater than 0 ms".to_string());
    }

    match variation.kind {
        VariationType::None => {}
        VariationType::Random => {
            if variation.min.is_none() || variation.max.is_none() {
                return Err("Random variation requires a minimum and a maximum".to_string());
            }
        }
        VariationType::Linear => {
            if !variation.has_full_range() {
                return Err(
                    "Linear variation requires a minimum, a maximum and a step".to_string(),
                );
            }
        }
        VariationType::Discrete => {
            if variation.values.is_empty() {
                return Err("Discrete variation requires at least one value".to_string());
            }
        }
        VariationType::Cycle => {
            if variation.values.is_empty() && !variation.has_full_range() {
                return Err(
                    "Cycle variation requires a value list or a minimum, a maximum and a step"
                        .to_string(),
                );
            }
        }
    }

    if let (Some(min), Some(max)) = (variation.min, variation.max) {
        if min > max {
            return Err(format!(
                "Variation minimum ({}) must not exceed the maximum ({})",
                min, max
            ));
        }
    }

    if let Some(step) = variation.step {
        if step <= 0.0 || !step.is_finite() {
            return Err(format!("Variation step must be positive, got {}", step));
        }
    }

    Ok(())
}
