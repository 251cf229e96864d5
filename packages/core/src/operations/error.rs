//! Batch validation errors
//!
//! `BatchErrors` aggregates every problem found in one set of batch settings so
//! the caller can show them all at once. The batch is rejected as a whole if any
//! field is set; there is no partial submission.
//!
//! ```rust
//! use opcsim_core::operations::BatchErrors;
//!
//! let mut errors = BatchErrors::default();
//! assert!(errors.is_empty());
//!
//! errors.duplicates.push("ns=2;s=Sensor2".to_string());
//! assert_eq!(
//!     errors.to_string(),
//!     "Batch validation failed: duplicate node IDs: ns=2;s=Sensor2"
//! );
//! ```

use serde::Serialize;
use thiserror::Error;

fn summarize(errors: &BatchErrors) -> String {
    let mut parts = Vec::new();
    if let Some(message) = &errors.name_template {
        parts.push(format!("name template: {}", message));
    }
    if let Some(message) = &errors.node_id_template {
        parts.push(format!("node ID template: {}", message));
    }
    if let Some(message) = &errors.range {
        parts.push(format!("range: {}", message));
    }
    if let Some(message) = &errors.value {
        parts.push(format!("value: {}", message));
    }
    if let Some(message) = &errors.variation {
        parts.push(format!("variation: {}", message));
    }
    if let Some(message) = &errors.decimal_places {
        parts.push(format!("decimal places: {}", message));
    }
    if !errors.duplicates.is_empty() {
        parts.push(format!("duplicate node IDs: {}", errors.duplicates.join(", ")));
    }
    parts.join("; ")
}

/// All problems found in one batch request
#[derive(Error, Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[error("Batch validation failed: {}", summarize(self))]
pub struct BatchErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_template: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id_template: Option<String>,

    /// Inverted or oversized index range
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,

    /// Missing or out-of-range value (first offending index)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub variation: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub decimal_places: Option<String>,

    /// Every node ID repeated within the batch or already persisted, once each,
    /// in first-seen order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub duplicates: Vec<String>,
}

impl BatchErrors {
    pub fn is_empty(&self) -> bool {
        self.name_template.is_none()
            && self.node_id_template.is_none()
            && self.range.is_none()
            && self.value.is_none()
            && self.variation.is_none()
            && self.decimal_places.is_none()
            && self.duplicates.is_empty()
    }

    /// `Ok(())` when nothing failed
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_lists_every_failed_check() {
        let errors = BatchErrors {
            name_template: Some("Name template is required".to_string()),
            range: Some("Start index must not be greater than end index".to_string()),
            duplicates: vec!["a".to_string(), "b".to_string()],
            ..Default::default()
        };
        assert_eq!(
            errors.to_string(),
            "Batch validation failed: name template: Name template is required; \
             range: Start index must not be greater than end index; \
             duplicate node IDs: a, b"
        );
    }

    #[test]
    fn test_serializes_only_failed_checks() {
        let errors = BatchErrors {
            node_id_template: Some("required".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({ "nodeIdTemplate": "required" }));
    }

    #[test]
    fn test_into_result() {
        assert!(BatchErrors::default().into_result().is_ok());
        let errors = BatchErrors {
            value: Some("bad".to_string()),
            ..Default::default()
        };
        assert!(errors.into_result().is_err());
    }
}
