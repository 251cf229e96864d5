//! Batch Provisioning Settings
//!
//! `BatchSettings` is the request body of `POST /api/nodes/batch/`: a name
//! template, a node-ID template, an inclusive index range and the settings every
//! generated node shares. It uses camelCase keys on the wire.
//!
//! ```rust
//! use opcsim_core::models::{BatchSettings, DataType};
//!
//! let settings = BatchSettings::new("Sensor_{i}", "ns=2;s=Sensor{i}", 1, 3)
//!     .with_data_type(DataType::Double)
//!     .with_value_template("0.0");
//!
//! assert_eq!(settings.len(), 3);
//! let json = serde_json::to_value(&settings).unwrap();
//! assert_eq!(json["nodeIdTemplate"], "ns=2;s=Sensor{i}");
//! ```

use crate::models::data_type::DataType;
use crate::models::node::{
    variation_values, NodeType, Variation, VariationType, DEFAULT_DECIMAL_PLACES,
    DEFAULT_VARIATION_INTERVAL_MS,
};
use serde::{Deserialize, Serialize};

fn default_variation_interval() -> u64 {
    DEFAULT_VARIATION_INTERVAL_MS
}

fn default_decimal_places() -> u32 {
    DEFAULT_DECIMAL_PLACES
}

/// Settings for generating a range of nodes from templates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSettings {
    /// Name template, e.g. `Sensor_{i}`
    #[serde(default)]
    pub name_template: String,

    /// Node ID template, e.g. `ns=2;s=Sensor{i}`
    #[serde(default)]
    pub node_id_template: String,

    /// First index (inclusive)
    pub start_index: i64,

    /// Last index (inclusive)
    pub end_index: i64,

    #[serde(default)]
    pub node_type: NodeType,

    #[serde(default)]
    pub data_type: DataType,

    /// Value template; without a placeholder the literal is reused for every node
    #[serde(default)]
    pub value_template: String,

    #[serde(default)]
    pub variation_type: VariationType,

    #[serde(default)]
    pub variation_min: Option<f64>,

    #[serde(default)]
    pub variation_max: Option<f64>,

    #[serde(default)]
    pub variation_step: Option<f64>,

    #[serde(default = "default_variation_interval")]
    pub variation_interval: u64,

    #[serde(default, with = "variation_values")]
    pub variation_values: Vec<serde_json::Value>,

    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            name_template: String::new(),
            node_id_template: String::new(),
            start_index: 1,
            end_index: 1,
            node_type: NodeType::Variable,
            data_type: DataType::Double,
            value_template: String::new(),
            variation_type: VariationType::None,
            variation_min: None,
            variation_max: None,
            variation_step: None,
            variation_interval: DEFAULT_VARIATION_INTERVAL_MS,
            variation_values: Vec::new(),
            decimal_places: DEFAULT_DECIMAL_PLACES,
        }
    }
}

impl BatchSettings {
    /// Create batch settings for a variable range with default type settings
    pub fn new(
        name_template: impl Into<String>,
        node_id_template: impl Into<String>,
        start_index: i64,
        end_index: i64,
    ) -> Self {
        Self {
            name_template: name_template.into(),
            node_id_template: node_id_template.into(),
            start_index,
            end_index,
            ..Default::default()
        }
    }

    pub fn with_node_type(mut self, node_type: NodeType) -> Self {
        self.node_type = node_type;
        self
    }

    pub fn with_data_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }

    pub fn with_value_template(mut self, value_template: impl Into<String>) -> Self {
        self.value_template = value_template.into();
        self
    }

    /// Copy a variation policy into the batch settings
    pub fn with_variation(mut self, variation: Variation) -> Self {
        self.variation_type = variation.kind;
        self.variation_min = variation.min;
        self.variation_max = variation.max;
        self.variation_step = variation.step;
        self.variation_interval = variation.interval_ms;
        self.variation_values = variation.values;
        self
    }

    pub fn with_decimal_places(mut self, decimal_places: u32) -> Self {
        self.decimal_places = decimal_places;
        self
    }

    /// Variation policy shared by every generated node
    pub fn variation(&self) -> Variation {
        Variation {
            kind: self.variation_type,
            interval_ms: self.variation_interval,
            min: self.variation_min,
            max: self.variation_max,
            step: self.variation_step,
            values: self.variation_values.clone(),
        }
    }

    /// Whether the index range is well-formed (`start_index <= end_index`)
    pub fn has_valid_range(&self) -> bool {
        self.start_index <= self.end_index
    }

    /// Number of nodes the range produces; zero for an inverted range
    pub fn len(&self) -> u64 {
        if self.has_valid_range() {
            self.end_index.abs_diff(self.start_index).saturating_add(1)
        } else {
            0
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
