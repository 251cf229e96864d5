//! Node Descriptor Data Structures
//!
//! This module defines `NodeDescriptor`, the description of one simulated
//! data-point exposed by the protocol server, and the types it is built from.
//!
//! # Architecture
//!
//! - **Tagged union**: `NodeKind` discriminates on `node_type`. Only the
//!   `Variable` variant carries a data type, a value and a variation policy, so an
//!   object or method can never hold a numeric range.
//! - **Flat wire form**: the backend exchanges one flat JSON object per node with
//!   snake_case keys and a `node_type` discriminator. `#[serde(flatten)]` maps the
//!   union onto that shape.
//! - **Lenient reads**: listings from the backend omit most variation fields and
//!   may carry `null` values, so every variable field has a default.
//!
//! # Examples
//!
//! ```rust
//! use opcsim_core::models::{DataType, NodeDescriptor, VariableSpec};
//!
//! let node = NodeDescriptor::variable(
//!     "Boiler Temperature",
//!     "ns=2;s=Boiler.Temp",
//!     VariableSpec::new(DataType::Double, "21.5"),
//! );
//!
//! let json = serde_json::to_value(&node).unwrap();
//! assert_eq!(json["node_type"], "variable");
//! assert_eq!(json["data_type"], "double");
//! assert_eq!(json["value"], "21.5");
//! ```

use crate::models::data_type::DataType;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// Default variation interval in milliseconds
pub const DEFAULT_VARIATION_INTERVAL_MS: u64 = 1000;

/// Default number of decimal places shown for floating types
pub const DEFAULT_DECIMAL_PLACES: u32 = 2;

/// Most decimal places a floating value is shown with
pub const MAX_DECIMAL_PLACES: u32 = 17;

fn default_variation_interval() -> u64 {
    DEFAULT_VARIATION_INTERVAL_MS
}

fn default_decimal_places() -> u32 {
    DEFAULT_DECIMAL_PLACES
}

/// Maps an explicit `null` to the type's default
fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Kind of node exposed by the protocol server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    #[default]
    Variable,
    Object,
    Method,
}

impl NodeType {
    pub const ALL: [NodeType; 3] = [NodeType::Variable, NodeType::Object, NodeType::Method];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Variable => "variable",
            Self::Object => "object",
            Self::Method => "method",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Variable => "Variable",
            Self::Object => "Object",
            Self::Method => "Method",
        }
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "variable" => Ok(Self::Variable),
            "object" => Ok(Self::Object),
            "method" => Ok(Self::Method),
            _ => Err(format!("Invalid node type: {}", s)),
        }
    }
}

/// How the runtime changes a variable's value over time
///
/// The policy is executed by the external variation scheduler; this crate only
/// describes and validates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariationType {
    /// Value never changes
    #[default]
    None,
    /// Uniformly random value within `[min, max]`
    Random,
    /// Walks from min to max by `step`, reversing direction at each bound
    Linear,
    /// Steps through `values` in order
    Discrete,
    /// Steps through `values`, or walks min → max by `step` and wraps around
    Cycle,
}

impl VariationType {
    pub const ALL: [VariationType; 5] = [
        VariationType::None,
        VariationType::Random,
        VariationType::Linear,
        VariationType::Discrete,
        VariationType::Cycle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Random => "random",
            Self::Linear => "linear",
            Self::Discrete => "discrete",
            Self::Cycle => "cycle",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "No Variation",
            Self::Random => "Random",
            Self::Linear => "Linear",
            Self::Discrete => "Discrete",
            Self::Cycle => "Cycle",
        }
    }
}

impl std::fmt::Display for VariationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wire codec for `variation_values`.
///
/// The backend stores the candidate list as JSON text, so it is written as a
/// string holding a JSON array (`""` when empty). Reads accept that string form,
/// a native JSON array, or `null`. Anything else reads as an empty list, so one
/// malformed stored node cannot break a whole listing.
pub mod variation_values {
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S>(values: &[Value], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if values.is_empty() {
            return serializer.serialize_str("");
        }
        let text = serde_json::to_string(values).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&text)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(Vec::new()),
            Value::Array(values) => Ok(values),
            Value::String(text) if text.trim().is_empty() => Ok(Vec::new()),
            Value::String(text) => match serde_json::from_str::<Value>(&text) {
                Ok(Value::Array(values)) => Ok(values),
                _ => {
                    tracing::warn!(
                        "Ignoring variation_values that are not a JSON array: '{}'",
                        text
                    );
                    Ok(Vec::new())
                }
            },
            other => {
                tracing::warn!("Ignoring variation_values that are not a JSON array: {}", other);
                Ok(Vec::new())
            }
        }
    }
}

/// Variation policy of a variable node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variation {
    #[serde(rename = "variation_type", default, deserialize_with = "deserialize_null_default")]
    pub kind: VariationType,

    /// Milliseconds between variation steps
    #[serde(rename = "variation_interval", default = "default_variation_interval")]
    pub interval_ms: u64,

    #[serde(rename = "variation_min", default)]
    pub min: Option<f64>,

    #[serde(rename = "variation_max", default)]
    pub max: Option<f64>,

    #[serde(rename = "variation_step", default)]
    pub step: Option<f64>,

    /// Candidate values for discrete/cycle variation, in order
    #[serde(rename = "variation_values", default, with = "variation_values")]
    pub values: Vec<serde_json::Value>,
}

impl Default for Variation {
    fn default() -> Self {
        Self {
            kind: VariationType::None,
            interval_ms: DEFAULT_VARIATION_INTERVAL_MS,
            min: None,
            max: None,
            step: None,
            values: Vec::new(),
        }
    }
}

impl Variation {
    /// Random variation between `min` and `max`
    pub fn random(min: f64, max: f64) -> Self {
        Self {
            kind: VariationType::Random,
            min: Some(min),
            max: Some(max),
            ..Default::default()
        }
    }

    /// Linear variation from `min` to `max` in increments of `step`
    pub fn linear(min: f64, max: f64, step: f64) -> Self {
        Self {
            kind: VariationType::Linear,
            min: Some(min),
            max: Some(max),
            step: Some(step),
            ..Default::default()
        }
    }

    /// Discrete variation over an ordered candidate list
    pub fn discrete(values: Vec<serde_json::Value>) -> Self {
        Self {
            kind: VariationType::Discrete,
            values,
            ..Default::default()
        }
    }

    /// Set the interval between steps
    pub fn with_interval(mut self, interval_ms: u64) -> Self {
        self.interval_ms = interval_ms;
        self
    }

    /// Whether min, max and step are all present
    pub fn has_full_range(&self) -> bool {
        self.min.is_some() && self.max.is_some() && self.step.is_some()
    }
}

/// A value converted to its data type
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Integer(i128),
    Float(f64),
    Boolean(bool),
    DateTime(DateTime<Utc>),
    Text(String),
    Array(Vec<serde_json::Value>),
}

/// Variable-only part of a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableSpec {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub data_type: DataType,

    /// Current/initial value as entered
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub value: String,

    #[serde(flatten)]
    pub variation: Variation,

    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
}

impl VariableSpec {
    /// Create a variable spec without variation
    pub fn new(data_type: DataType, value: impl Into<String>) -> Self {
        Self {
            data_type,
            value: value.into(),
            variation: Variation::default(),
            decimal_places: DEFAULT_DECIMAL_PLACES,
        }
    }

    /// Attach a variation policy
    pub fn with_variation(mut self, variation: Variation) -> Self {
        self.variation = variation;
        self
    }

    /// Set display precision for floating types
    pub fn with_decimal_places(mut self, decimal_places: u32) -> Self {
        self.decimal_places = decimal_places;
        self
    }

    /// Convert the textual value to its data type.
    ///
    /// Returns `None` for an empty or unconvertible value. Booleans accept
    /// `true`, `1`, `yes` and `on` (case-insensitive) as true and anything else
    /// as false. Datetimes accept RFC 3339, `YYYY-MM-DDTHH:MM:SS[.f]`,
    /// `YYYY-MM-DD HH:MM:SS[.f]` (read as UTC) and plain dates (midnight UTC).
    ///
    /// ```rust
    /// use opcsim_core::models::{DataType, TypedValue, VariableSpec};
    ///
    /// let spec = VariableSpec::new(DataType::Boolean, "Yes");
    /// assert_eq!(spec.typed_value(), Some(TypedValue::Boolean(true)));
    ///
    /// let spec = VariableSpec::new(DataType::Int32, "12");
    /// assert_eq!(spec.typed_value(), Some(TypedValue::Integer(12)));
    /// ```
    pub fn typed_value(&self) -> Option<TypedValue> {
        let raw = self.value.trim();
        if raw.is_empty() {
            return None;
        }

        match self.data_type {
            DataType::Double | DataType::Float => raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(TypedValue::Float),
            DataType::Int32
            | DataType::Int64
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64 => raw.parse::<i128>().ok().map(TypedValue::Integer),
            DataType::Boolean => Some(TypedValue::Boolean(matches!(
                raw.to_ascii_lowercase().as_str(),
                "true" | "1" | "yes" | "on"
            ))),
            DataType::DateTime => parse_datetime(raw).map(TypedValue::DateTime),
            DataType::Array => match serde_json::from_str::<serde_json::Value>(raw) {
                Ok(serde_json::Value::Array(values)) => Some(TypedValue::Array(values)),
                _ => None,
            },
            DataType::String | DataType::ByteString => Some(TypedValue::Text(raw.to_string())),
        }
    }

    /// Value formatted for display.
    ///
    /// Floating types are rounded to `decimal_places`; everything else (and any
    /// value that does not parse) is shown as entered.
    pub fn display_value(&self) -> String {
        if self.data_type.is_floating() {
            if let Ok(v) = self.value.trim().parse::<f64>() {
                if v.is_finite() {
                    let places = self.decimal_places.min(MAX_DECIMAL_PLACES) as usize;
                    return format!("{:.*}", places, v);
                }
            }
        }
        self.value.clone()
    }
}

fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Node-type specific part of a descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node_type", rename_all = "lowercase")]
pub enum NodeKind {
    Variable(VariableSpec),
    Object,
    Method,
}

impl NodeKind {
    pub fn node_type(&self) -> NodeType {
        match self {
            Self::Variable(_) => NodeType::Variable,
            Self::Object => NodeType::Object,
            Self::Method => NodeType::Method,
        }
    }
}

/// Description of one node
///
/// # Fields
///
/// - `id`: Backend-assigned key, `None` until the node has been created
/// - `name`: Display label
/// - `node_id`: Protocol node identifier (e.g. `ns=2;s=Sensor1`), unique per registry
/// - `description`: Optional free text
/// - `kind`: Node type and, for variables, the typed value and variation policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub name: String,

    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub node_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten)]
    pub kind: NodeKind,
}

impl NodeDescriptor {
    /// Create a variable node
    pub fn variable(
        name: impl Into<String>,
        node_id: impl Into<String>,
        spec: VariableSpec,
    ) -> Self {
        Self::with_kind(name, node_id, NodeKind::Variable(spec))
    }

    /// Create an object node
    pub fn object(name: impl Into<String>, node_id: impl Into<String>) -> Self {
        Self::with_kind(name, node_id, NodeKind::Object)
    }

    /// Create a method node
    pub fn method(name: impl Into<String>, node_id: impl Into<String>) -> Self {
        Self::with_kind(name, node_id, NodeKind::Method)
    }

    fn with_kind(name: impl Into<String>, node_id: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: None,
            name: name.into(),
            node_id: node_id.into(),
            description: None,
            kind,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    /// Variable part, if this is a variable node
    pub fn as_variable(&self) -> Option<&VariableSpec> {
        match &self.kind {
            NodeKind::Variable(spec) => Some(spec),
            _ => None,
        }
    }

    pub fn as_variable_mut(&mut self) -> Option<&mut VariableSpec> {
        match &mut self.kind {
            NodeKind::Variable(spec) => Some(spec),
            _ => None,
        }
    }

    /// Whether the backend has assigned this node a key
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}
