//! Data Models
//!
//! This module contains the data structures used throughout opcsim:
//!
//! - `DataType` - Variable data types and the Type Range Table
//! - `NodeDescriptor` - One node (tagged union over `node_type`)
//! - `BatchSettings` - Template + index range for batch provisioning

mod batch;
mod data_type;
mod node;


pub use batch::BatchSettings;
pub use data_type::{DataType, NumericRange, ValueError};
pub use node::{
    variation_values, NodeDescriptor, NodeKind, NodeType, TypedValue, VariableSpec, Variation,
    VariationType, DEFAULT_DECIMAL_PLACES, DEFAULT_VARIATION_INTERVAL_MS, MAX_DECIMAL_PLACES,
};
