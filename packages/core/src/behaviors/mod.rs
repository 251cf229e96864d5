//! Node Validation Behaviors
//!
//! This module provides the single-node validator:
//!
//! - `validate_node` - Checks one descriptor's required fields, value range and
//!   variation policy, reporting every problem at once
//! - `FieldErrors` - Field → message map returned on failure
//!
//! Validation is a pure function of the descriptor and the static Type Range
//! Table. It never touches the network; cross-registry uniqueness of a single
//! node's ID is left to the backend.

mod node_validator;

#[cfg(test)]
mod node_validator_test;

pub use node_validator::{
    validate_decimal_places, validate_node, validate_value, validate_variation, FieldErrors,
    NodeField,
};
