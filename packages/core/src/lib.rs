//! opcsim Core - Node Specification and Batch Provisioning
//!
//! This crate defines simulated protocol-server nodes, validates them, expands
//! templated batches into many nodes, and drives a node backend over HTTP.
//!
//! # Architecture
//!
//! - **Pure validation**: range checks, single-node and batch validation are
//!   synchronous functions with no I/O
//! - **Exact bounds**: numeric values are compared as exact decimals
//! - **Backend-owned persistence**: the `client` talks to the backend; the
//!   registry only mirrors its last answer
//!
//! # Modules
//!
//! - [`models`] - Node descriptor, data types, batch settings
//! - [`behaviors`] - Single-node validation
//! - [`operations`] - Template expansion and batch validation
//! - [`client`] - Backend API trait and HTTP implementation
//! - [`services`] - Node service, registry, editing context
//! - [`config`] - Client configuration

pub mod behaviors;
pub mod client;
pub mod config;
pub mod models;
pub mod operations;
pub mod services;

// Re-export commonly used types
pub use behaviors::*;
pub use client::{ApiError, ApiResponse, HttpNodeApi, NodeApi};
pub use config::{ClientConfig, ConfigError};
pub use models::*;
pub use operations::{expand_batch, BatchErrors, BatchReport, BatchValidator, GeneratedNode};
pub use services::*;
