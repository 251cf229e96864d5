//! Business Services
//!
//! - `NodeService` - validate, submit and reload workflow over a backend
//! - `NodeRegistry` - last-fetched snapshot of backend nodes
//! - `EditContext` - per-session create/edit draft
//!
//! Services coordinate between the backend client and the pure validation and
//! expansion layers.

pub mod editing;
pub mod error;
pub mod node_service;
pub mod registry;


pub use editing::{EditContext, EditMode};
pub use error::NodeServiceError;
pub use node_service::NodeService;
pub use registry::{NodeRegistry, RegistryStats};
