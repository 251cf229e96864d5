//! Batch Operations
//!
//! Template expansion and validation of batch provisioning requests.
//!
//! - [`template`]: placeholder parsing and expansion into descriptors
//! - [`batch`]: whole-batch validation (templates, range, values, duplicates)
//! - [`error`]: the aggregated `BatchErrors` report

pub mod batch;
pub mod error;
pub mod template;


pub use batch::{BatchReport, BatchValidator, DEFAULT_MAX_BATCH_SIZE};
pub use error::BatchErrors;
pub use template::{expand_batch, GeneratedNode, Template};
