//! Node Service - Provisioning Workflow
//!
//! Orchestrates the client-side node workflow:
//!
//! - single save: validate → create or replace → reload the registry
//! - delete: remove by backend id → reload the registry
//! - batch: validate against the registry's node IDs → submit once → reload
//!
//! Nothing reaches the backend unless validation passed. A failed request
//! leaves the registry snapshot and the caller's editing context untouched, and
//! is never retried automatically.
//!
//! # Batch guard
//!
//! One batch may be in flight per service (clones share the flag). A second
//! submission fails immediately with `BatchInProgress`; the flag is cleared
//! when the first one finishes, whatever the outcome.

use crate::client::{HttpNodeApi, NodeApi};
use crate::config::ClientConfig;
use crate::models::{BatchSettings, NodeDescriptor};
use crate::operations::{BatchReport, BatchValidator};
use crate::services::editing::{EditContext, EditMode};
use crate::services::error::NodeServiceError;
use crate::services::registry::NodeRegistry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Clears the processing flag when dropped
struct ProcessingGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> ProcessingGuard<'a> {
    /// `None` if the flag is already set
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Client-side node workflow over a backend
pub struct NodeService<A = HttpNodeApi>
where
    A: NodeApi,
{
    api: Arc<A>,

    registry: NodeRegistry,

    validator: BatchValidator,

    /// Set while a batch submission is in flight
    processing: Arc<AtomicBool>,
}

// Manual Clone implementation because A doesn't need to be Clone
impl<A> Clone for NodeService<A>
where
    A: NodeApi,
{
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            registry: self.registry.clone(),
            validator: self.validator.clone(),
            processing: self.processing.clone(),
        }
    }
}

impl NodeService<HttpNodeApi> {
    /// Build a service talking HTTP to the configured backend
    pub fn from_config(config: &ClientConfig) -> Result<Self, NodeServiceError> {
        let api = HttpNodeApi::new(config)?;
        Ok(Self::new(Arc::new(api)).with_validator(BatchValidator::new(config.max_batch_size)))
    }
}

impl<A> NodeService<A>
where
    A: NodeApi,
{
    /// Create a service with an empty registry and the default batch limit
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            registry: NodeRegistry::new(),
            validator: BatchValidator::default(),
            processing: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_validator(mut self, validator: BatchValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    /// Whether a batch submission is in flight
    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::Acquire)
    }

    /// Reload the registry from the backend
    pub async fn refresh(&self) -> Result<usize, NodeServiceError> {
        Ok(self.registry.refresh(self.api.as_ref()).await?)
    }

    /// Validate and persist the draft of an editing context.
    ///
    /// Creates a new node or fully replaces the edited one, then reloads the
    /// registry. The context is only read; callers discard it on success.
    pub async fn save(&self, context: &EditContext) -> Result<(), NodeServiceError> {
        context.validate()?;

        let draft = context.draft();
        match context.mode() {
            EditMode::Create => self.api.create_node(draft).await?,
            EditMode::Edit { id } => self.api.update_node(id, draft).await?,
        }

        self.reload_after_mutation().await;
        Ok(())
    }

    /// Delete a persisted node and reload the registry
    pub async fn delete(&self, node: &NodeDescriptor) -> Result<(), NodeServiceError> {
        let id = node
            .id
            .ok_or_else(|| NodeServiceError::not_persisted(node.node_id.clone()))?;

        self.api.delete_node(id).await?;
        self.reload_after_mutation().await;
        Ok(())
    }

    /// Validate batch settings against the current registry without submitting
    pub async fn check_batch(&self, settings: &BatchSettings) -> BatchReport {
        let existing = self.registry.existing_ids().await;
        self.validator.check(settings, &existing)
    }

    /// Validate and submit a batch in one request.
    ///
    /// Returns the number of nodes the batch created.
    pub async fn submit_batch(&self, settings: &BatchSettings) -> Result<usize, NodeServiceError> {
        let _guard = ProcessingGuard::acquire(&self.processing).ok_or_else(|| {
            tracing::warn!(
                "Rejected batch {}: another batch is in flight",
                settings.node_id_template
            );
            NodeServiceError::BatchInProgress
        })?;

        let nodes = self.check_batch(settings).await.into_result()?;

        self.api.create_batch(settings).await?;
        tracing::info!("Submitted batch of {} node(s)", nodes.len());

        self.reload_after_mutation().await;
        Ok(nodes.len())
    }

    /// A failed reload after a successful mutation is recorded on the
    /// registry, not reported as a failure of the mutation.
    async fn reload_after_mutation(&self) {
        if let Err(err) = self.registry.refresh(self.api.as_ref()).await {
            tracing::warn!("Mutation succeeded but the registry reload failed: {}", err);
        }
    }
}
