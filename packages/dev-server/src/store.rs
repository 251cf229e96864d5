//! In-memory node store
//!
//! Holds nodes in insertion order and assigns integer ids. Every mutation is
//! validated first and either applies completely or not at all.

use opcsim_core::behaviors::{validate_node, FieldErrors};
use opcsim_core::models::{BatchSettings, NodeDescriptor};
use opcsim_core::operations::{BatchErrors, BatchValidator};
use std::collections::HashSet;
use thiserror::Error;

/// Store operation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Node not found: {id}")]
    NodeNotFound { id: i64 },

    #[error("Node ID already exists: {node_id}")]
    DuplicateNodeId { node_id: String },

    #[error(transparent)]
    Validation(#[from] FieldErrors),

    #[error(transparent)]
    Batch(#[from] BatchErrors),
}

impl StoreError {
    pub fn node_not_found(id: i64) -> Self {
        Self::NodeNotFound { id }
    }

    pub fn duplicate_node_id(node_id: impl Into<String>) -> Self {
        Self::DuplicateNodeId {
            node_id: node_id.into(),
        }
    }
}

/// Nodes known to the dev server
#[derive(Debug, Clone)]
pub struct NodeStore {
    nodes: Vec<NodeDescriptor>,
    next_id: i64,
    validator: BatchValidator,
}

impl Default for NodeStore {
    fn default() -> Self {
        Self::new(BatchValidator::default())
    }
}

impl NodeStore {
    pub fn new(validator: BatchValidator) -> Self {
        Self {
            nodes: Vec::new(),
            next_id: 1,
            validator,
        }
    }

    pub fn list(&self) -> Vec<NodeDescriptor> {
        self.nodes.clone()
    }

    pub fn get(&self, id: i64) -> Option<&NodeDescriptor> {
        self.nodes.iter().find(|node| node.id == Some(id))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn node_ids(&self) -> HashSet<String> {
        self.nodes.iter().map(|node| node.node_id.clone()).collect()
    }

    fn insert(&mut self, mut node: NodeDescriptor) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        node.id = Some(id);
        self.nodes.push(node);
        id
    }

    /// Validate and add a node; returns its new id
    pub fn create(&mut self, node: NodeDescriptor) -> Result<i64, StoreError> {
        validate_node(&node)?;
        if self.nodes.iter().any(|n| n.node_id == node.node_id) {
            return Err(StoreError::duplicate_node_id(node.node_id));
        }

        let id = self.insert(node);
        tracing::info!("Created node {}", id);
        Ok(id)
    }

    /// Validate and fully replace the node stored under `id`
    pub fn update(&mut self, id: i64, mut node: NodeDescriptor) -> Result<(), StoreError> {
        validate_node(&node)?;
        if self
            .nodes
            .iter()
            .any(|n| n.node_id == node.node_id && n.id != Some(id))
        {
            return Err(StoreError::duplicate_node_id(node.node_id));
        }

        let slot = self
            .nodes
            .iter_mut()
            .find(|n| n.id == Some(id))
            .ok_or_else(|| StoreError::node_not_found(id))?;
        node.id = Some(id);
        *slot = node;

        tracing::info!("Updated node {}", id);
        Ok(())
    }

    pub fn delete(&mut self, id: i64) -> Result<NodeDescriptor, StoreError> {
        let index = self
            .nodes
            .iter()
            .position(|n| n.id == Some(id))
            .ok_or_else(|| StoreError::node_not_found(id))?;

        tracing::info!("Deleted node {}", id);
        Ok(self.nodes.remove(index))
    }

    /// Expand, validate against stored node IDs, then add every node.
    ///
    /// Returns the number of nodes created.
    pub fn create_batch(&mut self, settings: &BatchSettings) -> Result<usize, StoreError> {
        let generated = self.validator.validate(settings, &self.node_ids())?;

        let count = generated.len();
        for node in generated {
            self.insert(node.descriptor);
        }

        tracing::info!("Created batch of {} node(s) from {}", count, settings.node_id_template);
        Ok(count)
    }
}
