//! Editing Context
//!
//! A draft node plus whether it is being created or edited. Each session owns
//! its own context; the service consumes it on save and leaves it untouched on
//! failure so the user can correct and resubmit.

use crate::behaviors::{validate_node, FieldErrors};
use crate::models::{DataType, NodeDescriptor, NodeKind, NodeType, VariableSpec};
use crate::services::error::NodeServiceError;
use std::collections::HashSet;

/// Whether the draft is a new node or a replacement for a persisted one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Create,
    Edit { id: i64 },
}

/// Draft node being created or edited
#[derive(Debug, Clone, PartialEq)]
pub struct EditContext {
    mode: EditMode,
    draft: NodeDescriptor,
    /// Node ID the draft had when editing started
    original_node_id: Option<String>,
}

impl EditContext {
    /// Start a new node: an empty double variable with default settings
    pub fn create() -> Self {
        Self::create_from(NodeDescriptor::variable(
            "",
            "",
            VariableSpec::new(DataType::Double, ""),
        ))
    }

    /// Start a new node from a prepared draft; any backend id is dropped
    pub fn create_from(mut draft: NodeDescriptor) -> Self {
        draft.id = None;
        Self {
            mode: EditMode::Create,
            draft,
            original_node_id: None,
        }
    }

    /// Start editing a persisted node
    pub fn edit(node: NodeDescriptor) -> Result<Self, NodeServiceError> {
        let id = node
            .id
            .ok_or_else(|| NodeServiceError::not_persisted(node.node_id.clone()))?;
        Ok(Self {
            mode: EditMode::Edit { id },
            original_node_id: Some(node.node_id.clone()),
            draft: node,
        })
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, EditMode::Edit { .. })
    }

    pub fn draft(&self) -> &NodeDescriptor {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut NodeDescriptor {
        &mut self.draft
    }

    pub fn into_draft(self) -> NodeDescriptor {
        self.draft
    }

    /// Change the draft's node type.
    ///
    /// Switching to `variable` starts from an empty double value; switching
    /// away from it drops the variable settings.
    pub fn set_node_type(&mut self, node_type: NodeType) {
        if self.draft.node_type() == node_type {
            return;
        }
        self.draft.kind = match node_type {
            NodeType::Variable => NodeKind::Variable(VariableSpec::new(DataType::Double, "")),
            NodeType::Object => NodeKind::Object,
            NodeType::Method => NodeKind::Method,
        };
    }

    /// Run the single-node validator over the draft
    pub fn validate(&self) -> Result<(), FieldErrors> {
        validate_node(&self.draft)
    }

    /// Message when the draft's node ID is already taken by another node.
    ///
    /// When editing, keeping the node's own ID is fine.
    pub fn node_id_conflict(&self, existing_ids: &HashSet<String>) -> Option<String> {
        let node_id = self.draft.node_id.trim();
        if node_id.is_empty() || self.original_node_id.as_deref() == Some(node_id) {
            return None;
        }
        existing_ids
            .contains(node_id)
            .then(|| format!("Node ID '{}' already exists", node_id))
    }
}

impl Default for EditContext {
    fn default() -> Self {
        Self::create()
    }
}
