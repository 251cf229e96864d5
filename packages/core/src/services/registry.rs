//! Node Registry
//!
//! In-memory copy of the nodes the backend currently knows, reloaded after every
//! successful mutation.
//!
//! # Snapshots
//!
//! The node list is held as an `Arc<Vec<NodeDescriptor>>` and swapped wholesale
//! on each reload, so readers holding an older snapshot never see a half-applied
//! update. A failed reload records its error and leaves the previous snapshot in
//! place.

use crate::client::{ApiError, NodeApi};
use crate::models::NodeDescriptor;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

/// Last-fetched list of nodes
#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    nodes: Arc<RwLock<Arc<Vec<NodeDescriptor>>>>,

    /// Message of the most recent failed refresh, cleared by the next success
    last_error: Arc<RwLock<Option<String>>>,

    last_refresh: Arc<RwLock<Option<Instant>>>,
}

impl NodeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a new node list
    pub async fn replace(&self, nodes: Vec<NodeDescriptor>) {
        {
            let mut current = self.nodes.write().await;
            *current = Arc::new(nodes);
        }
        {
            let mut last = self.last_refresh.write().await;
            *last = Some(Instant::now());
        }
        let mut error = self.last_error.write().await;
        *error = None;
    }

    /// Record a failed refresh; the snapshot is kept
    pub async fn record_error(&self, message: impl Into<String>) {
        let mut error = self.last_error.write().await;
        *error = Some(message.into());
    }

    /// Reload from the backend.
    ///
    /// Returns the number of nodes loaded. On failure the error is recorded and
    /// returned, and the previous snapshot stays current.
    pub async fn refresh(&self, api: &dyn NodeApi) -> Result<usize, ApiError> {
        match api.list_nodes().await {
            Ok(nodes) => {
                let count = nodes.len();
                self.replace(nodes).await;
                tracing::debug!("Registry refreshed with {} node(s)", count);
                Ok(count)
            }
            Err(err) => {
                tracing::warn!("Registry refresh failed: {}", err);
                self.record_error(err.user_message()).await;
                Err(err)
            }
        }
    }

    /// Current snapshot
    pub async fn snapshot(&self) -> Arc<Vec<NodeDescriptor>> {
        self.nodes.read().await.clone()
    }

    /// Node IDs of every known node
    pub async fn existing_ids(&self) -> HashSet<String> {
        self.nodes
            .read()
            .await
            .iter()
            .map(|node| node.node_id.clone())
            .collect()
    }

    pub async fn find_by_node_id(&self, node_id: &str) -> Option<NodeDescriptor> {
        self.nodes
            .read()
            .await
            .iter()
            .find(|node| node.node_id == node_id)
            .cloned()
    }

    pub async fn find_by_id(&self, id: i64) -> Option<NodeDescriptor> {
        self.nodes
            .read()
            .await
            .iter()
            .find(|node| node.id == Some(id))
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.nodes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.nodes.read().await.is_empty()
    }

    pub async fn last_error(&self) -> Option<String> {
        self.last_error.read().await.clone()
    }

    /// Registry statistics (for debugging/monitoring)
    pub async fn stats(&self) -> RegistryStats {
        RegistryStats {
            nodes: self.len().await,
            last_refresh: *self.last_refresh.read().await,
            last_error: self.last_error().await,
        }
    }
}

/// Statistics about the registry
#[derive(Debug, Clone)]
pub struct RegistryStats {
    pub nodes: usize,
    /// Last successful refresh (None if never refreshed)
    pub last_refresh: Option<Instant>,
    pub last_error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BatchSettings;
    use async_trait::async_trait;

    struct FixedApi(Result<Vec<NodeDescriptor>, String>);

    #[async_trait]
    impl NodeApi for FixedApi {
        async fn list_nodes(&self) -> Result<Vec<NodeDescriptor>, ApiError> {
            self.0.clone().map_err(ApiError::backend)
        }

        async fn create_node(&self, _node: &NodeDescriptor) -> Result<(), ApiError> {
            Ok(())
        }

        async fn update_node(&self, _id: i64, _node: &NodeDescriptor) -> Result<(), ApiError> {
            Ok(())
        }

        async fn delete_node(&self, _id: i64) -> Result<(), ApiError> {
            Ok(())
        }

        async fn create_batch(&self, _settings: &BatchSettings) -> Result<(), ApiError> {
            Ok(())
        }
    }

    fn folder(id: i64, node_id: &str) -> NodeDescriptor {
        let mut node = NodeDescriptor::object("Folder", node_id);
        node.id = Some(id);
        node
    }

    #[tokio::test]
    async fn test_replace_swaps_snapshot() {
        let registry = NodeRegistry::new();
        assert!(registry.is_empty().await);

        registry.replace(vec![folder(1, "ns=2;s=A"), folder(2, "ns=2;s=B")]).await;
        let before = registry.snapshot().await;

        registry.replace(vec![folder(3, "ns=2;s=C")]).await;

        assert_eq!(before.len(), 2);
        assert_eq!(registry.len().await, 1);
        assert!(registry.find_by_node_id("ns=2;s=C").await.is_some());
        assert!(registry.find_by_node_id("ns=2;s=A").await.is_none());
        assert_eq!(registry.find_by_id(3).await.map(|n| n.node_id), Some("ns=2;s=C".to_string()));
    }

    #[tokio::test]
    async fn test_existing_ids() {
        let registry = NodeRegistry::new();
        registry.replace(vec![folder(1, "ns=2;s=A"), folder(2, "ns=2;s=B")]).await;

        let ids = registry.existing_ids().await;
        assert_eq!(ids.len(), 2);
        assert!(ids.contains("ns=2;s=B"));
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_snapshot() {
        let registry = NodeRegistry::new();
        registry.refresh(&FixedApi(Ok(vec![folder(1, "ns=2;s=A")]))).await.unwrap();
        assert!(registry.stats().await.last_refresh.is_some());

        let result = registry.refresh(&FixedApi(Err("backend down".to_string()))).await;
        assert!(result.is_err());
        assert_eq!(registry.len().await, 1);
        assert_eq!(registry.last_error().await.as_deref(), Some("backend down"));

        registry.refresh(&FixedApi(Ok(vec![]))).await.unwrap();
        assert!(registry.is_empty().await);
        assert_eq!(registry.last_error().await, None);
    }

    #[test]
    fn test_stats_from_blocking_context() {
        let registry = NodeRegistry::new();
        tokio_test::assert_ok!(tokio_test::block_on(
            registry.refresh(&FixedApi(Ok(vec![folder(1, "ns=2;s=A")])))
        ));
        tokio_test::assert_err!(tokio_test::block_on(
            registry.refresh(&FixedApi(Err("timeout".to_string())))
        ));

        let stats = tokio_test::block_on(registry.stats());
        assert_eq!(stats.nodes, 1);
        assert_eq!(stats.last_error.as_deref(), Some("timeout"));
    }
}
