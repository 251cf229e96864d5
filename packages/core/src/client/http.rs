//! reqwest implementation of [`NodeApi`]

use super::{node_path, ApiError, ApiResponse, NodeApi, BATCH_PATH, NODES_PATH};
use crate::config::ClientConfig;
use crate::models::{BatchSettings, NodeDescriptor};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use tracing::{debug, error, info, warn};

/// Header carrying the CSRF token on mutating requests
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// HTTP client for the node backend
#[derive(Debug, Clone)]
pub struct HttpNodeApi {
    client: Client,
    base_url: String,
    csrf_token: Option<String>,
}

impl HttpNodeApi {
    /// Build a client from validated configuration
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
            csrf_token: config.csrf_token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the CSRF token when one is configured
    fn mutating(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.csrf_token {
            Some(token) => request.header(CSRF_HEADER, token),
            None => request,
        }
    }

    /// Read the `{success, nodes?, error?}` envelope from a response
    async fn read_envelope(response: Response) -> Result<ApiResponse, ApiError> {
        let status = response.status();
        let body = response.text().await?;
        debug!("Backend response status: {}", status);

        if !status.is_success() {
            let message = error_message(&body);
            error!("Backend error: {} - {}", status, message.as_deref().unwrap_or(&body));
            return Err(ApiError::status(status.as_u16(), message));
        }

        let envelope: ApiResponse = serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse backend response: {}", e);
            ApiError::decode(e.to_string())
        })?;

        envelope.into_result().map_err(|err| {
            warn!("Backend rejected request: {}", err);
            err
        })
    }
}

/// `error` field of a JSON body, if there is one
fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiResponse>(body)
        .ok()
        .and_then(|envelope| envelope.error)
        .filter(|message| !message.trim().is_empty())
}

#[async_trait]
impl NodeApi for HttpNodeApi {
    async fn list_nodes(&self) -> Result<Vec<NodeDescriptor>, ApiError> {
        let response = self.client.get(self.url(NODES_PATH)).send().await?;
        let nodes = Self::read_envelope(response).await?.nodes.ok_or_else(|| {
            error!("Backend listing carried no nodes");
            ApiError::decode("listing without nodes")
        })?;
        debug!("Fetched {} node(s)", nodes.len());
        Ok(nodes)
    }

    async fn create_node(&self, node: &NodeDescriptor) -> Result<(), ApiError> {
        let request = self.client.post(self.url(NODES_PATH)).json(node);
        let response = self.mutating(request).send().await?;
        Self::read_envelope(response).await?;
        info!("Created node {}", node.node_id);
        Ok(())
    }

    async fn update_node(&self, id: i64, node: &NodeDescriptor) -> Result<(), ApiError> {
        let request = self.client.put(self.url(&node_path(id))).json(node);
        let response = self.mutating(request).send().await?;
        Self::read_envelope(response).await?;
        info!("Updated node {} ({})", id, node.node_id);
        Ok(())
    }

    async fn delete_node(&self, id: i64) -> Result<(), ApiError> {
        let request = self.client.delete(self.url(&node_path(id)));
        let response = self.mutating(request).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = error_message(&body);
            error!("Failed to delete node {}: {}", id, status);
            return Err(ApiError::status(status.as_u16(), message));
        }

        // A 2xx body is optional, but an explicit `success: false` still fails.
        if let Ok(envelope) = serde_json::from_str::<ApiResponse>(&body) {
            if !envelope.success && envelope.error.is_some() {
                return envelope.into_result().map(|_| ());
            }
        }

        info!("Deleted node {}", id);
        Ok(())
    }

    async fn create_batch(&self, settings: &BatchSettings) -> Result<(), ApiError> {
        let request = self.client.post(self.url(BATCH_PATH)).json(settings);
        let response = self.mutating(request).send().await?;
        Self::read_envelope(response).await?;
        info!(
            "Created batch {} over {}..={}",
            settings.node_id_template, settings.start_index, settings.end_index
        );
        Ok(())
    }
}
