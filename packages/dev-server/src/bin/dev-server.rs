//! Development HTTP Server Binary
//!
//! Starts the in-memory node backend.
//!
//! # Usage
//!
//! ```bash
//! # Default port 3001, no CSRF check
//! cargo run -p opcsim-dev-server
//!
//! # Custom port with a CSRF token
//! DEV_SERVER_PORT=3002 DEV_SERVER_CSRF_TOKEN=dev cargo run -p opcsim-dev-server
//! ```
//!
//! # Environment Variables
//!
//! - `DEV_SERVER_PORT`: Server port (default: 3001)
//! - `DEV_SERVER_CSRF_TOKEN`: Token required in `X-CSRFToken` on mutating requests
//! - `RUST_LOG`: Logging level (e.g., "info", "debug", "trace")

use opcsim_dev_server::DevServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("opcsim HTTP Dev Server");

    let config = DevServerConfig::from_env()?;
    tracing::info!("Port: {}", config.port);

    opcsim_dev_server::start_server(&config).await
}
