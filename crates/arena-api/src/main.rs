//! Challenge tracker API server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p arena-api
//! ```
//!
//! Configuration is loaded from environment variables (and `.env`).

use arena_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = AppConfig::from_env();

    let tracing_config = config
        .as_ref()
        .map_or_else(|_| TracingConfig::default(), |c| TracingConfig::for_environment(c.app.env));
    if let Err(e) = try_init_tracing_with_config(tracing_config) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    info!(
        env = ?config.app.env,
        port = config.api.port,
        image_uploads = config.image_host.is_some(),
        external_sign_in = config.oauth.is_some(),
        "Starting challenge tracker API server"
    );

    if let Err(e) = arena_api::run(config).await {
        error!(error = %e, "Server failed to start");
        std::process::exit(1);
    }
}
