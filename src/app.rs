use actix_web::web;

use crate::infrastructure::config::AppConfig;
use crate::interfaces::http::{start_server, HttpState};

/// Load configuration, set up logging and serve the HTTP API until shutdown
pub async fn run() -> std::io::Result<()> {
    // A missing .env file is normal
    let _ = dotenvy::dotenv();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            let _ = tracing_subscriber::fmt().with_env_filter("info").try_init();
            tracing::error!(error = %err, "Failed to load configuration");
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                err.to_string(),
            ));
        }
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(config.log_filter.as_str())
        .try_init();

    tracing::info!(
        host = %config.host,
        port = config.port,
        preview_rows = config.preview_rows,
        "Starting DataSweeper"
    );

    let state = web::Data::new(HttpState::new(&config));
    start_server(state, &config)?.await
}
