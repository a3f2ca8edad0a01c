//! HTTP server setup

use axum::Router;
use routescout_core::AppConfig;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::routes::create_router;
use crate::AppState;

/// Create the full application router with middleware
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Bind and serve the quote API on the configured host and port
pub async fn start_server(state: AppState) -> Result<(), std::io::Error> {
    let addr = bind_addr(state.config());
    let chains = state.config().chains.len();
    let app = create_app(state);

    tracing::info!(%addr, chains, "quote API listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn bind_addr(config: &AppConfig) -> String {
    format!("{}:{}", config.api_host, config.api_port)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_addr_follows_config() {
        let mut config = AppConfig::default();
        config.api_host = "0.0.0.0".to_string();
        config.api_port = 9000;
        assert_eq!(bind_addr(&config), "0.0.0.0:9000");
    }

    #[test]
    fn test_bind_addr_defaults_to_loopback() {
        let config = AppConfig::default();
        assert_eq!(bind_addr(&config), "127.0.0.1:18550");
    }
}
