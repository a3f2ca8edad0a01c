//! Health check endpoint

use axum::{extract::State, Json};

use crate::dto::{ChainInfo, HealthResponse};
use crate::AppState;

/// GET /health - Check API health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let chains = state
        .config()
        .chains
        .keys()
        .map(|&chain| ChainInfo::from(chain))
        .collect();
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        chains,
    })
}
