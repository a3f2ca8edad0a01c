//! Application state shared across API handlers

use std::sync::Arc;

use quoter::QuoteEngine;
use routescout_core::AppConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    engine: QuoteEngine,
    config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(engine: QuoteEngine, config: Arc<AppConfig>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { engine, config }),
        }
    }

    pub fn engine(&self) -> &QuoteEngine {
        &self.inner.engine
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }
}
