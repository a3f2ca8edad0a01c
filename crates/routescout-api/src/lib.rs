//! routescout-api: HTTP API layer for routescout
//!
//! Exposes the quoting engine over a small JSON surface. Expected DeFi
//! negatives (unknown token, no liquidity) come back as HTTP 200 with
//! `success: false`, matching how quote consumers poll; only caller
//! mistakes and engine faults use error status codes.

pub mod dto;
pub mod routes;
pub mod server;
pub mod state;

pub use server::*;
pub use state::AppState;
