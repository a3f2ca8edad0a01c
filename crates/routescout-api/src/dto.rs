//! Data Transfer Objects for API requests and responses

use quoter::{DexQuote, SwapQuote};
use routescout_core::{ChainId, QuoteError};
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Chains with a configured venue table
    pub chains: Vec<ChainInfo>,
}

/// A chain the engine is configured to quote on
#[derive(Debug, Clone, Serialize)]
pub struct ChainInfo {
    pub name: String,
    /// Numeric EVM chain ID
    pub id: u64,
    pub native_symbol: String,
}

impl From<ChainId> for ChainInfo {
    fn from(chain: ChainId) -> Self {
        Self {
            name: chain.to_string(),
            id: chain.id(),
            native_symbol: chain.native_symbol().to_string(),
        }
    }
}

/// Generic API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("internal", message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("bad_request", message)
    }
}

impl From<&QuoteError> for ApiError {
    fn from(err: &QuoteError) -> Self {
        Self::new(err.error_code(), err.to_string())
    }
}

/// Address-based quote request
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteApiRequest {
    pub chain: ChainId,
    /// Input token address (0x-prefixed hex)
    pub token_in: String,
    /// Output token address (0x-prefixed hex)
    pub token_out: String,
    /// Input amount in base units, decimal string
    pub amount_in: String,
    #[serde(default)]
    pub slippage_bps: Option<u64>,
}

/// Symbol-based quote request
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteBySymbolsRequest {
    pub chain: ChainId,
    pub token_in: String,
    pub token_out: String,
    /// Input amount in human units, decimal string ("1.5")
    pub amount: String,
    #[serde(default)]
    pub slippage_bps: Option<u64>,
}

/// Quote response envelope. Expected negatives are reported here with
/// `success: false` rather than as transport errors.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<SwapQuote>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

impl QuoteResponse {
    pub fn ok(quote: SwapQuote) -> Self {
        Self {
            success: true,
            quote: Some(quote),
            error: None,
        }
    }

    pub fn failure(err: &QuoteError) -> Self {
        Self {
            success: false,
            quote: None,
            error: Some(err.into()),
        }
    }
}

/// Per-venue comparison response envelope
#[derive(Debug, Clone, Serialize)]
pub struct CompareResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quotes: Option<Vec<DexQuote>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

impl CompareResponse {
    pub fn ok(quotes: Vec<DexQuote>) -> Self {
        Self {
            success: true,
            quotes: Some(quotes),
            error: None,
        }
    }

    pub fn failure(err: &QuoteError) -> Self {
        Self {
            success: false,
            quotes: None,
            error: Some(err.into()),
        }
    }
}
