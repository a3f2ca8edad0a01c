//! Error types for routescout

use thiserror::Error;

/// Chain client (JSON-RPC) errors.
///
/// These never reach quote callers directly: the venue adapter downgrades
/// them to a no-liquidity result after its retry budget is exhausted.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("RPC endpoint unreachable: {url}")]
    Unreachable { url: String },

    #[error("RPC request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Call reverted: {message}")]
    Reverted { message: String },

    #[error("RPC returned error: {message}")]
    Api { message: String },

    #[error("Failed to parse RPC response: {0}")]
    Parse(String),

    #[error("No RPC endpoint configured for chain: {chain}")]
    NoEndpoint { chain: String },
}

/// Quote request errors surfaced to callers.
///
/// `TokenNotFound` and `NoLiquidity` are expected DeFi negatives, not bugs;
/// the Display string is suitable for direct display to a user.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("Unknown token: {token}")]
    TokenNotFound { token: String },

    #[error("No liquidity for this pair on any configured venue")]
    NoLiquidity,

    #[error("Invalid amount: {message}")]
    InvalidAmount { message: String },

    #[error("Chain not configured: {chain}")]
    ChainNotConfigured { chain: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl QuoteError {
    /// Get a machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::TokenNotFound { .. } => "token_not_found",
            Self::NoLiquidity => "no_liquidity",
            Self::InvalidAmount { .. } => "invalid_amount",
            Self::ChainNotConfigured { .. } => "chain_not_configured",
            Self::Internal(_) => "internal",
        }
    }

    /// Get HTTP status code for this error.
    ///
    /// Expected negatives return 200: the API reports them in the body as
    /// `{success: false, error}` rather than as transport failures.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::TokenNotFound { .. } | Self::NoLiquidity => 200,
            Self::InvalidAmount { .. } => 400,
            Self::ChainNotConfigured { .. } => 422,
            Self::Internal(_) => 500,
        }
    }
}

/// Result type alias for quote operations
pub type Result<T> = std::result::Result<T, QuoteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_error_codes() {
        let err = QuoteError::TokenNotFound {
            token: "PEPE".into(),
        };
        assert_eq!(err.error_code(), "token_not_found");
        assert_eq!(err.status_code(), 200);

        let err = QuoteError::InvalidAmount {
            message: "zero".into(),
        };
        assert_eq!(err.error_code(), "invalid_amount");
        assert_eq!(err.status_code(), 400);

        assert_eq!(QuoteError::NoLiquidity.error_code(), "no_liquidity");
        assert_eq!(QuoteError::Internal("boom".into()).status_code(), 500);
    }

    #[test]
    fn test_display_is_user_facing() {
        let err = QuoteError::NoLiquidity;
        assert_eq!(
            err.to_string(),
            "No liquidity for this pair on any configured venue"
        );
    }
}
