//! Quote routes

use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use ethereum_types::U256;
use quoter::QuoteRequest;
use routescout_core::{parse_address, QuoteError};

use crate::dto::{
    ApiError, CompareResponse, QuoteApiRequest, QuoteBySymbolsRequest, QuoteResponse,
};
use crate::AppState;

/// Create quote routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(get_quote))
        .route("/by-symbols", post(get_quote_by_symbols))
        .route("/compare", post(compare_venues))
}

/// POST /quote - Best route across all venues, by token address
async fn get_quote(
    State(state): State<AppState>,
    Json(request): Json<QuoteApiRequest>,
) -> Result<Json<QuoteResponse>, (StatusCode, Json<ApiError>)> {
    let request = parse_quote_request(&request)?;
    match state.engine().get_quote(&request).await {
        Ok(quote) => Ok(Json(QuoteResponse::ok(quote))),
        Err(err) => quote_failure(err),
    }
}

/// POST /quote/by-symbols - Best route, tokens addressed by symbol
async fn get_quote_by_symbols(
    State(state): State<AppState>,
    Json(request): Json<QuoteBySymbolsRequest>,
) -> Result<Json<QuoteResponse>, (StatusCode, Json<ApiError>)> {
    let result = state
        .engine()
        .get_quote_by_symbols(
            request.chain,
            &request.token_in,
            &request.token_out,
            &request.amount,
            request.slippage_bps,
        )
        .await;
    match result {
        Ok(quote) => Ok(Json(QuoteResponse::ok(quote))),
        Err(err) => quote_failure(err),
    }
}

/// POST /quote/compare - Direct-pair comparison across every venue,
/// including venues without liquidity
async fn compare_venues(
    State(state): State<AppState>,
    Json(request): Json<QuoteApiRequest>,
) -> Result<Json<CompareResponse>, (StatusCode, Json<ApiError>)> {
    let request = parse_quote_request(&request)?;
    match state.engine().compare_all_venues(&request).await {
        Ok(quotes) => Ok(Json(CompareResponse::ok(quotes))),
        Err(err) => match err.status_code() {
            200 => Ok(Json(CompareResponse::failure(&err))),
            code => Err((status_from(code), Json((&err).into()))),
        },
    }
}

fn parse_quote_request(
    request: &QuoteApiRequest,
) -> Result<QuoteRequest, (StatusCode, Json<ApiError>)> {
    let token_in = parse_address(&request.token_in).ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError::bad_request(format!(
                "invalid token_in address: {}",
                request.token_in
            ))),
        )
    })?;
    let token_out = parse_address(&request.token_out).ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError::bad_request(format!(
                "invalid token_out address: {}",
                request.token_out
            ))),
        )
    })?;
    let amount_in = U256::from_dec_str(&request.amount_in).map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError::bad_request(format!(
                "invalid amount_in: {}",
                request.amount_in
            ))),
        )
    })?;

    Ok(QuoteRequest {
        chain: request.chain,
        token_in,
        token_out,
        amount_in,
        slippage_bps: request.slippage_bps,
    })
}

/// Map an engine error to the response contract: expected negatives are
/// a 200 body with `success: false`, everything else an error status.
fn quote_failure(
    err: QuoteError,
) -> Result<Json<QuoteResponse>, (StatusCode, Json<ApiError>)> {
    match err.status_code() {
        200 => Ok(Json(QuoteResponse::failure(&err))),
        code => Err((status_from(code), Json((&err).into()))),
    }
}

fn status_from(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}
