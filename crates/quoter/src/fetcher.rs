//! Quote fan-out and ranking
//!
//! Fetches one candidate per venue for the direct pair, composes two-hop
//! candidates through the configured intermediate assets, and ranks the
//! merged set by raw integer output. Venue failures surface as missing
//! candidates, never as request failures.

use ethereum_types::{Address, U256};
use futures::future::join_all;
use routescout_core::{TokenMeta, VenueConfig, VenueFamily};
use serde::Serialize;

use crate::adapters::{quote_single_hop, HopQuote, QuoteCtx};
use crate::math;

/// Serialize a base-unit amount as a decimal string rather than the
/// default hex form
pub(crate) fn u256_dec<S: serde::Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// One venue's candidate for the requested pair, as exposed by the
/// comparison surface and carried inside a full quote.
#[derive(Debug, Clone, Serialize)]
pub struct DexQuote {
    pub venue_label: String,
    /// Token addresses along the route, input first
    pub path: Vec<Address>,
    pub path_symbols: Vec<String>,
    /// Output in base units. The ranking key.
    #[serde(serialize_with = "u256_dec")]
    pub output_amount: U256,
    pub output_amount_formatted: String,
    pub price_impact_pct: f64,
    /// Output human units per input human unit
    pub effective_price: f64,
    /// Estimated pool depth in USD, 0.0 when unknown
    pub estimated_liquidity_usd: f64,
    pub has_liquidity: bool,
    /// Set on exactly one entry of a ranked set
    pub is_optimal: bool,
    /// Family of the venue that produced this candidate, kept for gas
    /// estimation on the winning route
    #[serde(skip)]
    pub(crate) family: VenueFamily,
}

impl DexQuote {
    /// Entry for a venue that could not serve the pair, used by the
    /// per-venue comparison surface
    pub(crate) fn no_liquidity(
        venue_label: String,
        family: VenueFamily,
        token_in: &TokenMeta,
        token_out: &TokenMeta,
    ) -> Self {
        Self {
            venue_label,
            path: vec![token_in.address, token_out.address],
            path_symbols: vec![token_in.symbol.clone(), token_out.symbol.clone()],
            output_amount: U256::zero(),
            output_amount_formatted: "0".to_string(),
            price_impact_pct: 0.0,
            effective_price: 0.0,
            estimated_liquidity_usd: 0.0,
            has_liquidity: false,
            is_optimal: false,
            family,
        }
    }

    pub(crate) fn from_direct(
        hop: HopQuote,
        token_in: &TokenMeta,
        token_out: &TokenMeta,
        amount_in: U256,
    ) -> Self {
        Self {
            venue_label: hop.venue_label,
            path: vec![token_in.address, token_out.address],
            path_symbols: vec![token_in.symbol.clone(), token_out.symbol.clone()],
            output_amount: hop.amount_out,
            output_amount_formatted: math::format_units(hop.amount_out, token_out.decimals),
            price_impact_pct: hop.price_impact_pct,
            effective_price: math::execution_price(
                amount_in,
                token_in.decimals,
                hop.amount_out,
                token_out.decimals,
            ),
            estimated_liquidity_usd: hop.liquidity_usd,
            has_liquidity: true,
            is_optimal: false,
            family: hop.family,
        }
    }

    fn from_two_hop(
        hop1: HopQuote,
        hop2: HopQuote,
        token_in: &TokenMeta,
        mid: &TokenMeta,
        token_out: &TokenMeta,
        amount_in: U256,
    ) -> Self {
        let venue_label = if hop1.venue_label == hop2.venue_label {
            hop1.venue_label.clone()
        } else {
            format!("{} / {}", hop1.venue_label, hop2.venue_label)
        };
        // Route depth is bounded by its shallowest known pool
        let liquidity = match (hop1.liquidity_usd > 0.0, hop2.liquidity_usd > 0.0) {
            (true, true) => hop1.liquidity_usd.min(hop2.liquidity_usd),
            (true, false) => hop1.liquidity_usd,
            (false, true) => hop2.liquidity_usd,
            (false, false) => 0.0,
        };
        Self {
            venue_label,
            path: vec![token_in.address, mid.address, token_out.address],
            path_symbols: vec![
                token_in.symbol.clone(),
                mid.symbol.clone(),
                token_out.symbol.clone(),
            ],
            output_amount: hop2.amount_out,
            output_amount_formatted: math::format_units(hop2.amount_out, token_out.decimals),
            price_impact_pct: hop1.price_impact_pct + hop2.price_impact_pct,
            effective_price: math::execution_price(
                amount_in,
                token_in.decimals,
                hop2.amount_out,
                token_out.decimals,
            ),
            estimated_liquidity_usd: liquidity,
            has_liquidity: true,
            is_optimal: false,
            family: hop1.family,
        }
    }
}

/// Fetch, compose, and rank all candidates for a pair.
///
/// The direct fan-out is retried once in full after a delay when it comes
/// back completely empty, since a transient provider hiccup at the wrong
/// moment otherwise reads as no liquidity anywhere. The returned vector
/// is sorted by output descending with `is_optimal` set on the first
/// entry; empty means no venue can serve the pair.
pub(crate) async fn fetch_all_quotes(
    ctx: &QuoteCtx<'_>,
    venues: &[VenueConfig],
    intermediates: &[TokenMeta],
    token_in: &TokenMeta,
    token_out: &TokenMeta,
    amount_in: U256,
) -> Vec<DexQuote> {
    let mut candidates = direct_fanout(ctx, venues, token_in, token_out, amount_in).await;
    if candidates.is_empty() {
        tracing::debug!(
            token_in = %token_in.symbol,
            token_out = %token_out.symbol,
            "direct fan-out empty, retrying once"
        );
        tokio::time::sleep(std::time::Duration::from_millis(ctx.policy.fanout_retry_delay_ms))
            .await;
        candidates = direct_fanout(ctx, venues, token_in, token_out, amount_in).await;
    }

    candidates.extend(two_hop_fanout(ctx, venues, intermediates, token_in, token_out, amount_in).await);

    // Stable sort: ties keep direct-before-two-hop and venue declaration order
    candidates.sort_by(|a, b| b.output_amount.cmp(&a.output_amount));
    if let Some(best) = candidates.first_mut() {
        best.is_optimal = true;
    }
    candidates
}

async fn direct_fanout(
    ctx: &QuoteCtx<'_>,
    venues: &[VenueConfig],
    token_in: &TokenMeta,
    token_out: &TokenMeta,
    amount_in: U256,
) -> Vec<DexQuote> {
    let futures = venues.iter().map(|venue| async move {
        quote_single_hop(ctx, venue, token_in, token_out, amount_in)
            .await
            .map(|hop| DexQuote::from_direct(hop, token_in, token_out, amount_in))
    });
    join_all(futures).await.into_iter().flatten().collect()
}

/// Compose one candidate per (intermediate, venue) pair, feeding the
/// first hop's real output into the second. A zero-output hop discards
/// the candidate.
async fn two_hop_fanout(
    ctx: &QuoteCtx<'_>,
    venues: &[VenueConfig],
    intermediates: &[TokenMeta],
    token_in: &TokenMeta,
    token_out: &TokenMeta,
    amount_in: U256,
) -> Vec<DexQuote> {
    let mut futures = Vec::new();
    for mid in intermediates {
        if mid.address == token_in.address || mid.address == token_out.address {
            continue;
        }
        for venue in venues {
            futures.push(async move {
                let hop1 = quote_single_hop(ctx, venue, token_in, mid, amount_in).await?;
                if hop1.amount_out.is_zero() {
                    return None;
                }
                let hop2 = quote_single_hop(ctx, venue, mid, token_out, hop1.amount_out).await?;
                if hop2.amount_out.is_zero() {
                    return None;
                }
                Some(DexQuote::from_two_hop(
                    hop1, hop2, token_in, mid, token_out, amount_in,
                ))
            });
        }
    }
    join_all(futures).await.into_iter().flatten().collect()
}
