//! Quote assembly
//!
//! Turns the ranked candidate set into the full quote surface: execution
//! parameters (minimum output, deadline), gas and USD figures, and the
//! MEV assessment. All amount math stays in integer base units; USD
//! figures are display-only derivations.

use std::time::{SystemTime, UNIX_EPOCH};

use ethereum_types::{Address, U256};
use routescout_core::constants::DEFAULT_SLIPPAGE_BPS;
use routescout_core::{ChainId, MevRisk, QuotePolicy, RouteKind, TokenMeta, VenueFamily};
use serde::Serialize;

use crate::fetcher::DexQuote;
use crate::{math, mev};

/// Gas units for a single-hop constant-product swap
const GAS_BASE_SWAP: u64 = 150_000;
/// Extra gas per additional hop
const GAS_PER_EXTRA_HOP: u64 = 80_000;
/// Extra gas for stable-pool math
const GAS_STABLE_SURCHARGE: u64 = 120_000;

/// The winning route of a quote
#[derive(Debug, Clone, Serialize)]
pub struct Route {
    pub venue_label: String,
    pub kind: RouteKind,
    pub path: Vec<Address>,
    pub path_symbols: Vec<String>,
}

/// A complete, executable swap quote
#[derive(Debug, Clone, Serialize)]
pub struct SwapQuote {
    pub chain: ChainId,
    pub token_in: TokenMeta,
    pub token_out: TokenMeta,
    pub route: Route,

    #[serde(serialize_with = "crate::fetcher::u256_dec")]
    pub input_amount: U256,
    pub input_amount_formatted: String,
    #[serde(serialize_with = "crate::fetcher::u256_dec")]
    pub output_amount: U256,
    pub output_amount_formatted: String,
    /// 0.0 when no USD price is known for the output token
    pub output_amount_usd: f64,
    pub effective_price: f64,
    pub price_impact_pct: f64,

    /// Effective slippage tolerance applied to `min_amount_out`
    pub slippage_bps: u64,
    #[serde(serialize_with = "crate::fetcher::u256_dec")]
    pub min_amount_out: U256,
    pub min_amount_out_formatted: String,
    /// On-chain execution cutoff, unix seconds
    pub deadline: u64,

    pub gas_estimate: u64,
    pub gas_cost_usd: f64,
    pub net_output_usd: f64,

    pub mev_risk: MevRisk,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mev_warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_mev_profit_usd: Option<f64>,

    pub block_number: u64,
    /// Staleness cutoff for this quote, unix milliseconds. Always earlier
    /// than the deadline.
    pub expires_at: u64,

    /// Every candidate considered, ranked best-first
    pub all_quotes: Vec<DexQuote>,
}

/// Everything the builder needs beyond the candidate set
pub(crate) struct BuildInputs<'a> {
    pub policy: &'a QuotePolicy,
    pub chain: ChainId,
    pub token_in: &'a TokenMeta,
    pub token_out: &'a TokenMeta,
    pub amount_in: U256,
    pub requested_slippage_bps: u64,
    pub gas_price_wei: U256,
    pub native_usd: f64,
    pub block_number: u64,
    pub token_in_usd: Option<f64>,
    pub token_out_usd: Option<f64>,
}

/// Assemble the full quote from a non-empty ranked candidate set.
/// Returns `None` only when the set is empty.
pub(crate) fn build_quote(inputs: &BuildInputs<'_>, quotes: Vec<DexQuote>) -> Option<SwapQuote> {
    let best = quotes.first()?.clone();

    let suggested_bps = suggested_slippage_bps(best.price_impact_pct);
    let slippage_bps = inputs.requested_slippage_bps.max(suggested_bps);
    let min_amount_out = math::apply_slippage_bps(best.output_amount, slippage_bps);

    let gas_estimate = gas_units(best.family, best.path.len().saturating_sub(1) as u64);
    let gas_cost_usd =
        math::u256_to_f64(inputs.gas_price_wei) / 1e18 * gas_estimate as f64 * inputs.native_usd;

    let output_amount_usd = inputs
        .token_out_usd
        .map(|price| math::to_human(best.output_amount, inputs.token_out.decimals) * price)
        .unwrap_or(0.0);
    let net_output_usd = if output_amount_usd > 0.0 {
        output_amount_usd - gas_cost_usd
    } else {
        0.0
    };

    // Trade notional for the MEV heuristic, from whichever side has a price
    let trade_usd = inputs
        .token_in_usd
        .map(|price| math::to_human(inputs.amount_in, inputs.token_in.decimals) * price)
        .unwrap_or(output_amount_usd);
    let assessment = mev::assess(trade_usd, best.price_impact_pct, best.estimated_liquidity_usd);

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    let deadline = now.as_secs() + inputs.policy.deadline_secs;
    let expires_at = now.as_millis() as u64 + inputs.policy.quote_ttl_ms;

    let kind = if best.path.len() > 2 {
        RouteKind::MultiHop
    } else {
        RouteKind::Direct
    };

    Some(SwapQuote {
        chain: inputs.chain,
        token_in: inputs.token_in.clone(),
        token_out: inputs.token_out.clone(),
        route: Route {
            venue_label: best.venue_label.clone(),
            kind,
            path: best.path.clone(),
            path_symbols: best.path_symbols.clone(),
        },
        input_amount: inputs.amount_in,
        input_amount_formatted: math::format_units(inputs.amount_in, inputs.token_in.decimals),
        output_amount: best.output_amount,
        output_amount_formatted: best.output_amount_formatted.clone(),
        output_amount_usd,
        effective_price: best.effective_price,
        price_impact_pct: best.price_impact_pct,
        slippage_bps,
        min_amount_out,
        min_amount_out_formatted: math::format_units(min_amount_out, inputs.token_out.decimals),
        deadline,
        gas_estimate,
        gas_cost_usd,
        net_output_usd,
        mev_risk: assessment.risk,
        mev_warning: assessment.warning,
        estimated_mev_profit_usd: assessment.estimated_profit_usd,
        block_number: inputs.block_number,
        expires_at,
        all_quotes: quotes,
    })
}

/// Slippage tolerance suggested from the observed price impact.
///
/// Below 1% impact the default tolerance holds. Between 1% and 3% the
/// tolerance tracks the impact itself. Above 3% it adds a 1% buffer on
/// top, since execution price drifts fastest exactly where impact is
/// already high.
pub(crate) fn suggested_slippage_bps(price_impact_pct: f64) -> u64 {
    if !price_impact_pct.is_finite() || price_impact_pct < 1.0 {
        DEFAULT_SLIPPAGE_BPS
    } else if price_impact_pct <= 3.0 {
        (price_impact_pct * 100.0).ceil() as u64
    } else {
        (price_impact_pct * 100.0).ceil() as u64 + 100
    }
}

fn gas_units(family: VenueFamily, hops: u64) -> u64 {
    let base = match family {
        VenueFamily::ConstantProduct => GAS_BASE_SWAP,
        VenueFamily::StableConstantProduct => GAS_BASE_SWAP + GAS_STABLE_SURCHARGE,
    };
    base + GAS_PER_EXTRA_HOP * hops.saturating_sub(1)
}
