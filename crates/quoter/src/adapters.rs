//! Venue quote adapters
//!
//! One adapter per venue family, all behind `quote_single_hop`. Adapters
//! are infallible by contract: any chain-level failure is downgraded to
//! `None` after the retry budget so a broken venue never aborts the
//! fan-out it is part of. Every chain call is admitted through the
//! request's `CallGate`.

use std::collections::HashMap;
use std::time::Duration;

use ethereum_types::{Address, U256};
use evm_client::{abi, CallGate, ChainClient};
use routescout_core::{ChainId, QuotePolicy, TokenMeta, VenueConfig, VenueFamily};

use crate::math;

/// Shared per-request context threaded through the adapters and fetcher
pub(crate) struct QuoteCtx<'a> {
    pub client: &'a dyn ChainClient,
    pub gate: &'a CallGate,
    pub policy: &'a QuotePolicy,
    pub chain: ChainId,
    /// Display-only USD prices by token address
    pub prices: &'a HashMap<Address, f64>,
}

/// One venue's answer for a single hop
#[derive(Debug, Clone)]
pub(crate) struct HopQuote {
    /// Venue name, with the pool sub-type appended where the venue
    /// distinguishes one
    pub venue_label: String,
    pub family: VenueFamily,
    pub amount_out: U256,
    pub price_impact_pct: f64,
    /// Estimated pool depth in USD, 0.0 when unknown
    pub liquidity_usd: f64,
}

/// Quote one hop on one venue. Returns `None` when the venue has no
/// usable pool for the pair or stops responding.
pub(crate) async fn quote_single_hop(
    ctx: &QuoteCtx<'_>,
    venue: &VenueConfig,
    token_in: &TokenMeta,
    token_out: &TokenMeta,
    amount_in: U256,
) -> Option<HopQuote> {
    match venue.family {
        VenueFamily::ConstantProduct => {
            quote_constant_product(ctx, venue, token_in, token_out, amount_in).await
        }
        VenueFamily::StableConstantProduct => {
            quote_stable_constant_product(ctx, venue, token_in, token_out, amount_in).await
        }
    }
}

/// Uniswap-V2-style adapter. The router's `getAmountsOut` is the source
/// of truth for the output amount; reserves are probed separately for
/// price impact and depth, and that probe failing only degrades the
/// impact figure to the placeholder.
async fn quote_constant_product(
    ctx: &QuoteCtx<'_>,
    venue: &VenueConfig,
    token_in: &TokenMeta,
    token_out: &TokenMeta,
    amount_in: U256,
) -> Option<HopQuote> {
    let data = match abi::encode_get_amounts_out(amount_in, &[token_in.address, token_out.address]) {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!(venue = %venue.name, error = %e, "failed to encode router call");
            return None;
        }
    };
    let bytes = call_with_retry(ctx, &venue.name, venue.router, data).await?;
    let amount_out = match abi::decode_amounts_out(&abi::get_amounts_out(), &bytes) {
        Ok(amount) => amount,
        Err(e) => {
            tracing::warn!(venue = %venue.name, error = %e, "unparseable router response");
            return None;
        }
    };
    if amount_out.is_zero() {
        return None;
    }

    let (price_impact_pct, liquidity_usd) =
        match probe_reserves(ctx, venue, token_in, token_out, amount_in, amount_out).await {
            Some(figures) => figures,
            None => (ctx.policy.stable_hop_impact_pct, 0.0),
        };

    Some(HopQuote {
        venue_label: venue.name.clone(),
        family: venue.family,
        amount_out,
        price_impact_pct,
        liquidity_usd,
    })
}

/// Solidly-style adapter. Probes the stable and volatile pool sub-types
/// for the pair and keeps whichever pays more, tagging the label with
/// the winning sub-type.
async fn quote_stable_constant_product(
    ctx: &QuoteCtx<'_>,
    venue: &VenueConfig,
    token_in: &TokenMeta,
    token_out: &TokenMeta,
    amount_in: U256,
) -> Option<HopQuote> {
    let mut best: Option<(U256, &'static str)> = None;
    for (stable, tag) in [(true, "stable"), (false, "volatile")] {
        let data = match abi::encode_get_amounts_out_route(
            amount_in,
            token_in.address,
            token_out.address,
            stable,
        ) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(venue = %venue.name, error = %e, "failed to encode route call");
                continue;
            }
        };
        let Some(bytes) = call_with_retry(ctx, &venue.name, venue.router, data).await else {
            continue;
        };
        let amount_out = match abi::decode_amounts_out(&abi::get_amounts_out_routes(), &bytes) {
            Ok(amount) => amount,
            Err(e) => {
                tracing::warn!(venue = %venue.name, error = %e, "unparseable route response");
                continue;
            }
        };
        if amount_out.is_zero() {
            continue;
        }
        if best.map_or(true, |(current, _)| amount_out > current) {
            best = Some((amount_out, tag));
        }
    }

    let (amount_out, tag) = best?;
    Some(HopQuote {
        venue_label: format!("{} ({})", venue.name, tag),
        family: venue.family,
        amount_out,
        // No reserve surface for per-sub-type depth; charge the flat
        // per-hop figure instead
        price_impact_pct: ctx.policy.stable_hop_impact_pct,
        liquidity_usd: 0.0,
    })
}

/// Best-effort reserve probe: factory `getPair` then pair `getReserves`,
/// oriented by the V2 token0/token1 address ordering. Returns the real
/// price impact and a USD depth estimate when a side has a known price.
async fn probe_reserves(
    ctx: &QuoteCtx<'_>,
    venue: &VenueConfig,
    token_in: &TokenMeta,
    token_out: &TokenMeta,
    amount_in: U256,
    amount_out: U256,
) -> Option<(f64, f64)> {
    let data = abi::encode_get_pair(token_in.address, token_out.address).ok()?;
    let bytes = call_with_retry(ctx, &venue.name, venue.factory, data).await?;
    let pair = abi::decode_pair(&bytes).ok()??;

    let data = abi::encode_get_reserves().ok()?;
    let bytes = call_with_retry(ctx, &venue.name, pair, data).await?;
    let (reserve0, reserve1) = abi::decode_reserves(&bytes).ok()?;

    // token0 is the numerically lower address
    let (reserve_in, reserve_out) = if token_in.address < token_out.address {
        (reserve0, reserve1)
    } else {
        (reserve1, reserve0)
    };
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return None;
    }

    let impact = math::price_impact_pct(reserve_in, reserve_out, amount_in, amount_out);

    // Depth estimate: double whichever side has a known USD price
    let liquidity = ctx
        .prices
        .get(&token_in.address)
        .map(|price| math::to_human(reserve_in, token_in.decimals) * price * 2.0)
        .or_else(|| {
            ctx.prices
                .get(&token_out.address)
                .map(|price| math::to_human(reserve_out, token_out.decimals) * price * 2.0)
        })
        .unwrap_or(0.0);

    Some((impact, liquidity.max(0.0)))
}

/// Issue a gated chain call with the venue retry/backoff policy.
/// Exhausting the budget logs once at warn and yields `None`.
async fn call_with_retry(
    ctx: &QuoteCtx<'_>,
    venue_name: &str,
    to: Address,
    data: Vec<u8>,
) -> Option<Vec<u8>> {
    let mut backoff_ms = ctx.policy.retry_backoff_ms;
    for attempt in 0..=ctx.policy.venue_retries {
        let result = {
            let _pass = ctx.gate.admit().await;
            ctx.client.call(ctx.chain, to, data.clone()).await
        };
        match result {
            Ok(bytes) => return Some(bytes),
            Err(e) if attempt == ctx.policy.venue_retries => {
                tracing::warn!(
                    venue = venue_name,
                    to = %format!("{:#x}", to),
                    error = %e,
                    "venue call failed, treating as no liquidity"
                );
            }
            Err(e) => {
                tracing::debug!(venue = venue_name, attempt, error = %e, "venue call failed, retrying");
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                backoff_ms = backoff_ms.saturating_mul(2);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{addr_of, make_ctx_parts, FakeChainClient};
    use routescout_core::VenueFamily;

    fn cp_venue(router: u8, factory: u8) -> VenueConfig {
        VenueConfig {
            name: "TestSwap".to_string(),
            family: VenueFamily::ConstantProduct,
            router: addr_of(router),
            factory: addr_of(factory),
            fee_bps: 30,
        }
    }

    fn stable_venue(router: u8, factory: u8) -> VenueConfig {
        VenueConfig {
            name: "TestDrome".to_string(),
            family: VenueFamily::StableConstantProduct,
            router: addr_of(router),
            factory: addr_of(factory),
            fee_bps: 30,
        }
    }

    fn token(byte: u8, symbol: &str, decimals: u8) -> TokenMeta {
        TokenMeta::new(addr_of(byte), symbol, decimals)
    }

    #[tokio::test(start_paused = true)]
    async fn test_constant_product_quote_with_real_impact() {
        let venue = cp_venue(0x10, 0x11);
        let weth = token(0x01, "WETH", 18);
        let usdc = token(0x02, "USDC", 6);

        let mut client = FakeChainClient::new();
        // 1000 WETH / 2.5M USDC pool
        client.add_pool(
            venue.router,
            venue.factory,
            weth.address,
            U256::from(1_000u64) * U256::exp10(18),
            usdc.address,
            U256::from(2_500_000u64) * U256::exp10(6),
            30,
            false,
        );

        let (gate, policy, prices) = make_ctx_parts(&[(weth.address, 2500.0)]);
        let ctx = QuoteCtx {
            client: &client,
            gate: &gate,
            policy: &policy,
            chain: ChainId::Ethereum,
            prices: &prices,
        };

        let amount_in = U256::exp10(18); // 1 WETH
        let hop = quote_single_hop(&ctx, &venue, &weth, &usdc, amount_in)
            .await
            .unwrap();

        assert_eq!(hop.venue_label, "TestSwap");
        // ~2489 USDC out of a 2500-spot pool after fee and slippage
        assert!(hop.amount_out > U256::from(2_480u64) * U256::exp10(6));
        assert!(hop.amount_out < U256::from(2_500u64) * U256::exp10(6));
        // 1/1000 of the pool plus the 0.3% fee lands well under 1% impact
        assert!(hop.price_impact_pct > 0.0 && hop.price_impact_pct < 1.0);
        // 2 * 1000 WETH * $2500
        assert!((hop.liquidity_usd - 5_000_000.0).abs() < 50_000.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_pool_is_none_not_error() {
        let venue = cp_venue(0x10, 0x11);
        let client = FakeChainClient::new();
        let (gate, policy, prices) = make_ctx_parts(&[]);
        let ctx = QuoteCtx {
            client: &client,
            gate: &gate,
            policy: &policy,
            chain: ChainId::Ethereum,
            prices: &prices,
        };

        let hop = quote_single_hop(
            &ctx,
            &venue,
            &token(0x01, "WETH", 18),
            &token(0x02, "USDC", 6),
            U256::exp10(18),
        )
        .await;
        assert!(hop.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failures_are_retried() {
        let venue = cp_venue(0x10, 0x11);
        let weth = token(0x01, "WETH", 18);
        let usdc = token(0x02, "USDC", 6);

        let mut client = FakeChainClient::new();
        client.add_pool(
            venue.router,
            venue.factory,
            weth.address,
            U256::from(1_000u64) * U256::exp10(18),
            usdc.address,
            U256::from(2_500_000u64) * U256::exp10(6),
            30,
            false,
        );
        // First two attempts fail; the retry budget covers them
        client.fail_next(2);

        let (gate, policy, prices) = make_ctx_parts(&[]);
        let ctx = QuoteCtx {
            client: &client,
            gate: &gate,
            policy: &policy,
            chain: ChainId::Ethereum,
            prices: &prices,
        };

        let hop = quote_single_hop(&ctx, &venue, &weth, &usdc, U256::exp10(18)).await;
        assert!(hop.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_yield_none() {
        let venue = cp_venue(0x10, 0x11);
        let weth = token(0x01, "WETH", 18);
        let usdc = token(0x02, "USDC", 6);

        let mut client = FakeChainClient::new();
        client.add_pool(
            venue.router,
            venue.factory,
            weth.address,
            U256::exp10(20),
            usdc.address,
            U256::exp10(12),
            30,
            false,
        );
        client.fail_next(100);

        let (gate, policy, prices) = make_ctx_parts(&[]);
        let ctx = QuoteCtx {
            client: &client,
            gate: &gate,
            policy: &policy,
            chain: ChainId::Ethereum,
            prices: &prices,
        };

        let hop = quote_single_hop(&ctx, &venue, &weth, &usdc, U256::exp10(18)).await;
        assert!(hop.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stable_venue_picks_better_subtype() {
        let venue = stable_venue(0x20, 0x21);
        let usdc = token(0x02, "USDC", 6);
        let usdt = token(0x03, "USDT", 6);

        let mut client = FakeChainClient::new();
        // The stable pool is much deeper, so it pays better for this pair
        client.add_pool(
            venue.router,
            venue.factory,
            usdc.address,
            U256::from(10_000_000u64) * U256::exp10(6),
            usdt.address,
            U256::from(10_000_000u64) * U256::exp10(6),
            30,
            true,
        );
        client.add_pool(
            venue.router,
            venue.factory,
            usdc.address,
            U256::from(10_000u64) * U256::exp10(6),
            usdt.address,
            U256::from(10_000u64) * U256::exp10(6),
            30,
            false,
        );

        let (gate, policy, prices) = make_ctx_parts(&[]);
        let ctx = QuoteCtx {
            client: &client,
            gate: &gate,
            policy: &policy,
            chain: ChainId::Base,
            prices: &prices,
        };

        let hop = quote_single_hop(&ctx, &venue, &usdc, &usdt, U256::from(1_000u64) * U256::exp10(6))
            .await
            .unwrap();
        assert_eq!(hop.venue_label, "TestDrome (stable)");
        assert_eq!(hop.price_impact_pct, policy.stable_hop_impact_pct);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stable_venue_falls_back_to_volatile() {
        let venue = stable_venue(0x20, 0x21);
        let weth = token(0x01, "WETH", 18);
        let usdc = token(0x02, "USDC", 6);

        let mut client = FakeChainClient::new();
        // Only a volatile pool exists for this pair
        client.add_pool(
            venue.router,
            venue.factory,
            weth.address,
            U256::from(500u64) * U256::exp10(18),
            usdc.address,
            U256::from(1_250_000u64) * U256::exp10(6),
            30,
            false,
        );

        let (gate, policy, prices) = make_ctx_parts(&[]);
        let ctx = QuoteCtx {
            client: &client,
            gate: &gate,
            policy: &policy,
            chain: ChainId::Base,
            prices: &prices,
        };

        let hop = quote_single_hop(&ctx, &venue, &weth, &usdc, U256::exp10(18))
            .await
            .unwrap();
        assert_eq!(hop.venue_label, "TestDrome (volatile)");
    }
}
