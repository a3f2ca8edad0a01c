//! quoter: multi-venue swap quote aggregation
//!
//! The engine fans a requested trade out across every configured AMM
//! venue, composes two-hop routes through intermediate assets, ranks all
//! candidates by raw integer output, and assembles the winning route
//! into an executable quote with slippage bounds, a deadline, gas
//! figures, and a sandwich-exposure assessment.
//!
//! All dependencies come in through constructors: the chain client is a
//! trait object, the token registry a trait object, the configuration a
//! shared value. Nothing here reaches for process globals.

mod adapters;
pub mod builder;
pub mod fetcher;
pub mod math;
pub mod mev;
pub mod price_cache;
pub mod registry;

#[cfg(test)]
pub(crate) mod testutil;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use ethereum_types::{Address, U256};
use evm_client::{CallGate, ChainClient};
use routescout_core::constants::WEI_PER_GWEI;
use routescout_core::{AppConfig, ChainConfig, ChainId, QuoteError, Result, TokenMeta};

use adapters::QuoteCtx;
pub use builder::{Route, SwapQuote};
pub use fetcher::DexQuote;
use price_cache::PriceCache;
use registry::{symbol_or_short, ConfigTokenRegistry, TokenRegistry};

/// A quote request in base units
#[derive(Debug, Clone)]
pub struct QuoteRequest {
    pub chain: ChainId,
    pub token_in: Address,
    pub token_out: Address,
    pub amount_in: U256,
    /// Requested slippage tolerance; the engine may widen it when the
    /// observed price impact demands more
    pub slippage_bps: Option<u64>,
}

/// The quoting engine. One instance serves the whole process; every
/// request gets its own call gate.
pub struct QuoteEngine {
    client: Arc<dyn ChainClient>,
    tokens: Arc<dyn TokenRegistry>,
    config: Arc<AppConfig>,
    prices: PriceCache,
}

impl QuoteEngine {
    pub fn new(client: Arc<dyn ChainClient>, config: Arc<AppConfig>) -> Self {
        let tokens = Arc::new(ConfigTokenRegistry::new(config.clone()));
        Self::with_registry(client, config, tokens)
    }

    pub fn with_registry(
        client: Arc<dyn ChainClient>,
        config: Arc<AppConfig>,
        tokens: Arc<dyn TokenRegistry>,
    ) -> Self {
        Self {
            client,
            tokens,
            config,
            prices: PriceCache::default(),
        }
    }

    /// Quote the best route for a trade across all configured venues.
    ///
    /// `NoLiquidity` and `TokenNotFound` are expected negatives here,
    /// not failures of the engine.
    pub async fn get_quote(&self, request: &QuoteRequest) -> Result<SwapQuote> {
        let (chain_cfg, token_in, token_out) = self.validate(request)?;

        let prices = self.usd_prices(request.chain, chain_cfg).await;
        let gate = self.make_gate();
        let ctx = QuoteCtx {
            client: self.client.as_ref(),
            gate: &gate,
            policy: &self.config.policy,
            chain: request.chain,
            prices: &prices,
        };

        let intermediates = self.resolve_intermediates(request.chain);
        let candidates = fetcher::fetch_all_quotes(
            &ctx,
            self.config.venues_for_chain(request.chain),
            &intermediates,
            &token_in,
            &token_out,
            request.amount_in,
        )
        .await;
        if candidates.is_empty() {
            return Err(QuoteError::NoLiquidity);
        }

        let block_number = match self.client.get_block_number(request.chain).await {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(chain = %request.chain, error = %e, "block number unavailable");
                0
            }
        };
        let gas_price_wei = match self.client.get_gas_price(request.chain).await {
            Ok(price) => price,
            Err(e) => {
                tracing::warn!(chain = %request.chain, error = %e, "gas price unavailable, using fallback");
                U256::from((chain_cfg.fallback_gas_price_gwei * WEI_PER_GWEI as f64) as u128)
            }
        };

        let inputs = builder::BuildInputs {
            policy: &self.config.policy,
            chain: request.chain,
            token_in: &token_in,
            token_out: &token_out,
            amount_in: request.amount_in,
            requested_slippage_bps: request
                .slippage_bps
                .unwrap_or(self.config.policy.default_slippage_bps),
            gas_price_wei,
            native_usd: chain_cfg.native_usd,
            block_number,
            token_in_usd: prices.get(&token_in.address).copied(),
            token_out_usd: prices.get(&token_out.address).copied(),
        };
        let quote = builder::build_quote(&inputs, candidates)
            .ok_or_else(|| QuoteError::Internal("empty candidate set after ranking".to_string()))?;

        // A priced input side plus the observed execution price yields a
        // price for the output token; remember it for later display math
        if let (Some(in_usd), None) = (inputs.token_in_usd, inputs.token_out_usd) {
            if quote.effective_price > 0.0 {
                self.prices
                    .insert(token_out.address, in_usd / quote.effective_price)
                    .await;
            }
        }

        tracing::info!(
            chain = %request.chain,
            token_in = %token_in.symbol,
            token_out = %token_out.symbol,
            venue = %quote.route.venue_label,
            kind = %quote.route.kind,
            output = %quote.output_amount_formatted,
            candidates = quote.all_quotes.len(),
            "quote served"
        );
        Ok(quote)
    }

    /// Symbol-addressed variant of `get_quote`: resolves both tokens
    /// through the registry and parses a human decimal amount.
    pub async fn get_quote_by_symbols(
        &self,
        chain: ChainId,
        token_in_symbol: &str,
        token_out_symbol: &str,
        amount: &str,
        slippage_bps: Option<u64>,
    ) -> Result<SwapQuote> {
        let token_in = self
            .tokens
            .by_symbol(chain, token_in_symbol)
            .ok_or_else(|| QuoteError::TokenNotFound {
                token: token_in_symbol.to_string(),
            })?;
        let token_out = self
            .tokens
            .by_symbol(chain, token_out_symbol)
            .ok_or_else(|| QuoteError::TokenNotFound {
                token: token_out_symbol.to_string(),
            })?;
        let amount_in = math::parse_units(amount, token_in.decimals).ok_or_else(|| {
            QuoteError::InvalidAmount {
                message: format!("cannot parse '{}' as {} amount", amount, token_in.symbol),
            }
        })?;

        self.get_quote(&QuoteRequest {
            chain,
            token_in: token_in.address,
            token_out: token_out.address,
            amount_in,
            slippage_bps,
        })
        .await
    }

    /// Direct-pair comparison across every configured venue. Unlike
    /// `get_quote`, venues that cannot serve the pair still appear in
    /// the result, marked `has_liquidity: false`.
    pub async fn compare_all_venues(&self, request: &QuoteRequest) -> Result<Vec<DexQuote>> {
        let (chain_cfg, token_in, token_out) = self.validate(request)?;

        let prices = self.usd_prices(request.chain, chain_cfg).await;
        let gate = self.make_gate();
        let ctx = QuoteCtx {
            client: self.client.as_ref(),
            gate: &gate,
            policy: &self.config.policy,
            chain: request.chain,
            prices: &prices,
        };

        let venues = self.config.venues_for_chain(request.chain);
        let hops = futures::future::join_all(venues.iter().map(|venue| {
            adapters::quote_single_hop(&ctx, venue, &token_in, &token_out, request.amount_in)
        }))
        .await;

        let mut quotes: Vec<DexQuote> = venues
            .iter()
            .zip(hops)
            .map(|(venue, hop)| match hop {
                Some(hop) => {
                    DexQuote::from_direct(hop, &token_in, &token_out, request.amount_in)
                }
                None => DexQuote::no_liquidity(
                    venue.name.clone(),
                    venue.family,
                    &token_in,
                    &token_out,
                ),
            })
            .collect();

        quotes.sort_by(|a, b| b.output_amount.cmp(&a.output_amount));
        if let Some(best) = quotes.first_mut() {
            if best.has_liquidity {
                best.is_optimal = true;
            }
        }
        Ok(quotes)
    }

    /// Common request validation: positive amount, configured chain,
    /// distinct registered tokens.
    fn validate(&self, request: &QuoteRequest) -> Result<(&ChainConfig, TokenMeta, TokenMeta)> {
        if request.amount_in.is_zero() {
            return Err(QuoteError::InvalidAmount {
                message: "amount must be positive".to_string(),
            });
        }
        if request.token_in == request.token_out {
            return Err(QuoteError::InvalidAmount {
                message: "input and output tokens are identical".to_string(),
            });
        }
        let chain_cfg = self
            .config
            .chain(request.chain)
            .ok_or_else(|| QuoteError::ChainNotConfigured {
                chain: request.chain.to_string(),
            })?;
        let token_in = self
            .tokens
            .by_address(request.chain, request.token_in)
            .ok_or_else(|| QuoteError::TokenNotFound {
                token: format!("{:#x}", request.token_in),
            })?;
        let token_out = self
            .tokens
            .by_address(request.chain, request.token_out)
            .ok_or_else(|| QuoteError::TokenNotFound {
                token: format!("{:#x}", request.token_out),
            })?;
        Ok((chain_cfg, token_in, token_out))
    }

    fn make_gate(&self) -> CallGate {
        CallGate::new(
            self.config.policy.max_concurrent_calls,
            Duration::from_millis(self.config.policy.min_call_spacing_ms),
        )
    }

    /// Display-only USD price table for a chain: cached figures first,
    /// then the static seeds (stables at par, wrapped native at the
    /// configured native price).
    async fn usd_prices(&self, chain: ChainId, chain_cfg: &ChainConfig) -> HashMap<Address, f64> {
        let mut prices = HashMap::new();
        for entry in &chain_cfg.tokens {
            if let Some(price) = self.prices.get(entry.address).await {
                prices.insert(entry.address, price);
            } else if let Some(price) = seed_price(&entry.symbol, chain, chain_cfg.native_usd) {
                prices.insert(entry.address, price);
            }
        }
        prices
    }

    /// Intermediate assets resolved to metadata. Unregistered
    /// intermediates are routed through anyway with a placeholder symbol.
    fn resolve_intermediates(&self, chain: ChainId) -> Vec<TokenMeta> {
        self.config
            .intermediate_assets_for_chain(chain)
            .iter()
            .map(|&address| {
                self.tokens.by_address(chain, address).unwrap_or_else(|| {
                    TokenMeta::new(address, symbol_or_short(self.tokens.as_ref(), chain, address), 18)
                })
            })
            .collect()
    }
}

/// Static USD seed prices. Stables sit at par; the chain's wrapped
/// native asset takes the configured native price. Everything else is
/// unknown unless the cache has learned it.
fn seed_price(symbol: &str, chain: ChainId, native_usd: f64) -> Option<f64> {
    if symbol.strip_prefix('W') == Some(chain.native_symbol()) {
        return Some(native_usd);
    }
    match symbol {
        "USDC" | "USDT" | "DAI" => Some(1.0),
        _ => None,
    }
}
