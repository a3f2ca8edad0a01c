//! Configuration types for routescout
//!
//! The venue registry and token metadata tables are configuration data,
//! loaded once at startup and read-only for the process lifetime.

use std::collections::HashMap;

use ethereum_types::Address;
use serde::{Deserialize, Serialize};

use crate::types::{parse_address, ChainId};

/// AMM venue family. Each variant has its own quote adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VenueFamily {
    /// Uniswap-V2-style x*y=k pools behind a router with `getAmountsOut`
    ConstantProduct,
    /// Solidly-style venues offering stable and volatile pool sub-types
    /// for the same pair
    StableConstantProduct,
}

/// One configured AMM venue on a chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueConfig {
    pub name: String,
    pub family: VenueFamily,
    pub router: Address,
    pub factory: Address,
    /// Swap fee in basis points (30 = 0.30%)
    pub fee_bps: u64,
}

/// Token metadata entry backing the symbol registry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenEntry {
    pub symbol: String,
    pub address: Address,
    pub decimals: u8,
}

/// Per-chain configuration: RPC endpoint, venue table, routing intermediates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    /// JSON-RPC endpoint URL
    pub rpc_url: String,

    /// Configured venues, in ranking tie-break order
    pub venues: Vec<VenueConfig>,

    /// Intermediate assets used for two-hop route composition
    pub intermediates: Vec<Address>,

    /// Known tokens (symbol registry)
    pub tokens: Vec<TokenEntry>,

    /// Seed price for the chain's native asset, USD (display figures only)
    #[serde(default = "default_native_usd")]
    pub native_usd: f64,

    /// Gas price used when the endpoint cannot report one, in gwei
    #[serde(default = "default_fallback_gas_gwei")]
    pub fallback_gas_price_gwei: f64,
}

fn default_native_usd() -> f64 {
    2500.0
}

fn default_fallback_gas_gwei() -> f64 {
    10.0
}

/// Engine policy knobs. All timing values were chosen against public RPC
/// provider rate limits; see the fetcher for how they are applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotePolicy {
    /// Default slippage tolerance in bps when the caller supplies none
    #[serde(default = "default_slippage_bps")]
    pub default_slippage_bps: u64,

    /// Execution deadline window in seconds (on-chain router cutoff)
    #[serde(default = "default_deadline_secs")]
    pub deadline_secs: u64,

    /// Quote staleness window in milliseconds (strictly shorter than the deadline)
    #[serde(default = "default_quote_ttl_ms")]
    pub quote_ttl_ms: u64,

    /// Per-chain-call timeout in seconds
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: u64,

    /// Retries per venue call before treating it as no-liquidity
    #[serde(default = "default_venue_retries")]
    pub venue_retries: u32,

    /// First retry backoff in milliseconds (doubles per attempt)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Delay before retrying an entirely empty direct fan-out, milliseconds
    #[serde(default = "default_fanout_retry_delay_ms")]
    pub fanout_retry_delay_ms: u64,

    /// Maximum concurrent chain calls per request
    #[serde(default = "default_max_concurrent_calls")]
    pub max_concurrent_calls: usize,

    /// Minimum spacing between chain-call admissions, milliseconds
    #[serde(default = "default_min_call_spacing_ms")]
    pub min_call_spacing_ms: u64,

    /// Placeholder per-hop price impact for venues without reserve math, percent
    #[serde(default = "default_stable_hop_impact_pct")]
    pub stable_hop_impact_pct: f64,
}

fn default_slippage_bps() -> u64 {
    crate::types::constants::DEFAULT_SLIPPAGE_BPS
}
fn default_deadline_secs() -> u64 {
    20 * 60
}
fn default_quote_ttl_ms() -> u64 {
    30_000
}
fn default_call_timeout_secs() -> u64 {
    5
}
fn default_venue_retries() -> u32 {
    2
}
fn default_retry_backoff_ms() -> u64 {
    300
}
fn default_fanout_retry_delay_ms() -> u64 {
    1_000
}
fn default_max_concurrent_calls() -> usize {
    4
}
fn default_min_call_spacing_ms() -> u64 {
    100
}
fn default_stable_hop_impact_pct() -> f64 {
    0.30
}

impl Default for QuotePolicy {
    fn default() -> Self {
        Self {
            default_slippage_bps: default_slippage_bps(),
            deadline_secs: default_deadline_secs(),
            quote_ttl_ms: default_quote_ttl_ms(),
            call_timeout_secs: default_call_timeout_secs(),
            venue_retries: default_venue_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
            fanout_retry_delay_ms: default_fanout_retry_delay_ms(),
            max_concurrent_calls: default_max_concurrent_calls(),
            min_call_spacing_ms: default_min_call_spacing_ms(),
            stable_hop_impact_pct: default_stable_hop_impact_pct(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Per-chain venue and token tables
    pub chains: HashMap<ChainId, ChainConfig>,

    /// Engine policy
    #[serde(default)]
    pub policy: QuotePolicy,

    /// API bind host
    #[serde(default = "default_api_host")]
    pub api_host: String,

    /// API server port
    #[serde(default = "default_api_port")]
    pub api_port: u16,
}

fn default_api_host() -> String {
    "127.0.0.1".to_string()
}

fn default_api_port() -> u16 {
    18550
}

impl AppConfig {
    pub fn chain(&self, chain: ChainId) -> Option<&ChainConfig> {
        self.chains.get(&chain)
    }

    /// Venue registry lookup: all configured venues on a chain,
    /// in declaration order (used as the stable ranking tie-break).
    pub fn venues_for_chain(&self, chain: ChainId) -> &[VenueConfig] {
        self.chains
            .get(&chain)
            .map(|c| c.venues.as_slice())
            .unwrap_or(&[])
    }

    /// Intermediate-asset set for two-hop route composition on a chain
    pub fn intermediate_assets_for_chain(&self, chain: ChainId) -> &[Address] {
        self.chains
            .get(&chain)
            .map(|c| c.intermediates.as_slice())
            .unwrap_or(&[])
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let mut chains = HashMap::new();
        chains.insert(ChainId::Ethereum, ethereum_mainnet());
        chains.insert(ChainId::Base, base_mainnet());
        Self {
            chains,
            policy: QuotePolicy::default(),
            api_host: default_api_host(),
            api_port: default_api_port(),
        }
    }
}

fn addr(s: &str) -> Address {
    parse_address(s).expect("valid preset address")
}

/// Built-in Ethereum mainnet preset
fn ethereum_mainnet() -> ChainConfig {
    let weth = addr("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");
    let usdc = addr("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");
    let usdt = addr("0xdAC17F958D2ee523a2206206994597C13D831ec7");
    let dai = addr("0x6B175474E89094C44Da98b954EedeAC495271d0F");

    ChainConfig {
        rpc_url: "https://eth.llamarpc.com".to_string(),
        venues: vec![
            VenueConfig {
                name: "Uniswap V2".to_string(),
                family: VenueFamily::ConstantProduct,
                router: addr("0x7a250d5630B4cF539739dF2C5dAcb4c659F2488D"),
                factory: addr("0x5C69bEe701ef814a2B6a3EDD4B1652CB9cc5aA6f"),
                fee_bps: 30,
            },
            VenueConfig {
                name: "SushiSwap".to_string(),
                family: VenueFamily::ConstantProduct,
                router: addr("0xd9e1cE17f2641f24aE83637ab66a2cca9C378B9F"),
                factory: addr("0xC0AEe478e3658e2610c5F7A4A2E1777cE9e4f2Ac"),
                fee_bps: 30,
            },
        ],
        intermediates: vec![weth, usdc, usdt, dai],
        tokens: vec![
            TokenEntry {
                symbol: "WETH".to_string(),
                address: weth,
                decimals: 18,
            },
            TokenEntry {
                symbol: "USDC".to_string(),
                address: usdc,
                decimals: 6,
            },
            TokenEntry {
                symbol: "USDT".to_string(),
                address: usdt,
                decimals: 6,
            },
            TokenEntry {
                symbol: "DAI".to_string(),
                address: dai,
                decimals: 18,
            },
        ],
        native_usd: default_native_usd(),
        fallback_gas_price_gwei: default_fallback_gas_gwei(),
    }
}

/// Built-in Base mainnet preset
fn base_mainnet() -> ChainConfig {
    let weth = addr("0x4200000000000000000000000000000000000006");
    let usdc = addr("0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913");

    ChainConfig {
        rpc_url: "https://mainnet.base.org".to_string(),
        venues: vec![
            VenueConfig {
                name: "Aerodrome".to_string(),
                family: VenueFamily::StableConstantProduct,
                router: addr("0xcF77a3Ba9A5CA399B7c97c74d54e5b1Beb874E43"),
                factory: addr("0x420DD381b31aEf6683db6B902084cB0FFECe40Da"),
                fee_bps: 30,
            },
            VenueConfig {
                name: "BaseSwap".to_string(),
                family: VenueFamily::ConstantProduct,
                router: addr("0x327Df1E6de05895d2ab08513aaDD9313Fe505d86"),
                factory: addr("0xFDa619b6d20975be80A10332cD39b9a4b0FAa8BB"),
                fee_bps: 25,
            },
        ],
        intermediates: vec![weth, usdc],
        tokens: vec![
            TokenEntry {
                symbol: "WETH".to_string(),
                address: weth,
                decimals: 18,
            },
            TokenEntry {
                symbol: "USDC".to_string(),
                address: usdc,
                decimals: 6,
            },
        ],
        native_usd: default_native_usd(),
        fallback_gas_price_gwei: 0.05,
    }
}
