//! Test fixtures: an in-memory chain client that simulates
//! constant-product pools behind the router/factory/pair call surface.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use ethabi::Token;
use ethereum_types::{Address, U256};
use evm_client::{abi, CallGate, ChainClient};
use routescout_core::{
    AppConfig, ChainConfig, ChainId, QuotePolicy, RpcError, TokenEntry, VenueConfig, VenueFamily,
};

use crate::math;

pub fn addr_of(byte: u8) -> Address {
    Address::from([byte; 20])
}

/// Gate, policy, and price map for driving adapters directly
pub fn make_ctx_parts(
    prices: &[(Address, f64)],
) -> (CallGate, QuotePolicy, HashMap<Address, f64>) {
    let policy = QuotePolicy::default();
    let gate = CallGate::new(
        policy.max_concurrent_calls,
        Duration::from_millis(policy.min_call_spacing_ms),
    );
    (gate, policy, prices.iter().copied().collect())
}

/// Single-chain configuration over `addr_of` addresses: two
/// constant-product venues and a WETH/USDC/USDT/DAI token table.
pub fn test_app_config() -> AppConfig {
    let venues = vec![
        VenueConfig {
            name: "AlphaSwap".to_string(),
            family: VenueFamily::ConstantProduct,
            router: addr_of(0x10),
            factory: addr_of(0x11),
            fee_bps: 30,
        },
        VenueConfig {
            name: "BetaSwap".to_string(),
            family: VenueFamily::ConstantProduct,
            router: addr_of(0x12),
            factory: addr_of(0x13),
            fee_bps: 30,
        },
    ];
    let tokens = vec![
        TokenEntry {
            symbol: "WETH".to_string(),
            address: addr_of(0x01),
            decimals: 18,
        },
        TokenEntry {
            symbol: "USDC".to_string(),
            address: addr_of(0x02),
            decimals: 6,
        },
        TokenEntry {
            symbol: "USDT".to_string(),
            address: addr_of(0x03),
            decimals: 6,
        },
        TokenEntry {
            symbol: "DAI".to_string(),
            address: addr_of(0x04),
            decimals: 18,
        },
    ];
    let chain = ChainConfig {
        rpc_url: "http://unused.test".to_string(),
        venues,
        intermediates: vec![addr_of(0x01), addr_of(0x02)],
        tokens,
        native_usd: 2500.0,
        fallback_gas_price_gwei: 10.0,
    };

    let mut chains = HashMap::new();
    chains.insert(ChainId::Ethereum, chain);
    AppConfig {
        chains,
        policy: QuotePolicy::default(),
        api_host: "127.0.0.1".to_string(),
        api_port: 0,
    }
}

struct FakePool {
    router: Address,
    factory: Address,
    pair: Address,
    token0: Address,
    token1: Address,
    reserve0: U256,
    reserve1: U256,
    fee_bps: u64,
    stable: bool,
}

impl FakePool {
    fn matches(&self, a: Address, b: Address) -> bool {
        (self.token0 == a && self.token1 == b) || (self.token0 == b && self.token1 == a)
    }

    /// Swap output with reserves oriented for the given input token
    fn amount_out(&self, token_in: Address, amount_in: U256) -> U256 {
        let (reserve_in, reserve_out) = if token_in == self.token0 {
            (self.reserve0, self.reserve1)
        } else {
            (self.reserve1, self.reserve0)
        };
        math::constant_product_out(reserve_in, reserve_out, amount_in, self.fee_bps)
    }
}

/// In-memory `ChainClient` over simulated constant-product pools
pub struct FakeChainClient {
    pools: Vec<FakePool>,
    pub block_number: u64,
    pub gas_price: U256,
    fail_remaining: AtomicU32,
}

impl FakeChainClient {
    pub fn new() -> Self {
        Self {
            pools: Vec::new(),
            block_number: 19_000_000,
            gas_price: U256::from(10u64) * U256::from(1_000_000_000u64), // 10 gwei
            fail_remaining: AtomicU32::new(0),
        }
    }

    /// Register a pool. Token order is normalized to the V2 convention
    /// (token0 is the lower address).
    #[allow(clippy::too_many_arguments)]
    pub fn add_pool(
        &mut self,
        router: Address,
        factory: Address,
        token_a: Address,
        reserve_a: U256,
        token_b: Address,
        reserve_b: U256,
        fee_bps: u64,
        stable: bool,
    ) {
        let (token0, reserve0, token1, reserve1) = if token_a < token_b {
            (token_a, reserve_a, token_b, reserve_b)
        } else {
            (token_b, reserve_b, token_a, reserve_a)
        };
        let pair = Address::from({
            let mut bytes = [0xCCu8; 20];
            bytes[19] = self.pools.len() as u8;
            bytes
        });
        self.pools.push(FakePool {
            router,
            factory,
            pair,
            token0,
            token1,
            reserve0,
            reserve1,
            fee_bps,
            stable,
        });
    }

    /// Make the next `n` calls fail with an API error
    pub fn fail_next(&self, n: u32) {
        self.fail_remaining.store(n, Ordering::SeqCst);
    }

    fn find_pool(&self, router: Address, a: Address, b: Address, stable: bool) -> Option<&FakePool> {
        self.pools
            .iter()
            .find(|p| p.router == router && p.stable == stable && p.matches(a, b))
    }

    fn amounts_out(
        &self,
        router: Address,
        amount_in: U256,
        hops: &[(Address, Address, bool)],
    ) -> Result<Vec<u8>, RpcError> {
        let mut amounts = vec![Token::Uint(amount_in)];
        let mut current = amount_in;
        for &(from, to, stable) in hops {
            let pool = self.find_pool(router, from, to, stable).ok_or_else(|| {
                RpcError::Reverted {
                    message: "execution reverted".to_string(),
                }
            })?;
            current = pool.amount_out(from, current);
            amounts.push(Token::Uint(current));
        }
        Ok(ethabi::encode(&[Token::Array(amounts)]))
    }
}

#[async_trait]
impl ChainClient for FakeChainClient {
    async fn call(&self, _chain: ChainId, to: Address, data: Vec<u8>) -> Result<Vec<u8>, RpcError> {
        if self.fail_remaining.load(Ordering::SeqCst) > 0 {
            self.fail_remaining.fetch_sub(1, Ordering::SeqCst);
            return Err(RpcError::Api {
                message: "simulated provider failure".to_string(),
            });
        }

        let selector: [u8; 4] = data
            .get(..4)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| RpcError::Parse("calldata too short".to_string()))?;

        if selector == abi::get_amounts_out().short_signature() {
            let inputs = abi::get_amounts_out()
                .decode_input(&data[4..])
                .map_err(|e| RpcError::Parse(e.to_string()))?;
            let (Some(Token::Uint(amount_in)), Some(Token::Array(path))) =
                (inputs.first(), inputs.get(1))
            else {
                return Err(RpcError::Parse("bad getAmountsOut input".to_string()));
            };
            let addrs: Vec<Address> = path
                .iter()
                .filter_map(|t| match t {
                    Token::Address(a) => Some(*a),
                    _ => None,
                })
                .collect();
            let hops: Vec<(Address, Address, bool)> = addrs
                .windows(2)
                .map(|w| (w[0], w[1], false))
                .collect();
            return self.amounts_out(to, *amount_in, &hops);
        }

        if selector == abi::get_amounts_out_routes().short_signature() {
            let inputs = abi::get_amounts_out_routes()
                .decode_input(&data[4..])
                .map_err(|e| RpcError::Parse(e.to_string()))?;
            let (Some(Token::Uint(amount_in)), Some(Token::Array(routes))) =
                (inputs.first(), inputs.get(1))
            else {
                return Err(RpcError::Parse("bad getAmountsOut(routes) input".to_string()));
            };
            let mut hops = Vec::new();
            for route in routes {
                let Token::Tuple(fields) = route else {
                    return Err(RpcError::Parse("bad route tuple".to_string()));
                };
                let (Some(Token::Address(from)), Some(Token::Address(to_token)), Some(Token::Bool(stable))) =
                    (fields.first(), fields.get(1), fields.get(2))
                else {
                    return Err(RpcError::Parse("bad route fields".to_string()));
                };
                hops.push((*from, *to_token, *stable));
            }
            return self.amounts_out(to, *amount_in, &hops);
        }

        if selector == abi::get_pair().short_signature() {
            let inputs = abi::get_pair()
                .decode_input(&data[4..])
                .map_err(|e| RpcError::Parse(e.to_string()))?;
            let (Some(Token::Address(a)), Some(Token::Address(b))) = (inputs.first(), inputs.get(1))
            else {
                return Err(RpcError::Parse("bad getPair input".to_string()));
            };
            let pair = self
                .pools
                .iter()
                .find(|p| p.factory == to && !p.stable && p.matches(*a, *b))
                .map(|p| p.pair)
                .unwrap_or_else(Address::zero);
            return Ok(ethabi::encode(&[Token::Address(pair)]));
        }

        if selector == abi::get_reserves().short_signature() {
            let pool = self
                .pools
                .iter()
                .find(|p| p.pair == to)
                .ok_or_else(|| RpcError::Reverted {
                    message: "execution reverted".to_string(),
                })?;
            return Ok(ethabi::encode(&[
                Token::Uint(pool.reserve0),
                Token::Uint(pool.reserve1),
                Token::Uint(U256::zero()),
            ]));
        }

        Err(RpcError::Parse(format!(
            "unhandled selector 0x{}",
            hex::encode(selector)
        )))
    }

    async fn get_block_number(&self, _chain: ChainId) -> Result<u64, RpcError> {
        Ok(self.block_number)
    }

    async fn get_gas_price(&self, _chain: ChainId) -> Result<U256, RpcError> {
        Ok(self.gas_price)
    }
}
