//! Token registry
//!
//! Resolves tokens by symbol or address against the per-chain tables in
//! the configuration. The trait seam exists so tests can inject a fixed
//! table without building a full `AppConfig`.

use std::sync::Arc;

use ethereum_types::Address;
use routescout_core::{AppConfig, ChainId, TokenMeta};

pub trait TokenRegistry: Send + Sync {
    /// Resolve a token by symbol, case-insensitively
    fn by_symbol(&self, chain: ChainId, symbol: &str) -> Option<TokenMeta>;

    /// Resolve a token by address
    fn by_address(&self, chain: ChainId, address: Address) -> Option<TokenMeta>;
}

/// Registry over the static token tables in the configuration
pub struct ConfigTokenRegistry {
    config: Arc<AppConfig>,
}

impl ConfigTokenRegistry {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self { config }
    }
}

impl TokenRegistry for ConfigTokenRegistry {
    fn by_symbol(&self, chain: ChainId, symbol: &str) -> Option<TokenMeta> {
        self.config.chain(chain)?.tokens.iter().find_map(|entry| {
            entry
                .symbol
                .eq_ignore_ascii_case(symbol)
                .then(|| TokenMeta::new(entry.address, entry.symbol.clone(), entry.decimals))
        })
    }

    fn by_address(&self, chain: ChainId, address: Address) -> Option<TokenMeta> {
        self.config.chain(chain)?.tokens.iter().find_map(|entry| {
            (entry.address == address)
                .then(|| TokenMeta::new(entry.address, entry.symbol.clone(), entry.decimals))
        })
    }
}

/// Short display form of a token for labels when the registry has no
/// entry for it: `0x1234..abcd`.
pub fn short_address(address: Address) -> String {
    let hex = format!("{:x}", address);
    format!("0x{}..{}", &hex[..4], &hex[hex.len() - 4..])
}

/// Symbol for display, falling back to the shortened address
pub fn symbol_or_short(registry: &dyn TokenRegistry, chain: ChainId, address: Address) -> String {
    registry
        .by_address(chain, address)
        .map(|t| t.symbol)
        .unwrap_or_else(|| short_address(address))
}

#[cfg(test)]
mod tests {
    use super::*;
    use routescout_core::parse_address;

    fn make_registry() -> ConfigTokenRegistry {
        ConfigTokenRegistry::new(Arc::new(AppConfig::default()))
    }

    #[test]
    fn test_resolve_by_symbol_case_insensitive() {
        let registry = make_registry();
        let weth = registry.by_symbol(ChainId::Ethereum, "weth").unwrap();
        assert_eq!(weth.symbol, "WETH");
        assert_eq!(weth.decimals, 18);
        assert!(registry.by_symbol(ChainId::Ethereum, "NOPE").is_none());
    }

    #[test]
    fn test_resolve_by_address() {
        let registry = make_registry();
        let usdc = parse_address("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48").unwrap();
        let meta = registry.by_address(ChainId::Ethereum, usdc).unwrap();
        assert_eq!(meta.symbol, "USDC");
        assert_eq!(meta.decimals, 6);
    }

    #[test]
    fn test_chains_are_isolated() {
        let registry = make_registry();
        let mainnet_usdc = parse_address("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48").unwrap();
        assert!(registry.by_address(ChainId::Base, mainnet_usdc).is_none());
    }

    #[test]
    fn test_short_address() {
        let addr = parse_address("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2").unwrap();
        assert_eq!(short_address(addr), "0xc02a..6cc2");
    }

    #[test]
    fn test_symbol_or_short_fallback() {
        let registry = make_registry();
        let unknown = Address::from([0xab; 20]);
        let label = symbol_or_short(&registry, ChainId::Ethereum, unknown);
        assert!(label.starts_with("0xabab.."));
    }
}
