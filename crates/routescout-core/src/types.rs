//! Core type definitions for routescout

use std::fmt;

use ethereum_types::Address;
use serde::{Deserialize, Serialize};

/// Chain the engine can quote on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainId {
    Ethereum,
    Base,
}

impl ChainId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ethereum => "ethereum",
            Self::Base => "base",
        }
    }

    /// Numeric EVM chain ID
    pub fn id(&self) -> u64 {
        match self {
            Self::Ethereum => 1,
            Self::Base => 8453,
        }
    }

    /// Symbol of the chain's native gas asset
    pub fn native_symbol(&self) -> &'static str {
        match self {
            Self::Ethereum | Self::Base => "ETH",
        }
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Token metadata resolved from the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMeta {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
}

impl TokenMeta {
    pub fn new(address: Address, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            address,
            symbol: symbol.into(),
            decimals,
        }
    }
}

/// Sandwich-attack exposure tier for a quoted trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MevRisk {
    Low,
    Medium,
    High,
}

impl MevRisk {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

impl fmt::Display for MevRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Shape of a winning route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteKind {
    Direct,
    MultiHop,
}

impl RouteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::MultiHop => "multi-hop",
        }
    }
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse a hex address string, with or without the `0x` prefix.
pub fn parse_address(s: &str) -> Option<Address> {
    let hex_str = s.strip_prefix("0x").unwrap_or(s);
    if hex_str.len() != 40 {
        return None;
    }
    let bytes = hex::decode(hex_str).ok()?;
    Some(Address::from_slice(&bytes))
}

/// Constants
pub mod constants {
    /// Basis-point denominator (1 bps = 0.01%)
    pub const BPS_DENOM: u64 = 10_000;

    /// Default slippage tolerance when the caller does not supply one (0.5%)
    pub const DEFAULT_SLIPPAGE_BPS: u64 = 50;

    /// Wei per gwei
    pub const WEI_PER_GWEI: u64 = 1_000_000_000;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_display() {
        assert_eq!(ChainId::Ethereum.as_str(), "ethereum");
        assert_eq!(ChainId::Base.id(), 8453);
        assert_eq!(ChainId::Base.native_symbol(), "ETH");
    }

    #[test]
    fn test_mev_risk_ordering() {
        assert!(MevRisk::Low < MevRisk::Medium);
        assert!(MevRisk::Medium < MevRisk::High);
    }

    #[test]
    fn test_route_kind_serialization() {
        let json = serde_json::to_string(&RouteKind::MultiHop).unwrap();
        assert_eq!(json, "\"multi-hop\"");
    }

    #[test]
    fn test_parse_address() {
        let addr = parse_address("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2").unwrap();
        assert_eq!(addr.as_bytes()[0], 0xc0);
        assert!(parse_address("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2").is_some());
        assert!(parse_address("0x1234").is_none());
        assert!(parse_address("not hex").is_none());
    }
}
