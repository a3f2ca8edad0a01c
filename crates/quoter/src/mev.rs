//! Sandwich-attack exposure heuristic
//!
//! A trade is attractive to sandwich when it is large relative to the
//! pool or moves the price enough that front/back-running it covers gas.
//! The classification here is advisory and display-oriented; it never
//! changes routing or amounts.

use routescout_core::MevRisk;

/// Trade-to-liquidity ratio above which exposure is HIGH, percent
const HIGH_RATIO_PCT: f64 = 5.0;
/// Price impact above which exposure is HIGH, percent
const HIGH_IMPACT_PCT: f64 = 5.0;
/// Trade-to-liquidity ratio above which exposure is MEDIUM, percent
const MEDIUM_RATIO_PCT: f64 = 1.0;
/// Price impact above which exposure is MEDIUM, percent
const MEDIUM_IMPACT_PCT: f64 = 2.0;

/// Fraction of the victim's impact loss an attacker typically captures
const ATTACKER_CAPTURE: f64 = 0.5;

/// MEV assessment attached to a quote
#[derive(Debug, Clone)]
pub struct MevAssessment {
    pub risk: MevRisk,
    /// Rough attacker profit for a textbook sandwich, USD. `None` when
    /// exposure is LOW.
    pub estimated_profit_usd: Option<f64>,
    /// Human-readable warning, present for MEDIUM and HIGH only
    pub warning: Option<String>,
}

/// Classify sandwich exposure from trade size, price impact, and pool depth.
///
/// Unknown liquidity (zero or negative) zeroes the size ratio rather than
/// inflating it; classification then rests on price impact alone.
pub fn assess(trade_usd: f64, price_impact_pct: f64, liquidity_usd: f64) -> MevAssessment {
    let ratio_pct = if liquidity_usd > 0.0 {
        trade_usd / liquidity_usd * 100.0
    } else {
        0.0
    };

    let risk = if ratio_pct > HIGH_RATIO_PCT || price_impact_pct > HIGH_IMPACT_PCT {
        MevRisk::High
    } else if ratio_pct > MEDIUM_RATIO_PCT || price_impact_pct > MEDIUM_IMPACT_PCT {
        MevRisk::Medium
    } else {
        MevRisk::Low
    };

    if risk == MevRisk::Low {
        return MevAssessment {
            risk,
            estimated_profit_usd: None,
            warning: None,
        };
    }

    let profit = (trade_usd * price_impact_pct / 100.0 * ATTACKER_CAPTURE).max(0.0);
    let warning = match risk {
        MevRisk::High => format!(
            "High sandwich exposure: trade is {:.1}% of pool liquidity with {:.2}% price impact. \
             Consider splitting the trade or using a private relay.",
            ratio_pct, price_impact_pct
        ),
        _ => format!(
            "Moderate sandwich exposure ({:.2}% price impact). A tighter slippage \
             tolerance reduces the attacker's margin.",
            price_impact_pct
        ),
    };

    MevAssessment {
        risk,
        estimated_profit_usd: Some(profit),
        warning: Some(warning),
    }
}
