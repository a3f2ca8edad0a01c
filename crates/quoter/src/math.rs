//! Integer AMM math
//!
//! All monetary amounts stay in `U256` base units through this module.
//! Division always rounds down, so every derived amount (output, minimum
//! output) is conservative for the trader. Floats appear only in the
//! display-oriented helpers at the bottom and never feed back into
//! amounts or rankings.

use ethereum_types::U256;
use routescout_core::constants::BPS_DENOM;

/// Constant-product swap output for one hop: x*y=k with the venue fee
/// deducted from the input side.
///
/// Returns zero when the pool cannot produce output (empty reserves,
/// zero input, or overflow in the intermediate products).
pub fn constant_product_out(reserve_in: U256, reserve_out: U256, amount_in: U256, fee_bps: u64) -> U256 {
    if reserve_in.is_zero() || reserve_out.is_zero() || amount_in.is_zero() {
        return U256::zero();
    }
    if fee_bps >= BPS_DENOM {
        return U256::zero();
    }

    let fee_factor = U256::from(BPS_DENOM - fee_bps);
    let amount_with_fee = match amount_in.checked_mul(fee_factor) {
        Some(v) => v,
        None => return U256::zero(),
    };
    let numerator = match amount_with_fee.checked_mul(reserve_out) {
        Some(v) => v,
        None => return U256::zero(),
    };
    let denominator = match reserve_in
        .checked_mul(U256::from(BPS_DENOM))
        .and_then(|v| v.checked_add(amount_with_fee))
    {
        Some(v) => v,
        None => return U256::zero(),
    };

    numerator / denominator
}

/// Price impact of a trade against a constant-product pool, in percent.
///
/// Compares the execution price against the pre-trade spot price. Both
/// prices are formed from the same raw reserves, so token decimals
/// cancel out.
pub fn price_impact_pct(reserve_in: U256, reserve_out: U256, amount_in: U256, amount_out: U256) -> f64 {
    if reserve_in.is_zero() || reserve_out.is_zero() || amount_in.is_zero() {
        return 0.0;
    }

    let spot = u256_to_f64(reserve_out) / u256_to_f64(reserve_in);
    if spot <= 0.0 {
        return 0.0;
    }
    let execution = u256_to_f64(amount_out) / u256_to_f64(amount_in);

    ((spot - execution) / spot * 100.0).max(0.0)
}

/// Apply a slippage tolerance to an output amount, rounding down.
///
/// A tolerance at or above 100% clamps the minimum to zero.
pub fn apply_slippage_bps(amount: U256, slippage_bps: u64) -> U256 {
    if slippage_bps >= BPS_DENOM {
        return U256::zero();
    }
    amount * U256::from(BPS_DENOM - slippage_bps) / U256::from(BPS_DENOM)
}

/// Lossy conversion for display math. Amounts near U256::MAX lose
/// precision but never panic.
pub fn u256_to_f64(value: U256) -> f64 {
    let mut result = 0.0_f64;
    for i in (0..4).rev() {
        result = result * 18_446_744_073_709_551_616.0 + value.0[i] as f64;
    }
    result
}

/// Format a base-unit amount as a decimal string, trimming trailing
/// zeros from the fractional part.
pub fn format_units(amount: U256, decimals: u8) -> String {
    let scale = U256::from(10u64).pow(U256::from(decimals));
    if scale.is_zero() || decimals == 0 {
        return amount.to_string();
    }
    let whole = amount / scale;
    let frac = amount % scale;
    if frac.is_zero() {
        return whole.to_string();
    }
    let frac_str = format!("{:0>width$}", frac.to_string(), width = decimals as usize);
    let trimmed = frac_str.trim_end_matches('0');
    format!("{}.{}", whole, trimmed)
}

/// Parse a human decimal string into base units. Returns `None` for
/// malformed input or more fractional digits than the token carries.
pub fn parse_units(s: &str, decimals: u8) -> Option<U256> {
    let s = s.trim();
    if s.is_empty() || s.starts_with('-') {
        return None;
    }
    let (whole, frac) = match s.split_once('.') {
        Some((w, f)) => (w, f),
        None => (s, ""),
    };
    if frac.len() > decimals as usize {
        return None;
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let scale = U256::from(10u64).pow(U256::from(decimals));
    let whole_part = U256::from_dec_str(if whole.is_empty() { "0" } else { whole })
        .ok()?
        .checked_mul(scale)?;
    let frac_part = if frac.is_empty() {
        U256::zero()
    } else {
        let padded = format!("{:0<width$}", frac, width = decimals as usize);
        U256::from_dec_str(&padded).ok()?
    };
    whole_part.checked_add(frac_part)
}

/// Human-unit value of a base-unit amount (display only)
pub fn to_human(amount: U256, decimals: u8) -> f64 {
    u256_to_f64(amount) / 10f64.powi(decimals as i32)
}

/// Execution price as output human units per input human unit
pub fn execution_price(amount_in: U256, in_decimals: u8, amount_out: U256, out_decimals: u8) -> f64 {
    let input = to_human(amount_in, in_decimals);
    if input <= 0.0 {
        return 0.0;
    }
    to_human(amount_out, out_decimals) / input
}
