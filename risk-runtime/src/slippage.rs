//! Constant-product AMM slippage estimation.
//!
//! `reserve_in * reserve_out = k` holds across the trade. Amounts are raw
//! token quantities (18-decimal wei and beyond), so the quote runs on
//! `BigDecimal`; only the bounded percentage is converted to `Decimal`. Any
//! invalid input or degenerate result maps to a sentinel estimate instead of
//! an error.

use crate::config::RiskConfig;
use crate::types::{
    Lang, SlippageAssumption, SlippageEstimate, SlippageLevel, SlippageReport,
    SlippageRiskRequest,
};
use bigdecimal::{BigDecimal, Signed, ToPrimitive};
use rust_decimal::Decimal;
use std::str::FromStr;

const DEFAULT_POOL_TYPE: &str = "AMM";
const SLIPPAGE_DP: i64 = 6;
/// Significant digits kept on reported prices and amounts.
const REPORT_PRECISION: u64 = 28;

/// Amounts past 10^128 (or finer than 10^-128) are not token quantities.
const MAX_AMOUNT_EXPONENT: i64 = 128;
const MAX_AMOUNT_BITS: u64 = 512;

/// Parse a token amount given as a plain or scientific-notation decimal.
///
/// Returns `None` for absent or malformed values, and for magnitudes no
/// token supply reaches.
pub fn parse_amount(raw: Option<&str>) -> Option<BigDecimal> {
    let s = raw?.trim();
    if s.is_empty() {
        return None;
    }
    let value = BigDecimal::from_str(s).ok()?;
    let (digits, exponent) = value.as_bigint_and_exponent();
    if digits.bits() > MAX_AMOUNT_BITS || exponent.abs() > MAX_AMOUNT_EXPONENT {
        return None;
    }
    Some(value)
}

fn sentinel(assumption: SlippageAssumption) -> SlippageEstimate {
    SlippageEstimate {
        has_required_amounts: false,
        assumption,
        spot_price: None,
        execution_price: None,
        output_after_trade: None,
        estimated_slippage_pct: Decimal::ZERO,
        pool_type: DEFAULT_POOL_TYPE.to_string(),
        price_impact_pct: None,
    }
}

/// The "insufficient data" sentinel: no computation was possible.
pub fn insufficient_data() -> SlippageEstimate {
    sentinel(SlippageAssumption::InsufficientData)
}

struct Quote {
    spot_price: BigDecimal,
    output_after_trade: BigDecimal,
    execution_price: BigDecimal,
    slippage_pct: Decimal,
}

fn to_pct(value: &BigDecimal) -> Option<Decimal> {
    let (digits, scale) = value
        .round(SLIPPAGE_DP)
        .with_scale(SLIPPAGE_DP)
        .as_bigint_and_exponent();
    Decimal::try_from_i128_with_scale(digits.to_i128()?, u32::try_from(scale).ok()?).ok()
}

fn tidy(value: &BigDecimal) -> BigDecimal {
    value.with_prec(REPORT_PRECISION).normalized()
}

/// Inputs must be strictly positive.
fn quote(trade_in: &BigDecimal, reserve_in: &BigDecimal, reserve_out: &BigDecimal) -> Option<Quote> {
    let spot_price = reserve_out / reserve_in;

    let k = reserve_in * reserve_out;
    let output_after_trade = reserve_out - k / (reserve_in + trade_in);
    if !output_after_trade.is_positive() {
        return None;
    }

    let execution_price = &output_after_trade / trade_in;
    let raw_pct = (&spot_price - &execution_price) / &spot_price * BigDecimal::from(100);
    let slippage_pct = to_pct(&raw_pct)?.max(Decimal::ZERO);

    Some(Quote {
        spot_price: tidy(&spot_price),
        output_after_trade: tidy(&output_after_trade),
        execution_price: tidy(&execution_price),
        slippage_pct,
    })
}

/// Estimate slippage for swapping `trade_in` into a constant-product pool.
///
/// All three amounts must be strictly positive, otherwise the
/// insufficient-data sentinel is returned with a zero slippage.
pub fn estimate_amm_slippage(
    trade_in: &BigDecimal,
    pool_reserve_in: &BigDecimal,
    pool_reserve_out: &BigDecimal,
) -> SlippageEstimate {
    if !trade_in.is_positive() || !pool_reserve_in.is_positive() || !pool_reserve_out.is_positive()
    {
        return insufficient_data();
    }

    match quote(trade_in, pool_reserve_in, pool_reserve_out) {
        Some(q) => {
            tracing::debug!(
                spot_price = %q.spot_price,
                execution_price = %q.execution_price,
                slippage_pct = %q.slippage_pct,
                "constant-product estimate"
            );
            SlippageEstimate {
                has_required_amounts: true,
                assumption: SlippageAssumption::ConstantProductAmm,
                spot_price: Some(q.spot_price),
                execution_price: Some(q.execution_price),
                output_after_trade: Some(q.output_after_trade),
                estimated_slippage_pct: q.slippage_pct,
                pool_type: DEFAULT_POOL_TYPE.to_string(),
                price_impact_pct: None,
            }
        }
        None => {
            tracing::warn!(
                trade_in = %trade_in,
                reserve_in = %pool_reserve_in,
                reserve_out = %pool_reserve_out,
                "degenerate constant-product output"
            );
            sentinel(SlippageAssumption::InvalidOutput)
        }
    }
}

/// Estimate from a wire request, where amounts arrive as strings.
pub fn estimate_for_request(request: &SlippageRiskRequest) -> SlippageEstimate {
    let pool = request.pool.clone().unwrap_or_default();
    let trade_in = parse_amount(Some(request.token_pay_amount.as_str()));
    let reserve_in = parse_amount(pool.token_pay_amount.as_deref());
    let reserve_out = parse_amount(pool.token_get_amount.as_deref());

    let mut estimate = match (trade_in, reserve_in, reserve_out) {
        (Some(trade_in), Some(reserve_in), Some(reserve_out)) => {
            estimate_amm_slippage(&trade_in, &reserve_in, &reserve_out)
        }
        _ => {
            tracing::debug!(pool = %request.pool_address, "missing or unparsable amounts");
            insufficient_data()
        }
    };

    if let Some(pool_type) = pool.pool_type.filter(|t| !t.trim().is_empty()) {
        estimate.pool_type = pool_type;
    }
    estimate.price_impact_pct = pool.price_impact_pct;
    estimate
}

impl SlippageLevel {
    /// Bucket an estimate: below `low_below` is low, up to `medium_max` is
    /// medium, anything above is high. Sentinels are unknown.
    pub fn classify(estimate: &SlippageEstimate, low_below: Decimal, medium_max: Decimal) -> Self {
        if !estimate.has_required_amounts {
            return SlippageLevel::Unknown;
        }
        let pct = estimate.estimated_slippage_pct;
        if pct < low_below {
            SlippageLevel::Low
        } else if pct <= medium_max {
            SlippageLevel::Medium
        } else {
            SlippageLevel::High
        }
    }

    pub fn from_estimate(estimate: &SlippageEstimate, config: &RiskConfig) -> Self {
        Self::classify(
            estimate,
            config.slippage_low_below_pct,
            config.slippage_medium_max_pct,
        )
    }
}

pub fn build_slippage_report(config: &RiskConfig, request: &SlippageRiskRequest) -> SlippageReport {
    let estimate = estimate_for_request(request);
    let level = SlippageLevel::from_estimate(&estimate, config);

    SlippageReport {
        pool_address: request.pool_address.clone(),
        chain: request.chain.clone(),
        lang: Lang::normalize(request.lang.as_deref()),
        estimate,
        level,
    }
}
