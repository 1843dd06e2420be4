//! Tunable constants for the signal computations.
//!
//! Every field can be overridden through a `RISK_*` environment variable.
//! Unset or unparsable values fall back to the defaults below.

use crate::error::RiskError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskConfig {
    /// Composite similarity at or above which a candidate counts as a likely clone
    pub high_similarity_threshold: f64,
    /// Max transactions attached as evidence for the top match
    pub evidence_limit: usize,
    /// Characters compared by the order-tolerant head-bag metric
    pub head_bag_len: usize,
    /// Only the most recent N transactions of a history are considered
    pub max_transactions: usize,
    pub slippage_low_below_pct: Decimal,
    pub slippage_medium_max_pct: Decimal,
    pub summary_max_chars: usize,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            high_similarity_threshold: 0.85,
            evidence_limit: 3,
            head_bag_len: 6,
            max_transactions: 100,
            slippage_low_below_pct: Decimal::ONE,
            slippage_medium_max_pct: Decimal::new(3, 0),
            summary_max_chars: 120,
        }
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl RiskConfig {
    /// Read overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Testable version taking an explicit key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();
        Self {
            high_similarity_threshold: parse_or(
                &lookup,
                "RISK_HIGH_SIMILARITY_THRESHOLD",
                d.high_similarity_threshold,
            ),
            evidence_limit: parse_or(&lookup, "RISK_EVIDENCE_LIMIT", d.evidence_limit),
            head_bag_len: parse_or(&lookup, "RISK_HEAD_BAG_LEN", d.head_bag_len),
            max_transactions: parse_or(&lookup, "RISK_MAX_TRANSACTIONS", d.max_transactions),
            slippage_low_below_pct: parse_or(
                &lookup,
                "RISK_SLIPPAGE_LOW_BELOW_PCT",
                d.slippage_low_below_pct,
            ),
            slippage_medium_max_pct: parse_or(
                &lookup,
                "RISK_SLIPPAGE_MEDIUM_MAX_PCT",
                d.slippage_medium_max_pct,
            ),
            summary_max_chars: parse_or(&lookup, "RISK_SUMMARY_MAX_CHARS", d.summary_max_chars),
        }
    }

    pub fn validate(&self) -> Result<(), RiskError> {
        if !(0.0..=1.0).contains(&self.high_similarity_threshold) {
            return Err(RiskError::ConfigError(format!(
                "high_similarity_threshold must be within [0, 1], got {}",
                self.high_similarity_threshold
            )));
        }
        if self.evidence_limit == 0 {
            return Err(RiskError::ConfigError(
                "evidence_limit must be positive".into(),
            ));
        }
        if self.head_bag_len == 0 {
            return Err(RiskError::ConfigError("head_bag_len must be positive".into()));
        }
        if self.max_transactions == 0 {
            return Err(RiskError::ConfigError(
                "max_transactions must be positive".into(),
            ));
        }
        if self.slippage_low_below_pct < Decimal::ZERO
            || self.slippage_medium_max_pct < self.slippage_low_below_pct
        {
            return Err(RiskError::ConfigError(format!(
                "slippage bands inverted: low < {}, medium <= {}",
                self.slippage_low_below_pct, self.slippage_medium_max_pct
            )));
        }
        if self.summary_max_chars == 0 {
            return Err(RiskError::ConfigError(
                "summary_max_chars must be positive".into(),
            ));
        }
        Ok(())
    }
}
