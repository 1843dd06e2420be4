//! Deterministic signal extraction for the phishing and contract explainers.

use crate::types::{
    AccountTransaction, ContractReport, ContractRiskRequest, ContractSignals, Lang,
    PhishingSignals, TagInfo,
};

/// Tag label fragments treated as suspicious.
const SUSPICIOUS_TAG_MARKERS: &[&str] = &["phish", "scam", "drainer"];

impl PhishingSignals {
    /// Count transactions and explicit failures. A missing `success` flag is
    /// not a failure.
    pub fn from_transactions(transactions: &[AccountTransaction]) -> Self {
        let tx_count = transactions.len();
        let failed_count = transactions
            .iter()
            .filter(|tx| tx.success == Some(false))
            .count();
        let failed_ratio = (tx_count > 0).then(|| failed_count as f64 / tx_count as f64);

        Self {
            tx_count,
            failed_count,
            failed_ratio,
        }
    }
}

/// Lowercased labels containing a phishing/scam/drainer marker.
pub fn suspicious_tags(tags: &[TagInfo]) -> Vec<String> {
    tags.iter()
        .map(|tag| tag.label.to_lowercase())
        .filter(|label| SUSPICIOUS_TAG_MARKERS.iter().any(|m| label.contains(m)))
        .collect()
}

fn enabled(flags: &[(&str, Option<bool>)]) -> Vec<String> {
    flags
        .iter()
        .filter(|(_, value)| *value == Some(true))
        .map(|(name, _)| name.to_string())
        .collect()
}

impl ContractSignals {
    pub fn from_request(request: &ContractRiskRequest) -> Self {
        let permissions = request.permissions.clone().unwrap_or_default();
        let enabled_privileges = enabled(&[
            ("can_upgrade", permissions.can_upgrade),
            ("can_pause", permissions.can_pause),
            ("can_blacklist", permissions.can_blacklist),
            ("can_mint", permissions.can_mint),
            ("can_burn", permissions.can_burn),
        ]);

        let flags = request.token_flags.clone().unwrap_or_default();
        let risky_token_flags = enabled(&[
            ("has_transfer_tax", flags.has_transfer_tax),
            ("tax_changeable", flags.tax_changeable),
            ("max_tx_limit", flags.max_tx_limit),
            ("max_wallet_limit", flags.max_wallet_limit),
            ("trading_restrictions", flags.trading_restrictions),
        ]);

        let tags = request.tags.as_deref().unwrap_or_default();

        Self {
            code_verified: request.code.as_ref().map(|c| c.verified),
            is_proxy: request.proxy.as_ref().and_then(|p| p.is_proxy),
            enabled_privileges,
            risky_token_flags,
            tag_count: tags.len(),
            suspicious_tags: suspicious_tags(tags),
        }
    }
}

pub fn build_contract_report(request: &ContractRiskRequest) -> ContractReport {
    let signals = ContractSignals::from_request(request);
    tracing::debug!(
        privileges = signals.enabled_privileges.len(),
        risky_flags = signals.risky_token_flags.len(),
        suspicious_tags = signals.suspicious_tags.len(),
        "contract signals extracted"
    );

    ContractReport {
        contract_address: request.contract_address.clone(),
        chain: request.chain.clone(),
        lang: Lang::normalize(request.lang.as_deref()),
        interaction_type: request.interaction_type.clone(),
        signals,
    }
}
