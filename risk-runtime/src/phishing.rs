//! Phishing-clone detection over a wallet's local transaction history.
//!
//! Every counterparty seen in the history is scored against the target
//! address; the closest one becomes the "most similar" match and the newest
//! transactions touching it are attached as evidence.

use std::collections::BTreeSet;

use crate::address::{canonical_address, is_canonical, normalize_address};
use crate::config::RiskConfig;
use crate::similarity::{SIMILARITY_METHOD, score_pair};
use crate::types::{
    AccountTransaction, Lang, PhishingReport, PhishingRiskRequest, PhishingSignals,
    SimilarityContext, SimilarityScore,
};

/// Distinct canonical counterparties from the from/to/contract fields,
/// excluding `target`, in lexicographic order.
pub fn collect_candidates(target: &str, transactions: &[AccountTransaction]) -> Vec<String> {
    let candidates: BTreeSet<String> = transactions
        .iter()
        .flat_map(|tx| tx.address_fields())
        .filter_map(canonical_address)
        .filter(|addr| addr != target)
        .collect();
    candidates.into_iter().collect()
}

/// Score each candidate against `target`, best first.
///
/// Ties on the composite score are broken by address so the ordering is
/// deterministic.
pub fn rank_candidates(target: &str, candidates: &[String], head_len: usize) -> Vec<SimilarityScore> {
    let mut scores: Vec<SimilarityScore> = candidates
        .iter()
        .map(|candidate| score_pair(target, candidate, head_len))
        .collect();
    scores.sort_by(|a, b| {
        b.similarity
            .total_cmp(&a.similarity)
            .then_with(|| a.address.cmp(&b.address))
    });
    scores
}

/// Transactions referencing `address` in any address field, newest first,
/// at most `limit` of them.
pub fn related_transactions(
    address: &str,
    transactions: &[AccountTransaction],
    limit: usize,
) -> Vec<AccountTransaction> {
    let mut related: Vec<AccountTransaction> = transactions
        .iter()
        .filter(|tx| {
            tx.address_fields()
                .into_iter()
                .any(|field| field.is_some() && normalize_address(field) == address)
        })
        .cloned()
        .collect();
    related.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    related.truncate(limit);
    related
}

/// Build the similarity context with default thresholds.
pub fn build_similarity_context(
    target_address: &str,
    transactions: &[AccountTransaction],
) -> SimilarityContext {
    build_similarity_context_with(&RiskConfig::default(), target_address, transactions)
}

pub fn build_similarity_context_with(
    config: &RiskConfig,
    target_address: &str,
    transactions: &[AccountTransaction],
) -> SimilarityContext {
    let target = normalize_address(Some(target_address));
    if !is_canonical(&target) {
        tracing::debug!(address = %target, "target is not a canonical address; no similarity computed");
        return SimilarityContext {
            target_address: target,
            ..SimilarityContext::default()
        };
    }

    let candidates = collect_candidates(&target, transactions);
    let ranked = rank_candidates(&target, &candidates, config.head_bag_len);
    let high_similarity_count = ranked
        .iter()
        .filter(|s| s.similarity >= config.high_similarity_threshold)
        .count();

    let (most_similar_address, most_similar_similarity, most_similar_transactions) =
        match ranked.first() {
            Some(top) => (
                Some(top.address.clone()),
                top.similarity,
                related_transactions(&top.address, transactions, config.evidence_limit),
            ),
            None => (None, 0.0, Vec::new()),
        };

    tracing::debug!(
        candidate_count = ranked.len(),
        top_similarity = most_similar_similarity,
        high_similarity_count,
        "similarity context built"
    );

    SimilarityContext {
        target_address: target,
        candidate_count: ranked.len(),
        candidates: ranked,
        most_similar_address,
        most_similar_similarity,
        high_similarity_count,
        most_similar_transactions,
    }
}

/// Keep only the newest `max` transactions.
fn most_recent(transactions: &[AccountTransaction], max: usize) -> Vec<AccountTransaction> {
    let mut recent = transactions.to_vec();
    if recent.len() > max {
        tracing::warn!(
            received = recent.len(),
            kept = max,
            "transaction history truncated to most recent entries"
        );
        recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        recent.truncate(max);
    }
    recent
}

/// Assemble everything the phishing explainer needs for one request.
pub fn build_phishing_report(config: &RiskConfig, request: &PhishingRiskRequest) -> PhishingReport {
    let history = most_recent(
        request.transactions.as_deref().unwrap_or_default(),
        config.max_transactions,
    );

    PhishingReport {
        address: request.address.clone(),
        chain: request.chain.clone(),
        lang: Lang::normalize(request.lang.as_deref()),
        signals: PhishingSignals::from_transactions(&history),
        similarity: build_similarity_context_with(config, &request.address, &history),
        similarity_method: SIMILARITY_METHOD.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TARGET: &str = "0x1234567890abcdef1234567890abcdef12345678";
    const CLONE: &str = "0x1234567890abcdef1234567890abcdef12345670";

    fn tx(hash: &str, timestamp: i64, from: Option<&str>, to: Option<&str>) -> AccountTransaction {
        AccountTransaction {
            tx_hash: hash.to_string(),
            timestamp,
            from_address: from.map(str::to_string),
            to_address: to.map(str::to_string),
            value: None,
            token_address: None,
            token_decimals: None,
            tx_type: None,
            contract_address: None,
            method_sig: None,
            success: None,
        }
    }

    #[test]
    fn test_candidates_exclude_target_and_invalid() {
        let target = normalize_address(Some(TARGET));
        let txs = vec![
            tx("0x1", 1, Some(TARGET), Some(CLONE)),
            tx("0x2", 2, Some("0xabc"), Some(&CLONE.to_uppercase().replace("0X", "0x"))),
            tx("0x3", 3, None, Some("0x9999999999999999999999999999999999999999")),
        ];
        let candidates = collect_candidates(&target, &txs);
        assert_eq!(
            candidates,
            vec![
                "1234567890abcdef1234567890abcdef12345670".to_string(),
                "9999999999999999999999999999999999999999".to_string(),
            ]
        );
    }

    #[test]
    fn test_high_signal_clone_ranks_first() {
        let txs = vec![tx(
            "0x1",
            1,
            Some(CLONE),
            Some("0x9999999999999999999999999999999999999999"),
        )];
        let ctx = build_similarity_context(TARGET, &txs);
        assert_eq!(ctx.candidate_count, 2);
        assert_eq!(
            ctx.most_similar_address.as_deref(),
            Some("1234567890abcdef1234567890abcdef12345670")
        );
        assert!(ctx.most_similar_similarity > 0.55);
        assert_eq!(ctx.high_similarity_count, 1);
    }

    #[test]
    fn test_low_signal_history() {
        let txs = vec![tx(
            "0x1",
            1,
            Some("0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb"),
            Some("0xcccccccccccccccccccccccccccccccccccccccc"),
        )];
        let ctx = build_similarity_context("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", &txs);
        assert_eq!(ctx.candidate_count, 2);
        assert!(ctx.most_similar_similarity < 0.3);
        assert_eq!(ctx.high_similarity_count, 0);
        // Equal scores fall back to address order.
        assert_eq!(
            ctx.most_similar_address.as_deref(),
            Some("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb")
        );
    }

    #[test]
    fn test_empty_history() {
        let ctx = build_similarity_context(TARGET, &[]);
        assert_eq!(ctx.candidate_count, 0);
        assert!(ctx.candidates.is_empty());
        assert_eq!(ctx.most_similar_address, None);
        assert_eq!(ctx.most_similar_similarity, 0.0);
        assert!(ctx.most_similar_transactions.is_empty());
    }

    #[test]
    fn test_invalid_target_yields_empty_context() {
        let txs = vec![tx("0x1", 1, Some(CLONE), None)];
        let ctx = build_similarity_context("0xabc", &txs);
        assert_eq!(ctx.target_address, "abc");
        assert_eq!(ctx.candidate_count, 0);
        assert_eq!(ctx.most_similar_address, None);
    }

    #[test]
    fn test_evidence_newest_three() {
        let txs = vec![
            tx("0x1", 10, Some(CLONE), Some("0x9999999999999999999999999999999999999999")),
            tx("0x2", 40, Some(CLONE), Some("0x8888888888888888888888888888888888888888")),
            tx("0x3", 30, Some("0x7777777777777777777777777777777777777777"), Some(CLONE)),
            tx("0x4", 20, Some(CLONE), Some("0x6666666666666666666666666666666666666666")),
        ];
        let ctx = build_similarity_context(TARGET, &txs);
        let hashes: Vec<&str> = ctx
            .most_similar_transactions
            .iter()
            .map(|t| t.tx_hash.as_str())
            .collect();
        assert_eq!(hashes, vec!["0x2", "0x3", "0x4"]);
    }

    #[test]
    fn test_evidence_matches_contract_field() {
        let mut contract_tx = tx("0xc", 5, None, None);
        contract_tx.contract_address = Some(CLONE.to_string());
        let ctx = build_similarity_context(TARGET, &[contract_tx]);
        assert_eq!(ctx.candidate_count, 1);
        assert_eq!(ctx.most_similar_transactions.len(), 1);
    }

    #[test]
    fn test_report_truncates_history() {
        let config = RiskConfig {
            max_transactions: 2,
            ..RiskConfig::default()
        };
        let request = PhishingRiskRequest {
            address: TARGET.to_string(),
            chain: "monad".to_string(),
            lang: Some("en".to_string()),
            transactions: Some(vec![
                tx("0x1", 1, Some(CLONE), None),
                tx("0x2", 2, Some("0x9999999999999999999999999999999999999999"), None),
                tx("0x3", 3, Some("0x8888888888888888888888888888888888888888"), None),
            ]),
        };
        let report = build_phishing_report(&config, &request);
        assert_eq!(report.lang, Lang::En);
        assert_eq!(report.signals.tx_count, 2);
        // The clone only appeared in the oldest transaction.
        assert_eq!(report.similarity.candidate_count, 2);
        assert_eq!(report.similarity_method, SIMILARITY_METHOD);
    }

    fn arb_tx() -> impl Strategy<Value = AccountTransaction> {
        (
            0i64..1_000,
            proptest::option::of("[0-9a-f]{40}"),
            proptest::option::of("[0-9a-f]{38,40}"),
        )
            .prop_map(|(ts, from, to)| tx("0xh", ts, from.as_deref(), to.as_deref()))
    }

    proptest! {
        #[test]
        fn prop_evidence_bounded_and_sorted(
            target in "[0-9a-f]{40}",
            txs in proptest::collection::vec(arb_tx(), 0..30),
        ) {
            let ctx = build_similarity_context(&target, &txs);
            prop_assert!(ctx.most_similar_transactions.len() <= 3);
            prop_assert!(ctx
                .most_similar_transactions
                .windows(2)
                .all(|w| w[0].timestamp >= w[1].timestamp));
            prop_assert!(ctx
                .candidates
                .windows(2)
                .all(|w| w[0].similarity >= w[1].similarity));
            prop_assert_eq!(ctx.candidate_count, ctx.candidates.len());
        }
    }
}
