//! End-to-end signal computation from wire-format JSON requests.
//!
//! Each scenario decodes a request the way the wallet backend sends it,
//! builds the report handed to the explainer, and checks the structured
//! evidence (never any model output).

use bigdecimal::BigDecimal;
use risk_runtime::summary::{sanitize_summary, summary_leaks_internals};
use risk_runtime::{
    ContractRiskRequest, Lang, PhishingRiskRequest, RiskConfig, RiskLevel, SlippageAssumption,
    SlippageLevel, SlippageRequestBuilder, SlippageRiskRequest, build_contract_report,
    build_phishing_report, build_slippage_report,
};
use rust_decimal_macros::dec;

fn phishing_high_similarity() -> String {
    serde_json::json!({
        "address": "0xA11ce0000000000000000000000000000000BEEF",
        "chain": "monad",
        "lang": "zh",
        "transactions": [
            {
                "tx_hash": "0x1111",
                "timestamp": 1739001000,
                "from_address": "0xA11ce0000000000000000000000000000000BEEA",
                "to_address": "0xA11ce0000000000000000000000000000000BEE9",
                "value": "125000000000000000",
                "tx_type": "transfer",
                "contract_address": null
            },
            {
                "tx_hash": "0x2222",
                "timestamp": 1739001600,
                "from_address": "0xA11ce0000000000000000000000000000000BEE8",
                "to_address": "0xA11ce0000000000000000000000000000000BEE7",
                "value": "89000000000000000",
                "tx_type": "transfer",
                "contract_address": null,
                "success": false
            }
        ]
    })
    .to_string()
}

#[test]
fn test_phishing_high_similarity_flow() {
    let request = PhishingRiskRequest::from_json(&phishing_high_similarity()).unwrap();
    let report = build_phishing_report(&RiskConfig::default(), &request);

    assert_eq!(report.lang, Lang::Zh);
    assert_eq!(report.signals.tx_count, 2);
    assert_eq!(report.signals.failed_count, 1);

    let ctx = &report.similarity;
    assert_eq!(ctx.target_address, "a11ce0000000000000000000000000000000beef");
    assert_eq!(ctx.candidate_count, 4);
    assert_eq!(ctx.high_similarity_count, 4);
    assert!(ctx.most_similar_similarity >= 0.7);
    // Every clone shares the full head, so ties resolve by address.
    assert_eq!(
        ctx.most_similar_address.as_deref(),
        Some("a11ce0000000000000000000000000000000bee7")
    );
    assert_eq!(ctx.most_similar_transactions.len(), 1);
    assert_eq!(ctx.most_similar_transactions[0].tx_hash, "0x2222");
}

#[test]
fn test_phishing_low_similarity_flow() {
    let json = serde_json::json!({
        "address": "0xA11ce0000000000000000000000000000000BEEF",
        "transactions": [{
            "tx_hash": "0x3333",
            "timestamp": 1739002200,
            "from_address": "0x0000000000000000000000000000000000001111",
            "to_address": "0x9999999999999999999999999999999999998888",
            "contract_address": "0x7777777777777777777777777777777777776666"
        }]
    })
    .to_string();
    let request = PhishingRiskRequest::from_json(&json).unwrap();
    let report = build_phishing_report(&RiskConfig::default(), &request);

    let ctx = &report.similarity;
    assert_eq!(ctx.candidate_count, 3);
    assert!(ctx.most_similar_similarity <= 0.9);
    assert_eq!(ctx.high_similarity_count, 0);
    assert_eq!(
        ctx.most_similar_address.as_deref(),
        Some("0000000000000000000000000000000000001111")
    );
}

#[test]
fn test_phishing_without_history() {
    let request = PhishingRiskRequest::from_json(r#"{"address": "0xabc"}"#).unwrap();
    let report = build_phishing_report(&RiskConfig::default(), &request);

    assert_eq!(report.signals.tx_count, 0);
    assert_eq!(report.signals.failed_ratio, None);
    assert_eq!(report.similarity.candidate_count, 0);
    assert_eq!(report.similarity.most_similar_address, None);
    assert_eq!(report.similarity.most_similar_similarity, 0.0);
    assert!(report.similarity.most_similar_transactions.is_empty());
}

#[test]
fn test_contract_flow() {
    let json = serde_json::json!({
        "contract_address": "0xDeaD00000000000000000000000000000000BEEF",
        "chain": "monad",
        "lang": "en",
        "interaction_type": "approve",
        "creator": {"creator_address": "0xF00d00000000000000000000000000000000CAFE"},
        "proxy": {"is_proxy": true, "implementation_address": "0x1234"},
        "permissions": {"owner": "0xF00d", "can_upgrade": true, "can_blacklist": true},
        "token_flags": {"trading_restrictions": true},
        "code": {"verified": true},
        "tags": [{"source": "community", "label": "Scam Token"}]
    })
    .to_string();
    let request = ContractRiskRequest::from_json(&json).unwrap();
    let report = build_contract_report(&request);

    assert_eq!(report.interaction_type.as_deref(), Some("approve"));
    assert_eq!(
        report.signals.enabled_privileges,
        vec!["can_upgrade", "can_blacklist"]
    );
    assert_eq!(report.signals.risky_token_flags, vec!["trading_restrictions"]);
    assert_eq!(report.signals.suspicious_tags, vec!["scam token"]);
}

#[test]
fn test_slippage_flow() {
    let json = serde_json::json!({
        "pool_address": "0xpool",
        "token_pay_amount": "100",
        "lang": "en",
        "pool": {"token_pay_amount": "1000", "token_get_amount": "1000"}
    })
    .to_string();
    let request = SlippageRiskRequest::from_json(&json).unwrap();
    let report = build_slippage_report(&RiskConfig::default(), &request);

    assert_eq!(report.estimate.assumption, SlippageAssumption::ConstantProductAmm);
    assert_eq!(report.estimate.spot_price, Some(BigDecimal::from(1)));
    assert_eq!(report.estimate.estimated_slippage_pct, dec!(9.090909));
    assert_eq!(report.level, SlippageLevel::High);
    assert_eq!(report.level.label(report.lang), "high");
}

#[test]
fn test_slippage_wei_scale_pool() {
    // 1e12 whole tokens of 18 decimals on each side, traded at 1%.
    let json = serde_json::json!({
        "pool_address": "0xpool",
        "token_pay_amount": "1e28",
        "pool": {"token_pay_amount": "1e30", "token_get_amount": "1e30"}
    })
    .to_string();
    let request = SlippageRiskRequest::from_json(&json).unwrap();
    let report = build_slippage_report(&RiskConfig::default(), &request);

    assert!(report.estimate.has_required_amounts);
    assert_eq!(report.estimate.estimated_slippage_pct, dec!(0.990099));
    assert_eq!(report.level, SlippageLevel::Low);
}

#[test]
fn test_slippage_unparsable_amount_is_unknown() {
    let json = r#"{
        "pool_address": "0xpool",
        "token_pay_amount": "ten",
        "pool": {"token_pay_amount": "1000", "token_get_amount": "900"}
    }"#;
    let request = SlippageRiskRequest::from_json(json).unwrap();
    let report = build_slippage_report(&RiskConfig::default(), &request);

    assert!(!report.estimate.has_required_amounts);
    assert_eq!(report.estimate.estimated_slippage_pct, dec!(0));
    assert_eq!(report.level, SlippageLevel::Unknown);
    assert_eq!(report.level.label(Lang::Zh), "未知");
}

#[test]
fn test_builder_request_matches_wire_request() {
    let built = SlippageRequestBuilder::new()
        .pool_address("0xpool")
        .token_pay_amount("10")
        .reserves("1000", "900")
        .build()
        .unwrap();
    let config = RiskConfig::default();
    let report = build_slippage_report(&config, &built);
    assert_eq!(report.level, SlippageLevel::Low);
    assert!(report.estimate.has_required_amounts);
}

#[test]
fn test_report_serializes_for_explainer() {
    let request = PhishingRiskRequest::from_json(&phishing_high_similarity()).unwrap();
    let report = build_phishing_report(&RiskConfig::default(), &request);
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["lang"], "zh");
    assert_eq!(
        value["similarity_method"],
        "max(prefix,suffix,levenshtein,head_bag_6)"
    );
    assert!(value["similarity"]["candidates"].is_array());
}

#[test]
fn test_summary_contract_over_computed_figures() {
    let request = PhishingRiskRequest::from_json(&phishing_high_similarity()).unwrap();
    let report = build_phishing_report(&RiskConfig::default(), &request);

    let leaked = format!(
        "This address matches a past counterparty with similarity {:.2}.",
        report.similarity.most_similar_similarity
    );
    assert!(summary_leaks_internals(&leaked));
    assert_eq!(
        sanitize_summary(&leaked, RiskLevel::High, report.lang),
        "发现明显的风险信号，请在核实对方身份前避免交互。"
    );
}
