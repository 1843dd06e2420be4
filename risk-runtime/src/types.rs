use bigdecimal::BigDecimal;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Response language for localized labels and canned sentences
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Lang {
    #[default]
    Zh,
    En,
}

impl Lang {
    /// Anything starting with `en` is English; everything else, including
    /// an absent value, falls back to Chinese.
    pub fn normalize(raw: Option<&str>) -> Self {
        let value = raw.unwrap_or("zh").trim().to_lowercase();
        if value.starts_with("en") {
            Lang::En
        } else {
            Lang::Zh
        }
    }
}

/// Qualitative risk level shared by phishing, contract and slippage tasks
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
    Unknown,
}

impl RiskLevel {
    pub fn label(self, lang: Lang) -> &'static str {
        match (self, lang) {
            (RiskLevel::High, Lang::En) => "high",
            (RiskLevel::Medium, Lang::En) => "medium",
            (RiskLevel::Low, Lang::En) => "low",
            (RiskLevel::Unknown, Lang::En) => "unknown",
            (RiskLevel::High, Lang::Zh) => "高",
            (RiskLevel::Medium, Lang::Zh) => "中",
            (RiskLevel::Low, Lang::Zh) => "低",
            (RiskLevel::Unknown, Lang::Zh) => "未知",
        }
    }

    /// Accepts both the English and the Chinese vocabulary.
    pub fn parse_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "high" | "高" => Some(RiskLevel::High),
            "medium" | "中" => Some(RiskLevel::Medium),
            "low" | "低" => Some(RiskLevel::Low),
            "unknown" | "未知" => Some(RiskLevel::Unknown),
            _ => None,
        }
    }
}

// ── Requests ────────────────────────────────────────────────────────────────

fn default_chain() -> String {
    "monad".to_string()
}

fn default_swap() -> Option<String> {
    Some("swap".to_string())
}

fn default_pool_type() -> Option<String> {
    Some("AMM".to_string())
}

/// A locally stored historical transaction. Read-only input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountTransaction {
    pub tx_hash: String,
    pub timestamp: i64,
    #[serde(default)]
    pub from_address: Option<String>,
    #[serde(default)]
    pub to_address: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub token_address: Option<String>,
    #[serde(default)]
    pub token_decimals: Option<u32>,
    /// transfer | approve | contract_call | swap | mint | stake
    #[serde(default)]
    pub tx_type: Option<String>,
    #[serde(default)]
    pub contract_address: Option<String>,
    #[serde(default)]
    pub method_sig: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
}

impl AccountTransaction {
    /// The three address-bearing fields, in from/to/contract order.
    pub fn address_fields(&self) -> [Option<&str>; 3] {
        [
            self.from_address.as_deref(),
            self.to_address.as_deref(),
            self.contract_address.as_deref(),
        ]
    }
}

/// Phishing risk request: a counterparty address plus local history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhishingRiskRequest {
    pub address: String,
    #[serde(default = "default_chain")]
    pub chain: String,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub transactions: Option<Vec<AccountTransaction>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagInfo {
    pub source: String,
    pub label: String,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ContractCodeInfo {
    pub verified: bool,
    #[serde(default)]
    pub source_code: Option<String>,
    #[serde(default)]
    pub bytecode: Option<String>,
    #[serde(default)]
    pub compiler_version: Option<String>,
    #[serde(default)]
    pub abi: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ContractPermissions {
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub admin: Option<String>,
    #[serde(default)]
    pub can_upgrade: Option<bool>,
    #[serde(default)]
    pub can_pause: Option<bool>,
    #[serde(default)]
    pub can_blacklist: Option<bool>,
    #[serde(default)]
    pub can_mint: Option<bool>,
    #[serde(default)]
    pub can_burn: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ContractProxyInfo {
    #[serde(default)]
    pub is_proxy: Option<bool>,
    #[serde(default)]
    pub implementation_address: Option<String>,
    #[serde(default)]
    pub admin_address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ContractCreatorInfo {
    #[serde(default)]
    pub creator_address: Option<String>,
    #[serde(default)]
    pub creation_tx_hash: Option<String>,
    #[serde(default)]
    pub creation_timestamp: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TokenBehaviorFlags {
    #[serde(default)]
    pub has_transfer_tax: Option<bool>,
    #[serde(default)]
    pub tax_changeable: Option<bool>,
    #[serde(default)]
    pub max_tx_limit: Option<bool>,
    #[serde(default)]
    pub max_wallet_limit: Option<bool>,
    #[serde(default)]
    pub trading_restrictions: Option<bool>,
}

/// Contract risk request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractRiskRequest {
    pub contract_address: String,
    #[serde(default = "default_chain")]
    pub chain: String,
    #[serde(default)]
    pub lang: Option<String>,
    /// approve | swap | mint | stake | contract_call
    #[serde(default)]
    pub interaction_type: Option<String>,
    #[serde(default)]
    pub creator: Option<ContractCreatorInfo>,
    #[serde(default)]
    pub proxy: Option<ContractProxyInfo>,
    #[serde(default)]
    pub permissions: Option<ContractPermissions>,
    #[serde(default)]
    pub token_flags: Option<TokenBehaviorFlags>,
    #[serde(default)]
    pub code: Option<ContractCodeInfo>,
    #[serde(default)]
    pub tags: Option<Vec<TagInfo>>,
}

/// Pool reserves as reported by the wallet. Amounts are decimal strings so
/// 18-decimal token quantities survive transport unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlippagePoolStats {
    #[serde(default)]
    pub price_impact_pct: Option<f64>,
    #[serde(default)]
    pub token_pay_amount: Option<String>,
    #[serde(default)]
    pub token_get_amount: Option<String>,
    #[serde(default = "default_pool_type", rename = "type")]
    pub pool_type: Option<String>,
}

impl Default for SlippagePoolStats {
    fn default() -> Self {
        Self {
            price_impact_pct: None,
            token_pay_amount: None,
            token_get_amount: None,
            pool_type: default_pool_type(),
        }
    }
}

/// Slippage risk request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlippageRiskRequest {
    pub pool_address: String,
    #[serde(default = "default_chain")]
    pub chain: String,
    #[serde(default)]
    pub lang: Option<String>,
    pub token_pay_amount: String,
    #[serde(default = "default_swap")]
    pub interaction_type: Option<String>,
    #[serde(default)]
    pub pool: Option<SlippagePoolStats>,
}

// ── Similarity ──────────────────────────────────────────────────────────────

/// Per-candidate similarity against the target address.
///
/// Every component lies in [0, 1]; `similarity` is the maximum of the four,
/// so it is never below any component.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimilarityScore {
    pub address: String,
    pub prefix_match_ratio: f64,
    pub suffix_match_ratio: f64,
    pub levenshtein_similarity: f64,
    pub head_bag_similarity: f64,
    pub similarity: f64,
}

/// Ranked similarity evidence for one target address
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SimilarityContext {
    pub target_address: String,
    pub candidate_count: usize,
    /// Sorted by `similarity` descending, ties by address ascending
    pub candidates: Vec<SimilarityScore>,
    pub most_similar_address: Option<String>,
    pub most_similar_similarity: f64,
    pub high_similarity_count: usize,
    /// Most recent transactions touching the top match, newest first
    pub most_similar_transactions: Vec<AccountTransaction>,
}

// ── Slippage ────────────────────────────────────────────────────────────────

/// How an estimate was (or was not) produced
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SlippageAssumption {
    ConstantProductAmm,
    InsufficientData,
    InvalidOutput,
}

/// Constant-product slippage estimate, or an insufficient-data sentinel.
///
/// Prices and amounts keep the unbounded range of raw token quantities; the
/// percentage is always within [0, 100] and fits a `Decimal`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SlippageEstimate {
    pub has_required_amounts: bool,
    pub assumption: SlippageAssumption,
    pub spot_price: Option<BigDecimal>,
    pub execution_price: Option<BigDecimal>,
    pub output_after_trade: Option<BigDecimal>,
    pub estimated_slippage_pct: Decimal,
    pub pool_type: String,
    pub price_impact_pct: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SlippageLevel {
    High,
    Medium,
    Low,
    Unknown,
}

impl SlippageLevel {
    pub fn as_risk_level(self) -> RiskLevel {
        match self {
            SlippageLevel::High => RiskLevel::High,
            SlippageLevel::Medium => RiskLevel::Medium,
            SlippageLevel::Low => RiskLevel::Low,
            SlippageLevel::Unknown => RiskLevel::Unknown,
        }
    }

    pub fn label(self, lang: Lang) -> &'static str {
        self.as_risk_level().label(lang)
    }
}

// ── Signals and reports ─────────────────────────────────────────────────────

/// Behavioural counters over a transaction history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PhishingSignals {
    pub tx_count: usize,
    pub failed_count: usize,
    pub failed_ratio: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ContractSignals {
    pub code_verified: Option<bool>,
    pub is_proxy: Option<bool>,
    pub enabled_privileges: Vec<String>,
    pub risky_token_flags: Vec<String>,
    pub tag_count: usize,
    pub suspicious_tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhishingReport {
    pub address: String,
    pub chain: String,
    pub lang: Lang,
    pub signals: PhishingSignals,
    pub similarity: SimilarityContext,
    pub similarity_method: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContractReport {
    pub contract_address: String,
    pub chain: String,
    pub lang: Lang,
    pub interaction_type: Option<String>,
    pub signals: ContractSignals,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SlippageReport {
    pub pool_address: String,
    pub chain: String,
    pub lang: Lang,
    pub estimate: SlippageEstimate,
    pub level: SlippageLevel,
}
