use crate::error::RiskError;
use crate::slippage::parse_amount;
use crate::types::*;
use serde::de::DeserializeOwned;

fn decode<T: DeserializeOwned>(json: &str) -> Result<T, RiskError> {
    serde_json::from_str(json).map_err(|e| RiskError::InvalidRequest(e.to_string()))
}

impl PhishingRiskRequest {
    pub fn from_json(json: &str) -> Result<Self, RiskError> {
        decode(json)
    }
}

impl ContractRiskRequest {
    pub fn from_json(json: &str) -> Result<Self, RiskError> {
        decode(json)
    }
}

impl SlippageRiskRequest {
    pub fn from_json(json: &str) -> Result<Self, RiskError> {
        decode(json)
    }
}

pub struct PhishingRequestBuilder {
    address: Option<String>,
    chain: Option<String>,
    lang: Option<String>,
    transactions: Vec<AccountTransaction>,
}

impl PhishingRequestBuilder {
    pub fn new() -> Self {
        Self {
            address: None,
            chain: None,
            lang: None,
            transactions: Vec::new(),
        }
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn chain(mut self, chain: impl Into<String>) -> Self {
        self.chain = Some(chain.into());
        self
    }

    pub fn lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    pub fn transaction(mut self, tx: AccountTransaction) -> Self {
        self.transactions.push(tx);
        self
    }

    pub fn transactions(mut self, txs: impl IntoIterator<Item = AccountTransaction>) -> Self {
        self.transactions.extend(txs);
        self
    }

    pub fn build(self) -> Result<PhishingRiskRequest, RiskError> {
        let address = self
            .address
            .filter(|a| !a.trim().is_empty())
            .ok_or_else(|| RiskError::InvalidRequest("address required".into()))?;

        Ok(PhishingRiskRequest {
            address,
            chain: self.chain.unwrap_or_else(|| "monad".into()),
            lang: self.lang,
            transactions: Some(self.transactions),
        })
    }
}

impl Default for PhishingRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub struct SlippageRequestBuilder {
    pool_address: Option<String>,
    chain: Option<String>,
    lang: Option<String>,
    token_pay_amount: Option<String>,
    reserve_in: Option<String>,
    reserve_out: Option<String>,
    pool_type: Option<String>,
    price_impact_pct: Option<f64>,
}

impl SlippageRequestBuilder {
    pub fn new() -> Self {
        Self {
            pool_address: None,
            chain: None,
            lang: None,
            token_pay_amount: None,
            reserve_in: None,
            reserve_out: None,
            pool_type: None,
            price_impact_pct: None,
        }
    }

    pub fn pool_address(mut self, address: impl Into<String>) -> Self {
        self.pool_address = Some(address.into());
        self
    }

    pub fn chain(mut self, chain: impl Into<String>) -> Self {
        self.chain = Some(chain.into());
        self
    }

    pub fn lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    pub fn token_pay_amount(mut self, amount: impl Into<String>) -> Self {
        self.token_pay_amount = Some(amount.into());
        self
    }

    /// Pool reserves on the pay side and the receive side.
    pub fn reserves(mut self, reserve_in: impl Into<String>, reserve_out: impl Into<String>) -> Self {
        self.reserve_in = Some(reserve_in.into());
        self.reserve_out = Some(reserve_out.into());
        self
    }

    pub fn pool_type(mut self, pool_type: impl Into<String>) -> Self {
        self.pool_type = Some(pool_type.into());
        self
    }

    pub fn price_impact_pct(mut self, pct: f64) -> Self {
        self.price_impact_pct = Some(pct);
        self
    }

    /// Amounts given to the builder must parse; wire requests decoded with
    /// `from_json` are not held to this and degrade to the sentinel instead.
    pub fn build(self) -> Result<SlippageRiskRequest, RiskError> {
        let pool_address = self
            .pool_address
            .ok_or_else(|| RiskError::InvalidRequest("pool_address required".into()))?;
        let token_pay_amount = self
            .token_pay_amount
            .ok_or_else(|| RiskError::InvalidRequest("token_pay_amount required".into()))?;

        for (field, value) in [
            ("token_pay_amount", Some(&token_pay_amount)),
            ("pool.token_pay_amount", self.reserve_in.as_ref()),
            ("pool.token_get_amount", self.reserve_out.as_ref()),
        ] {
            if let Some(value) = value {
                if parse_amount(Some(value.as_str())).is_none() {
                    return Err(RiskError::InvalidAmount {
                        field: field.into(),
                        value: value.clone(),
                    });
                }
            }
        }

        let has_pool = self.reserve_in.is_some()
            || self.reserve_out.is_some()
            || self.pool_type.is_some()
            || self.price_impact_pct.is_some();
        let pool = has_pool.then(|| SlippagePoolStats {
            price_impact_pct: self.price_impact_pct,
            token_pay_amount: self.reserve_in,
            token_get_amount: self.reserve_out,
            pool_type: self.pool_type.or_else(|| Some("AMM".into())),
        });

        Ok(SlippageRiskRequest {
            pool_address,
            chain: self.chain.unwrap_or_else(|| "monad".into()),
            lang: self.lang,
            token_pay_amount,
            interaction_type: Some("swap".into()),
            pool,
        })
    }
}

impl Default for SlippageRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
