pub mod error;
pub mod types;
pub mod config;
pub mod address;
pub mod similarity;
pub mod phishing;
pub mod signals;
pub mod slippage;
pub mod summary;
pub mod request;

pub use config::RiskConfig;
pub use error::RiskError;
pub use phishing::{build_phishing_report, build_similarity_context, build_similarity_context_with};
pub use request::{PhishingRequestBuilder, SlippageRequestBuilder};
pub use signals::build_contract_report;
pub use slippage::{build_slippage_report, estimate_amm_slippage};
pub use types::*;
