use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use risk_runtime::summary::{normalize_slippage_summary, sanitize_summary};
use risk_runtime::{
    ContractRiskRequest, Lang, PhishingRiskRequest, RiskConfig, RiskLevel, SlippageRiskRequest,
    build_contract_report, build_phishing_report, build_slippage_report,
};

/// Compute structured risk signals from a JSON request.
///
/// Reads the request from INPUT, or stdin when INPUT is omitted or `-`, and
/// writes the report as JSON to stdout.
#[derive(Parser)]
#[command(name = "risk-signals", version)]
struct Cli {
    /// Pretty-print the JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Address-similarity context and behaviour counters for a counterparty
    Phishing { input: Option<PathBuf> },
    /// Privilege, token-flag and tag signals for a contract
    Contract { input: Option<PathBuf> },
    /// Constant-product slippage estimate and level
    Slippage { input: Option<PathBuf> },
    /// Apply the client-facing summary contract to model-written text
    Summary {
        /// high | medium | low | unknown (or 高/中/低/未知); not needed with --slippage
        #[arg(long, required_unless_present = "slippage")]
        level: Option<String>,
        /// Response language; anything starting with `en` is English
        #[arg(long)]
        lang: Option<String>,
        /// Use the one-sentence slippage normalization instead
        #[arg(long)]
        slippage: bool,
        input: Option<PathBuf>,
    },
}

fn setup_log() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{EnvFilter, fmt};
    if tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .try_init()
        .is_err()
    {}
}

fn read_input(input: Option<&PathBuf>) -> anyhow::Result<String> {
    match input {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("reading request from {}", path.display())),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading request from stdin")?;
            Ok(buf)
        }
    }
}

fn emit<T: serde::Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}

/// Slippage summaries are normalized without a level, so `risk_level` is
/// only echoed back when one was given.
fn summarize(
    text: &str,
    level: Option<&str>,
    lang: Lang,
    slippage: bool,
    config: &RiskConfig,
) -> anyhow::Result<serde_json::Value> {
    let level = match level {
        Some(raw) => match RiskLevel::parse_label(raw) {
            Some(level) => Some(level),
            None => bail!("unknown risk level: {raw}"),
        },
        None => None,
    };

    let summary = match (slippage, level) {
        (true, _) => normalize_slippage_summary(text, lang, config.summary_max_chars),
        (false, Some(level)) => sanitize_summary(text, level, lang),
        (false, None) => bail!("--level is required unless --slippage is set"),
    };

    let mut out = serde_json::json!({ "summary": summary });
    if let Some(level) = level {
        out["risk_level"] = level.label(lang).into();
    }
    Ok(out)
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    setup_log();

    let cli = Cli::parse();
    let config = RiskConfig::from_env();
    config.validate().context("invalid RISK_* configuration")?;
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Command::Phishing { input } => {
            let request = PhishingRiskRequest::from_json(&read_input(input.as_ref())?)?;
            let report = build_phishing_report(&config, &request);
            tracing::info!(
                candidates = report.similarity.candidate_count,
                top = report.similarity.most_similar_similarity,
                "phishing signals computed"
            );
            emit(&report, cli.pretty)
        }
        Command::Contract { input } => {
            let request = ContractRiskRequest::from_json(&read_input(input.as_ref())?)?;
            let report = build_contract_report(&request);
            tracing::info!(contract = %report.contract_address, "contract signals computed");
            emit(&report, cli.pretty)
        }
        Command::Slippage { input } => {
            let request = SlippageRiskRequest::from_json(&read_input(input.as_ref())?)?;
            let report = build_slippage_report(&config, &request);
            tracing::info!(
                pool = %report.pool_address,
                slippage_pct = %report.estimate.estimated_slippage_pct,
                level = ?report.level,
                "slippage estimate computed"
            );
            emit(&report, cli.pretty)
        }
        Command::Summary {
            level,
            lang,
            slippage,
            input,
        } => {
            let lang = Lang::normalize(lang.as_deref());
            let text = read_input(input.as_ref())?;
            let out = summarize(&text, level.as_deref(), lang, slippage, &config)?;
            emit(&out, cli.pretty)
        }
    }
}
