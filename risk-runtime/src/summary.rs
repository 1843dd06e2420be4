//! Guards applied to model-written summaries before they reach a client.
//!
//! Similarity components, thresholds and raw percentages are internal
//! evidence. A summary that mentions them is replaced with a fixed sentence
//! for the resulting risk level.

use crate::types::{Lang, RiskLevel};

/// Lowercased fragments naming internal metrics or tuning knobs.
const INTERNAL_MARKERS: &[&str] = &[
    "prefix_match",
    "prefix match",
    "suffix_match",
    "suffix match",
    "levenshtein",
    "edit distance",
    "head_bag",
    "head bag",
    "composite",
    "similarity_method",
    "threshold",
    "编辑距离",
    "阈值",
];

const SENTENCE_TERMINATORS: &[char] = &['。', '！', '？', '.', '!', '?'];

pub fn canned_summary(level: RiskLevel, lang: Lang) -> &'static str {
    match (level, lang) {
        (RiskLevel::High, Lang::En) => {
            "Strong risk indicators were found; avoid interacting until the counterparty is verified."
        }
        (RiskLevel::Medium, Lang::En) => {
            "Some risk indicators were found; double-check the details before proceeding."
        }
        (RiskLevel::Low, Lang::En) => "No significant risk indicators were found, but stay cautious.",
        (RiskLevel::Unknown, Lang::En) => {
            "Insufficient data to assess the risk reliably; proceed with caution."
        }
        (RiskLevel::High, Lang::Zh) => "发现明显的风险信号，请在核实对方身份前避免交互。",
        (RiskLevel::Medium, Lang::Zh) => "发现部分风险信号，请在继续操作前仔细核对细节。",
        (RiskLevel::Low, Lang::Zh) => "未发现明显风险信号，但仍请保持谨慎。",
        (RiskLevel::Unknown, Lang::Zh) => "数据不足，无法可靠评估风险，请谨慎操作。",
    }
}

fn insufficient_slippage_summary(lang: Lang) -> &'static str {
    match lang {
        Lang::En => "Insufficient data, so slippage can only be judged conservatively.",
        Lang::Zh => "数据不足，因此只能对滑点做保守判断。",
    }
}

fn flatten(text: &str) -> String {
    text.trim().replace(['\r', '\n'], " ")
}

fn contains_raw_number(text: &str) -> bool {
    let chars: Vec<char> = text.chars().collect();
    chars.iter().enumerate().any(|(i, c)| match c {
        // "0.95", ".95" and the full-width point
        '.' | '．' => chars.get(i + 1).is_some_and(|n| n.is_ascii_digit()),
        // "9%", "9 %", "9  ％"
        '%' | '％' => chars[..i]
            .iter()
            .rev()
            .find(|p| !p.is_whitespace())
            .is_some_and(|p| p.is_ascii_digit()),
        _ => false,
    })
}

/// True when `text` names an internal metric or carries a decimal or
/// percentage figure.
pub fn summary_leaks_internals(text: &str) -> bool {
    let lowered = text.to_lowercase();
    INTERNAL_MARKERS.iter().any(|m| lowered.contains(m)) || contains_raw_number(text)
}

/// Return the summary unchanged if it is clean, otherwise the canned
/// sentence for `level` in `lang`.
pub fn sanitize_summary(text: &str, level: RiskLevel, lang: Lang) -> String {
    let flat = flatten(text);
    if flat.is_empty() {
        return canned_summary(level, lang).to_string();
    }
    if summary_leaks_internals(&flat) {
        tracing::warn!(?level, "summary leaked internal figures; replaced with canned text");
        return canned_summary(level, lang).to_string();
    }
    flat
}

/// Cut a slippage explanation at a sentence terminator, then to at most
/// `max_chars` characters.
///
/// Terminators are tried in priority order `。！？.!?`, not by position: the
/// first terminator kind that occurs past the opening character decides the
/// cut, at its first occurrence. "A! B." is kept whole because `.` outranks
/// `!` and only appears at the end.
pub fn normalize_slippage_summary(text: &str, lang: Lang, max_chars: usize) -> String {
    let mut flat = flatten(text);
    if flat.is_empty() {
        return insufficient_slippage_summary(lang).to_string();
    }

    for sep in SENTENCE_TERMINATORS {
        if let Some(idx) = flat.find(*sep) {
            if idx > 0 {
                flat.truncate(idx + sep.len_utf8());
                break;
            }
        }
    }

    flat.chars()
        .take(max_chars)
        .collect::<String>()
        .trim()
        .to_string()
}
