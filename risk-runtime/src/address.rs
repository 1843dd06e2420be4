//! Canonical address form used by the similarity engine.

/// Length of a canonical address: 20 bytes as lowercase hex, no prefix.
pub const ADDRESS_HEX_LEN: usize = 40;

/// Normalize any address-like string.
///
/// Trims, lowercases, strips one leading `0x`, drops every character outside
/// `[0-9a-f]` and keeps at most 40 characters. Never fails; a result shorter
/// than 40 characters means the input was not a usable address.
pub fn normalize_address(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return String::new();
    };
    let lowered = raw.trim().to_lowercase();
    let body = lowered.strip_prefix("0x").unwrap_or(&lowered);
    body.chars()
        .filter(|c| c.is_ascii_hexdigit())
        .take(ADDRESS_HEX_LEN)
        .collect()
}

/// True when `normalized` is a full 40-character canonical address.
pub fn is_canonical(normalized: &str) -> bool {
    normalized.len() == ADDRESS_HEX_LEN
}

/// Normalize and keep only full-length results.
pub fn canonical_address(raw: Option<&str>) -> Option<String> {
    let normalized = normalize_address(raw);
    is_canonical(&normalized).then_some(normalized)
}
