//! Pairwise address similarity.
//!
//! Four independent metrics over two normalized addresses, each in [0, 1].
//! The composite is their maximum: phishing clones usually optimize one
//! visual dimension (prefix, suffix, or a shuffled head), so any single
//! strong resemblance should dominate the score.

use crate::address::ADDRESS_HEX_LEN;
use crate::types::SimilarityScore;

/// Label attached to reports so consumers know how the composite was formed.
pub const SIMILARITY_METHOD: &str = "max(prefix,suffix,levenshtein,head_bag_6)";

fn ratio(matches: usize) -> f64 {
    (matches as f64 / ADDRESS_HEX_LEN as f64).clamp(0.0, 1.0)
}

/// Matching characters from index 0 up to the first mismatch, over 40.
pub fn prefix_match_ratio(a: &str, b: &str) -> f64 {
    let matches = a
        .bytes()
        .zip(b.bytes())
        .take_while(|(x, y)| x == y)
        .count();
    ratio(matches)
}

/// Matching characters from the last index backwards, over 40.
pub fn suffix_match_ratio(a: &str, b: &str) -> f64 {
    let matches = a
        .bytes()
        .rev()
        .zip(b.bytes().rev())
        .take_while(|(x, y)| x == y)
        .count();
    ratio(matches)
}

/// Classic unit-cost edit distance with two rolling rows.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a = a.as_bytes();
    let b = b.as_bytes();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            let deletion = prev[j + 1] + 1;
            let insertion = curr[j] + 1;
            curr[j + 1] = substitution.min(deletion).min(insertion);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// `1 - distance / 40`, floored at zero.
pub fn levenshtein_similarity(a: &str, b: &str) -> f64 {
    let distance = levenshtein_distance(a, b) as f64;
    (1.0 - distance / ADDRESS_HEX_LEN as f64).clamp(0.0, 1.0)
}

/// Multiset overlap of the first `head_len` characters of each string:
/// `2 * sum(min(count_a[c], count_b[c])) / (len(head_a) + len(head_b))`.
///
/// Catches clones whose leading characters are locally permuted, which plain
/// prefix matching scores poorly.
pub fn head_bag_similarity(a: &str, b: &str, head_len: usize) -> f64 {
    let head_a = &a.as_bytes()[..a.len().min(head_len)];
    let head_b = &b.as_bytes()[..b.len().min(head_len)];
    let total = head_a.len() + head_b.len();
    if total == 0 {
        return 0.0;
    }

    let mut counts_a = [0usize; 256];
    let mut counts_b = [0usize; 256];
    for &c in head_a {
        counts_a[c as usize] += 1;
    }
    for &c in head_b {
        counts_b[c as usize] += 1;
    }
    let overlap: usize = counts_a
        .iter()
        .zip(counts_b.iter())
        .map(|(x, y)| (*x).min(*y))
        .sum();

    (2.0 * overlap as f64 / total as f64).clamp(0.0, 1.0)
}

/// Score `candidate` against `target`. Both are expected in canonical form.
pub fn score_pair(target: &str, candidate: &str, head_len: usize) -> SimilarityScore {
    let prefix = prefix_match_ratio(target, candidate);
    let suffix = suffix_match_ratio(target, candidate);
    let levenshtein = levenshtein_similarity(target, candidate);
    let head_bag = head_bag_similarity(target, candidate, head_len);
    let similarity = prefix.max(suffix).max(levenshtein).max(head_bag);

    SimilarityScore {
        address: candidate.to_string(),
        prefix_match_ratio: prefix,
        suffix_match_ratio: suffix,
        levenshtein_similarity: levenshtein,
        head_bag_similarity: head_bag,
        similarity,
    }
}
