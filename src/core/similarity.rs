use std::collections::BTreeSet;

/// Score the similarity of two keyword sets, normalized to [0, 1]
///
/// For every token pair (one per set) points accumulate: exact match = 3,
/// containment = 2, similar tokens = 1. The sum is divided by
/// `|a| * |b| * 2` and clamped at 1.0. Returns 0 when either set is empty.
///
/// This is a cheap bag-of-words heuristic, not an embedding: near-equal
/// scores are expected, and ties are broken downstream by the composite
/// ranking (distance, availability), never by this score alone.
pub fn similarity_score(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let mut points = 0u32;
    for token_a in a {
        for token_b in b {
            if token_a == token_b {
                points += 3;
            } else if token_a.contains(token_b.as_str()) || token_b.contains(token_a.as_str()) {
                points += 2;
            } else if are_similar(token_a, token_b) {
                points += 1;
            }
        }
    }

    let max_points = (a.len() * b.len() * 2) as f64;
    (f64::from(points) / max_points).min(1.0)
}

/// Check whether two tokens are close variants of each other
///
/// Tokens qualify when their lengths differ by at most two and they share a
/// common prefix of at least three characters, or one contains the other.
#[inline]
fn are_similar(a: &str, b: &str) -> bool {
    let len_a = a.chars().count();
    let len_b = b.chars().count();
    if len_a.abs_diff(len_b) > 2 {
        return false;
    }

    let common_prefix = a
        .chars()
        .zip(b.chars())
        .take_while(|(ca, cb)| ca == cb)
        .count();
    if common_prefix >= 3 {
        return true;
    }

    a.contains(b) || b.contains(a)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(tokens: &[&str]) -> BTreeSet<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_set_scores_zero() {
        let empty = BTreeSet::new();
        let other = set(&["nuoc", "water"]);

        assert_eq!(similarity_score(&empty, &other), 0.0);
        assert_eq!(similarity_score(&other, &empty), 0.0);
    }

    #[test]
    fn test_symmetry() {
        let a = set(&["nuoc", "water", "sach"]);
        let b = set(&["nuoc", "uong"]);

        assert_eq!(similarity_score(&a, &b), similarity_score(&b, &a));
    }

    #[test]
    fn test_score_is_bounded() {
        // Identical singleton sets would hit 3/2 unclamped
        let a = set(&["water"]);
        let b = set(&["water"]);

        let score = similarity_score(&a, &b);
        assert!(score > 0.0 && score <= 1.0);
    }

    #[test]
    fn test_exact_beats_partial() {
        let request = set(&["nuoc", "water"]);
        let exact = set(&["nuoc", "water"]);
        let partial = set(&["nuocngot", "soda"]);

        assert!(similarity_score(&request, &exact) > similarity_score(&request, &partial));
    }

    #[test]
    fn test_prefix_variants_count() {
        // Same length, shared 3+ char prefix
        let a = set(&["thuoc"]);
        let b = set(&["thuon"]);

        assert!(similarity_score(&a, &b) > 0.0);
    }

    #[test]
    fn test_unrelated_tokens_score_zero() {
        let a = set(&["nuoc"]);
        let b = set(&["shelter"]);

        assert_eq!(similarity_score(&a, &b), 0.0);
    }
}
