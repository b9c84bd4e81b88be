use crate::models::Resource;

/// Check whether a resource may enter matching at all
///
/// Eligible means status `ready` with stock on hand. The pool query already
/// filters on both, but the matcher re-checks so a stale pool snapshot can
/// never produce a match against an empty shelf.
#[inline]
pub fn is_eligible(resource: &Resource) -> bool {
    resource.is_ready() && resource.quantity > 0
}

/// Check whether two raw labels share any literal word
///
/// Fallback admissibility test: a candidate whose keyword similarity is zero
/// survives only if the raw labels still share a word. Words shorter than
/// three characters are ignored; comparison is case-insensitive containment
/// on the raw (un-normalized) text.
pub fn has_common_words(label_a: &str, label_b: &str) -> bool {
    let lower_a = label_a.to_lowercase();
    let lower_b = label_b.to_lowercase();
    let words_a: Vec<&str> = lower_a.split_whitespace().filter(|w| w.chars().count() > 2).collect();
    let words_b: Vec<&str> = lower_b.split_whitespace().filter(|w| w.chars().count() > 2).collect();

    for a in &words_a {
        for b in &words_b {
            if a == b || a.contains(b) || b.contains(a) {
                return true;
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(status: &str, quantity: i32) -> Resource {
        Resource {
            id: 1,
            name: "Test".to_string(),
            category: "nuoc uong".to_string(),
            quantity,
            minimum_reserve: 10,
            status: status.to_string(),
            latitude: 16.0,
            longitude: 108.0,
        }
    }

    #[test]
    fn test_eligibility() {
        assert!(is_eligible(&resource("ready", 5)));
        assert!(!is_eligible(&resource("ready", 0)));
        assert!(!is_eligible(&resource("depleted", 5)));
    }

    #[test]
    fn test_common_words_exact() {
        assert!(has_common_words("nuoc sach", "nuoc uong"));
    }

    #[test]
    fn test_common_words_containment() {
        assert!(has_common_words("food packages", "package"));
    }

    #[test]
    fn test_common_words_ignores_short_words() {
        assert!(!has_common_words("o to", "an ca"));
    }

    #[test]
    fn test_no_common_words() {
        assert!(!has_common_words("nuoc sach", "thuoc men"));
    }
}
