use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonical aid categories recognized by the triage engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Rescue,
    Medical,
    Water,
    Food,
    Shelter,
    Clothing,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Rescue => "rescue",
            Category::Medical => "medical",
            Category::Water => "water",
            Category::Food => "food",
            Category::Shelter => "shelter",
            Category::Clothing => "clothing",
        }
    }
}

/// One synonym group: the normalized substrings that detect a category and
/// the canonical tokens the extractor emits for it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynonymGroup {
    pub category: Category,
    pub variants: Vec<String>,
    pub tokens: Vec<String>,
}

/// Synonym table for keyword extraction and category detection
///
/// The table is plain configuration data: it is constructed once (from the
/// built-in groups or from settings) and passed by reference into the
/// extractor, so matching behavior is fully determined by explicit inputs.
/// Group order matters: `detect` returns the first group whose variant
/// occurs in the label, and the built-in groups are ordered by triage
/// priority so a label naming several needs resolves to the most urgent one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynonymTable {
    groups: Vec<SynonymGroup>,
}

impl SynonymTable {
    pub fn new(groups: Vec<SynonymGroup>) -> Self {
        Self { groups }
    }

    /// The default relief-domain groups (Vietnamese ASCII-folded + English)
    pub fn builtin() -> Self {
        fn group(category: Category, variants: &[&str], tokens: &[&str]) -> SynonymGroup {
            SynonymGroup {
                category,
                variants: variants.iter().map(|s| s.to_string()).collect(),
                tokens: tokens.iter().map(|s| s.to_string()).collect(),
            }
        }

        Self::new(vec![
            group(Category::Rescue, &["cuu ho", "rescue"], &["cuuho", "rescue"]),
            group(
                Category::Medical,
                &["thuoc", "medical", "yte", "y te"],
                &["thuoc", "medical", "yte"],
            ),
            group(Category::Water, &["nuoc", "water"], &["nuoc", "water"]),
            group(
                Category::Food,
                &["thuc pham", "food", "luong thuc"],
                &["thucpham", "food"],
            ),
            group(Category::Shelter, &["cho o", "shelter"], &["choo", "shelter"]),
            group(
                Category::Clothing,
                &["quan ao", "clothing"],
                &["quanao", "clothing"],
            ),
        ])
    }

    pub fn groups(&self) -> &[SynonymGroup] {
        &self.groups
    }

    /// Detect the canonical category of a free-text label, if any
    pub fn detect(&self, label: &str) -> Option<Category> {
        let normalized = normalize(label);
        self.groups
            .iter()
            .find(|g| g.variants.iter().any(|v| normalized.contains(v.as_str())))
            .map(|g| g.category)
    }
}

impl Default for SynonymTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Lowercase a label and strip diacritics (NFD + combining-mark removal)
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Extract the keyword set of a free-text category label
///
/// The result contains the canonical tokens of every synonym group whose
/// variant occurs in the normalized label, plus each whitespace-delimited
/// word longer than two characters. Request and resource labels go through
/// the same extraction, so similarity comparison is symmetric.
pub fn extract_keywords(label: &str, synonyms: &SynonymTable) -> BTreeSet<String> {
    let normalized = normalize(label);
    let mut keywords = BTreeSet::new();

    for group in synonyms.groups() {
        if group.variants.iter().any(|v| normalized.contains(v.as_str())) {
            for token in &group.tokens {
                keywords.insert(token.clone());
            }
        }
    }

    for word in normalized.split_whitespace() {
        if word.chars().count() > 2 {
            keywords.insert(word.to_string());
        }
    }

    keywords
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_diacritics() {
        assert_eq!(normalize("Nước uống"), "nuoc uong");
        assert_eq!(normalize("Thực phẩm"), "thuc pham");
    }

    #[test]
    fn test_extract_adds_canonical_tokens() {
        let table = SynonymTable::builtin();
        let keywords = extract_keywords("Nước uống", &table);

        assert!(keywords.contains("nuoc"));
        assert!(keywords.contains("water"));
        assert!(keywords.contains("uong"));
    }

    #[test]
    fn test_extract_drops_short_words() {
        let table = SynonymTable::builtin();
        let keywords = extract_keywords("cho o an toan", &table);

        // "o" and "an" are too short to survive as words, but the shelter
        // synonym still fires on the "cho o" substring
        assert!(keywords.contains("choo"));
        assert!(keywords.contains("shelter"));
        assert!(!keywords.contains("o"));
        assert!(!keywords.contains("an"));
    }

    #[test]
    fn test_extract_is_a_set() {
        let table = SynonymTable::builtin();
        let keywords = extract_keywords("water water water", &table);

        assert_eq!(keywords.iter().filter(|k| *k == "water").count(), 1);
    }

    #[test]
    fn test_detect_category() {
        let table = SynonymTable::builtin();

        assert_eq!(table.detect("Thực phẩm khô"), Some(Category::Food));
        assert_eq!(table.detect("medical supplies"), Some(Category::Medical));
        assert_eq!(table.detect("xang dau"), None);
    }

    #[test]
    fn test_detect_prefers_higher_priority() {
        let table = SynonymTable::builtin();

        // Label naming both rescue and food resolves to rescue
        assert_eq!(table.detect("cuu ho va thuc pham"), Some(Category::Rescue));
    }

    #[test]
    fn test_request_and_resource_labels_extract_identically() {
        let table = SynonymTable::builtin();

        let a = extract_keywords("nuoc sach", &table);
        let b = extract_keywords("Nuoc sach", &table);
        assert_eq!(a, b);
    }
}
