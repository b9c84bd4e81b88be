use crate::core::{
    distance::haversine_distance,
    filters::{has_common_words, is_eligible},
    keywords::{extract_keywords, SynonymTable},
    similarity::similarity_score,
};
use crate::models::{MatchCandidate, MatchOutcome, Resource};

/// Weights of the composite candidate score
///
/// With the defaults the composite is
/// `similarity * 50 + max(0, 100 - distance_km * 2) + availability_ratio * 50`.
#[derive(Debug, Clone, Copy)]
pub struct MatchWeights {
    pub similarity: f64,
    pub proximity_base: f64,
    pub proximity_per_km: f64,
    pub availability: f64,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            similarity: 50.0,
            proximity_base: 100.0,
            proximity_per_km: 2.0,
            availability: 50.0,
        }
    }
}

/// Resource matching orchestrator
///
/// # Pipeline stages
/// 1. Keyword extraction from the request label
/// 2. Per-candidate keyword similarity
/// 3. Admissibility: zero similarity is discarded unless the raw labels
///    still share a literal word
/// 4. Composite scoring (similarity, proximity, availability) and ranking
#[derive(Debug, Clone)]
pub struct Matcher {
    synonyms: SynonymTable,
    weights: MatchWeights,
}

impl Matcher {
    pub fn new(synonyms: SynonymTable, weights: MatchWeights) -> Self {
        Self { synonyms, weights }
    }

    pub fn with_defaults() -> Self {
        Self::new(SynonymTable::builtin(), MatchWeights::default())
    }

    pub fn synonyms(&self) -> &SynonymTable {
        &self.synonyms
    }

    /// Rank the resource pool against a request and pick the best candidate
    ///
    /// Returns `Matched` with the winner plus up to two runner-ups, or
    /// `NoMatch` when no candidate survives admissibility. An empty pool is
    /// a normal `NoMatch`, never an error.
    ///
    /// # Arguments
    /// * `request_label` - the request's free-text type label
    /// * `lat`, `lng` - the request's submission coordinates
    /// * `pool` - ready-status resources fetched from the store
    pub fn rank(&self, request_label: &str, lat: f64, lng: f64, pool: Vec<Resource>) -> MatchOutcome {
        let request_keywords = extract_keywords(request_label, &self.synonyms);

        let mut candidates: Vec<MatchCandidate> = pool
            .into_iter()
            .filter(is_eligible)
            .filter_map(|resource| {
                let resource_keywords = extract_keywords(&resource.category, &self.synonyms);
                let similarity = similarity_score(&request_keywords, &resource_keywords);

                // Zero similarity survives only on a literal common word
                if similarity == 0.0 && !has_common_words(request_label, &resource.category) {
                    return None;
                }

                let distance_km =
                    haversine_distance(lat, lng, resource.latitude, resource.longitude);

                let composite_score = similarity * self.weights.similarity
                    + (self.weights.proximity_base - distance_km * self.weights.proximity_per_km)
                        .max(0.0)
                    + resource.availability_ratio() * self.weights.availability;

                Some(MatchCandidate {
                    resource,
                    composite_score,
                    distance_km,
                    similarity,
                })
            })
            .collect();

        // Highest composite first; ties go to the closer center
        candidates.sort_by(|a, b| {
            b.composite_score
                .partial_cmp(&a.composite_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| {
                    a.distance_km
                        .partial_cmp(&b.distance_km)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
        });

        let mut ranked = candidates.into_iter();
        match ranked.next() {
            Some(best) => MatchOutcome::Matched {
                candidate: best,
                alternatives: ranked.take(2).collect(),
            },
            None => MatchOutcome::NoMatch,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(id: i64, category: &str, quantity: i32, lat: f64, lng: f64) -> Resource {
        Resource {
            id,
            name: format!("Resource {}", id),
            category: category.to_string(),
            quantity,
            minimum_reserve: 20,
            status: "ready".to_string(),
            latitude: lat,
            longitude: lng,
        }
    }

    #[test]
    fn test_empty_pool_is_no_match() {
        let matcher = Matcher::with_defaults();

        let outcome = matcher.rank("nuoc sach", 16.0, 108.0, vec![]);
        assert!(matches!(outcome, MatchOutcome::NoMatch));
    }

    #[test]
    fn test_water_request_prefers_water_resource() {
        let matcher = Matcher::with_defaults();

        let pool = vec![
            resource(1, "Thực phẩm", 100, 16.0, 108.0),
            resource(2, "Nước uống", 100, 16.0, 108.0),
        ];

        match matcher.rank("nuoc sach", 16.0, 108.0, pool) {
            MatchOutcome::Matched { candidate, .. } => {
                assert_eq!(candidate.resource.id, 2);
                assert!(candidate.similarity > 0.0);
            }
            other => panic!("Expected a match, got {:?}", other),
        }
    }

    #[test]
    fn test_unrelated_candidates_are_discarded() {
        let matcher = Matcher::with_defaults();

        let pool = vec![resource(1, "xang dau", 100, 16.0, 108.0)];

        let outcome = matcher.rank("nuoc sach", 16.0, 108.0, pool);
        assert!(matches!(outcome, MatchOutcome::NoMatch));
    }

    #[test]
    fn test_ineligible_resources_are_skipped() {
        let matcher = Matcher::with_defaults();

        let depleted = resource(1, "Nước uống", 0, 16.0, 108.0);
        let mut reserved = resource(2, "Nước uống", 50, 16.0, 108.0);
        reserved.status = "allocated".to_string();

        let outcome = matcher.rank("nuoc sach", 16.0, 108.0, vec![depleted, reserved]);
        assert!(matches!(outcome, MatchOutcome::NoMatch));
    }

    #[test]
    fn test_closer_center_wins_between_equal_labels() {
        let matcher = Matcher::with_defaults();

        let pool = vec![
            resource(1, "Nước uống", 100, 20.0, 106.0), // far from the request
            resource(2, "Nước uống", 100, 16.05, 108.05), // a few km away
        ];

        match matcher.rank("nuoc uong", 16.0, 108.0, pool) {
            MatchOutcome::Matched { candidate, alternatives } => {
                assert_eq!(candidate.resource.id, 2);
                assert_eq!(alternatives.len(), 1);
                assert!(candidate.distance_km < alternatives[0].distance_km);
            }
            other => panic!("Expected a match, got {:?}", other),
        }
    }

    #[test]
    fn test_at_most_two_alternatives() {
        let matcher = Matcher::with_defaults();

        let pool = (1..=6)
            .map(|i| resource(i, "Nước uống", 100, 16.0 + i as f64 * 0.01, 108.0))
            .collect();

        match matcher.rank("nuoc uong", 16.0, 108.0, pool) {
            MatchOutcome::Matched { alternatives, .. } => {
                assert_eq!(alternatives.len(), 2);
            }
            other => panic!("Expected a match, got {:?}", other),
        }
    }

    #[test]
    fn test_availability_breaks_near_ties() {
        let matcher = Matcher::with_defaults();

        let mut scarce = resource(1, "Nước uống", 5, 16.0, 108.0);
        scarce.minimum_reserve = 95;
        let stocked = resource(2, "Nước uống", 95, 16.0, 108.0);

        match matcher.rank("nuoc uong", 16.0, 108.0, vec![scarce, stocked]) {
            MatchOutcome::Matched { candidate, .. } => {
                assert_eq!(candidate.resource.id, 2);
            }
            other => panic!("Expected a match, got {:?}", other),
        }
    }
}
