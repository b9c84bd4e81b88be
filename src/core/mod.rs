// Core algorithm exports
pub mod distance;
pub mod filters;
pub mod keywords;
pub mod matcher;
pub mod scoring;
pub mod similarity;

pub use distance::{haversine_distance, GeoBounds};
pub use filters::{has_common_words, is_eligible};
pub use keywords::{extract_keywords, normalize, Category, SynonymGroup, SynonymTable};
pub use matcher::{MatchWeights, Matcher};
pub use scoring::{priority_score, PriorityFactors, UrgencyTier, WeatherSeverity};
pub use similarity::similarity_score;
