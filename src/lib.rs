//! Relief Algo - Request triage and resource matching for disaster relief
//!
//! This library provides the core engine of the relief coordination
//! platform: priority scoring for incoming aid requests, fuzzy
//! keyword/geographic matching against the resource pool, and the approval
//! workflow that ties them together.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{
    haversine_distance, priority_score, similarity_score, GeoBounds, MatchWeights, Matcher,
    PriorityFactors, SynonymTable, UrgencyTier,
};
pub use crate::models::{MatchOutcome, MatchingStatus, ReliefRequest, Resource};
