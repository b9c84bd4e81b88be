use serde::{Deserialize, Serialize};

use crate::core::keywords::Category;

/// Declared urgency tier of a relief request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyTier {
    High,
    Medium,
    Low,
}

impl UrgencyTier {
    /// Parse a stored urgency label; unrecognized labels degrade to Low
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "high" | "cao" => UrgencyTier::High,
            "medium" | "trung_binh" => UrgencyTier::Medium,
            "low" | "thap" => UrgencyTier::Low,
            _ => UrgencyTier::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyTier::High => "high",
            UrgencyTier::Medium => "medium",
            UrgencyTier::Low => "low",
        }
    }
}

/// Weather severity classes that raise triage priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherSeverity {
    Storm,
    Heat,
}

impl WeatherSeverity {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "storm" | "mua_bao" => Some(WeatherSeverity::Storm),
            "heat" | "nang_nong" => Some(WeatherSeverity::Heat),
            _ => None,
        }
    }
}

/// Inputs to the priority score
///
/// Everything time-dependent is explicit: the caller supplies the hours the
/// request has been waiting, so repeated calls with identical factors yield
/// identical scores.
#[derive(Debug, Clone)]
pub struct PriorityFactors {
    pub urgency: UrgencyTier,
    pub people_affected: u32,
    pub category: Option<Category>,
    pub hours_waiting: f64,
    /// Distance to the nearest matched center, if a match has been computed.
    /// `None` (no match yet) applies no penalty.
    pub nearest_distance_km: Option<f64>,
    pub weather: Option<WeatherSeverity>,
}

/// Compute the triage priority score, clamped to [0, 100]
///
/// Additive formula:
/// - urgency: high 40, medium 25, low 10
/// - people affected: >=100 -> 30, >=50 -> 25, >=20 -> 20, >=10 -> 15, else 10
/// - category: rescue 20, medical 18, water 15, food 12, shelter 10, other 8
/// - waiting time: +1 per 2 full hours, capped at +10
/// - distance: -10 beyond 50 km, -5 beyond 20 km
/// - weather: +15 storm, +5 heat
///
/// Total function: every input degrades to its lowest bucket, nothing fails.
pub fn priority_score(factors: &PriorityFactors) -> u8 {
    let mut score: i32 = 0;

    score += urgency_points(factors.urgency);
    score += people_points(factors.people_affected);
    score += category_points(factors.category);
    score += waiting_points(factors.hours_waiting);
    score -= distance_penalty(factors.nearest_distance_km);
    score += weather_points(factors.weather);

    score.clamp(0, 100) as u8
}

#[inline]
fn urgency_points(urgency: UrgencyTier) -> i32 {
    match urgency {
        UrgencyTier::High => 40,
        UrgencyTier::Medium => 25,
        UrgencyTier::Low => 10,
    }
}

#[inline]
fn people_points(people: u32) -> i32 {
    match people {
        p if p >= 100 => 30,
        p if p >= 50 => 25,
        p if p >= 20 => 20,
        p if p >= 10 => 15,
        _ => 10,
    }
}

#[inline]
fn category_points(category: Option<Category>) -> i32 {
    match category {
        Some(Category::Rescue) => 20,
        Some(Category::Medical) => 18,
        Some(Category::Water) => 15,
        Some(Category::Food) => 12,
        Some(Category::Shelter) => 10,
        _ => 8,
    }
}

#[inline]
fn waiting_points(hours: f64) -> i32 {
    if hours <= 0.0 || !hours.is_finite() {
        return 0;
    }
    ((hours / 2.0).floor() as i32).min(10)
}

#[inline]
fn distance_penalty(distance_km: Option<f64>) -> i32 {
    match distance_km {
        Some(d) if d > 50.0 => 10,
        Some(d) if d > 20.0 => 5,
        _ => 0,
    }
}

#[inline]
fn weather_points(weather: Option<WeatherSeverity>) -> i32 {
    match weather {
        Some(WeatherSeverity::Storm) => 15,
        Some(WeatherSeverity::Heat) => 5,
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_factors() -> PriorityFactors {
        PriorityFactors {
            urgency: UrgencyTier::Medium,
            people_affected: 5,
            category: Some(Category::Food),
            hours_waiting: 0.0,
            nearest_distance_km: None,
            weather: None,
        }
    }

    #[test]
    fn test_submission_scenario() {
        // high urgency, 60 people, food, just submitted, no match yet
        let factors = PriorityFactors {
            urgency: UrgencyTier::High,
            people_affected: 60,
            category: Some(Category::Food),
            hours_waiting: 0.0,
            nearest_distance_km: None,
            weather: None,
        };

        assert_eq!(priority_score(&factors), 82);
    }

    #[test]
    fn test_determinism() {
        let factors = base_factors();
        let first = priority_score(&factors);
        for _ in 0..10 {
            assert_eq!(priority_score(&factors), first);
        }
    }

    #[test]
    fn test_bounds() {
        let max_factors = PriorityFactors {
            urgency: UrgencyTier::High,
            people_affected: 500,
            category: Some(Category::Rescue),
            hours_waiting: 100.0,
            nearest_distance_km: Some(1.0),
            weather: Some(WeatherSeverity::Storm),
        };
        assert!(priority_score(&max_factors) <= 100);

        let min_factors = PriorityFactors {
            urgency: UrgencyTier::Low,
            people_affected: 1,
            category: None,
            hours_waiting: 0.0,
            nearest_distance_km: Some(200.0),
            weather: None,
        };
        let score = priority_score(&min_factors);
        assert!(score <= 100);
    }

    #[test]
    fn test_people_monotonicity() {
        let mut factors = base_factors();
        factors.people_affected = 5;
        let low = priority_score(&factors);
        factors.people_affected = 30;
        let high = priority_score(&factors);

        assert!(high >= low);
    }

    #[test]
    fn test_waiting_monotonicity_and_cap() {
        let mut factors = base_factors();
        let mut previous = priority_score(&factors);
        for hours in [2.0, 6.0, 12.0, 20.0, 48.0, 1000.0] {
            factors.hours_waiting = hours;
            let score = priority_score(&factors);
            assert!(score >= previous);
            previous = score;
        }

        // Beyond the cap the bonus stays at +10
        factors.hours_waiting = 20.0;
        let capped = priority_score(&factors);
        factors.hours_waiting = 2000.0;
        assert_eq!(priority_score(&factors), capped);
    }

    #[test]
    fn test_distance_penalty_brackets() {
        let mut factors = base_factors();
        factors.nearest_distance_km = Some(10.0);
        let near = priority_score(&factors);
        factors.nearest_distance_km = Some(30.0);
        let mid = priority_score(&factors);
        factors.nearest_distance_km = Some(80.0);
        let far = priority_score(&factors);

        assert_eq!(near as i32 - mid as i32, 5);
        assert_eq!(near as i32 - far as i32, 10);
    }

    #[test]
    fn test_weather_bonus() {
        let mut factors = base_factors();
        let calm = priority_score(&factors);
        factors.weather = Some(WeatherSeverity::Heat);
        assert_eq!(priority_score(&factors) - calm, 5);
        factors.weather = Some(WeatherSeverity::Storm);
        assert_eq!(priority_score(&factors) - calm, 15);
    }

    #[test]
    fn test_unrecognized_labels_degrade() {
        assert_eq!(UrgencyTier::from_label("catastrophic"), UrgencyTier::Low);
        assert_eq!(WeatherSeverity::from_label("drizzle"), None);

        let mut factors = base_factors();
        factors.category = None;
        // Unknown category contributes the default 8 points
        let unknown = priority_score(&factors);
        factors.category = Some(Category::Shelter);
        assert_eq!(priority_score(&factors) - unknown, 2);
    }
}
