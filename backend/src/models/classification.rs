use serde::{Deserialize, Serialize};

/// Named scalar metrics a vetting pipeline would report for a transit candidate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub snr: f64,
    pub cdpp_ppm: f64,
    pub odd_even_diff: f64,
    pub secondary_snr: f64,
    pub centroid_sigma: f64,
}

/// Binary outcome of comparing a score against a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    PlanetLike,
    NotPlanetLike,
}

impl Decision {
    pub fn from_score(score: f64, threshold: f64) -> Self {
        if score >= threshold {
            Decision::PlanetLike
        } else {
            Decision::NotPlanetLike
        }
    }
}

/// One entry of the ranked feature attribution list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureContribution {
    pub name: String,
    pub value: f64,
    pub impact: f64,
}

impl FeatureContribution {
    pub fn new(name: impl Into<String>, value: f64, impact: f64) -> Self {
        Self {
            name: name.into(),
            value,
            impact,
        }
    }
}

/// Result returned by the classification endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub target: String,
    pub mission: String,
    pub prob_planet: f64,
    pub threshold: f64,
    pub decision: Decision,
    pub diagnostics: Diagnostics,
    pub top_features: Vec<FeatureContribution>,
    pub notes: Vec<String>,
}
