//! Mock classification.
//!
//! No model is involved: the diagnostics are fixed constants and the score is a
//! clipped linear combination of them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::models::{Classification, Decision, Diagnostics, FeatureContribution};

pub const DEFAULT_TARGET: &str = "Mock-1";
pub const DEFAULT_MISSION: &str = "Kepler";
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Diagnostics reported for every request.
pub const MOCK_DIAGNOSTICS: Diagnostics = Diagnostics {
    snr: 18.3,
    cdpp_ppm: 65.0,
    odd_even_diff: 0.01,
    secondary_snr: 0.2,
    centroid_sigma: 0.7,
};

/// Body of a classification request. Every field is optional.
///
/// The body is loosely typed: `target` and `mission` take any JSON value and keep
/// its text, `threshold` takes a number or a numeric string. `null` counts as absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ScoreRequestBody")]
pub struct ScoreRequest {
    pub target: String,
    pub mission: String,
    pub threshold: f64,
}

impl Default for ScoreRequest {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET.to_string(),
            mission: DEFAULT_MISSION.to_string(),
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// Wire form of [`ScoreRequest`] before coercion.
#[derive(Debug, Default, Deserialize)]
struct ScoreRequestBody {
    #[serde(default)]
    target: Option<Value>,
    #[serde(default)]
    mission: Option<Value>,
    #[serde(default)]
    threshold: Option<Value>,
}

fn value_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn value_threshold(value: &Value) -> Result<f64, String> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(t) if t.is_finite() => Ok(t),
        _ => Err(format!("threshold must be a number (got {})", value)),
    }
}

impl TryFrom<ScoreRequestBody> for ScoreRequest {
    type Error = String;

    fn try_from(body: ScoreRequestBody) -> Result<Self, Self::Error> {
        let threshold = match &body.threshold {
            Some(v) => value_threshold(v)?,
            None => DEFAULT_THRESHOLD,
        };
        Ok(Self {
            target: body
                .target
                .map(value_text)
                .unwrap_or_else(|| DEFAULT_TARGET.to_string()),
            mission: body
                .mission
                .map(value_text)
                .unwrap_or_else(|| DEFAULT_MISSION.to_string()),
            threshold,
        })
    }
}

/// Planet probability implied by a set of diagnostics, clipped to [0, 1].
///
/// Higher SNR helps; noise, secondary eclipses and odd/even mismatch hurt.
pub fn planet_score(d: &Diagnostics) -> f64 {
    let score = 0.6 + 0.15 * (d.snr / 20.0)
        - 0.10 * (d.cdpp_ppm / 100.0)
        - 0.40 * d.secondary_snr.min(1.0)
        - 0.30 * (d.odd_even_diff * 10.0).min(1.0);
    score.clamp(0.0, 1.0)
}

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

fn mock_top_features() -> Vec<FeatureContribution> {
    vec![
        FeatureContribution::new("depth_ppm", 520.0, 0.23),
        FeatureContribution::new("duration_hr", 3.1, 0.17),
        FeatureContribution::new("secondary_snr", 0.2, -0.10),
        FeatureContribution::new("cdpp_ppm", 65.0, -0.12),
    ]
}

/// Score a request against the fixed diagnostics.
///
/// The decision compares the reported (rounded) probability with the threshold.
pub fn classify(request: &ScoreRequest) -> Classification {
    let diagnostics = MOCK_DIAGNOSTICS;
    let prob_planet = round3(planet_score(&diagnostics));
    let decision = Decision::from_score(prob_planet, request.threshold);
    debug!(
        target_id = %request.target,
        prob_planet,
        threshold = request.threshold,
        "mock classification"
    );

    Classification {
        target: request.target.clone(),
        mission: request.mission.clone(),
        prob_planet,
        threshold: request.threshold,
        decision,
        diagnostics,
        top_features: mock_top_features(),
        notes: vec!["Mock scoring; replace with real model later".to_string()],
    }
}
