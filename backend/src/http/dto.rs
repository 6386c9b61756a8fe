//! Data Transfer Objects for the HTTP API.
//!
//! Query structs carry their defaults through serde and are range-checked by
//! `validate` before any handler work runs.

use serde::{Deserialize, Serialize};

use super::error::AppError;
use crate::models::Mission;

pub use crate::models::Classification;
pub use crate::services::{ScoreRequest, SeriesPair};

pub const WINDOW_LENGTH_MIN: i64 = 51;
pub const WINDOW_LENGTH_MAX: i64 = 5001;
pub const DEPTH_PPM_MIN: f64 = 10.0;
pub const DEPTH_PPM_MAX: f64 = 20_000.0;

fn default_window_length() -> i64 {
    401
}

fn default_period() -> f64 {
    3.0
}

fn default_depth_ppm() -> f64 {
    1500.0
}

fn check_window_length(window_length: i64, problems: &mut Vec<String>) {
    if !(WINDOW_LENGTH_MIN..=WINDOW_LENGTH_MAX).contains(&window_length) {
        problems.push(format!(
            "window_length must be between {} and {} (got {})",
            WINDOW_LENGTH_MIN, WINDOW_LENGTH_MAX, window_length
        ));
    }
}

/// Query parameters for the synthetic plot and light-curve endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SyntheticQuery {
    /// Flattening window in samples, 51..=5001 (default: 401)
    #[serde(default = "default_window_length")]
    pub window_length: i64,
    /// Orbital period in days, > 0 (default: 3.0)
    #[serde(default = "default_period")]
    pub period: f64,
    /// Transit depth in ppm, 10..=20000 (default: 1500)
    #[serde(default = "default_depth_ppm")]
    pub depth_ppm: f64,
}

impl Default for SyntheticQuery {
    fn default() -> Self {
        Self {
            window_length: default_window_length(),
            period: default_period(),
            depth_ppm: default_depth_ppm(),
        }
    }
}

impl SyntheticQuery {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut problems = Vec::new();
        check_window_length(self.window_length, &mut problems);
        if !(self.period.is_finite() && self.period > 0.0) {
            problems.push(format!("period must be greater than 0 (got {})", self.period));
        }
        if !(DEPTH_PPM_MIN..=DEPTH_PPM_MAX).contains(&self.depth_ppm) {
            problems.push(format!(
                "depth_ppm must be between {} and {} (got {})",
                DEPTH_PPM_MIN, DEPTH_PPM_MAX, self.depth_ppm
            ));
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(problems))
        }
    }
}

/// Query parameters for the archive-backed endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveQuery {
    /// Kepler, K2 or TESS (default: Kepler)
    #[serde(default)]
    pub mission: Mission,
    /// Flattening window in samples, 51..=5001 (default: 401)
    #[serde(default = "default_window_length")]
    pub window_length: i64,
    /// Archive author override (default: per mission)
    #[serde(default)]
    pub author: Option<String>,
}

impl Default for ArchiveQuery {
    fn default() -> Self {
        Self {
            mission: Mission::default(),
            window_length: default_window_length(),
            author: None,
        }
    }
}

impl ArchiveQuery {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut problems = Vec::new();
        check_window_length(self.window_length, &mut problems);
        if matches!(self.author.as_deref(), Some(a) if a.trim().is_empty()) {
            problems.push("author must not be empty".to_string());
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(problems))
        }
    }
}

/// Response for `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub ok: bool,
    pub msg: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
}

/// Archive light curve with its flattened counterpart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveLightCurveResponse {
    pub mission: Mission,
    pub target: String,
    pub time: Vec<f64>,
    pub flux: Vec<f64>,
    pub flat_time: Vec<f64>,
    pub flat_flux: Vec<f64>,
}
