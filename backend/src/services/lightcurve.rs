//! Synthetic light curves for the mock endpoints.

use serde::{Deserialize, Serialize};

use crate::algorithms::{flatten, synthetic_transit, SyntheticParams};

/// Raw and flattened series sharing one time axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPair {
    pub time: Vec<f64>,
    pub flux: Vec<f64>,
    pub flat_time: Vec<f64>,
    pub flat_flux: Vec<f64>,
}

/// Convert a depth in parts per million to a fraction.
pub fn ppm_to_fraction(depth_ppm: f64) -> f64 {
    depth_ppm / 1e6
}

/// Generate the default synthetic curve with the given period and depth, then flatten it.
pub fn synthetic_series(period: f64, depth_ppm: f64, window_length: usize) -> SeriesPair {
    let params = SyntheticParams {
        period,
        depth: ppm_to_fraction(depth_ppm),
        ..Default::default()
    };
    let (time, flux) = synthetic_transit(&params);
    let flat_flux = flatten(&flux, window_length);

    SeriesPair {
        flat_time: time.clone(),
        time,
        flux,
        flat_flux,
    }
}
