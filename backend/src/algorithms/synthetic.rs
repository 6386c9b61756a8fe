//! Synthetic transit light curves.
//!
//! Produces a baseline of 1.0 with a slow sinusoidal trend and white noise, then
//! subtracts a Gaussian-shaped dip at every transit epoch.

use std::f64::consts::PI;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Parameters of a synthetic light curve. All durations are in days.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticParams {
    /// Orbital period
    pub period: f64,
    /// Transit depth as a fraction (0.003 = 3000 ppm)
    pub depth: f64,
    /// Transit duration
    pub duration: f64,
    /// Total time span
    pub tspan: f64,
    /// Sampling cadence (0.02 is about 30 min)
    pub cadence: f64,
    /// White noise standard deviation
    pub jitter: f64,
    /// Amplitude of the slow sinusoidal trend
    pub trend_amp: f64,
    pub seed: u64,
}

impl Default for SyntheticParams {
    fn default() -> Self {
        Self {
            period: 3.0,
            depth: 0.003,
            duration: 0.15,
            tspan: 27.0,
            cadence: 0.02,
            jitter: 0.0008,
            trend_amp: 0.0015,
            seed: 42,
        }
    }
}

impl SyntheticParams {
    /// Number of samples the generator will emit.
    pub fn sample_count(&self) -> usize {
        let n = self.tspan / self.cadence;
        if n.is_finite() && n > 0.0 {
            n as usize
        } else {
            0
        }
    }

    /// Centre time of the `k`-th injected transit.
    pub fn transit_center(&self, k: usize) -> f64 {
        k as f64 * self.period + 0.3 * self.period
    }

    /// Number of transit epochs injected, including two past the end of the span.
    ///
    /// Saturates at `usize::MAX` for periods far shorter than the span.
    pub fn transit_count(&self) -> usize {
        ((self.tspan / self.period).floor().max(0.0) as usize).saturating_add(2)
    }

    /// Index of the last injected epoch, kept in floating point so that tiny
    /// periods do not saturate.
    fn last_epoch(&self) -> f64 {
        (self.tspan / self.period).floor().max(0.0) + 1.0
    }
}

/// Dips are evaluated within this many widths of their centre; beyond it the
/// Gaussian is below the rounding error of a unit baseline.
const DIP_REACH: f64 = 10.0;

/// Above this many overlapping epochs per sample the dip sum is integrated
/// instead of evaluated term by term.
const MAX_EXPLICIT_EPOCHS: f64 = 4096.0;

/// Generate `(time, flux)` for the given parameters.
///
/// The output is fully determined by `params`: the noise comes from a ChaCha
/// generator seeded with `params.seed`.
pub fn synthetic_transit(params: &SyntheticParams) -> (Vec<f64>, Vec<f64>) {
    let n = params.sample_count();
    let mut rng = ChaCha8Rng::seed_from_u64(params.seed);

    let time: Vec<f64> = (0..n).map(|i| i as f64 * params.cadence).collect();
    let half_span = params.tspan / 2.0;

    let mut flux: Vec<f64> = time
        .iter()
        .map(|&t| {
            let trend = params.trend_amp * (2.0 * PI * t / half_span).sin();
            1.0 + trend + params.jitter * standard_normal(&mut rng)
        })
        .collect();

    let width = params.duration / 5.0;
    if width <= 0.0 || !width.is_finite() || params.period <= 0.0 || !params.period.is_finite() {
        return (time, flux);
    }

    let reach = DIP_REACH * width;
    let offset = 0.3 * params.period;
    let last = params.last_epoch();
    for (f, &t) in flux.iter_mut().zip(&time) {
        // epochs whose centre lies within `reach` of t
        let lo = ((t - reach - offset) / params.period).ceil().max(0.0);
        let hi = ((t + reach - offset) / params.period).floor().min(last);
        if hi < lo {
            continue;
        }
        if hi - lo > MAX_EXPLICIT_EPOCHS {
            *f -= params.depth * dense_dip_sum(t, lo, hi, offset, params.period, width);
        } else {
            for k in lo as usize..=hi as usize {
                let z = (t - params.transit_center(k)) / width;
                *f -= params.depth * (-0.5 * z * z).exp();
            }
        }
    }

    (time, flux)
}

/// Sum of unit Gaussians centred at `offset + k * period` for `k` in `lo..=hi`,
/// approximated by the integral over the epochs (midpoint rule).
fn dense_dip_sum(t: f64, lo: f64, hi: f64, offset: f64, period: f64, width: f64) -> f64 {
    let start = offset + lo * period - period / 2.0;
    let end = offset + hi * period + period / 2.0;
    let cdf = |c: f64| 0.5 * libm::erf((c - t) / (width * std::f64::consts::SQRT_2));
    (width * (2.0 * PI).sqrt() / period) * (cdf(end) - cdf(start))
}

/// Box-Muller draw from N(0, 1).
fn standard_normal<R: Rng>(rng: &mut R) -> f64 {
    // 1 - U keeps the logarithm argument in (0, 1]
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}
