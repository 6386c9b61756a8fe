//! Cleaning steps applied to archive segments: stitch, drop missing samples, normalize.

use std::cmp::Ordering;

use crate::models::{LightCurve, LightCurveError, RawLightCurve};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CleaningError {
    #[error("invalid light curve: {0}")]
    InvalidSeries(#[from] LightCurveError),
    #[error("cannot normalize by a median flux of {0}")]
    DegenerateMedian(f64),
}

/// Median of the finite values, `None` when there are none.
pub fn median(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let mut finite: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }
    finite.sort_by(f64::total_cmp);
    let mid = finite.len() / 2;
    if finite.len() % 2 == 0 {
        Some((finite[mid - 1] + finite[mid]) / 2.0)
    } else {
        Some(finite[mid])
    }
}

/// Concatenate segments into one series.
///
/// Each segment is first divided by its own median flux so that quarters or
/// sectors with different baselines line up. Segments are ordered by start time and
/// any sample whose time does not advance past the previous kept sample is dropped.
pub fn stitch(segments: &[RawLightCurve]) -> RawLightCurve {
    let mut ordered: Vec<&RawLightCurve> = segments.iter().filter(|s| !s.is_empty()).collect();
    ordered.sort_by(|a, b| match (a.start_time(), b.start_time()) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    let mut out = RawLightCurve::default();
    let mut last_time = f64::NEG_INFINITY;
    for segment in ordered {
        let scale = median(segment.flux.iter().flatten().copied())
            .filter(|m| *m != 0.0)
            .unwrap_or(1.0);
        for (&t, f) in segment.time.iter().zip(&segment.flux) {
            if !t.is_finite() || t <= last_time {
                continue;
            }
            last_time = t;
            out.time.push(t);
            out.flux.push(f.map(|v| v / scale));
        }
    }
    out
}

/// Drop samples with a missing or non-finite flux or time.
pub fn remove_nans(raw: &RawLightCurve) -> Result<LightCurve, CleaningError> {
    let mut last_time = f64::NEG_INFINITY;
    let (time, flux): (Vec<f64>, Vec<f64>) = raw
        .time
        .iter()
        .zip(&raw.flux)
        .filter_map(|(&t, f)| match f {
            Some(v) if t.is_finite() && v.is_finite() && t > last_time => {
                last_time = t;
                Some((t, *v))
            }
            _ => None,
        })
        .unzip();
    Ok(LightCurve::new(time, flux)?)
}

/// Divide the flux by its median so the baseline sits at 1.0.
///
/// An empty curve normalizes to itself.
pub fn normalize(lc: &LightCurve) -> Result<LightCurve, CleaningError> {
    let Some(m) = median(lc.flux().iter().copied()) else {
        return Ok(lc.clone());
    };
    if m == 0.0 {
        return Err(CleaningError::DegenerateMedian(m));
    }
    Ok(lc.map_flux(|_, v| v / m))
}
