//! Detrending filters.
//!
//! [`flatten`] is the moving-average proxy for a moving median used by the mock
//! endpoints. [`savgol_flatten`] is the quadratic Savitzky-Golay detrend applied to
//! archive data.

use crate::models::LightCurve;

/// Resolve a requested window length against a series of `len` samples.
///
/// Even windows are bumped to the next odd value, then the result is clamped to
/// `[3, largest odd <= len]`. Short series still get a window of 3.
pub fn effective_window(requested: usize, len: usize) -> usize {
    let wl = if requested % 2 == 0 {
        requested + 1
    } else {
        requested
    };
    let largest_odd = if len % 2 == 0 { len.saturating_sub(1) } else { len };
    wl.min(largest_odd).max(3)
}

/// Edge-pad `values` with `pad` copies of the first and last sample.
fn edge_pad(values: &[f64], pad: usize) -> Vec<f64> {
    let (Some(&first), Some(&last)) = (values.first(), values.last()) else {
        return Vec::new();
    };
    let mut padded = Vec::with_capacity(values.len() + 2 * pad);
    padded.extend(std::iter::repeat(first).take(pad));
    padded.extend_from_slice(values);
    padded.extend(std::iter::repeat(last).take(pad));
    padded
}

/// Moving average of the edge-padded series. Output has the same length as `flux`.
pub fn moving_average_trend(flux: &[f64], window_length: usize) -> Vec<f64> {
    if flux.is_empty() {
        return Vec::new();
    }
    let wl = effective_window(window_length, flux.len());
    let padded = edge_pad(flux, wl / 2);

    let mut trend = Vec::with_capacity(flux.len());
    let mut sum: f64 = padded[..wl].iter().sum();
    trend.push(sum / wl as f64);
    for i in wl..padded.len() {
        sum += padded[i] - padded[i - wl];
        trend.push(sum / wl as f64);
    }
    trend
}

/// Divide `flux` by its moving-average trend, giving a series with baseline 1.0.
///
/// `window_length` follows [`effective_window`]; a window longer than the series
/// is clamped, never rejected.
pub fn flatten(flux: &[f64], window_length: usize) -> Vec<f64> {
    let trend = moving_average_trend(flux, window_length);
    flux.iter().zip(&trend).map(|(f, m)| f / m).collect()
}

/// Quadratic Savitzky-Golay smoothing weights for a window of `2m + 1` samples.
fn savgol_weights(m: usize) -> Vec<f64> {
    let mf = m as f64;
    let norm = (2.0 * mf + 1.0) * (4.0 * mf * mf + 4.0 * mf - 3.0);
    (0..=2 * m)
        .map(|j| {
            let i = j as f64 - mf;
            3.0 * (3.0 * mf * mf + 3.0 * mf - 1.0 - 5.0 * i * i) / norm
        })
        .collect()
}

/// Savitzky-Golay trend (polynomial order 2) of the edge-padded series.
pub fn savgol_trend(flux: &[f64], window_length: usize) -> Vec<f64> {
    if flux.is_empty() {
        return Vec::new();
    }
    let wl = effective_window(window_length, flux.len());
    let weights = savgol_weights(wl / 2);
    let padded = edge_pad(flux, wl / 2);

    padded
        .windows(wl)
        .map(|w| w.iter().zip(&weights).map(|(v, c)| v * c).sum())
        .collect()
}

/// Detrend a light curve with a quadratic Savitzky-Golay filter.
///
/// Samples whose trend is zero or whose ratio is not finite are dropped, so the
/// result can be shorter than the input (and empty for pathological input).
pub fn savgol_flatten(lc: &LightCurve, window_length: usize) -> LightCurve {
    let trend = savgol_trend(lc.flux(), window_length);
    let ratio = lc.map_flux(|i, f| f / trend[i]);
    let keep: Vec<bool> = ratio
        .flux()
        .iter()
        .zip(&trend)
        .map(|(r, m)| *m != 0.0 && r.is_finite())
        .collect();
    ratio.select(&keep)
}

#[cfg(test)]
#[path = "flatten_tests.rs"]
mod flatten_tests;
