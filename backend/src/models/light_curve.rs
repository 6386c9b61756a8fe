use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Reasons a pair of series cannot form a [`LightCurve`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LightCurveError {
    #[error("time and flux lengths differ ({time} vs {flux})")]
    LengthMismatch { time: usize, flux: usize },
    #[error("time is not strictly increasing at index {index}")]
    NonIncreasingTime { index: usize },
}

/// Time series of flux measurements.
///
/// `time` is in days and strictly increasing; `flux` is unitless with a baseline near 1.0.
///
/// Deserialization goes through [`LightCurve::new`], so decoded curves are validated too.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "LightCurveColumns")]
pub struct LightCurve {
    time: Vec<f64>,
    flux: Vec<f64>,
}

/// Unvalidated wire form of a [`LightCurve`].
#[derive(Deserialize)]
struct LightCurveColumns {
    time: Vec<f64>,
    flux: Vec<f64>,
}

impl TryFrom<LightCurveColumns> for LightCurve {
    type Error = LightCurveError;

    fn try_from(columns: LightCurveColumns) -> Result<Self, Self::Error> {
        Self::new(columns.time, columns.flux)
    }
}

impl LightCurve {
    pub fn new(time: Vec<f64>, flux: Vec<f64>) -> Result<Self, LightCurveError> {
        if time.len() != flux.len() {
            return Err(LightCurveError::LengthMismatch {
                time: time.len(),
                flux: flux.len(),
            });
        }
        if let Some(index) = time
            .windows(2)
            .position(|w| w[1].partial_cmp(&w[0]) != Some(Ordering::Greater))
        {
            return Err(LightCurveError::NonIncreasingTime { index: index + 1 });
        }
        Ok(Self { time, flux })
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn flux(&self) -> &[f64] {
        &self.flux
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Transform each flux sample, keeping the time axis. The closure receives the
    /// sample index and value.
    pub fn map_flux(&self, mut f: impl FnMut(usize, f64) -> f64) -> Self {
        let flux = self.flux.iter().enumerate().map(|(i, &v)| f(i, v)).collect();
        Self {
            time: self.time.clone(),
            flux,
        }
    }

    /// Keep the samples whose mask entry is `true`.
    ///
    /// A subsequence of a strictly increasing series is still strictly increasing, so
    /// the result is always a valid light curve. Missing mask entries count as `false`.
    pub fn select(&self, mask: &[bool]) -> Self {
        let (time, flux) = self
            .time
            .iter()
            .zip(&self.flux)
            .zip(mask)
            .filter(|(_, &keep)| keep)
            .map(|((&t, &f), _)| (t, f))
            .unzip();
        Self { time, flux }
    }

    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.time, self.flux)
    }
}

/// Light-curve segment as delivered by an archive, before cleaning.
///
/// Missing flux samples are `None` (`null` on the wire). Time is expected to be
/// ascending but is not validated until the segment is cleaned.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawLightCurve {
    pub time: Vec<f64>,
    pub flux: Vec<Option<f64>>,
}

impl RawLightCurve {
    pub fn len(&self) -> usize {
        self.time.len().min(self.flux.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First finite timestamp, used to order segments when stitching.
    pub fn start_time(&self) -> Option<f64> {
        self.time.iter().copied().find(|t| t.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accepts_increasing_time() {
        let lc = LightCurve::new(vec![0.0, 0.5, 1.0], vec![1.0, 0.99, 1.01]).unwrap();
        assert_eq!(lc.len(), 3);
        assert!(!lc.is_empty());
    }

    #[test]
    fn test_new_rejects_length_mismatch() {
        let err = LightCurve::new(vec![0.0, 1.0], vec![1.0]).unwrap_err();
        assert_eq!(err, LightCurveError::LengthMismatch { time: 2, flux: 1 });
    }

    #[test]
    fn test_new_rejects_repeated_time() {
        let err = LightCurve::new(vec![0.0, 1.0, 1.0], vec![1.0; 3]).unwrap_err();
        assert_eq!(err, LightCurveError::NonIncreasingTime { index: 2 });
    }

    #[test]
    fn test_new_rejects_nan_time() {
        assert!(LightCurve::new(vec![0.0, f64::NAN], vec![1.0, 1.0]).is_err());
    }

    #[test]
    fn test_select_keeps_masked_samples() {
        let lc = LightCurve::new(vec![0.0, 1.0, 2.0, 3.0], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let kept = lc.select(&[true, false, true, false]);
        assert_eq!(kept.time(), &[0.0, 2.0]);
        assert_eq!(kept.flux(), &[1.0, 3.0]);
    }

    #[test]
    fn test_deserialize_validates() {
        let lc: LightCurve = serde_json::from_str(r#"{"time": [0.0, 1.0], "flux": [1.0, 1.0]}"#).unwrap();
        assert_eq!(lc.len(), 2);

        let err = serde_json::from_str::<LightCurve>(r#"{"time": [1.0, 0.0], "flux": [1.0, 1.0]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("not strictly increasing"));
        assert!(serde_json::from_str::<LightCurve>(r#"{"time": [0.0], "flux": []}"#).is_err());
    }

    #[test]
    fn test_empty_curve_is_valid() {
        let lc = LightCurve::new(vec![], vec![]).unwrap();
        assert!(lc.is_empty());
    }
}
