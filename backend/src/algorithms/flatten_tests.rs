use super::*;

#[test]
fn test_effective_window_forces_odd() {
    assert_eq!(effective_window(400, 1350), 401);
    assert_eq!(effective_window(401, 1350), 401);
}

#[test]
fn test_effective_window_clamps_to_series() {
    assert_eq!(effective_window(5001, 1350), 1349);
    assert_eq!(effective_window(5001, 1349), 1349);
    assert_eq!(effective_window(1, 1350), 3);
    assert_eq!(effective_window(401, 2), 3);
    assert_eq!(effective_window(401, 0), 3);
}

#[test]
fn test_moving_average_of_constant_is_constant() {
    let flux = vec![2.0; 50];
    let trend = moving_average_trend(&flux, 11);
    assert_eq!(trend.len(), 50);
    assert!(trend.iter().all(|v| (v - 2.0).abs() < 1e-12));
}

#[test]
fn test_moving_average_uses_edge_padding() {
    // window 3 at index 0 averages [1, 1, 2]
    let trend = moving_average_trend(&[1.0, 2.0, 3.0, 4.0], 3);
    assert!((trend[0] - 4.0 / 3.0).abs() < 1e-12);
    assert!((trend[1] - 2.0).abs() < 1e-12);
    assert!((trend[3] - 11.0 / 3.0).abs() < 1e-12);
}

#[test]
fn test_flatten_preserves_length() {
    for len in [1usize, 2, 3, 10, 101] {
        let flux: Vec<f64> = (0..len).map(|i| 1.0 + 0.001 * i as f64).collect();
        for wl in [3usize, 51, 401] {
            assert_eq!(flatten(&flux, wl).len(), len);
        }
    }
}

#[test]
fn test_flatten_empty() {
    assert!(flatten(&[], 401).is_empty());
}

#[test]
fn test_flatten_removes_linear_trend_in_interior() {
    let flux: Vec<f64> = (0..200).map(|i| 1.0 + 0.0001 * i as f64).collect();
    let flat = flatten(&flux, 21);
    for v in &flat[10..190] {
        assert!((v - 1.0).abs() < 1e-12);
    }
}

#[test]
fn test_savgol_weights_match_known_values() {
    let w = savgol_weights(2);
    let expected = [-3.0, 12.0, 17.0, 12.0, -3.0];
    for (a, b) in w.iter().zip(expected) {
        assert!((a - b / 35.0).abs() < 1e-12);
    }
    assert!((savgol_weights(1)[1] - 1.0).abs() < 1e-12);
}

#[test]
fn test_savgol_trend_follows_quadratic() {
    let flux: Vec<f64> = (0..60)
        .map(|i| {
            let x = i as f64;
            1.0 + 1e-4 * x + 1e-6 * x * x
        })
        .collect();
    let trend = savgol_trend(&flux, 11);
    for i in 5..55 {
        assert!((trend[i] - flux[i]).abs() < 1e-12);
    }
}

#[test]
fn test_savgol_flatten_drops_zero_trend() {
    let lc = LightCurve::new(vec![0.0, 1.0, 2.0, 3.0, 4.0], vec![0.0; 5]).unwrap();
    let flat = savgol_flatten(&lc, 3);
    assert!(flat.is_empty());
}

#[test]
fn test_savgol_flatten_normalizes_constant_curve() {
    let time: Vec<f64> = (0..100).map(|i| i as f64 * 0.02).collect();
    let lc = LightCurve::new(time, vec![1.5; 100]).unwrap();
    let flat = savgol_flatten(&lc, 21);
    assert_eq!(flat.len(), 100);
    assert!(flat.flux().iter().all(|v| (v - 1.0).abs() < 1e-12));
}
