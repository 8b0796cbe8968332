//! Median, MAD and consistency score
//!
//! All functions are pure and work on a copy of the window, so callers can
//! pass the raw circular buffer in any rotation.

use crate::config::MAX_WINDOW;

/// Added to the MAD so a perfectly flat window does not reject its own samples
pub const MAD_EPSILON: f32 = 1e-6;

fn abs(x: f32) -> f32 {
    if x < 0.0 {
        -x
    } else {
        x
    }
}

/// Median of a sorted slice
fn sorted_median(sorted: &[f32]) -> f32 {
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    let mid = n / 2;
    if n % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

/// Median of `window`
///
/// Odd lengths return the middle element, even lengths the mean of the two
/// middle elements. Only the first `MAX_WINDOW` samples are considered.
/// An empty window yields 0.0.
pub fn median(window: &[f32]) -> f32 {
    let n = window.len().min(MAX_WINDOW);
    let mut scratch = [0.0f32; MAX_WINDOW];
    scratch[..n].copy_from_slice(&window[..n]);
    let sorted = &mut scratch[..n];
    sorted.sort_unstable_by(f32::total_cmp);
    sorted_median(sorted)
}

/// Median absolute deviation of `window` around `center`
pub fn mad(window: &[f32], center: f32) -> f32 {
    let n = window.len().min(MAX_WINDOW);
    let mut deviations = [0.0f32; MAX_WINDOW];
    for (d, &x) in deviations.iter_mut().zip(&window[..n]) {
        *d = abs(x - center);
    }
    let sorted = &mut deviations[..n];
    sorted.sort_unstable_by(f32::total_cmp);
    sorted_median(sorted)
}

/// Fraction of samples lying within `multiplier * (MAD + ε)` of the median
///
/// Returns a value in 0.0–1.0. An empty window scores 0.0.
pub fn consistency_score(window: &[f32], multiplier: f32) -> f32 {
    let n = window.len().min(MAX_WINDOW);
    if n == 0 {
        return 0.0;
    }
    let samples = &window[..n];
    let center = median(samples);
    let limit = multiplier * (mad(samples, center) + MAD_EPSILON);
    let close = samples.iter().filter(|&&x| abs(x - center) < limit).count();
    close as f32 / n as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::vec::Vec;

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[1.0, 2.0, 3.0, 4.0, 5.0]), 3.0);
        assert_eq!(median(&[1.0, 2.0, 3.0, 4.0]), 2.5);
        assert_eq!(median(&[5.0, 1.0, 4.0, 2.0, 3.0]), 3.0);
        assert_eq!(median(&[]), 0.0);
    }

    #[test]
    fn test_constant_window() {
        let window = [0.5f32; 20];
        let m = median(&window);
        assert_eq!(m, 0.5);
        assert_eq!(mad(&window, m), 0.0);
        assert_eq!(consistency_score(&window, 3.0), 1.0);
    }

    #[test]
    fn test_single_outlier_is_rejected() {
        let mut window = [0.5f32; 20];
        window[7] = 0.95;
        // 19 of 20 samples sit on the median, the spike is far outside
        assert_eq!(consistency_score(&window, 3.0), 0.95);
    }

    #[test]
    fn test_mad_known_values() {
        // |x - 3| = [2, 1, 0, 1, 2] -> median 1
        assert_eq!(mad(&[1.0, 2.0, 3.0, 4.0, 5.0], 3.0), 1.0);
    }

    fn window_strategy() -> impl Strategy<Value = Vec<f32>> {
        proptest::collection::vec(0.0f32..=1.0, 1..=MAX_WINDOW)
    }

    proptest! {
        #[test]
        fn median_lies_within_bounds(window in window_strategy()) {
            let m = median(&window);
            let lo = window.iter().cloned().fold(f32::INFINITY, f32::min);
            let hi = window.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
            prop_assert!(m >= lo && m <= hi);
        }

        #[test]
        fn mad_is_non_negative(window in window_strategy()) {
            let m = median(&window);
            prop_assert!(mad(&window, m) >= 0.0);
        }

        #[test]
        fn score_is_a_fraction(window in window_strategy(), k in 0.0f32..10.0) {
            let s = consistency_score(&window, k);
            prop_assert!((0.0..=1.0).contains(&s));
        }

        #[test]
        fn score_monotone_in_multiplier(
            window in window_strategy(),
            k in 0.0f32..10.0,
            extra in 0.0f32..10.0,
        ) {
            prop_assert!(consistency_score(&window, k) <= consistency_score(&window, k + extra));
        }
    }
}
