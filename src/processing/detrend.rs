// src/processing/detrend.rs
//! Trend removal and amplitude normalisation

use crate::config::constants::numeric::MIN_NORMALIZE_STD;
use crate::utils::stats::{mean, population_std};

/// Subtract the least-squares line fitted over (index, value).
///
/// Signals shorter than two samples are returned unchanged.
pub fn detrend(signal: &[f64]) -> Vec<f64> {
    let n = signal.len();
    if n < 2 {
        return signal.to_vec();
    }

    let nf = n as f64;
    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_xx) = (0.0, 0.0, 0.0, 0.0);
    for (i, &y) in signal.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }

    let denominator = nf * sum_xx - sum_x * sum_x;
    let slope = if denominator == 0.0 {
        0.0
    } else {
        (nf * sum_xy - sum_x * sum_y) / denominator
    };
    let intercept = (sum_y - slope * sum_x) / nf;

    signal
        .iter()
        .enumerate()
        .map(|(i, &y)| y - (slope * i as f64 + intercept))
        .collect()
}

/// Subtract a centred moving average of `window_size` samples, clipped at the edges
pub fn detrend_moving_average(signal: &[f64], window_size: usize) -> Vec<f64> {
    let n = signal.len();
    let half = window_size / 2;

    (0..n)
        .map(|i| {
            let start = i.saturating_sub(half);
            let end = (i + half).min(n.saturating_sub(1));
            signal[i] - mean(&signal[start..=end])
        })
        .collect()
}

/// Zero mean, unit (population) variance. A flat signal maps to all zeros.
pub fn normalize(signal: &[f64]) -> Vec<f64> {
    if signal.is_empty() {
        return Vec::new();
    }

    let m = mean(signal);
    let std = population_std(signal);
    if std <= MIN_NORMALIZE_STD {
        return vec![0.0; signal.len()];
    }

    signal.iter().map(|v| (v - m) / std).collect()
}

/// Least-squares slope of `signal` against its index
pub fn linear_slope(signal: &[f64]) -> f64 {
    let n = signal.len();
    if n < 2 {
        return 0.0;
    }
    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = mean(signal);
    let (num, den) = signal.iter().enumerate().fold((0.0, 0.0), |(num, den), (i, &y)| {
        let dx = i as f64 - x_mean;
        (num + dx * (y - y_mean), den + dx * dx)
    });
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}
