//! Numeric primitives for indicator calculation.
//!
//! All helpers operate on slices ordered oldest → newest and never panic on
//! empty input.

/// Arithmetic mean, `0.0` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Simple moving average over the trailing `period` values.
///
/// Returns `None` when fewer than `period` values are available.
pub fn sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    Some(mean(&values[values.len() - period..]))
}

/// EMA multiplier `2 / (period + 1)`.
pub fn ema_multiplier(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}

/// Single recursive EMA step.
pub fn ema_from_previous(value: f64, previous: f64, period: usize) -> f64 {
    let k = ema_multiplier(period);
    value * k + previous * (1.0 - k)
}

/// Full EMA series, seeded from the first value and smoothed across every
/// subsequent value. The output has the same length as the input.
pub fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    let mut series = Vec::with_capacity(values.len());
    let mut iter = values.iter();
    let Some(&first) = iter.next() else {
        return series;
    };
    let mut ema = first;
    series.push(ema);
    for &value in iter {
        ema = ema_from_previous(value, ema, period);
        series.push(ema);
    }
    series
}

/// Final EMA value seeded from the first element.
///
/// Returns `None` when fewer than `period` values are available.
pub fn ema(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    ema_series(values, period).last().copied()
}

/// Population variance (divides by N) of the trailing `period` values.
pub fn population_variance(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let window = &values[values.len() - period..];
    let avg = mean(window);
    let sum_sq: f64 = window.iter().map(|v| (v - avg).powi(2)).sum();
    Some(sum_sq / period as f64)
}

/// Population standard deviation of the trailing `period` values.
///
/// This is always the square root of [`population_variance`]; callers never
/// receive a variance under this name.
pub fn standard_deviation(values: &[f64], period: usize) -> Option<f64> {
    population_variance(values, period).map(f64::sqrt)
}

/// True range of a bar given the previous close.
pub fn true_range(high: f64, low: f64, prev_close: f64) -> f64 {
    let hl = high - low;
    let hc = (high - prev_close).abs();
    let lc = (low - prev_close).abs();
    hl.max(hc).max(lc)
}

/// Largest value, `None` for an empty slice.
pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

/// Smallest value, `None` for an empty slice.
pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

/// Clamp into the unit interval, mapping NaN to `0.0`.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}
