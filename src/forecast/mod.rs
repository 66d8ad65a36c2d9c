//! Time-series forecasting engine.
//!
//! Validates a (date, target) column pair out of a dataset, fits an ARIMA
//! model, and emits point forecasts with a 95% confidence interval keyed by
//! future timestamp. Every validation or fitting failure is the single
//! [`AnalystError::Forecast`] kind, distinguished only by message — the
//! presentation layer shows the message verbatim and callers branch on
//! "did it fail", not "why".
//!
//! The engine never mutates the caller's frame: the date column is parsed
//! into a derived copy when it is not already datetime-typed.

pub mod arima;


use crate::error::{AnalystError, Result};
use crate::utils::round3;
use polars::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

/// Minimum clean observations required before fitting is worth attempting.
pub const MIN_DATA_POINTS: usize = 10;

/// Default forecast horizon (steps).
pub const DEFAULT_STEPS: usize = 10;

/// Default (p, d, q) model order.
pub const DEFAULT_ORDER: (usize, usize, usize) = (1, 1, 1);

/// Two-sided confidence level for the prediction interval.
pub const CONFIDENCE_LEVEL: f64 = 0.95;

/// Parallel lower/upper interval bounds over exactly the forecast's keys.
#[derive(Clone, Debug, Serialize)]
pub struct ConfidenceInterval {
    pub lower: BTreeMap<String, f64>,
    pub upper: BTreeMap<String, f64>,
}

/// Output of a fitted forecasting model.
///
/// `forecast`, `confidence_interval.lower` and `confidence_interval.upper`
/// share an identical key set (fixed-format timestamps, so map order is
/// chronological), and `steps` equals the number of keys.
#[derive(Clone, Debug, Serialize)]
pub struct ForecastResult {
    pub model: String,
    pub order: (usize, usize, usize),
    pub steps: usize,
    pub forecast: BTreeMap<String, f64>,
    pub confidence_interval: ConfidenceInterval,
}

fn forecast_err(msg: impl Into<String>) -> AnalystError {
    AnalystError::Forecast(msg.into())
}

/// Fit an ARIMA model on `target_col` indexed by `date_col` and forecast
/// `steps` ahead.
///
/// Validation failures, checked in order: date column missing, target column
/// missing, date column unparseable as datetime, target column non-numeric,
/// fewer than [`MIN_DATA_POINTS`] rows after dropping missing values. Fitting
/// failures are wrapped, never propagated raw.
pub fn run_forecast(
    df: &DataFrame,
    date_col: &str,
    target_col: &str,
    steps: usize,
    order: (usize, usize, usize),
) -> Result<ForecastResult> {
    let Ok(date) = df.column(date_col) else {
        return Err(forecast_err(format!("Date column '{date_col}' not found")));
    };
    let Ok(target) = df.column(target_col) else {
        return Err(forecast_err(format!(
            "Target column '{target_col}' not found"
        )));
    };

    let date_s = date.as_materialized_series();
    let datetime_s = coerce_to_datetime(date_s)?;

    if !target.dtype().is_primitive_numeric() {
        return Err(forecast_err("Target column must be numeric"));
    }
    let target_f64 = target.as_materialized_series().cast(&DataType::Float64)?;

    // Drop rows where either side is missing, then sort ascending by date.
    let dt_ca = datetime_s.datetime()?;
    let val_ca = target_f64.f64()?;
    let mut pairs: Vec<(i64, f64)> = dt_ca
        .into_iter()
        .zip(val_ca)
        .filter_map(|(ts, v)| match (ts, v) {
            (Some(ts), Some(v)) => Some((ts, v)),
            _ => None,
        })
        .collect();

    if pairs.len() < MIN_DATA_POINTS {
        return Err(forecast_err("Not enough data points for forecasting"));
    }
    pairs.sort_by_key(|(ts, _)| *ts);

    let timestamps: Vec<i64> = pairs.iter().map(|(ts, _)| *ts).collect();
    let values: Vec<f64> = pairs.iter().map(|(_, v)| *v).collect();

    tracing::debug!(
        rows = values.len(),
        ?order,
        steps,
        "fitting ARIMA on cleaned series"
    );

    let fitted = arima::fit(&values, order)
        .map_err(|e| forecast_err(format!("ARIMA training failed: {e}")))?;
    let path = fitted
        .forecast(steps, CONFIDENCE_LEVEL)
        .map_err(|e| forecast_err(format!("ARIMA forecasting failed: {e}")))?;

    // The interval must bracket the point forecast at every step; a crossed
    // bound is a malformed model output, not something to pass through.
    for h in 0..steps {
        if !(path.lower[h] <= path.points[h] && path.points[h] <= path.upper[h]) {
            return Err(forecast_err(
                "Forecast confidence interval is malformed (lower > upper)",
            ));
        }
    }

    let interval = detect_interval(&timestamps);
    let last_ts = *timestamps.last().expect("validated non-empty");

    let mut forecast = BTreeMap::new();
    let mut lower = BTreeMap::new();
    let mut upper = BTreeMap::new();
    for h in 0..steps {
        let key = format_timestamp(last_ts + (h as i64 + 1) * interval);
        forecast.insert(key.clone(), round3(path.points[h]));
        lower.insert(key.clone(), round3(path.lower[h]));
        upper.insert(key, round3(path.upper[h]));
    }

    tracing::info!(steps, ?order, "forecast complete");
    Ok(ForecastResult {
        model: "ARIMA".to_owned(),
        order,
        steps,
        forecast,
        confidence_interval: ConfidenceInterval { lower, upper },
    })
}

/// Return the date column as millisecond datetimes, parsing a derived copy
/// when the column is not already temporal. A parse that loses values (new
/// nulls) is a hard failure.
fn coerce_to_datetime(date_s: &Series) -> Result<Series> {
    let parse_failed = || forecast_err("Date column cannot be parsed as datetime");
    let casted = date_s
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
        .map_err(|_| parse_failed())?;
    if !date_s.dtype().is_temporal() && casted.null_count() > date_s.null_count() {
        return Err(parse_failed());
    }
    Ok(casted)
}

/// Modal spacing between consecutive timestamps, in milliseconds.
/// Falls back to one day when no positive spacing can be established.
fn detect_interval(timestamps: &[i64]) -> i64 {
    const ONE_DAY_MS: i64 = 86_400_000;
    if timestamps.len() < 2 {
        return ONE_DAY_MS;
    }

    let mut diffs: Vec<i64> = timestamps.windows(2).map(|w| w[1] - w[0]).collect();
    diffs.sort_unstable();

    let mut best_val = diffs[0];
    let mut best_count = 1usize;
    let mut current_val = diffs[0];
    let mut current_count = 1usize;
    for &d in &diffs[1..] {
        if d == current_val {
            current_count += 1;
        } else {
            if current_count > best_count {
                best_count = current_count;
                best_val = current_val;
            }
            current_val = d;
            current_count = 1;
        }
    }
    if current_count > best_count {
        best_val = current_val;
    }

    if best_val <= 0 { ONE_DAY_MS } else { best_val }
}

fn format_timestamp(ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.naive_utc().format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| ms.to_string())
}
