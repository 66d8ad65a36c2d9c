//! Integration tests for the full query-answering workflow
//!
//! These tests run the router, profiling engine, and forecasting engine
//! end-to-end over realistic frames and verify the combined results.

use datalyst::dispatch::{self, QueryOutcome};
use datalyst::forecast::run_forecast;
use datalyst::profile::run_profile;
use datalyst::router::{Intent, route_query};
use polars::prelude::*;

/// 30 daily rows of dates and sales, no missing values.
fn sales_frame() -> DataFrame {
    let dates: Vec<String> = (1..=30).map(|d| format!("2024-06-{d:02}")).collect();
    let dates = Series::new("date".into(), dates)
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
        .expect("date strings parse");
    let sales: Vec<f64> = (0..30)
        .map(|i| 500.0 + 3.0 * i as f64 + (i % 5) as f64)
        .collect();
    let sales = Series::new("sales".into(), sales);
    DataFrame::new(vec![Column::from(dates), Column::from(sales)]).expect("frame builds")
}

#[test]
fn test_forecast_on_daily_sales_returns_twelve_steps() {
    let df = sales_frame();
    let result = run_forecast(&df, "date", "sales", 12, (1, 1, 1)).expect("forecast succeeds");

    assert_eq!(result.forecast.len(), 12);
    let forecast_keys: Vec<_> = result.forecast.keys().collect();
    let lower_keys: Vec<_> = result.confidence_interval.lower.keys().collect();
    let upper_keys: Vec<_> = result.confidence_interval.upper.keys().collect();
    assert_eq!(forecast_keys, lower_keys);
    assert_eq!(forecast_keys, upper_keys);
}

#[test]
fn test_profile_of_five_numeric_columns() {
    let columns: Vec<Column> = (0..5)
        .map(|c| {
            let values: Vec<f64> = (0..20).map(|i| (i * (c + 1)) as f64 + (i % (c + 2)) as f64).collect();
            Column::from(Series::new(format!("col{c}").into(), values))
        })
        .collect();
    let df = DataFrame::new(columns).expect("frame builds");

    let profile = run_profile(&df).expect("profiling succeeds");
    assert_eq!(profile.numeric_summary.len(), 5);

    let corr = profile.correlations.expect("matrix present for 5 numeric columns");
    assert_eq!(corr.len(), 5);
    for (name, row) in &corr {
        assert_eq!(row.len(), 5);
        assert_eq!(row[name], 1.0, "diagonal must be 1.0");
    }
}

#[test]
fn test_forecast_query_routes_to_forecast() {
    assert_eq!(route_query("what will sales be next month"), Intent::Forecast);
}

#[test]
fn test_average_query_routes_to_stats() {
    assert_eq!(route_query("show me the average price"), Intent::Stats);
}

#[test]
fn test_repeated_values_produce_no_outliers() {
    let mut values = Vec::new();
    for v in [10.0, 20.0, 30.0] {
        values.extend(std::iter::repeat_n(v, 20));
    }
    let df = DataFrame::new(vec![Column::from(Series::new("x".into(), values))])
        .expect("frame builds");

    let profile = run_profile(&df).expect("profiling succeeds");
    assert_eq!(profile.outlier_counts["x"], 0);
}

#[test]
fn test_csv_to_forecast_pipeline() {
    let dir = std::env::temp_dir();
    let path = dir.join("datalyst_integration_sales.csv");
    let mut body = String::from("date,sales\n");
    for d in 1..=30 {
        body.push_str(&format!("2024-06-{d:02},{}\n", 500 + 3 * d + d % 5));
    }
    std::fs::write(&path, body).expect("fixture written");

    let df = datalyst::io::load_df(&path).expect("load succeeds");
    let outcome = dispatch::answer_query(&df, "predict sales").expect("dispatch succeeds");
    match outcome {
        QueryOutcome::Forecast(result) => {
            assert_eq!(result.steps, dispatch::DISPATCH_STEPS);
            for (key, point) in &result.forecast {
                let lower = result.confidence_interval.lower[key];
                let upper = result.confidence_interval.upper[key];
                assert!(lower <= *point && *point <= upper, "crossed interval at {key}");
            }
        }
        other => panic!("expected a forecast outcome, got {other:?}"),
    }

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_stats_query_profile_matches_frame() {
    let df = sales_frame();
    let outcome = dispatch::answer_query(&df, "give me a summary").expect("dispatch succeeds");
    match outcome {
        QueryOutcome::Stats(profile) => {
            assert_eq!(profile.shape.rows, 30);
            assert_eq!(profile.shape.columns, 2);
            assert_eq!(profile.missing_counts["sales"], 0);
            // One numeric column only: no correlation matrix.
            assert!(profile.correlations.is_none());
        }
        other => panic!("expected a stats outcome, got {other:?}"),
    }
}
