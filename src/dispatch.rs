//! Query orchestration: route a free-text request to the right engine.
//!
//! The orchestrator is thin glue. It asks the router for a task label, then
//! dispatches: statistics queries get the full profile, forecast queries get
//! an auto-selected (date, target) column pair and a fixed 12-step horizon.
//! Anything else is handed back as unsupported — top-K shortcuts and
//! free-text LLM answering are external collaborators, not part of this
//! crate. The dataset is passed by shared reference and never mutated.

use crate::error::{AnalystError, Result};
use crate::forecast::{self, ForecastResult};
use crate::profile::{self, ProfileSummary};
use crate::router::{self, Intent};
use polars::prelude::*;
use serde::Serialize;

/// Horizon the orchestrator requests; the engine default stays at
/// [`forecast::DEFAULT_STEPS`].
pub const DISPATCH_STEPS: usize = 12;

/// Outcome of dispatching one query against one dataset.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum QueryOutcome {
    Stats(ProfileSummary),
    Forecast(ForecastResult),
    /// No deterministic path matched; the caller decides what to do next.
    Unsupported,
}

/// Route `query` and run the matching engine over `df`.
pub fn answer_query(df: &DataFrame, query: &str) -> Result<QueryOutcome> {
    let intent = router::route_query(query);
    tracing::info!(intent = intent.as_str(), "routed query");

    match intent {
        Intent::Stats => Ok(QueryOutcome::Stats(profile::run_profile(df)?)),
        Intent::Forecast => {
            let date_col = pick_date_column(df).ok_or_else(|| {
                AnalystError::Forecast(
                    "Forecasting requires one datetime column and one numeric column".to_owned(),
                )
            })?;
            let target_col = pick_numeric_column(df, &date_col).ok_or_else(|| {
                AnalystError::Forecast(
                    "Forecasting requires one datetime column and one numeric column".to_owned(),
                )
            })?;

            tracing::debug!(%date_col, %target_col, "auto-selected forecast columns");
            let result = forecast::run_forecast(
                df,
                &date_col,
                &target_col,
                DISPATCH_STEPS,
                forecast::DEFAULT_ORDER,
            )?;
            Ok(QueryOutcome::Forecast(result))
        }
        Intent::Llm => Ok(QueryOutcome::Unsupported),
    }
}

/// First datetime-typed column; failing that, the first column in declared
/// order whose datetime cast succeeds without losing values. A heuristic,
/// kept exactly as documented — no smarter tie-break.
fn pick_date_column(df: &DataFrame) -> Option<String> {
    for col in df.get_columns() {
        if col.dtype().is_temporal() {
            return Some(col.name().to_string());
        }
    }
    for col in df.get_columns() {
        let s = col.as_materialized_series();
        if let Ok(casted) = s.cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
            && casted.null_count() == s.null_count()
        {
            return Some(col.name().to_string());
        }
    }
    None
}

/// First numeric column other than the chosen date column.
fn pick_numeric_column(df: &DataFrame, date_col: &str) -> Option<String> {
    df.get_columns()
        .iter()
        .find(|c| c.dtype().is_primitive_numeric() && c.name().as_str() != date_col)
        .map(|c| c.name().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn dated_frame() -> Result<DataFrame> {
        let dates: Vec<String> = (1..=30).map(|d| format!("2024-03-{d:02}")).collect();
        let dates = Series::new("date".into(), dates);
        let sales: Vec<f64> = (0..30).map(|i| 200.0 + 2.0 * i as f64).collect();
        let sales = Series::new("sales".into(), sales);
        Ok(DataFrame::new(vec![Column::from(dates), Column::from(sales)])?)
    }

    #[test]
    fn test_stats_query_returns_profile() -> Result<()> {
        let df = dated_frame()?;
        let outcome = answer_query(&df, "show me the average price")?;
        match outcome {
            QueryOutcome::Stats(profile) => {
                assert_eq!(profile.shape.rows, 30);
                assert!(profile.numeric_summary.contains_key("sales"));
            }
            other => panic!("expected stats outcome, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn test_forecast_query_auto_selects_columns() -> Result<()> {
        let df = dated_frame()?;
        let outcome = answer_query(&df, "what will sales be next month")?;
        match outcome {
            QueryOutcome::Forecast(result) => {
                assert_eq!(result.steps, DISPATCH_STEPS);
                assert_eq!(result.forecast.len(), DISPATCH_STEPS);
            }
            other => panic!("expected forecast outcome, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn test_unmatched_query_is_unsupported() -> Result<()> {
        let df = dated_frame()?;
        let outcome = answer_query(&df, "hello there")?;
        assert!(matches!(outcome, QueryOutcome::Unsupported));
        Ok(())
    }

    #[test]
    fn test_forecast_without_usable_columns_fails() -> Result<()> {
        let labels = Series::new("label".into(), vec!["x"; 12]);
        let df = DataFrame::new(vec![Column::from(labels)])?;
        let err = answer_query(&df, "predict the future").unwrap_err();
        assert!(err.to_string().contains("datetime column"));
        Ok(())
    }

    #[test]
    fn test_date_column_selection_prefers_typed_datetime() -> Result<()> {
        let text = Series::new("note".into(), vec!["n/a"; 15]);
        let when = Series::new(
            "when".into(),
            (1..=15).map(|d| format!("2024-05-{d:02}")).collect::<Vec<_>>(),
        )
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
        let value = Series::new("value".into(), (0..15).map(f64::from).collect::<Vec<_>>());
        let df = DataFrame::new(vec![
            Column::from(text),
            Column::from(when),
            Column::from(value),
        ])?;

        assert_eq!(pick_date_column(&df).as_deref(), Some("when"));
        assert_eq!(pick_numeric_column(&df, "when").as_deref(), Some("value"));
        Ok(())
    }
}
