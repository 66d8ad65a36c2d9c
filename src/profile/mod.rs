//! Dataset profiling engine.
//!
//! A pure function of a dataset: row/column counts, per-column type tags and
//! missing counts, descriptive statistics and IQR outlier counts for numeric
//! columns, and a Pearson correlation matrix when at least two numeric columns
//! exist. The input frame is never mutated and nothing is cached — every call
//! recomputes from the data it is given.

pub mod stats;
pub mod types;

pub use types::{ColumnKind, NumericSummary, ProfileSummary, Shape};

use crate::error::{AnalystError, Result};
use polars::prelude::*;
use std::collections::BTreeMap;

/// Profile a dataset into a [`ProfileSummary`].
///
/// Fails with [`AnalystError::EmptyInput`] when the frame has zero rows or
/// zero columns; otherwise the summary is always complete.
pub fn run_profile(df: &DataFrame) -> Result<ProfileSummary> {
    if df.height() == 0 || df.width() == 0 {
        return Err(AnalystError::EmptyInput);
    }

    let shape = Shape {
        rows: df.height(),
        columns: df.width(),
    };
    tracing::debug!(rows = shape.rows, columns = shape.columns, "profiling dataset");

    let mut column_types = BTreeMap::new();
    let mut missing_counts = BTreeMap::new();
    for col in df.get_columns() {
        let name = col.name().to_string();
        column_types.insert(name.clone(), ColumnKind::from_dtype(col.dtype()));
        missing_counts.insert(name, col.null_count());
    }

    // Numeric columns, cast to f64 once and reused for summary, outliers and
    // correlations. Booleans are deliberately not numeric here.
    let numeric: Vec<(String, Series)> = df
        .get_columns()
        .iter()
        .filter(|c| c.dtype().is_primitive_numeric())
        .map(|c| {
            let casted = c.as_materialized_series().cast(&DataType::Float64)?;
            Ok((c.name().to_string(), casted))
        })
        .collect::<Result<_>>()?;

    let mut numeric_summary = BTreeMap::new();
    let mut outlier_counts = BTreeMap::new();
    for (name, series) in &numeric {
        let ca = series.f64()?;
        numeric_summary.insert(name.clone(), stats::summarise_numeric(ca));
        outlier_counts.insert(name.clone(), stats::iqr_outlier_count(ca));
    }

    let correlations = stats::correlation_matrix(&numeric)?;

    Ok(ProfileSummary {
        shape,
        column_types,
        missing_counts,
        numeric_summary,
        outlier_counts,
        correlations,
    })
}
