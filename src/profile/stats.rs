//! Numeric column statistics: descriptive summary, IQR outlier counts, and
//! the pairwise Pearson correlation matrix.
//!
//! Quantiles use linear interpolation. Rounding happens only at the
//! correlation output boundary, never during intermediate statistics, so
//! outlier thresholds are computed at full precision.

use super::types::NumericSummary;
use crate::error::Result;
use crate::utils::round3;
use polars::prelude::*;
use std::collections::BTreeMap;

pub fn summarise_numeric(ca: &Float64Chunked) -> NumericSummary {
    let non_null = ca.len() - ca.null_count();

    // std with ddof=1 is undefined below two observations; the mean below one.
    let mean = if non_null == 0 { None } else { ca.mean() };
    let std = if non_null < 2 { None } else { ca.std(1) };

    NumericSummary {
        mean,
        std,
        min: ca.min(),
        max: ca.max(),
    }
}

/// Count IQR-rule outliers: values strictly outside [Q1 - 1.5*IQR, Q3 + 1.5*IQR].
///
/// A zero or undefined IQR yields 0 — a degenerate spread must not flag every
/// value of a constant column as an outlier.
pub fn iqr_outlier_count(ca: &Float64Chunked) -> usize {
    let q1 = ca.quantile(0.25, QuantileMethod::Linear).unwrap_or(None);
    let q3 = ca.quantile(0.75, QuantileMethod::Linear).unwrap_or(None);

    let (Some(q1), Some(q3)) = (q1, q3) else {
        return 0;
    };
    let iqr = q3 - q1;
    if !iqr.is_finite() || iqr == 0.0 {
        return 0;
    }

    let lower = q1 - 1.5 * iqr;
    let upper = q3 + 1.5 * iqr;
    ca.into_iter()
        .flatten()
        .filter(|&v| v < lower || v > upper)
        .count()
}

/// Full pairwise Pearson correlation matrix over the numeric columns, keyed by
/// column name on both axes and rounded to 3 decimal places.
///
/// Returns `None` with fewer than two numeric columns. The matrix is built
/// symmetric by construction (each off-diagonal pair is computed once and
/// mirrored) with 1.0 on the diagonal. Pairs whose coefficient is undefined,
/// such as those involving a constant column, are omitted rather than
/// reported as 0.0.
pub fn correlation_matrix(
    numeric: &[(String, Series)],
) -> Result<Option<BTreeMap<String, BTreeMap<String, f64>>>> {
    if numeric.len() < 2 {
        return Ok(None);
    }

    let mut matrix: BTreeMap<String, BTreeMap<String, f64>> = numeric
        .iter()
        .map(|(name, _)| (name.clone(), BTreeMap::new()))
        .collect();

    for i in 0..numeric.len() {
        let (name_i, series_i) = &numeric[i];
        matrix
            .get_mut(name_i)
            .expect("row inserted above")
            .insert(name_i.clone(), 1.0);

        for (name_j, series_j) in numeric.iter().skip(i + 1) {
            let ca_i = series_i.f64()?;
            let ca_j = series_j.f64()?;
            // Zero variance makes the coefficient undefined; leave the pair out.
            let Some(corr) = polars::prelude::cov::pearson_corr(ca_i, ca_j).filter(|c| c.is_finite())
            else {
                continue;
            };
            let rounded = round3(corr);

            matrix
                .get_mut(name_i)
                .expect("row inserted above")
                .insert(name_j.clone(), rounded);
            matrix
                .get_mut(name_j)
                .expect("row inserted above")
                .insert(name_i.clone(), rounded);
        }
    }

    Ok(Some(matrix))
}
