use polars::prelude::DataType;
use serde::Serialize;
use std::collections::BTreeMap;

/// Logical column type tag, derived from the polars dtype.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Datetime,
    Boolean,
    Text,
}

impl ColumnKind {
    pub fn from_dtype(dtype: &DataType) -> Self {
        if dtype.is_bool() {
            Self::Boolean
        } else if dtype.is_primitive_numeric() {
            Self::Numeric
        } else if dtype.is_temporal() {
            Self::Datetime
        } else {
            Self::Text
        }
    }
}

/// Row and column counts of the profiled dataset.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Shape {
    pub rows: usize,
    pub columns: usize,
}

/// Descriptive statistics for one numeric column, computed over non-missing
/// values. `None` marks an undefined statistic (e.g. std with fewer than two
/// observations) and serializes as JSON null.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct NumericSummary {
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Immutable snapshot of dataset-wide descriptive statistics.
///
/// Every key in `numeric_summary` and `outlier_counts` names a numeric column
/// of the source frame. `correlations` is present only when at least two
/// numeric columns exist, and is then square and symmetric over exactly those
/// columns with coefficients rounded to 3 decimal places.
#[derive(Clone, Debug, Serialize)]
pub struct ProfileSummary {
    pub shape: Shape,
    pub column_types: BTreeMap<String, ColumnKind>,
    pub missing_counts: BTreeMap<String, usize>,
    pub numeric_summary: BTreeMap<String, NumericSummary>,
    pub outlier_counts: BTreeMap<String, usize>,
    pub correlations: Option<BTreeMap<String, BTreeMap<String, f64>>>,
}
