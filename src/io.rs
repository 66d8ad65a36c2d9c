//! Dataset loading.
//!
//! The engines only require an in-memory frame with named, typed columns;
//! this module is the external input boundary that produces one from a CSV,
//! JSON, or Parquet file. String columns that look like datetimes are parsed
//! best-effort so downstream auto-selection can find a date column.

use anyhow::{Context as _, Result};
use polars::prelude::*;

pub fn load_df(path: &std::path::Path) -> Result<DataFrame> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();

    let df = match ext.as_str() {
        "csv" => LazyCsvReader::new(path)
            .with_infer_schema_length(Some(10000))
            .with_has_header(true)
            .finish()?
            .collect()
            .context("Failed to read CSV")?,
        "parquet" => ParquetReader::new(std::fs::File::open(path)?)
            .finish()
            .context("Failed to read Parquet")?,
        "json" => JsonReader::new(std::fs::File::open(path)?)
            .finish()
            .context("Failed to read JSON")?,
        _ => return Err(anyhow::anyhow!("Unsupported file extension: {ext}")),
    };

    tracing::info!(
        rows = df.height(),
        columns = df.width(),
        path = %path.display(),
        "loaded dataset"
    );
    Ok(try_parse_temporal_columns(df))
}

/// Replace string columns that parse cleanly as datetimes. A column is only
/// converted when more than half of its values survive the parse; the
/// original is kept otherwise.
pub fn try_parse_temporal_columns(df: DataFrame) -> DataFrame {
    let mut df = df;
    let schema = df.schema().clone();

    for (name, dtype) in schema.iter() {
        if dtype.is_primitive_numeric() || dtype.is_temporal() || dtype.is_bool() {
            continue;
        }

        if let Ok(s) = df.column(name) {
            let s = s.as_materialized_series();
            if let Ok(casted) = s.cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
                && casted.null_count() < s.len() / 2
            {
                let _ = df.replace(name, casted);
            }
        }
    }
    df
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_csv_roundtrip() -> Result<()> {
        let dir = std::env::temp_dir();
        let path = dir.join("datalyst_io_test.csv");
        std::fs::write(&path, "date,sales\n2024-01-01,10\n2024-01-02,12\n2024-01-03,11\n")?;

        let df = load_df(&path)?;
        assert_eq!(df.height(), 3);
        assert_eq!(df.width(), 2);
        assert!(
            df.column("date")?.dtype().is_temporal(),
            "date strings should be parsed as datetime"
        );
        assert!(df.column("sales")?.dtype().is_primitive_numeric());

        std::fs::remove_file(&path).ok();
        Ok(())
    }

    #[test]
    fn test_unsupported_extension_is_rejected() {
        let err = load_df(std::path::Path::new("data.xlsx")).unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension"));
    }

    #[test]
    fn test_non_date_strings_are_left_alone() -> Result<()> {
        let s = Series::new("name".into(), vec!["alice", "bob", "carol"]);
        let df = DataFrame::new(vec![Column::from(s)])?;
        let df = try_parse_temporal_columns(df);
        assert!(!df.column("name")?.dtype().is_temporal());
        Ok(())
    }
}
