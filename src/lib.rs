//! # Datalyst - Deterministic Tabular Analytics
//!
//! Datalyst ingests a tabular dataset and answers free-text analytical
//! requests by routing each query to a deterministic execution path: a
//! dataset-wide statistical profile or a time-series forecast.
//!
//! ## Quick Start
//!
//! ```no_run
//! use datalyst::{dispatch, io};
//!
//! # fn example() -> anyhow::Result<()> {
//! let df = io::load_df(std::path::Path::new("sales.csv"))?;
//! let outcome = dispatch::answer_query(&df, "what will sales be next month")?;
//! println!("{}", serde_json::to_string_pretty(&outcome)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Modules
//!
//! - [`router`]: keyword intent routing (forecast / stats / fallback)
//! - [`profile`]: dataset profiling — shape, types, missing values, numeric
//!   summaries, IQR outliers, Pearson correlations
//! - [`forecast`]: time-series validation and ARIMA forecasting with
//!   confidence intervals
//! - [`dispatch`]: orchestration glue between the router and the engines
//! - [`io`]: dataset loading (CSV, JSON, Parquet)
//! - [`error`]: error types
//!
//! ## Design Notes
//!
//! All three engines are synchronous, stateless pure functions over a shared
//! `&DataFrame`: no mutation, no caching, no I/O beyond the frame they are
//! handed. Results serialize to nested primitives only, so any presentation
//! layer can render them directly. Failures abort the whole call with a
//! single typed error whose message is shown verbatim.

#![warn(clippy::all, rust_2018_idioms)]

pub mod dispatch;
pub mod error;
pub mod forecast;
pub mod io;
pub mod logging;
pub mod profile;
pub mod router;
pub mod utils;
