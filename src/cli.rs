use anyhow::Result;
use clap::{Parser, Subcommand};
use datalyst::dispatch::{self, QueryOutcome};
use datalyst::forecast;
use datalyst::{io, profile};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "datalyst", about = "Deterministic analytics over tabular data")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Profile a dataset: shape, types, missing values, numeric summary,
    /// outliers, and correlations
    Profile {
        /// Path to the dataset (CSV, JSON, Parquet)
        file: PathBuf,
    },
    /// Fit an ARIMA model on a date/target column pair and forecast ahead
    Forecast {
        /// Path to the dataset (CSV, JSON, Parquet)
        file: PathBuf,

        /// Name of the date column
        #[arg(long)]
        date_col: String,

        /// Name of the numeric target column
        #[arg(long)]
        target_col: String,

        /// Forecast horizon in steps
        #[arg(long, default_value_t = forecast::DEFAULT_STEPS)]
        steps: usize,

        /// Model order as p,d,q
        #[arg(long, value_parser = parse_order, default_value = "1,1,1")]
        order: (usize, usize, usize),
    },
    /// Answer a free-text analytical query against a dataset
    Ask {
        /// Path to the dataset (CSV, JSON, Parquet)
        file: PathBuf,

        /// The query, e.g. "show me the average price"
        query: String,
    },
}

fn parse_order(raw: &str) -> Result<(usize, usize, usize), String> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected p,d,q (e.g. 1,1,1), got '{raw}'"));
    }
    let parse = |s: &str| {
        s.parse::<usize>()
            .map_err(|_| format!("'{s}' is not a valid order component"))
    };
    Ok((parse(parts[0])?, parse(parts[1])?, parse(parts[2])?))
}

const UNSUPPORTED_GUIDANCE: &str = "This query is not supported yet.\n\n\
Try a simpler analytical request such as:\n\
- top / bottom values\n\
- sorting\n\
- filtering\n\
- basic statistics";

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Profile { file } => {
            let df = io::load_df(&file)?;
            let summary = profile::run_profile(&df)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Forecast {
            file,
            date_col,
            target_col,
            steps,
            order,
        } => {
            let df = io::load_df(&file)?;
            let result = forecast::run_forecast(&df, &date_col, &target_col, steps, order)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Ask { file, query } => {
            let df = io::load_df(&file)?;
            match dispatch::answer_query(&df, &query)? {
                QueryOutcome::Stats(summary) => {
                    println!("{}", serde_json::to_string_pretty(&summary)?);
                }
                QueryOutcome::Forecast(result) => {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                }
                QueryOutcome::Unsupported => {
                    println!("{UNSUPPORTED_GUIDANCE}");
                }
            }
        }
    }
    Ok(())
}
