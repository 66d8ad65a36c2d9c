//! Keyword-based intent routing for free-text analytical queries.
//!
//! The router maps a query string onto one of a small closed set of execution
//! paths. It is a deliberately conservative stand-in for real intent
//! understanding: lowercase the text, split it into alphanumeric tokens, and
//! intersect the token set with three fixed keyword groups. The group order is
//! policy, not accident — forecast intent must dominate because forecast
//! queries often also contain comparison words ("predict the trend").

use serde::Serialize;
use std::collections::HashSet;

const FORECAST_KEYWORDS: &[&str] = &[
    "forecast",
    "predict",
    "future",
    "next",
    "projection",
    "estimate",
];

const STATS_KEYWORDS: &[&str] = &[
    "mean",
    "average",
    "distribution",
    "count",
    "max",
    "min",
    "trend",
    "compare",
    "summary",
    "describe",
    "plot",
    "histogram",
];

const EXPLAIN_KEYWORDS: &[&str] = &[
    "why", "explain", "reason", "interpret", "insight", "impact",
];

/// The task category a query resolves to.
///
/// `Llm` is the fallback label: queries with no clear deterministic signal
/// degrade to an external free-text backend rather than failing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Forecast,
    Stats,
    Llm,
}

impl Intent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Forecast => "forecast",
            Self::Stats => "stats",
            Self::Llm => "llm",
        }
    }
}

/// Classify a query into an [`Intent`].
///
/// Total and pure: never fails, never touches the dataset. Empty or
/// whitespace-only input yields the fallback label. Explanation-style queries
/// ("why", "explain", ...) are recognised but not separately routed — they
/// take the same fallback path as "no match".
pub fn route_query(query: &str) -> Intent {
    if query.trim().is_empty() {
        return Intent::Llm;
    }

    let lowered = query.to_lowercase();
    let tokens: HashSet<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();

    if FORECAST_KEYWORDS.iter().any(|k| tokens.contains(k)) {
        return Intent::Forecast;
    }
    if STATS_KEYWORDS.iter().any(|k| tokens.contains(k)) {
        return Intent::Stats;
    }
    if EXPLAIN_KEYWORDS.iter().any(|k| tokens.contains(k)) {
        return Intent::Llm;
    }

    Intent::Llm
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forecast_query() {
        assert_eq!(route_query("what will sales be next month"), Intent::Forecast);
        assert_eq!(route_query("predict revenue for Q3"), Intent::Forecast);
    }

    #[test]
    fn test_stats_query() {
        assert_eq!(route_query("show me the average price"), Intent::Stats);
        assert_eq!(route_query("describe the distribution of ages"), Intent::Stats);
    }

    #[test]
    fn test_forecast_dominates_stats() {
        // "predict" (forecast) and "trend" (stats) both present
        assert_eq!(route_query("predict the trend of sales"), Intent::Forecast);
        // "forecast" and "average" both present
        assert_eq!(route_query("forecast the average sales"), Intent::Forecast);
    }

    #[test]
    fn test_explain_degrades_to_fallback() {
        assert_eq!(route_query("why did revenue drop"), Intent::Llm);
        assert_eq!(route_query("explain this dip"), Intent::Llm);
    }

    #[test]
    fn test_empty_and_whitespace_fall_back() {
        assert_eq!(route_query(""), Intent::Llm);
        assert_eq!(route_query("   \t\n "), Intent::Llm);
    }

    #[test]
    fn test_no_match_falls_back() {
        assert_eq!(route_query("hello world"), Intent::Llm);
    }

    #[test]
    fn test_punctuation_and_case_ignored() {
        assert_eq!(route_query("FORECAST, please!"), Intent::Forecast);
        assert_eq!(route_query("what's the MEAN?"), Intent::Stats);
    }

    #[test]
    fn test_keywords_match_whole_tokens_only() {
        // "meaning" contains "mean" but is not the token "mean"
        assert_eq!(route_query("the meaning of life"), Intent::Llm);
    }
}
