//! Read-side filters and sorting over stored results
//!
//! The recent/hits filters are placeholder criteria. With the default
//! `ResultsConfig` they test `date` and `sales` columns, which enrichment
//! never produces; they are kept as-is rather than silently rewired to
//! `monthly_sales`. Deployments can point them at real columns in config.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

use rankscout_common::config::ResultsConfig;
use rankscout_common::record::numeric_field;
use rankscout_common::{Error, Record};

use crate::models::enrichment::RANK_FIELD;

/// Sort order for `sort_by_rank`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(Error::InvalidInput(format!(
                "Unknown sort direction `{}` (expected `asc` or `desc`)",
                other
            ))),
        }
    }
}

/// Placeholder: keep records whose recency field is a string containing the marker
pub fn filter_recent(records: Vec<Record>, criteria: &ResultsConfig) -> Vec<Record> {
    records
        .into_iter()
        .filter(|r| {
            r.get(&criteria.recent_field)
                .and_then(Value::as_str)
                .is_some_and(|date| date.contains(&criteria.recent_marker))
        })
        .collect()
}

/// Placeholder: keep records whose hits field is a number above the threshold
pub fn filter_hits(records: Vec<Record>, criteria: &ResultsConfig) -> Vec<Record> {
    records
        .into_iter()
        .filter(|r| {
            numeric_field(r, &criteria.hits_field).is_some_and(|v| v > criteria.hits_threshold)
        })
        .collect()
}

/// Stable sort by rank; missing or non-numeric rank counts as 0
pub fn sort_by_rank(mut records: Vec<Record>, direction: SortDirection) -> Vec<Record> {
    let rank = |r: &Record| numeric_field(r, RANK_FIELD).unwrap_or(0.0);

    match direction {
        SortDirection::Asc => records.sort_by(|a, b| rank(a).total_cmp(&rank(b))),
        SortDirection::Desc => records.sort_by(|a, b| rank(b).total_cmp(&rank(a))),
    }
    records
}
