//! Client-side ordering of an already fetched catalog page.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::{ParseEnumError, University};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Best (lowest) ranking first; unranked last.
    #[default]
    Rank,
    /// Cheapest minimum tuition first; unknown tuition last.
    TuitionLow,
    /// Most expensive maximum tuition first; unknown tuition counts as 0.
    TuitionHigh,
    /// Highest acceptance rate first; unknown rate counts as 0.
    Acceptance,
}

impl FromStr for SortKey {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rank" => Ok(SortKey::Rank),
            "tuition_low" => Ok(SortKey::TuitionLow),
            "tuition_high" => Ok(SortKey::TuitionHigh),
            "acceptance" => Ok(SortKey::Acceptance),
            other => Err(ParseEnumError {
                kind: "sort key",
                value: other.to_string(),
            }),
        }
    }
}

/// Ascending with `None` after every present value.
fn ascending_missing_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn compare(key: SortKey, a: &University, b: &University) -> Ordering {
    match key {
        SortKey::Rank => {
            ascending_missing_last(a.ranking.map(f64::from), b.ranking.map(f64::from))
        }
        SortKey::TuitionLow => ascending_missing_last(a.tuition_min, b.tuition_min),
        SortKey::TuitionHigh => b
            .tuition_max
            .unwrap_or(0.0)
            .total_cmp(&a.tuition_max.unwrap_or(0.0)),
        SortKey::Acceptance => b
            .acceptance_rate
            .unwrap_or(0.0)
            .total_cmp(&a.acceptance_rate.unwrap_or(0.0)),
    }
}
