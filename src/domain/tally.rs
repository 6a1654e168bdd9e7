//! Tally aggregation for price-feed reveals
//!
//! Each reveal carries a price vector and a market status. The tally takes
//! the per-index median over every vector and requires the statuses to agree.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Body of a single reveal, and the shape of the aggregated result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub prices: Vec<f64>,
    pub market_status: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TallyError {
    #[error("No consensus among revealed results")]
    NoReveals,
    #[error("Market status is inconsistent between reveals: '{expected}' vs '{found}'")]
    StatusMismatch { expected: String, found: String },
    #[error("All price vectors are empty")]
    AllEmpty,
}

/// Combine reveals into one response holding the median price at each index.
///
/// Vectors may have different lengths; each index only counts the reveals
/// that reach it.
pub fn aggregate(reveals: &[Response]) -> Result<Response, TallyError> {
    let (first, rest) = reveals.split_first().ok_or(TallyError::NoReveals)?;
    if let Some(other) = rest
        .iter()
        .find(|r| r.market_status != first.market_status)
    {
        return Err(TallyError::StatusMismatch {
            expected: first.market_status.clone(),
            found: other.market_status.clone(),
        });
    }

    let width = reveals.iter().map(|r| r.prices.len()).max().unwrap_or(0);
    if width == 0 {
        return Err(TallyError::AllEmpty);
    }

    let mut prices = Vec::with_capacity(width);
    for index in 0..width {
        let values: Vec<f64> = reveals
            .iter()
            .filter_map(|r| r.prices.get(index).copied())
            .collect();
        if let Some(value) = median(values) {
            debug!(index, median = value, "tallied");
            prices.push(value);
        }
    }

    Ok(Response {
        prices,
        market_status: first.market_status.clone(),
    })
}

/// Median of `values`; the mean of the two middle values for an even count.
pub fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let middle = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[middle - 1] + values[middle]) / 2.0)
    } else {
        Some(values[middle])
    }
}
