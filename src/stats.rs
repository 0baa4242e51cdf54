// File: ./src/stats.rs
// Counting layer: bucketed summaries and the completion rate. Consumes
// whatever record sequence the caller hands over, filtered or not, and
// never touches the records themselves.
use crate::model::record::{Record, Status};
use std::collections::BTreeMap;
use std::fmt;
use strum::IntoEnumIterator;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum StatsError {
    /// The denominator selected zero records; there is no meaningful rate
    /// and no NaN will stand in for one.
    #[error("completion rate is undefined: no records match the denominator statuses")]
    UndefinedRate,
}

/// Dimension to bucket a record sequence on.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GroupBy {
    Status,
    FinishYear,
}

/// Key of one summary bucket. Ord gives status buckets their listing order
/// and year buckets their chronological order.
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord)]
pub enum GroupKey {
    Status(Status),
    Year(i32),
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Status(status) => write!(f, "{}", status),
            GroupKey::Year(year) => write!(f, "{}", year),
        }
    }
}

/// Bucketed counts plus the off-bucket remainder. `undated` is only ever
/// populated by [`GroupBy::FinishYear`] and holds the records that carry no
/// finish date, so `bucket_total() + undated` always equals the input length
/// and totals stay reconcilable.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Summary {
    pub buckets: BTreeMap<GroupKey, usize>,
    pub undated: usize,
}

impl Summary {
    pub fn bucket_total(&self) -> usize {
        self.buckets.values().sum()
    }

    pub fn count(&self, key: &GroupKey) -> usize {
        self.buckets.get(key).copied().unwrap_or(0)
    }

    /// Inserts a zero bucket for every status, for callers that want all
    /// five rows even when some are empty.
    pub fn seed_statuses(&mut self) {
        for status in Status::iter() {
            self.buckets.entry(GroupKey::Status(status)).or_insert(0);
        }
    }
}

/// Counts records into buckets along the requested dimension. Grouping by
/// finish year leaves absent keys absent: a record without a finish date
/// lands in `undated`, never in an invented year.
pub fn summarize(records: &[Record], group_by: GroupBy) -> Summary {
    let mut summary = Summary::default();
    for record in records {
        match group_by {
            GroupBy::Status => {
                *summary
                    .buckets
                    .entry(GroupKey::Status(record.status))
                    .or_insert(0) += 1;
            }
            GroupBy::FinishYear => match &record.finish_date {
                Some(date) => {
                    *summary.buckets.entry(GroupKey::Year(date.year)).or_insert(0) += 1;
                }
                None => summary.undated += 1,
            },
        }
    }
    summary
}

/// Fraction of the denominator population that is Completed. The caller
/// picks which statuses form the denominator; Completed entries outside
/// that set contribute to neither side. A defined result always lies in
/// [0, 1].
pub fn completion_rate(records: &[Record], denominator: &[Status]) -> Result<f64, StatsError> {
    let mut total = 0usize;
    let mut completed = 0usize;
    for record in records {
        if denominator.contains(&record.status) {
            total += 1;
            if record.status == Status::Completed {
                completed += 1;
            }
        }
    }
    if total == 0 {
        return Err(StatsError::UndefinedRate);
    }
    Ok(completed as f64 / total as f64)
}
