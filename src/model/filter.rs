// File: ./src/model/filter.rs
// Predicate constructors and their AND-composition. Every fallible
// constructor checks its bounds up front so a bad criterion is reported
// before any record is scanned, not discovered halfway through a pass.
use crate::model::record::{DateField, Record, Status};
use std::collections::BTreeSet;
use thiserror::Error;

/// A criterion that can never match anything as specified.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum FilterError {
    #[error("{field} year range {min}..={max} has its minimum above its maximum")]
    YearBoundsInverted { field: DateField, min: i32, max: i32 },
    #[error("score range {min}..={max} has its minimum above its maximum")]
    ScoreBoundsInverted { min: u8, max: u8 },
    #[error("score bound {0} is above 10")]
    ScoreBoundTooHigh(u8),
}

/// Membership test against a set of watch statuses. An empty set is legal
/// and matches nothing.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct StatusFilter {
    allowed: BTreeSet<Status>,
}

impl StatusFilter {
    pub fn new(statuses: impl IntoIterator<Item = Status>) -> Self {
        Self {
            allowed: statuses.into_iter().collect(),
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.allowed.contains(&record.status)
    }
}

/// Inclusive year window over one of the two record dates. Matching only
/// needs the year, so "2019-00-00" style entries participate fully.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct YearRange {
    field: DateField,
    min: i32,
    max: i32,
}

impl YearRange {
    pub fn new(field: DateField, min: i32, max: i32) -> Result<Self, FilterError> {
        if min > max {
            return Err(FilterError::YearBoundsInverted { field, min, max });
        }
        Ok(Self { field, min, max })
    }

    pub fn matches(&self, record: &Record) -> bool {
        // An absent date can never satisfy a year bound.
        match record.date(self.field) {
            Some(date) => self.min <= date.year && date.year <= self.max,
            None => false,
        }
    }
}

/// Inclusive score window over the 1-10 rating scale. Unscored entries
/// (score 0) never match, whatever the bounds say.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ScoreRange {
    min: u8,
    max: u8,
}

impl ScoreRange {
    pub fn new(min: u8, max: u8) -> Result<Self, FilterError> {
        if min > 10 {
            return Err(FilterError::ScoreBoundTooHigh(min));
        }
        if max > 10 {
            return Err(FilterError::ScoreBoundTooHigh(max));
        }
        if min > max {
            return Err(FilterError::ScoreBoundsInverted { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn matches(&self, record: &Record) -> bool {
        record.is_scored() && self.min <= record.score && record.score <= self.max
    }
}

/// Case-insensitive substring test on the title. The empty needle matches
/// every record.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TitleMatch {
    needle: String,
}

impl TitleMatch {
    pub fn new(needle: &str) -> Self {
        Self {
            needle: needle.to_lowercase(),
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.needle.is_empty() || record.title.to_lowercase().contains(&self.needle)
    }
}

/// Every criterion the caller supplied, combined with logical AND. A `None`
/// slot places no constraint of that kind, so the default value keeps all
/// records.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct FilterSet {
    pub status: Option<StatusFilter>,
    pub started: Option<YearRange>,
    pub finished: Option<YearRange>,
    pub score: Option<ScoreRange>,
    pub title: Option<TitleMatch>,
}

impl FilterSet {
    pub fn matches(&self, record: &Record) -> bool {
        self.status.as_ref().is_none_or(|f| f.matches(record))
            && self.started.is_none_or(|f| f.matches(record))
            && self.finished.is_none_or(|f| f.matches(record))
            && self.score.is_none_or(|f| f.matches(record))
            && self.title.as_ref().is_none_or(|f| f.matches(record))
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.started.is_none()
            && self.finished.is_none()
            && self.score.is_none()
            && self.title.is_none()
    }
}
