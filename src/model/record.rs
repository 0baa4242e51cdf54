// File: ./src/model/record.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::EnumIter;
use thiserror::Error;

/// Watch status of a catalog entry. Declaration order matches the listing
/// order of the MyAnimeList export (and its legacy numeric codes).
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter,
)]
pub enum Status {
    Watching,
    Completed,
    OnHold,
    Dropped,
    PlanToWatch,
}

impl Status {
    /// Only terminal entries may carry a finish date.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Dropped)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Watching => write!(f, "Watching"),
            Status::Completed => write!(f, "Completed"),
            Status::OnHold => write!(f, "On-Hold"),
            Status::Dropped => write!(f, "Dropped"),
            Status::PlanToWatch => write!(f, "Plan to Watch"),
        }
    }
}

impl FromStr for Status {
    type Err = String;

    /// Accepts the export spellings ("On-Hold", "Plan to Watch", ...) in any
    /// casing, plus the numeric codes older exports used for the same field.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match folded.as_str() {
            "watching" | "1" => Ok(Status::Watching),
            "completed" | "2" => Ok(Status::Completed),
            "onhold" | "3" => Ok(Status::OnHold),
            "dropped" | "4" => Ok(Status::Dropped),
            "plantowatch" | "ptw" | "6" => Ok(Status::PlanToWatch),
            _ => Err(format!(
                "unrecognized status '{}' (expected watching, completed, on-hold, dropped or plan-to-watch)",
                s.trim()
            )),
        }
    }
}

/// Which of a record's two dates an operation refers to.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum DateField {
    Start,
    Finish,
}

impl fmt::Display for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateField::Start => write!(f, "start"),
            DateField::Finish => write!(f, "finish"),
        }
    }
}

// --- DATES ---

/// Calendar date whose year is always known but whose month and day may not
/// be. Exports routinely hold "2019-00-00" style values; the missing
/// precision is preserved rather than padded with invented components.
///
/// The derived ordering sorts by year, then month, then day, with an unknown
/// component ahead of any known one.
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PartialDate {
    pub year: i32,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

impl PartialDate {
    /// Builds a date, discarding components that cannot hold: an out-of-range
    /// month or day becomes unknown, and a day without a month is meaningless
    /// so it is dropped too.
    pub fn new(year: i32, month: Option<u32>, day: Option<u32>) -> Self {
        let month = month.filter(|m| (1..=12).contains(m));
        let day = if month.is_some() {
            day.filter(|d| (1..=31).contains(d))
        } else {
            None
        };
        Self { year, month, day }
    }

    pub fn year_only(year: i32) -> Self {
        Self {
            year,
            month: None,
            day: None,
        }
    }

    /// The exact calendar day, when all three components are known and form a
    /// real date (Feb 30 yields None even though both components are set).
    pub fn full(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month?, self.day?)
    }
}

impl fmt::Display for PartialDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.month, self.day) {
            (Some(m), Some(d)) => write!(f, "{:04}-{:02}-{:02}", self.year, m, d),
            (Some(m), None) => write!(f, "{:04}-{:02}", self.year, m),
            _ => write!(f, "{:04}", self.year),
        }
    }
}

// --- RECORDS ---

/// One entry of the export: a title, where the user stands with it, and the
/// optional rating and watch dates.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub title: String,
    pub status: Status,
    /// 1-10 user rating; 0 means the entry was never scored.
    pub score: u8,
    pub start_date: Option<PartialDate>,
    pub finish_date: Option<PartialDate>,
}

impl Record {
    pub fn new(title: impl Into<String>, status: Status) -> Self {
        Self {
            title: title.into(),
            status,
            score: 0,
            start_date: None,
            finish_date: None,
        }
    }

    pub fn is_scored(&self) -> bool {
        self.score > 0
    }

    pub fn date(&self, field: DateField) -> Option<PartialDate> {
        match field {
            DateField::Start => self.start_date,
            DateField::Finish => self.finish_date,
        }
    }

    /// Checks the structural rules every usable record obeys. Entries failing
    /// any of them are excluded from queries and aggregations (see [`screen`]).
    pub fn validate(&self) -> Result<(), MalformedRecord> {
        if self.title.trim().is_empty() {
            return Err(MalformedRecord::EmptyTitle);
        }
        if self.score > 10 {
            return Err(MalformedRecord::ScoreOutOfRange(i64::from(self.score)));
        }
        if self.finish_date.is_some() && !self.status.is_terminal() {
            return Err(MalformedRecord::FinishDateOnUnfinished {
                status: self.status,
            });
        }
        Ok(())
    }

    /// True when both dates are fully specified and the finish lands strictly
    /// before the start. Worth flagging, never grounds for exclusion: partial
    /// dates cannot prove an inversion ("2020" vs "2020-05" stays silent).
    pub fn has_inverted_dates(&self) -> bool {
        match (
            self.start_date.and_then(|d| d.full()),
            self.finish_date.and_then(|d| d.full()),
        ) {
            (Some(start), Some(finish)) => finish < start,
            _ => false,
        }
    }
}

// --- SCREENING ---

/// Why a single entry was set aside instead of aborting the whole run.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum MalformedRecord {
    #[error("title is missing or empty")]
    EmptyTitle,
    #[error("status '{0}' is not a known watch status")]
    UnknownStatus(String),
    #[error("score {0} is outside 0-10")]
    ScoreOutOfRange(i64),
    #[error("score '{0}' is not a number")]
    UnreadableScore(String),
    #[error("finish date set on a {status} entry")]
    FinishDateOnUnfinished { status: Status },
}

/// One excluded entry together with the rule it broke.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Rejection {
    pub title: String,
    pub reason: MalformedRecord,
}

/// Outcome of sweeping raw entries through validation: the usable records in
/// their original order, plus one diagnostic per exclusion.
#[derive(Debug, Clone, Default)]
pub struct Screened {
    pub records: Vec<Record>,
    pub rejected: Vec<Rejection>,
}

impl Screened {
    pub fn excluded(&self) -> usize {
        self.rejected.len()
    }
}

/// Validates every candidate, keeping the good ones and turning each bad one
/// into a [`Rejection`]. A malformed entry never aborts the run and never
/// silently vanishes either; callers surface `rejected` alongside results.
pub fn screen(candidates: Vec<Record>) -> Screened {
    let mut screened = Screened::default();
    for record in candidates {
        match record.validate() {
            Ok(()) => {
                if record.has_inverted_dates() {
                    log::warn!(
                        "'{}' finishes before it starts ({} -> {}); keeping it as-is",
                        record.title,
                        record.start_date.unwrap_or(PartialDate::year_only(0)),
                        record.finish_date.unwrap_or(PartialDate::year_only(0)),
                    );
                }
                screened.records.push(record);
            }
            Err(reason) => {
                log::warn!("excluding '{}': {}", record.title, reason);
                screened.rejected.push(Rejection {
                    title: record.title,
                    reason,
                });
            }
        }
    }
    screened
}
