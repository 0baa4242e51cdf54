// File: ./src/model/mod.rs
pub mod filter;
pub mod record;

pub use filter::{FilterError, FilterSet, ScoreRange, StatusFilter, TitleMatch, YearRange};
pub use record::{
    DateField, MalformedRecord, PartialDate, Record, Rejection, Screened, Status, screen,
};
