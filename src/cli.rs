// File: ./src/cli.rs
//! Command-line surface: argument shapes and their translation into
//! engine criteria. Parsing stays here so the library layers never see
//! clap types.
use crate::model::filter::{
    FilterError, FilterSet, ScoreRange, StatusFilter, TitleMatch, YearRange,
};
use crate::model::record::{DateField, Status};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(
    name = "completionist",
    about = "Answers completion questions about a MyAnimeList export",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Export file to read (overrides the configured path)
    #[arg(long, global = true, value_name = "FILE")]
    pub export: Option<PathBuf>,

    /// More logging (-v for info, -vv for debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Per-status totals and the overall completion rate
    Stats {
        /// Count Plan-to-Watch entries in the completion-rate denominator
        #[arg(long)]
        include_planned: bool,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// How much was finished in each year
    Years {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// List the entries matching every given criterion
    List(ListArgs),
}

impl Command {
    /// The record criteria the command implies. Bounds are checked here, so
    /// an impossible range is refused before any file is read.
    pub fn criteria(&self) -> Result<FilterSet, FilterError> {
        match self {
            Command::List(args) => args.criteria(),
            _ => Ok(FilterSet::default()),
        }
    }
}

/// An inclusive year window as typed on the command line: a bare year
/// ("2020") or a span ("2018..2020"). Whether the bounds are ordered is
/// checked later, by the filter constructor.
#[derive(Debug, Clone, Copy)]
pub struct YearSpan {
    pub from: i32,
    pub to: i32,
}

impl FromStr for YearSpan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_year = |text: &str| {
            text.trim()
                .parse::<i32>()
                .map_err(|_| format!("'{}' is not a year", text.trim()))
        };
        match s.split_once("..") {
            Some((from, to)) => Ok(Self {
                from: parse_year(from)?,
                to: parse_year(to)?,
            }),
            None => {
                let year = parse_year(s)?;
                Ok(Self {
                    from: year,
                    to: year,
                })
            }
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Keep only these statuses (repeatable)
    #[arg(long = "status", value_name = "STATUS", value_parser = Status::from_str)]
    pub statuses: Vec<Status>,

    /// Finish year or range, e.g. 2020 or 2018..2020
    #[arg(long, value_name = "YEARS")]
    pub finished: Option<YearSpan>,

    /// Start year or range, e.g. 2020 or 2018..2020
    #[arg(long, value_name = "YEARS")]
    pub started: Option<YearSpan>,

    /// Lowest score to keep (1-10)
    #[arg(long, value_name = "N")]
    pub min_score: Option<u8>,

    /// Highest score to keep (1-10)
    #[arg(long, value_name = "N")]
    pub max_score: Option<u8>,

    /// Case-insensitive title substring
    #[arg(long, value_name = "TEXT")]
    pub title: Option<String>,

    /// Print at most this many rows (0 for everything)
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// Emit JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    /// Builds the criteria set, refusing impossible bounds before any
    /// record is read.
    pub fn criteria(&self) -> Result<FilterSet, FilterError> {
        let mut set = FilterSet::default();
        if !self.statuses.is_empty() {
            set.status = Some(StatusFilter::new(self.statuses.iter().copied()));
        }
        if let Some(span) = self.finished {
            set.finished = Some(YearRange::new(DateField::Finish, span.from, span.to)?);
        }
        if let Some(span) = self.started {
            set.started = Some(YearRange::new(DateField::Start, span.from, span.to)?);
        }
        if self.min_score.is_some() || self.max_score.is_some() {
            set.score = Some(ScoreRange::new(
                self.min_score.unwrap_or(1),
                self.max_score.unwrap_or(10),
            )?);
        }
        if let Some(text) = &self.title {
            set.title = Some(TitleMatch::new(text));
        }
        Ok(set)
    }
}
