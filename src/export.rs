// File: ./src/export.rs
// Reads the MyAnimeList XML export: a <myanimelist> root with one <anime>
// element per entry. Unreadable entries are set aside one by one; only a
// file that cannot be read or parsed as XML at all aborts the load.
use crate::model::record::{
    DateField, MalformedRecord, PartialDate, Record, Rejection, Screened, Status, screen,
};
use anyhow::{Context, Result};
use roxmltree::{Document, Node};
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Reads and screens an export file end to end.
pub fn load(path: &Path) -> Result<Screened> {
    let xml = fs::read_to_string(path)
        .with_context(|| format!("Failed to read export file '{}'", path.display()))?;
    parse(&xml).with_context(|| format!("Failed to parse export file '{}'", path.display()))
}

/// Parses the export XML and validates every entry. Entries that cannot be
/// turned into a usable record come back in `rejected` with the reason;
/// nothing short of broken XML makes this return Err.
pub fn parse(xml: &str) -> Result<Screened> {
    let doc = Document::parse(xml).context("not well-formed XML")?;
    let root = doc.root_element();
    if root.tag_name().name() != "myanimelist" {
        return Err(anyhow::anyhow!(
            "not a MyAnimeList export (root element is <{}>, expected <myanimelist>)",
            root.tag_name().name()
        ));
    }

    let mut candidates = Vec::new();
    let mut rejected = Vec::new();
    for entry in root.children().filter(|n| n.has_tag_name("anime")) {
        match parse_entry(entry) {
            Ok(record) => candidates.push(record),
            Err(rejection) => {
                log::warn!("skipping '{}': {}", rejection.title, rejection.reason);
                rejected.push(rejection);
            }
        }
    }

    // Validation rejects (e.g. a finish date on a Watching entry) join the
    // parse-level ones so callers see a single exclusion count.
    let mut screened = screen(candidates);
    rejected.append(&mut screened.rejected);
    screened.rejected = rejected;
    Ok(screened)
}

fn parse_entry(entry: Node) -> Result<Record, Rejection> {
    let title = text_of(entry, "series_title").unwrap_or_default().to_string();

    let status_raw = text_of(entry, "my_status").unwrap_or_default();
    let status = Status::from_str(status_raw).map_err(|_| Rejection {
        title: title.clone(),
        reason: MalformedRecord::UnknownStatus(status_raw.trim().to_string()),
    })?;

    let score = match text_of(entry, "my_score") {
        None => 0,
        Some(raw) => parse_score(raw).map_err(|reason| Rejection {
            title: title.clone(),
            reason,
        })?,
    };

    let start_date = parse_partial_date(text_of(entry, "my_start_date"), &title, DateField::Start);
    let finish_date =
        parse_partial_date(text_of(entry, "my_finish_date"), &title, DateField::Finish);

    Ok(Record {
        title,
        status,
        score,
        start_date,
        finish_date,
    })
}

/// Scores arrive as plain integers. Anything outside 0-10 is rejected here
/// rather than clamped; [`screen`] re-checks the range on top.
fn parse_score(raw: &str) -> Result<u8, MalformedRecord> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    let value: i64 = trimmed
        .parse()
        .map_err(|_| MalformedRecord::UnreadableScore(trimmed.to_string()))?;
    if !(0..=10).contains(&value) {
        return Err(MalformedRecord::ScoreOutOfRange(value));
    }
    Ok(value as u8)
}

/// Decodes the export's "YYYY-MM-DD" date text, where a zeroed component
/// stands for "unknown": "0000-00-00" is no date at all, "2019-00-00" is a
/// bare year, "2019-07-00" a year and month. The date is optional, so
/// unreadable text demotes to absent (with a warning) instead of sinking
/// the record.
fn parse_partial_date(raw: Option<&str>, title: &str, field: DateField) -> Option<PartialDate> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut parts = trimmed.splitn(3, '-');
    let year = match parts.next().and_then(|p| p.parse::<i32>().ok()) {
        Some(y) => y,
        None => {
            log::warn!(
                "'{}': unreadable {} date '{}', treating it as unset",
                title,
                field,
                trimmed
            );
            return None;
        }
    };
    if year == 0 {
        return None;
    }

    let month = parts
        .next()
        .and_then(|p| p.parse::<u32>().ok())
        .filter(|&m| m != 0);
    let day = parts
        .next()
        .and_then(|p| p.parse::<u32>().ok())
        .filter(|&d| d != 0);

    let date = PartialDate::new(year, month, day);
    // Feb 30 and friends: keep the precision that does hold.
    if date.month.is_some() && date.day.is_some() && date.full().is_none() {
        log::warn!(
            "'{}': impossible {} date '{}', keeping the year and month only",
            title,
            field,
            trimmed
        );
        return Some(PartialDate::new(year, month, None));
    }
    Some(date)
}

// Text lives as long as the document borrow, not the input string:
// entity-bearing text is resolved into storage owned by the document.
fn text_of<'a>(node: Node<'a, '_>, tag: &str) -> Option<&'a str> {
    node.children()
        .find(|c| c.has_tag_name(tag))
        .and_then(|c| c.text())
}
