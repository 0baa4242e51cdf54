// File: ./src/render.rs
// Plain-text table rendering. Width math goes through unicode-width so CJK
// titles line up; everything returns a String and printing stays with the
// caller.
use crate::model::record::Record;
use crate::stats::{StatsError, Summary};
use serde_json::json;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Titles longer than this are clipped with an ellipsis.
const MAX_TITLE_WIDTH: usize = 60;

/// Pads with spaces up to `width` display columns (wide glyphs count two).
fn pad(text: &str, width: usize) -> String {
    let mut out = String::from(text);
    for _ in UnicodeWidthStr::width(text)..width {
        out.push(' ');
    }
    out
}

/// Cuts text down to `max` display columns, marking the cut with an
/// ellipsis. Splits between chars, never inside one.
fn clip(text: &str, max: usize) -> String {
    if UnicodeWidthStr::width(text) <= max {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > max.saturating_sub(1) {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

pub fn percent(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

/// One row per record: title, status, score and both dates. Unscored and
/// undated cells show "-" rather than a zero that looks like data.
pub fn record_table(records: &[Record]) -> String {
    if records.is_empty() {
        return "No matching entries.\n".to_string();
    }

    let title_width = records
        .iter()
        .map(|r| UnicodeWidthStr::width(r.title.as_str()).min(MAX_TITLE_WIDTH))
        .max()
        .unwrap_or(0)
        .max("Title".len());

    let mut out = String::new();
    out.push_str(&format!(
        "{}  {:<13}  {:>5}  {:<10}  {:<10}\n",
        pad("Title", title_width),
        "Status",
        "Score",
        "Started",
        "Finished"
    ));
    out.push_str(&format!("{}\n", "-".repeat(title_width + 47)));

    for record in records {
        let score = if record.is_scored() {
            record.score.to_string()
        } else {
            "-".to_string()
        };
        let started = record
            .start_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        let finished = record
            .finish_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "{}  {:<13}  {:>5}  {:<10}  {:<10}\n",
            pad(&clip(&record.title, MAX_TITLE_WIDTH), title_width),
            record.status.to_string(),
            score,
            started,
            finished
        ));
    }
    out
}

/// Per-status counts with a total row. Callers seed the summary first when
/// they want all five statuses listed.
pub fn status_table(summary: &Summary) -> String {
    // "Plan to Watch" is the widest label.
    let label_width = 13;
    let mut out = String::new();
    for (key, count) in &summary.buckets {
        out.push_str(&format!(
            "{}  {:>6}\n",
            pad(&key.to_string(), label_width),
            count
        ));
    }
    out.push_str(&format!("{}\n", "-".repeat(label_width + 8)));
    out.push_str(&format!(
        "{}  {:>6}\n",
        pad("Total", label_width),
        summary.bucket_total()
    ));
    out
}

/// Finished-per-year histogram with each year's share of everything
/// finished. Entries finished on an unknown date get their own row so the
/// counts still add up.
pub fn year_table(summary: &Summary) -> String {
    let total = summary.bucket_total() + summary.undated;
    if total == 0 {
        return "Nothing finished yet.\n".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!("{:<7}  {:>6}  {:>6}\n", "Year", "Count", "Share"));
    for (key, count) in &summary.buckets {
        out.push_str(&format!(
            "{:<7}  {:>6}  {:>6}\n",
            key.to_string(),
            count,
            percent(*count as f64 / total as f64)
        ));
    }
    if summary.undated > 0 {
        out.push_str(&format!(
            "{:<7}  {:>6}  {:>6}\n",
            "no date",
            summary.undated,
            percent(summary.undated as f64 / total as f64)
        ));
    }
    out
}

/// The completion-rate line, including the honest version when the
/// denominator came up empty.
pub fn rate_line(rate: &Result<f64, StatsError>) -> String {
    match rate {
        Ok(value) => format!("Completion rate: {}\n", percent(*value)),
        Err(StatsError::UndefinedRate) => {
            "Completion rate: n/a (nothing in the denominator)\n".to_string()
        }
    }
}

/// Stdout note about skipped entries, for the table views. None when
/// nothing was excluded; the per-record reasons are already in the log.
pub fn exclusion_note(excluded: usize) -> Option<String> {
    match excluded {
        0 => None,
        1 => Some("\n1 malformed entry excluded from all results".to_string()),
        n => Some(format!("\n{} malformed entries excluded from all results", n)),
    }
}

fn bucket_map(summary: &Summary) -> serde_json::Map<String, serde_json::Value> {
    summary
        .buckets
        .iter()
        .map(|(key, count)| (key.to_string(), json!(count)))
        .collect()
}

/// JSON alternate of [`status_table`] plus the rate. Emitted instead of the
/// table, never alongside it, so stdout stays one parseable document; the
/// exclusion count rides along as a field.
pub fn stats_json(
    summary: &Summary,
    rate: &Result<f64, StatsError>,
    total: usize,
    excluded: usize,
) -> serde_json::Value {
    json!({
        "total": total,
        "excluded": excluded,
        "by_status": bucket_map(summary),
        "completion_rate": rate.ok(),
    })
}

/// JSON alternate of [`year_table`].
pub fn years_json(summary: &Summary, excluded: usize) -> serde_json::Value {
    json!({
        "by_year": bucket_map(summary),
        "undated": summary.undated,
        "excluded": excluded,
    })
}

/// JSON alternate of [`record_table`].
pub fn list_json(matches: &[Record], excluded: usize) -> serde_json::Value {
    json!({
        "matches": matches,
        "excluded": excluded,
    })
}
