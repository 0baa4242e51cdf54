// File: ./src/query.rs
// Runs a criteria set over the catalog and hands back the survivors in the
// one ordering every caller sees: finish date ascending, undated entries
// after all dated ones in their original input order, same-day ties broken
// by case-insensitive title.
use crate::model::filter::FilterSet;
use crate::model::record::Record;
use std::cmp::Ordering;

/// Applies every supplied criterion (logical AND) and sorts the matches.
/// With an empty criteria set this is a genuine pass-through apart from the
/// ordering, which is applied unconditionally.
pub fn run(records: &[Record], criteria: &FilterSet) -> Vec<Record> {
    let mut selected: Vec<Record> = records
        .iter()
        .filter(|r| criteria.matches(r))
        .cloned()
        .collect();
    // Stable sort: the comparator answers Equal for two undated records, so
    // their relative input order survives.
    selected.sort_by(compare_listing);
    log::debug!("query kept {} of {} records", selected.len(), records.len());
    selected
}

fn compare_listing(a: &Record, b: &Record) -> Ordering {
    match (&a.finish_date, &b.finish_date) {
        (Some(da), Some(db)) => da
            .cmp(db)
            .then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase())),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
