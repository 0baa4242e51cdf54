// Tests for MyAnimeList export parsing and the screening pipeline.
use completionist::export;
use completionist::model::{FilterSet, MalformedRecord, PartialDate, Status};
use completionist::query;
use completionist::stats::{GroupBy, GroupKey, summarize};

/// A small but representative export: CDATA titles, text and legacy numeric
/// statuses, and the whole range of date precision the format produces.
const SAMPLE_EXPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<myanimelist>
  <myinfo>
    <user_name>completionist</user_name>
    <user_total_anime>6</user_total_anime>
  </myinfo>
  <anime>
    <series_title><![CDATA[Fullmetal Alchemist: Brotherhood]]></series_title>
    <my_status>Completed</my_status>
    <my_score>10</my_score>
    <my_start_date>2019-04-05</my_start_date>
    <my_finish_date>2019-07-21</my_finish_date>
  </anime>
  <anime>
    <series_title><![CDATA[Mushishi]]></series_title>
    <my_status>2</my_status>
    <my_score>9</my_score>
    <my_start_date>2020-00-00</my_start_date>
    <my_finish_date>2020-11-00</my_finish_date>
  </anime>
  <anime>
    <series_title><![CDATA[One Piece]]></series_title>
    <my_status>Watching</my_status>
    <my_score>0</my_score>
    <my_start_date>2018-06-00</my_start_date>
    <my_finish_date>0000-00-00</my_finish_date>
  </anime>
  <anime>
    <series_title><![CDATA[School Days]]></series_title>
    <my_status>Dropped</my_status>
    <my_score>3</my_score>
    <my_start_date>0000-00-00</my_start_date>
    <my_finish_date>2017-00-00</my_finish_date>
  </anime>
  <anime>
    <series_title><![CDATA[Aria the Animation]]></series_title>
    <my_status>Plan to Watch</my_status>
    <my_score>0</my_score>
    <my_start_date>0000-00-00</my_start_date>
    <my_finish_date>0000-00-00</my_finish_date>
  </anime>
  <anime>
    <series_title><![CDATA[Hunter x Hunter (2011)]]></series_title>
    <my_status>On-Hold</my_status>
    <my_score>8</my_score>
    <my_start_date>2021-01-09</my_start_date>
    <my_finish_date>0000-00-00</my_finish_date>
  </anime>
</myanimelist>
"#;

// ==================== Well-formed Entries ====================

#[test]
fn test_parse_reads_every_wellformed_entry() {
    let screened = export::parse(SAMPLE_EXPORT).unwrap();
    assert_eq!(screened.records.len(), 6);
    assert_eq!(screened.excluded(), 0);
}

#[test]
fn test_parse_decodes_statuses_scores_and_partial_dates() {
    let screened = export::parse(SAMPLE_EXPORT).unwrap();

    let fma = &screened.records[0];
    assert_eq!(fma.title, "Fullmetal Alchemist: Brotherhood");
    assert_eq!(fma.status, Status::Completed);
    assert_eq!(fma.score, 10);
    assert_eq!(fma.finish_date, Some(PartialDate::new(2019, Some(7), Some(21))));

    // Legacy numeric status code and zeroed date components.
    let mushishi = &screened.records[1];
    assert_eq!(mushishi.status, Status::Completed);
    assert_eq!(mushishi.start_date, Some(PartialDate::year_only(2020)));
    assert_eq!(
        mushishi.finish_date,
        Some(PartialDate::new(2020, Some(11), None))
    );

    // 0000-00-00 means no date at all, not year zero.
    let one_piece = &screened.records[2];
    assert_eq!(one_piece.status, Status::Watching);
    assert!(!one_piece.is_scored());
    assert_eq!(one_piece.finish_date, None);
}

#[test]
fn test_entity_references_in_titles_are_decoded() {
    // Escaped characters reach the record as their resolved form, exactly
    // as CDATA content does.
    let xml = r#"<myanimelist>
  <anime>
    <series_title>Romeo &#215; Juliet</series_title>
    <my_status>Completed</my_status>
    <my_score>7</my_score>
  </anime>
  <anime>
    <series_title>Hack &amp; Slash</series_title>
    <my_status>Dropped</my_status>
    <my_score>4</my_score>
  </anime>
</myanimelist>"#;

    let screened = export::parse(xml).unwrap();
    assert_eq!(screened.records[0].title, "Romeo × Juliet");
    assert_eq!(screened.records[1].title, "Hack & Slash");
}

#[test]
fn test_parsed_records_flow_straight_into_queries_and_summaries() {
    let screened = export::parse(SAMPLE_EXPORT).unwrap();

    let everything = query::run(&screened.records, &FilterSet::default());
    assert_eq!(everything.len(), 6);
    // Dated finishes first, chronologically: School Days (2017) leads.
    assert_eq!(everything[0].title, "School Days");

    let by_status = summarize(&screened.records, GroupBy::Status);
    assert_eq!(by_status.count(&GroupKey::Status(Status::Completed)), 2);
    assert_eq!(by_status.count(&GroupKey::Status(Status::Dropped)), 1);
    assert_eq!(by_status.bucket_total(), 6);
}

// ==================== Malformed Entries ====================

#[test]
fn test_watching_entry_with_a_finish_date_is_excluded_and_counted() {
    let xml = r#"<myanimelist>
  <anime>
    <series_title>Good</series_title>
    <my_status>Completed</my_status>
    <my_score>7</my_score>
    <my_finish_date>2020-01-01</my_finish_date>
  </anime>
  <anime>
    <series_title>Bad</series_title>
    <my_status>Watching</my_status>
    <my_score>0</my_score>
    <my_finish_date>2019-00-00</my_finish_date>
  </anime>
</myanimelist>"#;

    let screened = export::parse(xml).unwrap();
    assert_eq!(screened.records.len(), 1);
    assert_eq!(screened.records[0].title, "Good");
    assert_eq!(screened.excluded(), 1);
    assert_eq!(screened.rejected[0].title, "Bad");
    assert_eq!(
        screened.rejected[0].reason,
        MalformedRecord::FinishDateOnUnfinished {
            status: Status::Watching
        }
    );
}

#[test]
fn test_unknown_status_and_wild_score_are_skipped_not_fatal() {
    let xml = r#"<myanimelist>
  <anime>
    <series_title>Mystery</series_title>
    <my_status>Rewatching</my_status>
  </anime>
  <anime>
    <series_title>Overrated</series_title>
    <my_status>Completed</my_status>
    <my_score>15</my_score>
  </anime>
  <anime>
    <series_title>Fine</series_title>
    <my_status>Completed</my_status>
    <my_score>6</my_score>
  </anime>
</myanimelist>"#;

    let screened = export::parse(xml).unwrap();
    assert_eq!(screened.records.len(), 1);
    assert_eq!(screened.records[0].title, "Fine");
    assert_eq!(screened.excluded(), 2);

    let reasons: Vec<&MalformedRecord> =
        screened.rejected.iter().map(|r| &r.reason).collect();
    assert!(reasons.contains(&&MalformedRecord::UnknownStatus("Rewatching".to_string())));
    assert!(reasons.contains(&&MalformedRecord::ScoreOutOfRange(15)));
}

#[test]
fn test_missing_title_is_a_rejection_with_a_readable_reason() {
    let xml = r#"<myanimelist>
  <anime>
    <my_status>Completed</my_status>
    <my_score>5</my_score>
  </anime>
</myanimelist>"#;

    let screened = export::parse(xml).unwrap();
    assert!(screened.records.is_empty());
    assert_eq!(screened.rejected[0].reason, MalformedRecord::EmptyTitle);
    assert!(screened.rejected[0].reason.to_string().contains("title"));
}

#[test]
fn test_unreadable_date_text_keeps_the_record_minus_the_date() {
    let xml = r#"<myanimelist>
  <anime>
    <series_title>Sloppy Edit</series_title>
    <my_status>Completed</my_status>
    <my_score>7</my_score>
    <my_finish_date>soon(tm)</my_finish_date>
  </anime>
</myanimelist>"#;

    let screened = export::parse(xml).unwrap();
    assert_eq!(screened.records.len(), 1);
    assert_eq!(screened.records[0].finish_date, None);
    assert_eq!(screened.excluded(), 0);
}

#[test]
fn test_inverted_full_dates_are_kept_not_rejected() {
    let xml = r#"<myanimelist>
  <anime>
    <series_title>Time Traveler</series_title>
    <my_status>Completed</my_status>
    <my_score>8</my_score>
    <my_start_date>2021-05-10</my_start_date>
    <my_finish_date>2020-02-02</my_finish_date>
  </anime>
</myanimelist>"#;

    let screened = export::parse(xml).unwrap();
    // Flagged in the log, but the record stays usable.
    assert_eq!(screened.records.len(), 1);
    assert_eq!(screened.excluded(), 0);
    assert!(screened.records[0].has_inverted_dates());
}

// ==================== Broken Files ====================

#[test]
fn test_wrong_root_element_is_a_hard_error() {
    let err = export::parse("<animelist><anime/></animelist>").unwrap_err();
    assert!(err.to_string().contains("myanimelist"));
}

#[test]
fn test_truncated_xml_is_a_hard_error() {
    assert!(export::parse("<myanimelist><anime>").is_err());
    assert!(export::parse("").is_err());
}

#[test]
fn test_load_reports_the_missing_file_path() {
    let missing = std::path::Path::new("/nonexistent/animelist.xml");
    let err = export::load(missing).unwrap_err();
    assert!(err.to_string().contains("/nonexistent/animelist.xml"));
}
