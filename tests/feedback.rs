use etymon::FeedbackError;
use etymon::feedback::{FeedbackKind, FeedbackRecord, append_feedback, load_feedback, pending_feedback};
use std::fs;
use tempfile::tempdir;

#[test]
fn new_records_are_pending_and_trimmed() {
    let record = FeedbackRecord::new(" biology ", FeedbackKind::Breakdown, " should be bio+logy ").unwrap();

    assert_eq!(record.word, "biology");
    assert_eq!(record.comment, "should be bio+logy");
    assert!(record.is_pending());
    // %Y-%m-%d %H:%M:%S
    assert_eq!(record.timestamp.len(), 19);
}

#[test]
fn empty_comment_is_rejected() {
    assert!(matches!(
        FeedbackRecord::new("biology", FeedbackKind::Other, "   "),
        Err(FeedbackError::EmptyComment)
    ));
}

#[test]
fn kinds_parse_case_insensitively() {
    assert_eq!("Definition".parse::<FeedbackKind>().unwrap(), FeedbackKind::Definition);
    assert_eq!(" category ".parse::<FeedbackKind>().unwrap(), FeedbackKind::Category);
    assert!(matches!(
        "spelling".parse::<FeedbackKind>(),
        Err(FeedbackError::UnknownKind(_))
    ));
}

#[test]
fn append_then_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("reports").join("feedback.csv");

    let first = FeedbackRecord::new("biology", FeedbackKind::Definition, "missing \"life\", too short").unwrap();
    let mut second = FeedbackRecord::new("geology", FeedbackKind::Pronunciation, "stress is wrong").unwrap();
    second.status = "resolved".to_string();

    append_feedback(&path, &first).unwrap();
    append_feedback(&path, &second).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("timestamp,word,type,comment,status\n"));
    assert_eq!(text.matches("timestamp,word").count(), 1);

    let records = load_feedback(&path).unwrap();
    assert_eq!(records, vec![first.clone(), second]);

    let pending = pending_feedback(&records);
    assert_eq!(pending, vec![&first]);
    println!("✓ feedback log holds {} records, {} pending", records.len(), pending.len());
}

#[test]
fn missing_log_has_no_records() {
    let dir = tempdir().unwrap();
    assert!(load_feedback(dir.path().join("none.csv")).unwrap().is_empty());
}
