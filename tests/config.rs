use etymon::config::{Config, DB_FILE, FEEDBACK_FILE, PENDING_FILE};
use std::path::PathBuf;

#[test]
fn defaults_use_the_shared_file_names() {
    let config = Config::from_lookup(|_| None);
    assert_eq!(config, Config::default());
    assert_eq!(config.database, PathBuf::from(DB_FILE));
    assert_eq!(config.pending, PathBuf::from(PENDING_FILE));
    assert_eq!(config.feedback, PathBuf::from(FEEDBACK_FILE));
}

#[test]
fn environment_then_flags() {
    let config = Config::from_lookup(|key| match key {
        "ETYMON_DB" => Some("/data/db.json.gz".to_string()),
        "ETYMON_PENDING" => Some("  ".to_string()),
        _ => None,
    });
    assert_eq!(config.database, PathBuf::from("/data/db.json.gz"));
    assert_eq!(config.pending, PathBuf::from(PENDING_FILE));

    let config = config.with_overrides(None, Some(PathBuf::from("incoming.json")), None);
    assert_eq!(config.database, PathBuf::from("/data/db.json.gz"));
    assert_eq!(config.pending, PathBuf::from("incoming.json"));
}
