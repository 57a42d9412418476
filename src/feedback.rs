use chrono::Local;
use serde::Serialize;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use crate::downloader::push_record;
use crate::error::FeedbackError;
use crate::loader::parse_csv;

pub const FEEDBACK_COLUMNS: [&str; 5] = ["timestamp", "word", "type", "comment", "status"];
pub const STATUS_PENDING: &str = "pending";

/// What a reader says is wrong with an entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum FeedbackKind {
    Pronunciation,
    Breakdown,
    Definition,
    Category,
    Other,
}

impl FeedbackKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackKind::Pronunciation => "pronunciation",
            FeedbackKind::Breakdown => "breakdown",
            FeedbackKind::Definition => "definition",
            FeedbackKind::Category => "category",
            FeedbackKind::Other => "other",
        }
    }
}

impl fmt::Display for FeedbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedbackKind {
    type Err = FeedbackError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "pronunciation" => Ok(FeedbackKind::Pronunciation),
            "breakdown" => Ok(FeedbackKind::Breakdown),
            "definition" => Ok(FeedbackKind::Definition),
            "category" => Ok(FeedbackKind::Category),
            "other" => Ok(FeedbackKind::Other),
            _ => Err(FeedbackError::UnknownKind(value.to_string())),
        }
    }
}

/// One line of the feedback log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FeedbackRecord {
    pub timestamp: String,
    pub word: String,
    pub kind: FeedbackKind,
    pub comment: String,
    pub status: String,
}

impl FeedbackRecord {
    /// A new pending report stamped with the local time.
    pub fn new(word: &str, kind: FeedbackKind, comment: &str) -> Result<Self, FeedbackError> {
        if comment.trim().is_empty() {
            return Err(FeedbackError::EmptyComment);
        }
        Ok(FeedbackRecord {
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            word: word.trim().to_string(),
            kind,
            comment: comment.trim().to_string(),
            status: STATUS_PENDING.to_string(),
        })
    }

    pub fn is_pending(&self) -> bool {
        self.status == STATUS_PENDING
    }
}

/// Appends a record to the log, writing the header first if the file is new.
pub fn append_feedback(path: impl AsRef<Path>, record: &FeedbackRecord) -> Result<(), FeedbackError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let is_new = fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);

    let mut line = String::new();
    if is_new {
        push_record(&mut line, FEEDBACK_COLUMNS);
    }
    push_record(
        &mut line,
        [
            record.timestamp.as_str(),
            record.word.as_str(),
            record.kind.as_str(),
            record.comment.as_str(),
            record.status.as_str(),
        ],
    );

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(line.as_bytes())?;
    Ok(())
}

/// Reads every record back. A missing log has no records; rows with an
/// unknown kind are kept as `Other`.
pub fn load_feedback(path: impl AsRef<Path>) -> Result<Vec<FeedbackRecord>, FeedbackError> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Vec::new());
    }
    let text = fs::read_to_string(path)?;
    let rows = parse_csv(&text)?;

    Ok(rows
        .iter()
        .skip(1)
        .map(|row| {
            let cell = |i: usize| row.get(i).map(|s| s.trim().to_string()).unwrap_or_default();
            FeedbackRecord {
                timestamp: cell(0),
                word: cell(1),
                kind: cell(2).parse().unwrap_or(FeedbackKind::Other),
                comment: cell(3),
                status: cell(4),
            }
        })
        .collect())
}

pub fn pending_feedback(records: &[FeedbackRecord]) -> Vec<&FeedbackRecord> {
    records.iter().filter(|r| r.is_pending()).collect()
}
