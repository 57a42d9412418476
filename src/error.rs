use thiserror::Error;

/// A single tabular row could not become a vocabulary entry.
///
/// Callers drop the row and keep going.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizationError {
    #[error("row has no word")]
    MissingWord,
}

/// Free text carried no structure the contribution parser recognises.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("contribution text is empty")]
    Empty,

    #[error("no category marker found (expected a line like \"Name\" 類)")]
    NoCategoryMarker,
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV input is empty")]
    Empty,

    #[error("unterminated quoted field starting on line {0}")]
    UnterminatedQuote(usize),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not read table: {0}")]
    Table(#[from] LoadError),

    #[error("unsupported store extension: {0}")]
    UnsupportedExtension(String),
}

#[derive(Error, Debug)]
pub enum FeedbackError {
    #[error("feedback comment is empty")]
    EmptyComment,

    #[error("unknown feedback kind: {0}")]
    UnknownKind(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not read feedback log: {0}")]
    Load(#[from] LoadError),
}
