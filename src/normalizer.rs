use crate::builder::FlatRow;
use crate::error::NormalizationError;
use crate::vocab::VocabularyEntry;
use std::collections::BTreeMap;

/// One tabular record keyed by column name.
pub type RawRecord = BTreeMap<String, String>;

/// Columns with a dedicated place in the tree; anything else is an
/// enrichment field and lands in `VocabularyEntry::extra`.
pub const CORE_COLUMNS: [&str; 9] = [
    "category",
    "roots",
    "meaning",
    "word",
    "breakdown",
    "definition",
    "phonetic",
    "example",
    "translation",
];

// Placeholders upstream tooling writes for "no value".
const EMPTY_MARKERS: [&str; 2] = ["nan", "無"];

/// Trims a field and collapses every "empty" marker to `""`.
pub fn clean_field(value: &str) -> String {
    let trimmed = value.trim();
    if EMPTY_MARKERS.iter().any(|m| trimmed.eq_ignore_ascii_case(m)) {
        String::new()
    } else {
        trimmed.to_string()
    }
}

fn field(raw: &RawRecord, name: &str) -> String {
    raw.get(name).map(|v| clean_field(v)).unwrap_or_default()
}

/// Converts a raw record into a vocabulary entry.
///
/// Missing optional fields come back as `""`, never absent. Fails only when
/// the word is empty after cleaning.
pub fn normalize_row(raw: &RawRecord) -> Result<VocabularyEntry, NormalizationError> {
    let word = field(raw, "word");
    if word.is_empty() {
        return Err(NormalizationError::MissingWord);
    }

    let mut extra = BTreeMap::new();
    for (key, value) in raw {
        let key = key.trim();
        if key.is_empty() || CORE_COLUMNS.contains(&key) {
            continue;
        }
        let value = clean_field(value);
        if !value.is_empty() {
            extra.insert(key.to_string(), value);
        }
    }

    Ok(VocabularyEntry {
        word,
        breakdown: field(raw, "breakdown"),
        definition: field(raw, "definition"),
        phonetic: field(raw, "phonetic"),
        example: field(raw, "example"),
        translation: field(raw, "translation"),
        extra,
    })
}

/// Like [`normalize_row`] but keeps the category/roots/meaning columns so
/// the row can be handed to the tree builder.
pub fn normalize_record(raw: &RawRecord) -> Result<FlatRow, NormalizationError> {
    let entry = normalize_row(raw)?;
    Ok(FlatRow::new(
        &field(raw, "category"),
        &field(raw, "roots"),
        &field(raw, "meaning"),
        entry,
    ))
}
