use crate::error::LoadError;
use crate::normalizer::{CORE_COLUMNS, RawRecord, clean_field};
use std::fs;
use std::path::Path;

/// Column layout of the shared vocabulary sheet, used when a file's header
/// row does not name its columns.
pub const COLUMN_NAMES: [&str; 20] = [
    "category",
    "roots",
    "meaning",
    "word",
    "breakdown",
    "definition",
    "phonetic",
    "example",
    "translation",
    "native_vibe",
    "synonym_nuance",
    "visual_prompt",
    "social_status",
    "emotional_tone",
    "street_usage",
    "collocation",
    "etymon_story",
    "usage_warning",
    "memory_hook",
    "audio_tag",
];

/// Width of one side-by-side block in the block layout (`A:I`, `J:R`, ...).
pub const BLOCK_COLUMNS: usize = 9;

/// Load vocabulary records from a CSV file
///
/// The first row is the header. When it names a `word` column, every column
/// is keyed by its header (core columns lowercased, the rest as written);
/// otherwise columns are keyed positionally by [`COLUMN_NAMES`].
///
/// # Examples
/// ```no_run
/// use etymon::loader::from_csv;
///
/// match from_csv("vocabulary.csv") {
///     Ok(records) => println!("Loaded {} rows", records.len()),
///     Err(e) => eprintln!("Error loading CSV: {}", e),
/// }
/// ```
pub fn from_csv(filepath: impl AsRef<Path>) -> Result<Vec<RawRecord>, LoadError> {
    let text = fs::read_to_string(filepath)?;
    parse_records(&text)
}

/// Load a sheet exported in the side-by-side block layout.
pub fn from_csv_blocks(filepath: impl AsRef<Path>) -> Result<Vec<RawRecord>, LoadError> {
    let text = fs::read_to_string(filepath)?;
    parse_blocked_records(&text, BLOCK_COLUMNS)
}

pub fn parse_records(text: &str) -> Result<Vec<RawRecord>, LoadError> {
    let rows = parse_csv(text)?;
    let (header, data) = rows.split_first().ok_or(LoadError::Empty)?;

    let header: Vec<String> = header.iter().map(|h| column_name(h)).collect();
    let names: Vec<String> = if header.iter().any(|h| h == "word") {
        header
    } else {
        COLUMN_NAMES.iter().map(|s| s.to_string()).collect()
    };

    Ok(data
        .iter()
        .map(|row| to_record(&names, row))
        .filter(|record| !is_repeated_header(record))
        .collect())
}

/// Splits every data row into `block_width`-wide chunks, one record each.
///
/// The first row is treated as a header and skipped. Chunks with neither a
/// category nor a word are dropped.
pub fn parse_blocked_records(text: &str, block_width: usize) -> Result<Vec<RawRecord>, LoadError> {
    let rows = parse_csv(text)?;
    if rows.is_empty() {
        return Err(LoadError::Empty);
    }

    let width = block_width.clamp(1, COLUMN_NAMES.len());
    let names: Vec<String> = COLUMN_NAMES[..width].iter().map(|s| s.to_string()).collect();
    let mut records = Vec::new();

    // collect block by block so each block's rows stay together
    let blocks = rows.iter().map(|r| r.len().div_ceil(width)).max().unwrap_or(0);
    for block in 0..blocks {
        for row in &rows[1..] {
            let start = block * width;
            if start >= row.len() {
                continue;
            }
            let end = (start + width).min(row.len());
            let record = to_record(&names, &row[start..end]);
            let has_category = record.get("category").is_some_and(|v| !clean_field(v).is_empty());
            let has_word = record.get("word").is_some_and(|v| !clean_field(v).is_empty());
            if (has_category || has_word) && !is_repeated_header(&record) {
                records.push(record);
            }
        }
    }

    Ok(records)
}

// Core columns match case-insensitively; enrichment columns keep the
// spelling the sheet gives them.
fn column_name(header: &str) -> String {
    let trimmed = header.trim();
    let lower = trimmed.to_lowercase();
    if CORE_COLUMNS.contains(&lower.as_str()) {
        lower
    } else {
        trimmed.to_string()
    }
}

fn to_record(names: &[String], row: &[String]) -> RawRecord {
    names
        .iter()
        .zip(row.iter())
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

// Sheets pasted together sometimes carry their header row in the data.
fn is_repeated_header(record: &RawRecord) -> bool {
    record
        .get("category")
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("category"))
}

/// Parse CSV text into rows of fields.
///
/// Handles quoted fields, doubled quotes, embedded commas and newlines,
/// CRLF line endings and a leading byte-order mark. Blank lines are skipped.
pub fn parse_csv(text: &str) -> Result<Vec<Vec<String>>, LoadError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut current_field = String::new();
    let mut in_quotes = false;
    let mut quote_line = 0;
    let mut line = 1;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    // Double quote inside quoted field - add a single quote
                    current_field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' => {
                in_quotes = true;
                quote_line = line;
            }
            ',' if !in_quotes => {
                row.push(std::mem::take(&mut current_field));
            }
            '\r' if !in_quotes && chars.peek() == Some(&'\n') => {}
            '\n' if !in_quotes => {
                row.push(std::mem::take(&mut current_field));
                push_row(&mut rows, std::mem::take(&mut row));
                line += 1;
            }
            _ => {
                if c == '\n' {
                    line += 1;
                }
                current_field.push(c);
            }
        }
    }

    if in_quotes {
        return Err(LoadError::UnterminatedQuote(quote_line));
    }

    // Add the last row when the text does not end in a newline
    if !current_field.is_empty() || !row.is_empty() {
        row.push(current_field);
        push_row(&mut rows, row);
    }

    Ok(rows)
}

fn push_row(rows: &mut Vec<Vec<String>>, row: Vec<String>) {
    if row.iter().all(|f| f.trim().is_empty()) {
        return;
    }
    rows.push(row);
}
