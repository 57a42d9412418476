use crate::builder::{FlatRow, flatten};
use crate::normalizer::CORE_COLUMNS;
use crate::vocab::VocabularyTree;
use std::collections::BTreeSet;

/// Convert a vocabulary tree to CSV format
///
/// One row per vocabulary entry. Each row repeats its category, its root
/// group's roots (joined with `/`) and meaning, followed by the entry
/// fields. Enrichment fields found anywhere in the tree become extra
/// columns after the core ones, in sorted order.
///
/// # Examples
/// ```
/// use etymon::downloader::to_csv;
/// use etymon::vocab::VocabularyTree;
///
/// let csv = to_csv(&VocabularyTree::new());
/// assert!(csv.starts_with("category,roots,meaning,word"));
/// ```
pub fn to_csv(tree: &VocabularyTree) -> String {
    rows_to_csv(&flatten(tree))
}

/// Same as [`to_csv`], prefixed with a UTF-8 byte-order mark so
/// spreadsheet programs pick the right encoding for CJK text.
pub fn to_excel_csv(tree: &VocabularyTree) -> String {
    let mut csv_content = String::from('\u{feff}');
    csv_content.push_str(&to_csv(tree));
    csv_content
}

pub fn rows_to_csv(rows: &[FlatRow]) -> String {
    let extra_columns: BTreeSet<&str> = rows
        .iter()
        .flat_map(|r| r.entry.extra.keys().map(String::as_str))
        .collect();

    let mut csv_content = String::new();
    let header: Vec<&str> = CORE_COLUMNS.iter().copied().chain(extra_columns.iter().copied()).collect();
    push_record(&mut csv_content, header.iter().copied());

    for row in rows {
        let entry = &row.entry;
        let roots = row.roots.join("/");
        let core = [
            row.category.as_str(),
            roots.as_str(),
            row.meaning.as_str(),
            entry.word.as_str(),
            entry.breakdown.as_str(),
            entry.definition.as_str(),
            entry.phonetic.as_str(),
            entry.example.as_str(),
            entry.translation.as_str(),
        ];
        let extras = extra_columns
            .iter()
            .map(|k| entry.extra.get(*k).map_or("", String::as_str));
        push_record(&mut csv_content, core.into_iter().chain(extras));
    }

    csv_content
}

/// Appends one CSV line, quoting fields as needed.
pub fn push_record<'a>(csv_content: &mut String, fields: impl IntoIterator<Item = &'a str>) {
    for (i, value) in fields.into_iter().enumerate() {
        if i > 0 {
            csv_content.push(',');
        }
        push_field(csv_content, value);
    }
    csv_content.push('\n');
}

// Handle value - escape commas, quotes, newlines as needed
fn push_field(csv_content: &mut String, value: &str) {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        let escaped = value.replace('"', "\"\"");
        csv_content.push_str(&format!("\"{}\"", escaped));
    } else {
        csv_content.push_str(value);
    }
}
