use crate::normalizer::{RawRecord, normalize_record};
use crate::vocab::{Category, RootGroup, VocabularyEntry, VocabularyTree, root_set};
use log::warn;
use std::collections::{BTreeSet, HashMap};

/// One vocabulary entry together with the columns that place it in the tree.
///
/// This is also the flattened row shape used by table-backed stores.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlatRow {
    pub category: String,
    pub roots: Vec<String>,
    pub meaning: String,
    pub entry: VocabularyEntry,
}

impl FlatRow {
    /// `roots` is the delimited form, e.g. `"bio / gen"`.
    pub fn new(category: &str, roots: &str, meaning: &str, entry: VocabularyEntry) -> Self {
        Self::with_roots(category, split_roots(roots), meaning, entry)
    }

    pub fn with_roots(
        category: &str,
        roots: Vec<String>,
        meaning: &str,
        entry: VocabularyEntry,
    ) -> Self {
        FlatRow {
            category: category.to_string(),
            roots,
            meaning: meaning.to_string(),
            entry,
        }
    }
}

/// Splits `a/b/c` into trimmed, non-empty roots, keeping their order.
pub fn split_roots(roots: &str) -> Vec<String> {
    roots
        .split('/')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect()
}

type GroupKey = (BTreeSet<String>, String);

/// Groups flat rows into category -> root group -> vocabulary.
///
/// Categories keep first-seen order, groups are keyed by root set plus
/// meaning and also keep first-seen order, entries keep input order.
/// No de-duplication happens here.
pub fn build_tree<I>(rows: I) -> VocabularyTree
where
    I: IntoIterator<Item = FlatRow>,
{
    let mut tree = VocabularyTree::new();
    let mut category_index: HashMap<String, usize> = HashMap::new();
    let mut group_index: Vec<HashMap<GroupKey, usize>> = Vec::new();

    for row in rows {
        let cat_idx = *category_index.entry(row.category.clone()).or_insert_with(|| {
            tree.categories.push(Category::new(&row.category));
            group_index.push(HashMap::new());
            tree.categories.len() - 1
        });

        let category = &mut tree.categories[cat_idx];
        let key = (root_set(&row.roots), row.meaning.clone());
        let group_idx = *group_index[cat_idx].entry(key).or_insert_with(|| {
            category
                .root_groups
                .push(RootGroup::new(row.roots.clone(), &row.meaning));
            category.root_groups.len() - 1
        });

        category.root_groups[group_idx].vocabulary.push(row.entry);
    }

    tree
}

/// Normalizes raw records and builds a tree from the usable ones.
///
/// Returns the tree and the number of rows dropped for having no word.
pub fn build_tree_from_records(records: &[RawRecord]) -> (VocabularyTree, usize) {
    let mut skipped = 0;
    let mut rows = Vec::with_capacity(records.len());

    for (i, record) in records.iter().enumerate() {
        match normalize_record(record) {
            Ok(row) => rows.push(row),
            Err(e) => {
                warn!("dropping record {}: {}", i + 1, e);
                skipped += 1;
            }
        }
    }

    (build_tree(rows), skipped)
}

/// One row per vocabulary entry, carrying its category and group columns.
pub fn flatten(tree: &VocabularyTree) -> Vec<FlatRow> {
    let mut rows = Vec::new();
    for cat in tree {
        for group in &cat.root_groups {
            for entry in &group.vocabulary {
                rows.push(FlatRow::with_roots(
                    &cat.category,
                    group.roots.clone(),
                    &group.meaning,
                    entry.clone(),
                ));
            }
        }
    }
    rows
}
