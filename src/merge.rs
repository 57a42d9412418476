use crate::vocab::{Category, RootGroup, VocabularyEntry, VocabularyTree};
use log::{debug, info, warn};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// What a merge changed. `skipped` counts malformed incoming items: a
/// blank or missing category name, an empty or missing root set, a blank or
/// missing word, and a new root group left with no usable words.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MergeStats {
    pub categories_added: usize,
    pub groups_added: usize,
    pub words_added: usize,
    pub skipped: usize,
}

impl MergeStats {
    pub fn is_noop(&self) -> bool {
        self.categories_added == 0 && self.groups_added == 0 && self.words_added == 0
    }
}

impl fmt::Display for MergeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "+{} categories, +{} root groups, +{} words",
            self.categories_added, self.groups_added, self.words_added
        )?;
        if self.skipped > 0 {
            write!(f, " ({} malformed items skipped)", self.skipped)?;
        }
        Ok(())
    }
}

/// Unions `incoming` into `existing` and returns the result.
///
/// Existing categories, groups and words never move; new ones are appended
/// to their parent. Categories match by exact name, root groups by root
/// set, words by lowercase trimmed spelling. Merging the same input twice
/// leaves the tree unchanged the second time.
pub fn merge(mut existing: VocabularyTree, incoming: VocabularyTree) -> (VocabularyTree, MergeStats) {
    let stats = merge_into(&mut existing, incoming);
    (existing, stats)
}

/// In-place form of [`merge`].
pub fn merge_into(existing: &mut VocabularyTree, incoming: VocabularyTree) -> MergeStats {
    let mut stats = MergeStats::default();
    for category in incoming {
        merge_category(existing, category, &mut stats);
    }
    stats
}

fn merge_category(tree: &mut VocabularyTree, incoming: Category, stats: &mut MergeStats) {
    if incoming.category.trim().is_empty() {
        warn!(
            "skipping category without a name ({} root groups)",
            incoming.root_groups.len()
        );
        stats.skipped += 1;
        return;
    }

    if let Some(target) = tree.category_mut(&incoming.category) {
        for group in incoming.root_groups {
            merge_group(target, group, stats);
        }
        return;
    }

    let mut fresh = Category::new(&incoming.category);
    for group in incoming.root_groups {
        merge_group(&mut fresh, group, stats);
    }
    if fresh.root_groups.is_empty() {
        warn!("category {:?} had no usable root groups", fresh.category);
        return;
    }
    info!(
        "added category {:?} ({} root groups)",
        fresh.category,
        fresh.root_groups.len()
    );
    stats.categories_added += 1;
    tree.categories.push(fresh);
}

fn merge_group(target: &mut Category, incoming: RootGroup, stats: &mut MergeStats) {
    let roots = incoming.root_set();
    if roots.is_empty() {
        warn!(
            "skipping root group without roots in {:?} (meaning {:?})",
            target.category, incoming.meaning
        );
        stats.skipped += 1;
        return;
    }

    match target.find_group_mut(&roots) {
        Some(group) => {
            let added = merge_words(group, incoming.vocabulary, stats);
            debug!("merged root group {}: {} new words", group.label(), added);
        }
        None => {
            let cleaned = incoming
                .roots
                .iter()
                .map(|r| r.trim())
                .filter(|r| !r.is_empty())
                .map(str::to_string)
                .collect();
            let mut group = RootGroup::new(cleaned, &incoming.meaning);
            if merge_words(&mut group, incoming.vocabulary, stats) == 0 {
                warn!("skipping root group {} without usable words", group.label());
                stats.skipped += 1;
                return;
            }
            info!("added root group {} to {:?}", group.label(), target.category);
            stats.groups_added += 1;
            target.root_groups.push(group);
        }
    }
}

fn merge_words(group: &mut RootGroup, incoming: Vec<VocabularyEntry>, stats: &mut MergeStats) -> usize {
    let mut seen: HashSet<String> = group.vocabulary.iter().map(VocabularyEntry::key).collect();
    let mut added = 0;

    for entry in incoming {
        if !entry.is_valid() {
            stats.skipped += 1;
            continue;
        }
        // duplicates are a no-op
        if seen.insert(entry.key()) {
            group.vocabulary.push(entry);
            added += 1;
        }
    }

    stats.words_added += added;
    added
}
