//! Parser for hand-written (or assistant-written) contributions.
//!
//! The accepted layout is line based:
//!
//! ```text
//! 「Science」類
//! -bio/vit-（生命）
//! biology（bio+logy=研究生命的學問）
//! vitamin（vit+amin）
//! ```
//!
//! A quoted name followed by `類` opens a category. A line whose roots sit
//! between hyphens, with the meaning in trailing parentheses, opens a root
//! group. Every following `word(breakdown=definition)` line adds a word to
//! that group; without `=` the definition becomes [`PENDING_DEFINITION`].
//! Word lines may carry a list marker (`*`, `•`, `- `, `1.`).
//! Full-width punctuation typed on IME keyboards is folded to ASCII first.

use crate::builder::split_roots;
use crate::error::ParseError;
use crate::merge::merge_into;
use crate::vocab::{Category, RootGroup, VocabularyEntry, VocabularyTree};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use serde::Serialize;

/// Definition given to words contributed without one.
pub const PENDING_DEFINITION: &str = "待校對";

lazy_static! {
    static ref CATEGORY_LINE: Regex = Regex::new(r#"^"\s*([^"]+?)\s*"\s*(?:類|类)"#).unwrap();
    static ref ROOT_LINE: Regex =
        Regex::new(r"^-\s*([^()]+?)\s*-\s*(?:\((.*)\))?\s*$").unwrap();
    static ref WORD_LINE: Regex = Regex::new(r"^([^()\s\-][^()]*?)\s*\((.*)\)\s*$").unwrap();
    static ref LIST_MARKER: Regex = Regex::new(r"^(?:[*•]\s*|-\s+|\d+\.\s*)").unwrap();
}

/// How much of a contribution was recognised and how much was thrown away.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ParseReport {
    pub categories: usize,
    pub groups: usize,
    pub words: usize,
    pub dropped_categories: usize,
    pub dropped_groups: usize,
    pub skipped_lines: usize,
}

/// Folds full-width and typographic punctuation to the ASCII forms the
/// grammar is written in.
pub fn normalize_punctuation(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '（' => '(',
            '）' => ')',
            '「' | '」' | '『' | '』' | '“' | '”' | '＂' => '"',
            '－' | '—' | '–' | '‐' | '―' => '-',
            '＝' => '=',
            '＋' => '+',
            '／' => '/',
            '\u{3000}' => ' ',
            other => other,
        })
        .collect()
}

/// Parses a contribution into a tree. See the module docs for the layout.
pub fn parse_contribution(text: &str) -> Result<VocabularyTree, ParseError> {
    parse_contribution_with_report(text).map(|(tree, _)| tree)
}

/// Best-effort parse that also reports what was dropped.
///
/// Only text without a single category marker is an error; malformed
/// lines, empty groups and empty categories are skipped.
pub fn parse_contribution_with_report(
    text: &str,
) -> Result<(VocabularyTree, ParseReport), ParseError> {
    if text.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let normalized = normalize_punctuation(text);
    let mut state = ParseState::default();
    let mut markers = 0;

    for (n, raw_line) in normalized.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(caps) = CATEGORY_LINE.captures(line) {
            markers += 1;
            state.open_category(&caps[1]);
        } else if let Some(caps) = ROOT_LINE.captures(line) {
            let meaning = caps.get(2).map_or("", |m| m.as_str().trim());
            if !state.open_group(&caps[1], meaning) {
                debug!("line {}: root block outside a category: {:?}", n + 1, line);
            }
        } else if let Some(entry) = parse_word_line(line) {
            if !state.push_word(entry) {
                debug!("line {}: word outside a root block: {:?}", n + 1, line);
            }
        } else {
            debug!("line {}: unrecognised: {:?}", n + 1, line);
            state.report.skipped_lines += 1;
        }
    }

    if markers == 0 {
        return Err(ParseError::NoCategoryMarker);
    }

    let (tree, mut report) = state.finish();
    let stats = tree.stats();
    report.categories = stats.categories;
    report.groups = stats.root_groups;
    report.words = stats.words;
    Ok((tree, report))
}

fn parse_word_line(line: &str) -> Option<VocabularyEntry> {
    let line = LIST_MARKER.replace(line, "");
    let caps = WORD_LINE.captures(&line)?;
    let word = caps[1].trim();
    let body = caps[2].trim();

    let (breakdown, definition) = match body.split_once('=') {
        Some((b, d)) if !d.trim().is_empty() => (b.trim(), d.trim()),
        Some((b, _)) => (b.trim(), PENDING_DEFINITION),
        None => (body, PENDING_DEFINITION),
    };
    Some(VocabularyEntry::new(word, breakdown, definition))
}

#[derive(Default)]
struct ParseState {
    tree: VocabularyTree,
    category: Option<Category>,
    group: Option<RootGroup>,
    report: ParseReport,
}

impl ParseState {
    fn open_category(&mut self, name: &str) {
        self.close_category();
        self.category = Some(Category::new(name));
    }

    fn open_group(&mut self, roots: &str, meaning: &str) -> bool {
        self.close_group();
        if self.category.is_none() {
            self.report.skipped_lines += 1;
            return false;
        }
        // `-a-/-an-` lists each alternative with its own hyphens
        let roots = split_roots(roots)
            .iter()
            .map(|r| r.trim_matches('-').trim())
            .filter(|r| !r.is_empty())
            .map(str::to_string)
            .collect();
        self.group = Some(RootGroup::new(roots, meaning));
        true
    }

    fn push_word(&mut self, entry: VocabularyEntry) -> bool {
        match self.group.as_mut() {
            Some(group) => {
                group.vocabulary.push(entry);
                true
            }
            None => {
                self.report.skipped_lines += 1;
                false
            }
        }
    }

    fn close_group(&mut self) {
        let Some(group) = self.group.take() else {
            return;
        };
        match self.category.as_mut() {
            Some(cat) if !group.vocabulary.is_empty() && !group.roots.is_empty() => {
                cat.root_groups.push(group)
            }
            _ => self.report.dropped_groups += 1,
        }
    }

    fn close_category(&mut self) {
        self.close_group();
        let Some(cat) = self.category.take() else {
            return;
        };
        if cat.root_groups.is_empty() {
            self.report.dropped_categories += 1;
            return;
        }
        // a category named twice in one text collapses into one node
        merge_into(&mut self.tree, VocabularyTree::from(vec![cat]));
    }

    fn finish(mut self) -> (VocabularyTree, ParseReport) {
        self.close_category();
        (self.tree, self.report)
    }
}
