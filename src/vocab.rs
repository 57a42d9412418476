use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A single vocabulary fact: the word, its structural breakdown and meaning.
///
/// Enrichment columns other than `phonetic`, `example` and `translation`
/// (native-speaker nuance, usage warnings, ...) live in `extra` and are
/// written flattened next to the core fields.
///
/// Every field has a default when deserializing, so a hand-written entry
/// without a `word` still loads and is skipped later by the merge.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub struct VocabularyEntry {
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub breakdown: String,
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub phonetic: String,
    #[serde(default)]
    pub example: String,
    #[serde(default)]
    pub translation: String,
    #[serde(flatten, deserialize_with = "enrichment_fields")]
    pub extra: BTreeMap<String, String>,
}

impl VocabularyEntry {
    pub fn new(word: &str, breakdown: &str, definition: &str) -> Self {
        VocabularyEntry {
            word: word.to_string(),
            breakdown: breakdown.to_string(),
            definition: definition.to_string(),
            ..Default::default()
        }
    }

    /// Key used for duplicate detection inside a root group.
    pub fn key(&self) -> String {
        word_key(&self.word)
    }

    pub fn is_valid(&self) -> bool {
        !self.word.trim().is_empty()
    }
}

/// Roots sharing one meaning, plus the words built from them.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub struct RootGroup {
    #[serde(default)]
    pub roots: Vec<String>,
    #[serde(default)]
    pub meaning: String,
    #[serde(default)]
    pub vocabulary: Vec<VocabularyEntry>,
}

impl RootGroup {
    pub fn new(roots: Vec<String>, meaning: &str) -> Self {
        RootGroup {
            roots,
            meaning: meaning.to_string(),
            vocabulary: Vec::new(),
        }
    }

    /// Roots as an unordered set; two groups match when their sets match.
    pub fn root_set(&self) -> BTreeSet<String> {
        root_set(&self.roots)
    }

    pub fn contains_word(&self, word: &str) -> bool {
        let key = word_key(word);
        self.vocabulary.iter().any(|v| v.key() == key)
    }

    /// Display label such as `bio/gen (life)`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.roots.join("/"), self.meaning)
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub struct Category {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub root_groups: Vec<RootGroup>,
}

impl Category {
    pub fn new(name: &str) -> Self {
        Category {
            category: name.to_string(),
            root_groups: Vec::new(),
        }
    }

    pub fn find_group(&self, roots: &BTreeSet<String>) -> Option<&RootGroup> {
        self.root_groups.iter().find(|g| &g.root_set() == roots)
    }

    pub fn find_group_mut(&mut self, roots: &BTreeSet<String>) -> Option<&mut RootGroup> {
        self.root_groups.iter_mut().find(|g| &g.root_set() == roots)
    }

    pub fn word_count(&self) -> usize {
        self.root_groups.iter().map(|g| g.vocabulary.len()).sum()
    }
}

/// The whole persisted collection, serialized as a bare JSON array of
/// categories.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct VocabularyTree {
    pub categories: Vec<Category>,
}

impl VocabularyTree {
    pub fn new() -> Self {
        VocabularyTree::default()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Category> {
        self.categories.iter()
    }

    /// Category names are matched exactly, case and whitespace included.
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.category == name)
    }

    pub fn category_mut(&mut self, name: &str) -> Option<&mut Category> {
        self.categories.iter_mut().find(|c| c.category == name)
    }

    pub fn stats(&self) -> TreeStats {
        let mut roots = BTreeSet::new();
        let mut stats = TreeStats {
            categories: self.categories.len(),
            ..Default::default()
        };
        for cat in &self.categories {
            stats.root_groups += cat.root_groups.len();
            for group in &cat.root_groups {
                stats.words += group.vocabulary.len();
                roots.extend(group.root_set());
            }
        }
        stats.unique_roots = roots.len();
        stats
    }
}

impl From<Vec<Category>> for VocabularyTree {
    fn from(categories: Vec<Category>) -> Self {
        VocabularyTree { categories }
    }
}

impl IntoIterator for VocabularyTree {
    type Item = Category;
    type IntoIter = std::vec::IntoIter<Category>;

    fn into_iter(self) -> Self::IntoIter {
        self.categories.into_iter()
    }
}

impl<'a> IntoIterator for &'a VocabularyTree {
    type Item = &'a Category;
    type IntoIter = std::slice::Iter<'a, Category>;

    fn into_iter(self) -> Self::IntoIter {
        self.categories.iter()
    }
}

/// Counters shown on the admin page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TreeStats {
    pub categories: usize,
    pub root_groups: usize,
    pub words: usize,
    pub unique_roots: usize,
}

impl fmt::Display for TreeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} categories, {} root groups, {} words, {} unique roots",
            self.categories, self.root_groups, self.words, self.unique_roots
        )
    }
}

// Hand-edited documents sometimes carry numbers or booleans in enrichment
// fields. Scalars are kept as their text, nulls are dropped.
fn enrichment_fields<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::Null => None,
            Value::String(s) => Some((key, s)),
            other => Some((key, other.to_string())),
        })
        .collect())
}

pub fn word_key(word: &str) -> String {
    word.trim().to_lowercase()
}

/// Trimmed, non-empty roots as a set.
pub fn root_set(roots: &[String]) -> BTreeSet<String> {
    roots
        .iter()
        .map(|r| r.trim())
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect()
}
