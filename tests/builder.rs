use etymon::builder::{FlatRow, build_tree, build_tree_from_records, flatten, split_roots};
use etymon::normalizer::RawRecord;
use etymon::vocab::VocabularyEntry;

fn row(category: &str, roots: &str, meaning: &str, word: &str) -> FlatRow {
    FlatRow::new(category, roots, meaning, VocabularyEntry::new(word, "", ""))
}

fn words(tree: &etymon::VocabularyTree, cat: usize, group: usize) -> Vec<String> {
    tree.categories[cat].root_groups[group]
        .vocabulary
        .iter()
        .map(|v| v.word.clone())
        .collect()
}

#[test]
fn splits_delimited_roots() {
    assert_eq!(split_roots("bio"), vec!["bio"]);
    assert_eq!(split_roots(" bio / vit /viv "), vec!["bio", "vit", "viv"]);
    assert_eq!(split_roots("a//b/"), vec!["a", "b"]);
    assert!(split_roots("").is_empty());
}

#[test]
fn groups_by_category_then_root_set_and_meaning() {
    let tree = build_tree(vec![
        row("Science", "bio", "life", "biology"),
        row("Medical", "cardio", "heart", "cardiology"),
        row("Science", "bio", "life", "biography"),
        row("Science", "geo", "earth", "geology"),
        row("Medical", "cardio", "heart", "cardiogram"),
    ]);

    assert_eq!(tree.len(), 2);
    assert_eq!(tree.categories[0].category, "Science");
    assert_eq!(tree.categories[1].category, "Medical");
    assert_eq!(tree.categories[0].root_groups.len(), 2);
    assert_eq!(words(&tree, 0, 0), vec!["biology", "biography"]);
    assert_eq!(words(&tree, 0, 1), vec!["geology"]);
    assert_eq!(words(&tree, 1, 0), vec!["cardiology", "cardiogram"]);
}

#[test]
fn root_order_does_not_split_groups() {
    let tree = build_tree(vec![
        row("Science", "bio/gen", "life", "biogenesis"),
        row("Science", "gen/bio", "life", "genobiology"),
    ]);

    let cat = &tree.categories[0];
    assert_eq!(cat.root_groups.len(), 1);
    // stored as first seen
    assert_eq!(cat.root_groups[0].roots, vec!["bio", "gen"]);
    assert_eq!(cat.root_groups[0].vocabulary.len(), 2);
}

#[test]
fn different_meaning_makes_a_separate_group() {
    let tree = build_tree(vec![
        row("Science", "port", "carry", "transport"),
        row("Science", "port", "harbour", "seaport"),
    ]);
    assert_eq!(tree.categories[0].root_groups.len(), 2);
}

#[test]
fn build_is_deterministic() {
    let rows = vec![
        row("B", "x", "1", "w1"),
        row("A", "y", "2", "w2"),
        row("B", "z", "3", "w3"),
        row("A", "y", "2", "w4"),
    ];
    let first = build_tree(rows.clone());
    for _ in 0..5 {
        assert_eq!(build_tree(rows.clone()), first);
    }
}

#[test]
fn drops_records_without_words() {
    let records: Vec<RawRecord> = vec![
        [("category", "Medical"), ("roots", "cardio"), ("meaning", "heart"), ("word", "cardiology")],
        [("category", "Medical"), ("roots", "cardio"), ("meaning", "heart"), ("word", "nan")],
        [("category", "Medical"), ("roots", "cardio"), ("meaning", "heart"), ("word", " ")],
    ]
    .into_iter()
    .map(|r| r.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
    .collect();

    let (tree, skipped) = build_tree_from_records(&records);
    assert_eq!(skipped, 2);
    assert_eq!(tree.stats().words, 1);
}

#[test]
fn flatten_then_build_round_trips() {
    let mut rich = VocabularyEntry::new("cardiology", "cardio+logy", "study of the heart");
    rich.phonetic = "ˌkɑːrdiˈɒlədʒi".to_string();
    rich.extra.insert("native_vibe".to_string(), "clinical".to_string());

    let original = build_tree(vec![
        FlatRow::new("Medical", "cardio", "heart", rich),
        row("Medical", "neuro/neur", "nerve", "neurology"),
        row("Science", "bio", "life", "biology"),
        row("Medical", "cardio", "heart", "cardiogram"),
    ]);

    let rebuilt = build_tree(flatten(&original));
    assert_eq!(rebuilt, original);
    println!("✓ flatten/build round trip preserved {} words", rebuilt.stats().words);
}
