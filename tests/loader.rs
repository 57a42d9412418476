use etymon::LoadError;
use etymon::builder::build_tree_from_records;
use etymon::downloader::{to_csv, to_excel_csv};
use etymon::loader::{parse_blocked_records, parse_csv, parse_records};

#[test]
fn parses_quoted_fields() {
    let rows = parse_csv("a,\"b,c\",\"say \"\"hi\"\"\"\n\"multi\nline\",x,\n").unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0], vec!["a", "b,c", "say \"hi\""]);
    assert_eq!(rows[1], vec!["multi\nline", "x", ""]);
}

#[test]
fn handles_crlf_bom_and_blank_lines() {
    let rows = parse_csv("\u{feff}word,definition\r\n\r\nbio,life\r\n").unwrap();
    assert_eq!(rows, vec![vec!["word", "definition"], vec!["bio", "life"]]);
}

#[test]
fn unterminated_quote_is_an_error() {
    match parse_csv("word\n\"never closed\n") {
        Err(LoadError::UnterminatedQuote(line)) => assert_eq!(line, 2),
        other => panic!("expected unterminated quote, got {:?}", other),
    }
}

#[test]
fn empty_input_is_an_error() {
    assert!(matches!(parse_records(""), Err(LoadError::Empty)));
}

#[test]
fn header_names_the_columns() {
    let text = "Category,Roots,Meaning,Word,Breakdown,Definition,native_vibe\n\
                Medical,cardio,heart,cardiology,cardio+logy,study of the heart,clinical\n";
    let records = parse_records(text).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["category"], "Medical");
    assert_eq!(records[0]["word"], "cardiology");
    assert_eq!(records[0]["native_vibe"], "clinical");
}

#[test]
fn unnamed_header_falls_back_to_sheet_layout() {
    let text = "分類,字根,意義,單字,拆解,定義\nScience,bio,life,biology,bio+logy,study of life\n";
    let records = parse_records(text).unwrap();

    assert_eq!(records[0]["category"], "Science");
    assert_eq!(records[0]["roots"], "bio");
    assert_eq!(records[0]["definition"], "study of life");
}

#[test]
fn repeated_header_rows_are_dropped() {
    let text = "category,roots,meaning,word\nScience,bio,life,biology\ncategory,roots,meaning,word\nScience,geo,earth,geology\n";
    let records = parse_records(text).unwrap();
    assert_eq!(records.len(), 2);
}

#[test]
fn splits_side_by_side_blocks() {
    let header = "category,roots,meaning,word,breakdown,definition,phonetic,example,translation";
    let text = format!(
        "{h},{h}\n\
         Science,bio,life,biology,bio+logy,study of life,,,,Medical,cardio,heart,cardiology,cardio+logy,study of the heart,,,\n\
         Science,geo,earth,geology,geo+logy,study of earth,,,,,,,,,,,,\n",
        h = header
    );
    let records = parse_blocked_records(&text, 9).unwrap();

    assert_eq!(records.len(), 3);
    // block by block
    assert_eq!(records[0]["word"], "biology");
    assert_eq!(records[1]["word"], "geology");
    assert_eq!(records[2]["word"], "cardiology");

    let (tree, skipped) = build_tree_from_records(&records);
    assert_eq!(skipped, 0);
    assert_eq!(tree.len(), 2);
}

#[test]
fn exported_csv_reads_back_into_the_same_tree() {
    let text = "category,roots,meaning,word,breakdown,definition,phonetic,example,translation,usage_warning\n\
                Medical,cardio/cardi,heart,cardiology,cardio+logy,\"study of the heart, formally\",,\"He said \"\"hi\"\"\",,rare\n\
                Science,bio,life,biology,bio+logy,研究生命的學問,,,,\n";
    let (tree, _) = build_tree_from_records(&parse_records(text).unwrap());

    let exported = to_csv(&tree);
    assert!(exported.starts_with(
        "category,roots,meaning,word,breakdown,definition,phonetic,example,translation,usage_warning\n"
    ));
    let (again, _) = build_tree_from_records(&parse_records(&exported).unwrap());
    assert_eq!(again, tree);

    let excel = to_excel_csv(&tree);
    assert!(excel.starts_with('\u{feff}'));
    let (from_excel, _) = build_tree_from_records(&parse_records(&excel).unwrap());
    assert_eq!(from_excel, tree);
    println!("✓ CSV export round trip");
}

#[test]
fn enrichment_headers_keep_their_spelling() {
    let text = "WORD,Definition,Native_Vibe\nbiology,study of life,cool\n";
    let records = parse_records(text).unwrap();

    assert_eq!(records[0]["word"], "biology");
    assert_eq!(records[0]["definition"], "study of life");
    assert_eq!(records[0]["Native_Vibe"], "cool");
    assert!(!records[0].contains_key("native_vibe"));
}
