/// Edge case integration tests
///
/// These tests cover encoding quirks, odd cell contents, and other unusual termbase files
mod common;

use std::fs;

use common::TermbaseFileBuilder;
use termbase::store::{FileStore, TermStore};
use termbase::utils::sanitize_cell;
use termbase::{TermRecord, Termbase};

fn open(path: &std::path::Path) -> Termbase {
    Termbase::open(Box::new(FileStore::new(path).unwrap())).unwrap()
}

#[test]
fn test_edge_case_unicode_case_folding() {
    let (_dir, path) = TermbaseFileBuilder::new()
        .entry("École", "school", "")
        .entry("STRASSE", "street", "")
        .entry("Ωmega", "omega", "")
        .write_xlsx("glossary.xlsx");
    let termbase = open(&path);

    assert_eq!(termbase.query("école").len(), 1);
    assert_eq!(termbase.query("ÉCOLE").len(), 1);
    assert_eq!(termbase.query("strasse").len(), 1);
    assert_eq!(termbase.query("ωMEGA").len(), 1);
}

#[test]
fn test_edge_case_cjk_and_emoji_terms() {
    let (_dir, path) = TermbaseFileBuilder::new()
        .entry("翻訳", "translation", "")
        .entry("🚀 launch", "lanzamiento", "🎉")
        .write_csv("glossary.csv");
    let termbase = open(&path);

    assert_eq!(termbase.query("翻訳").matches()[0].target_term(), "translation");
    assert_eq!(termbase.query("🚀 LAUNCH").matches()[0].notes(), "🎉");
}

#[test]
fn test_edge_case_whitespace_around_terms() {
    let (_dir, path) = TermbaseFileBuilder::new()
        .entry("  run  ", "\tcorrer ", " verb ")
        .write_csv("glossary.csv");
    let termbase = open(&path);

    let session = termbase.query("   RUN\t");
    assert_eq!(session.matches(), &[TermRecord::new("run", "correr", "verb")]);
}

#[test]
fn test_edge_case_internal_whitespace_is_significant() {
    let (_dir, path) = TermbaseFileBuilder::new()
        .entry("ice cream", "helado", "")
        .write_csv("glossary.csv");
    let termbase = open(&path);

    assert_eq!(termbase.query("ice cream").len(), 1);
    assert!(termbase.query("icecream").is_empty());
    assert!(termbase.query("ice  cream").is_empty());
}

#[test]
fn test_edge_case_utf8_bom_header() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("glossary.csv");
    fs::write(&path, "\u{feff}Source Term,Target Term,Notes\nrun,correr,\n").unwrap();

    let records = FileStore::new(&path).unwrap().load().unwrap();
    assert_eq!(records, vec![TermRecord::new("run", "correr", "")]);
}

#[test]
fn test_edge_case_crlf_csv_append_keeps_line_endings() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("glossary.csv");
    fs::write(&path, "Source Term,Target Term,Notes\r\nrun,correr,verb\r\n").unwrap();

    let mut termbase = open(&path);
    assert_eq!(termbase.query("run").matches()[0].notes(), "verb");

    termbase.add_entry("walk", "caminar", "").unwrap();
    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content, "Source Term,Target Term,Notes\r\nrun,correr,verb\r\nwalk,caminar,\r\n");
}

#[test]
fn test_edge_case_csv_without_trailing_newline() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("glossary.csv");
    fs::write(&path, "Source Term,Target Term,Notes\nrun,correr,").unwrap();

    let mut store = FileStore::new(&path).unwrap();
    store.append(&TermRecord::new("walk", "caminar", "")).unwrap();

    let records = store.load().unwrap();
    assert_eq!(
        records,
        vec![TermRecord::new("run", "correr", ""), TermRecord::new("walk", "caminar", "")]
    );
}

#[test]
fn test_edge_case_invalid_utf8_row_is_skipped() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("glossary.csv");
    let mut content = b"Source Term,Target Term,Notes\nrun,correr,\n".to_vec();
    content.extend_from_slice(b"bad,\xff\xfe,\n");
    content.extend_from_slice(b"walk,caminar,\n");
    fs::write(&path, content).unwrap();

    let records = FileStore::new(&path).unwrap().load().unwrap();
    assert_eq!(
        records,
        vec![TermRecord::new("run", "correr", ""), TermRecord::new("walk", "caminar", "")]
    );
}

#[test]
fn test_edge_case_quoted_multiline_notes() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("glossary.csv");
    fs::write(&path, "Source Term,Target Term,Notes\nrun,correr,\"line one\nline two\"\n").unwrap();

    let termbase = open(&path);
    let notes = termbase.query("run").matches()[0].notes().to_string();
    assert_eq!(notes, "line one\nline two");
    assert_eq!(sanitize_cell(&notes, false), "line one line two");
}

#[test]
fn test_edge_case_escape_sequences_in_cells() {
    let (_dir, path) = TermbaseFileBuilder::new()
        .entry("\x1b[31mred\x1b[0m", "rojo\x07", "")
        .write_csv("glossary.csv");
    let termbase = open(&path);

    // Stored verbatim; only display strips them
    let session = termbase.query("\x1b[31mred\x1b[0m");
    let record = &session.matches()[0];
    assert_eq!(sanitize_cell(record.source_term(), false), "red");
    assert_eq!(sanitize_cell(record.target_term(), false), "rojo");
}

#[test]
fn test_edge_case_empty_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("glossary.csv");
    fs::write(&path, "").unwrap();

    let termbase = open(&path);
    assert_eq!(termbase.stats().records, 0);
    assert!(termbase.query("anything").is_empty());
}

#[test]
fn test_edge_case_empty_csv_gets_header_on_first_append() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("glossary.csv");
    fs::write(&path, "").unwrap();

    let mut termbase = open(&path);
    termbase.add_entry("run", "correr", "").unwrap();

    let reopened = open(&path);
    assert_eq!(reopened.query("run").len(), 1);
}

#[test]
fn test_edge_case_many_matches_for_one_term() {
    let mut builder = TermbaseFileBuilder::new();
    for i in 0..200 {
        builder = builder.entry("set", &format!("meaning {i}"), "");
    }
    let (_dir, path) = builder.write_csv("glossary.csv");
    let termbase = open(&path);

    let session = termbase.query("SET");
    assert_eq!(session.len(), 200);
    assert_eq!(session.matches()[0].target_term(), "meaning 0");
    assert_eq!(session.matches()[199].target_term(), "meaning 199");
    assert_eq!(termbase.stats().distinct_terms, 1);
}

#[test]
fn test_edge_case_very_long_cell() {
    let long_notes = "x".repeat(10_000);
    let (_dir, path) = TermbaseFileBuilder::new()
        .entry("long", "largo", &long_notes)
        .write_xlsx("glossary.xlsx");
    let termbase = open(&path);

    assert_eq!(termbase.query("long").matches()[0].notes().len(), 10_000);
}

#[test]
fn test_edge_case_path_with_spaces_and_unicode() {
    let (_dir, path) = TermbaseFileBuilder::new()
        .entry("run", "correr", "")
        .write_xlsx("mis términos 2024.xlsx");
    let mut termbase = open(&path);

    termbase.add_entry("walk", "caminar", "").unwrap();
    assert_eq!(open(&path).stats().records, 2);
}
