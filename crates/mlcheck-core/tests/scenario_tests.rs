//! End-to-end scenarios over real document text and files

use mlcheck_core::{
    BatchScan, Diagnostic, DiagnosticKind, Dialect, DialectChoice, DialectSource, Discovery,
    Error, FileOutcome, Position, SchemaRule, TextEncoding, ValidationSession,
};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

fn html(text: &str) -> Vec<Diagnostic> {
    ValidationSession::new()
        .validate_text(text, Dialect::Html)
        .diagnostics
}

#[test]
fn test_mismatched_nesting_report() {
    assert_eq!(
        html("<div><span>text</div>"),
        vec![
            Diagnostic::mismatched_close("span", "div", Position::new(1, 16)),
            Diagnostic::unclosed_element("span"),
            Diagnostic::unclosed_element("div"),
        ]
    );
}

#[test]
fn test_realistic_page_is_valid() {
    let page = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Demo</title>
  <link rel="stylesheet" href="site.css">
  <style>p > a { color: red; }</style>
</head>
<body>
  <!-- navigation <nav> -->
  <img src="logo.png" alt="logo">
  <p>Line one<br>line two</p>
  <pre><b>bold, never closed</pre>
  <script>if (1 < 2) { document.write("</div>"); }</script>
</body>
</html>
"#;
    let outcome = ValidationSession::new().validate_text(page, Dialect::Html);

    assert!(outcome.is_valid(), "{:?}", outcome.diagnostics);
    // html head meta title link style body img p br pre b script
    assert_eq!(outcome.stats.tag_or_node_count, 13);
}

#[test]
fn test_void_close_positions_and_continuation() {
    let diagnostics = html("<p>\n  text</br>\n</p>\n</p>");

    assert_eq!(
        diagnostics,
        vec![
            Diagnostic::superfluous_void_close("br", Position::new(2, 7)),
            Diagnostic::unmatched_close("p", Position::new(4, 1)),
        ]
    );
}

#[test]
fn test_self_closed_void_element_reports_its_close() {
    assert_eq!(
        html("<p><br/></p>"),
        vec![Diagnostic::superfluous_void_close("br", Position::new(1, 4))]
    );
}

#[test]
fn test_mixed_case_tags_match() {
    assert!(html("<DIV><P>x</p></div>").is_empty());
}

#[test]
fn test_lex_errors_are_reported_with_structure() {
    let diagnostics = html("<ul><li>one</></li></ul>");
    let kinds: Vec<_> = diagnostics.iter().map(|d| d.kind).collect();

    assert_eq!(kinds, vec![DiagnosticKind::LexError]);
    assert_eq!(diagnostics[0].position(), Position::new(1, 12));
}

#[test]
fn test_moodle_quiz_with_broken_questions() {
    let quiz = r#"<?xml version="1.0" encoding="UTF-8"?>
<quiz>
  <question type="category">
    <category><text>$course$/Default</text></category>
  </question>
  <question type="multichoice">
    <name><text>Capital</text></name>
    <questiontext format="html"><text>Capital of France?</text></questiontext>
    <answer fraction="100"><text>Paris</text></answer>
    <answer fraction="0"><text>Lyon</text></answer>
  </question>
  <question type="multichoice">
    <questiontext format="html"><text>Orphan</text></questiontext>
  </question>
</quiz>
"#;
    let session = ValidationSession::new().with_schema(SchemaRule::builtin("moodlemc").unwrap());
    let outcome = session.validate_text(quiz, Dialect::Xml);

    let messages: Vec<_> = outcome.diagnostics.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "Missing <name> tag in multichoice question",
            "No <answer> tags found in multichoice question",
        ]
    );
    assert!(outcome
        .diagnostics
        .iter()
        .all(|d| d.position() == Position::new(12, 3)));
    assert_eq!(outcome.stats.error_count, 2);
}

#[test]
fn test_xml_parse_error_stops_schema_checks() {
    let quiz = "<quiz>\n  <question type=\"multichoice\">\n</quiz>\n";
    let session = ValidationSession::new().with_schema(SchemaRule::moodle_multichoice());
    let outcome = session.validate_text(quiz, Dialect::Xml);

    assert_eq!(outcome.diagnostics.len(), 1);
    assert_eq!(outcome.diagnostics[0].kind, DiagnosticKind::TreeParseError);
    assert!(outcome.diagnostics[0].position().is_known());
}

#[test]
fn test_file_validation_sniffs_and_reports_encoding() {
    let dir = TempDir::new().unwrap();
    let page = dir.path().join("page.txt");
    fs::write(&page, b"<html><body><p>caf\xe9</p></body></html>").unwrap();

    let report = ValidationSession::new()
        .validate_file(&page, DialectChoice::default())
        .unwrap();

    assert_eq!(report.encoding, TextEncoding::Latin1);
    assert_eq!(report.dialect_source, DialectSource::Detected);
    assert_eq!(report.outcome.dialect, Dialect::Html);
    assert!(report.outcome.is_valid());
}

#[test]
fn test_unknown_content_falls_back_to_xml() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("catalog.dat");
    fs::write(&file, "<catalog><book></catalog>").unwrap();

    let report = ValidationSession::new()
        .validate_file(&file, DialectChoice::default())
        .unwrap();

    assert_eq!(report.dialect_source, DialectSource::Fallback);
    assert_eq!(report.outcome.dialect, Dialect::Xml);
    assert_eq!(report.outcome.stats.error_count, 1);
}

#[test]
fn test_missing_file_is_an_error_not_a_diagnostic() {
    let dir = TempDir::new().unwrap();
    let result = ValidationSession::new()
        .validate_file(&dir.path().join("nope.html"), DialectChoice::Fixed(Dialect::Html));

    assert!(matches!(result, Err(Error::Io { .. })));
}

#[test]
fn test_recursive_batch_with_custom_extensions() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("lessons")).unwrap();
    fs::write(dir.path().join("index.xhtml"), "<p></p>").unwrap();
    fs::write(dir.path().join("skip.html"), "<p>").unwrap();
    fs::write(dir.path().join("lessons/one.XHTML"), "<p></div>").unwrap();

    let report = BatchScan::new(ValidationSession::new(), Dialect::Html)
        .with_discovery(Discovery::new(["xhtml"]).recursive(true))
        .run(dir.path())
        .unwrap();

    let files: Vec<_> = report.files().map(|f| f.path().to_path_buf()).collect();
    assert_eq!(
        files,
        vec![dir.path().join("index.xhtml"), dir.path().join("lessons/one.XHTML")]
    );
    assert!(report.recursive);
    assert_eq!(report.summary.files_with_errors, 1);
    assert_eq!(report.summary.total_errors, 2);
    assert!(report
        .files()
        .all(|outcome| matches!(outcome, FileOutcome::Checked(_))));
}

#[test]
fn test_batch_report_serializes_for_machines() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("q.xml"), "<quiz/>").unwrap();

    let report = BatchScan::new(ValidationSession::new(), Dialect::Xml)
        .run(dir.path())
        .unwrap();
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["dialect"], "XML");
    assert_eq!(value["summary"]["files_scanned"], 1);
    let file = &value["directories"][0]["files"][0];
    assert_eq!(file["status"], "checked");
    assert_eq!(file["encoding"], "utf-8");
    assert_eq!(file["stats"]["tag_or_node_count"], 1);
    assert!(value["generated_at"].is_string());
}

#[test]
fn test_deeply_nested_xml_is_checked_and_released() {
    let depth = 100_000;
    let quiz = format!(
        "<quiz>{}{}</quiz>",
        "<a>".repeat(depth),
        "</a>".repeat(depth)
    );

    let session = ValidationSession::new().with_schema(SchemaRule::moodle_multichoice());
    let outcome = session.validate_text(&quiz, Dialect::Xml);
    assert!(outcome.is_valid());
    assert_eq!(outcome.stats.tag_or_node_count, depth + 1);

    let truncated = &quiz[..quiz.len() - "</quiz>".len()];
    let outcome = session.validate_text(truncated, Dialect::Xml);
    assert_eq!(outcome.diagnostics.len(), 1);
    assert_eq!(outcome.diagnostics[0].kind, DiagnosticKind::TreeParseError);
}

#[test]
fn test_minified_single_line_page() {
    let n = 20_000;
    let page = format!("{}{}</br>", "<p>".repeat(n), "</p>".repeat(n));

    let outcome = ValidationSession::new().validate_text(&page, Dialect::Html);
    assert_eq!(outcome.stats.tag_or_node_count, n);
    assert_eq!(
        outcome.diagnostics,
        vec![Diagnostic::superfluous_void_close("br", Position::new(1, 7 * n + 1))]
    );
}
