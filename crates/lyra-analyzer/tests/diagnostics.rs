//! Rendering tests for analysis diagnostics.
//!
//! Each test triggers a specific error through the full pipeline and
//! renders it either through ariadne (colorless, for stable output) or as
//! a JSON line.

use lyra_analyzer::diagnostics::{render_type_error, DiagnosticOptions};
use lyra_analyzer::{analyze, Analysis, AnalysisOptions};
use lyra_syntax::{sexp, SyntaxTree};

// ── Helpers ────────────────────────────────────────────────────────────

fn opts() -> DiagnosticOptions {
    DiagnosticOptions::colorless()
}

fn parse_items(items: &[&str]) -> SyntaxTree {
    let text = format!("(source_file {})", items.join("\n"));
    sexp::parse(&text).unwrap()
}

fn analyze_tree(tree: &SyntaxTree) -> Analysis {
    analyze(tree.root(), tree.source(), &AnalysisOptions::with_file("main.lyra"))
}

/// Render every error of the analysis of `items`.
fn render_all_errors(items: &[&str], options: &DiagnosticOptions) -> Vec<String> {
    let tree = parse_items(items);
    let analysis = analyze_tree(&tree);
    analysis.render_errors(tree.source(), "main.lyra", options)
}

// ── Ariadne ────────────────────────────────────────────────────────────

#[test]
fn mismatch_report_has_code_labels_and_help() {
    let out = render_all_errors(
        &[r#"(declaration keyword: "let" name: (identifier "x") ":"
               type_annotation: (type_annotation type: (float_type "Float"))
               "=" value: (integer "1"))"#],
        &opts(),
    );
    assert_eq!(out.len(), 1);
    let report = &out[0];
    assert!(report.contains("[E0001]"), "{}", report);
    assert!(report.contains("cannot assign Int to variable x of type Float"), "{}", report);
    assert!(report.contains("expected Float, found Int"), "{}", report);
    assert!(report.contains("use a Float literal such as `1.0`"), "{}", report);
    assert!(report.contains("main.lyra"), "{}", report);
    assert!(!report.contains('\u{1b}'), "{}", report);
}

#[test]
fn duplicate_definition_points_at_both_definitions() {
    let first = r#"(declaration keyword: "let" name: (identifier "x") "=" value: (integer "1"))"#;
    let second = r#"(declaration keyword: "let" name: (identifier "x") "=" value: (integer "2"))"#;
    let out = render_all_errors(&[first, second], &opts());
    assert_eq!(out.len(), 1);
    let report = &out[0];
    assert!(report.contains("[C0001]"), "{}", report);
    assert!(report.contains("redefined here"), "{}", report);
    assert!(report.contains("first defined here"), "{}", report);
    assert!(report.contains("rename one of the definitions of `x`"), "{}", report);
}

#[test]
fn collection_errors_render_before_type_errors() {
    let out = render_all_errors(
        &[
            r#"(expression_statement (identifier "ghost"))"#,
            r#"(declaration keyword: "let" name: (identifier "y"))"#,
        ],
        &opts(),
    );
    assert_eq!(out.len(), 2);
    assert!(out[0].contains("[C0003]"), "{}", out[0]);
    assert!(out[1].contains("[E0003]"), "{}", out[1]);
}

// ── JSON ───────────────────────────────────────────────────────────────

#[test]
fn undefined_reference_as_json() {
    let out = render_all_errors(
        &[r#"(expression_statement (identifier "ghost"))"#],
        &DiagnosticOptions::json_mode(),
    );
    assert_eq!(out.len(), 1);
    insta::assert_snapshot!(out[0], @r#"{"code":"E0003","severity":"error","message":"undefined: ghost","file":"main.lyra","spans":[{"start":0,"end":5,"line":1,"col":1,"label":"not found in this scope"}],"expected":null,"found":null,"help":null}"#);
}

#[test]
fn argument_mismatch_json_carries_both_types() {
    let tree = parse_items(&[
        r#"(function_definition
             (function_signature "def" name: (identifier "twice") ":"
               (function_type
                 parameter_types: (parameter_types "(" (parameter_type type: (signed_integer_type "Int")) ")")
                 "->"
                 return_type: (signed_integer_type "Int")))
             "="
             (function_clause
               parameters: (parameter_list "(" (parameter pattern: (identifier "n")) ")")
               "=>"
               body: (binary_expression left: (identifier "n") operator: (operator "*") right: (integer "2"))))"#,
        r#"(expression_statement (call_expression function: (identifier "twice") arguments: (argument_list "(" (boolean "true") ")")))"#,
    ]);
    let analysis = analyze_tree(&tree);
    assert_eq!(analysis.type_errors.len(), 1, "{:?}", analysis.type_errors);

    let line = render_type_error(
        &analysis.type_errors[0],
        tree.source(),
        "main.lyra",
        &DiagnosticOptions::json_mode(),
    );
    let value: serde_json::Value = serde_json::from_str(&line).unwrap();
    assert_eq!(value["code"], "E0001");
    assert_eq!(value["message"], "argument 1: expected Int but got Bool");
    assert_eq!(value["expected"], "Int");
    assert_eq!(value["found"], "Bool");
    assert_eq!(value["spans"][0]["line"], 2);
    assert_eq!(value["spans"][0]["label"], "expected Int, found Bool");

    // The span covers exactly the offending argument.
    let start = value["spans"][0]["start"].as_u64().unwrap() as usize;
    let end = value["spans"][0]["end"].as_u64().unwrap() as usize;
    assert_eq!(&tree.source()[start..end], "true");
}
