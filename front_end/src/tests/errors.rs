use indoc::indoc;

use crate::diagnostics_reporter::DiagnosticReporter;
use crate::error::{FatalError, SemanticError, SemanticErrorKind};
use crate::lexer::tokenize;
use crate::name_analysis::analyze;
use crate::parser::parse_source;
use crate::source_location::Span;
use crate::source_manager::SourceManager;
use crate::symbol_table::SymbolTableError;

fn semantic_errors(source: &str) -> Vec<SemanticError> {
    let mut program = parse_source(source).expect("source should parse");
    let (_, errors) = analyze(&mut program).expect("no fatal error");
    errors
}

#[test]
fn test_duplicate_variable_error() {
    let source = indoc! {"
        void f() {
            int x;
            bool x;
        }
    "};

    let errors = semantic_errors(source);
    assert_eq!(errors.len(), 1, "Should have caught a duplicate declaration");

    let reporter = DiagnosticReporter::new(SourceManager::from_source(source));
    let formatted = reporter.report_semantic(&errors[0]);
    println!("{}", formatted);

    assert!(formatted.contains("error[E0101]"));
    assert!(formatted.contains("Multiply declared identifier `x`"));
    assert!(formatted.contains("--> <input>:3:10"));
    assert!(
        formatted.contains("    bool x;\n         ^\n"),
        "caret should sit under the second x:\n{}",
        formatted
    );
    assert!(formatted.contains("note: each name may be declared only once per scope"));
}

#[test]
fn test_undeclared_identifier_error() {
    let source = "void main() { total = 1; }";

    let errors = semantic_errors(source);
    let reporter = DiagnosticReporter::new(SourceManager::from_source(source).with_name("main.mini"));
    let formatted = reporter.report_semantic(&errors[0]);

    assert!(formatted.contains("error[E0103]"));
    assert!(formatted.contains("Undeclared identifier `total`"));
    assert!(formatted.contains("--> main.mini:1:15"));
    assert!(formatted.contains(" | not found in this scope"));
    assert!(formatted.contains("help: consider declaring `total` before using it"));
}

#[test]
fn test_void_variable_error() {
    let source = "void v;";

    let errors = semantic_errors(source);
    let reporter = DiagnosticReporter::new(SourceManager::from_source(source));
    let formatted = reporter.report_semantic(&errors[0]);

    assert!(formatted.contains("error[E0102]"));
    assert!(formatted.contains("Non-function declared void `v`"));
}

#[test]
fn test_invalid_struct_name_error() {
    let error = SemanticError::new(
        SemanticErrorKind::InvalidStructName { name: "bool".to_string() },
        Span::new(1, 8, 1, 11),
    );
    let reporter = DiagnosticReporter::new(SourceManager::from_source("struct bool { int a; };"));
    let formatted = reporter.report_semantic(&error);

    assert!(formatted.contains("error[E0104]"));
    assert!(formatted.contains("Invalid name of struct type `bool`"));
    assert!(formatted.contains("    struct bool { int a; };\n           ^^^^\n"));
}

#[test]
fn test_scan_error_rendering() {
    let source = "int x; $";
    let (_, errors) = tokenize(source);

    let reporter = DiagnosticReporter::new(SourceManager::from_source(source));
    let formatted = reporter.report_scan(&errors[0]);

    assert!(formatted.contains("error[E0201]"));
    assert!(formatted.contains("illegal character ignored: $"));
    assert!(formatted.contains("--> <input>:1:8"));
}

#[test]
fn test_scan_warning_rendering() {
    let source = "int x;\nx = 99999999999;";
    let (_, errors) = tokenize(source);

    let reporter = DiagnosticReporter::new(SourceManager::from_source(source));
    let formatted = reporter.report_scan(&errors[0]);

    assert!(formatted.contains("warning[E0201]"));
    assert!(formatted.contains("integer literal too large; using max value"));
}

#[test]
fn test_parse_error_rendering() {
    let source = "int x\nint y;";
    let error = parse_source(source).unwrap_err();

    let reporter = DiagnosticReporter::new(SourceManager::from_source(source));
    let formatted = reporter.report_parse(&error);

    assert!(formatted.contains("error[E0001]"));
    assert!(formatted.contains("expected `;` after variable declaration, found `int`"));
    assert!(formatted.contains("--> <input>:2:1"));
}

#[test]
fn test_fatal_error_rendering() {
    let reporter = DiagnosticReporter::new(SourceManager::new());
    let formatted = reporter.report_fatal(&FatalError::from(SymbolTableError::NullArgument));

    assert!(formatted.contains("internal error"));
    assert!(formatted.contains("declaration with an absent name or symbol"));
}

#[test]
fn test_source_manager_lines() {
    let manager = SourceManager::from_source("first\r\nsecond\n\nlast");

    assert_eq!(manager.line_count(), 4);
    assert_eq!(manager.get_line(1), Some("first"));
    assert_eq!(manager.get_line(2), Some("second"));
    assert_eq!(manager.get_line(3), Some(""));
    assert_eq!(manager.get_line(4), Some("last"));
    assert_eq!(manager.get_line(0), None);
    assert_eq!(manager.get_line(5), None);
}

#[test]
fn test_snippet_for_invalid_line() {
    let manager = SourceManager::from_source("int x;");
    assert_eq!(manager.get_snippet(&Span::point(7, 1)), "<invalid line number>");
}
