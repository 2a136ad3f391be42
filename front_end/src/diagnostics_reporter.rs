use colored::Colorize;

use crate::error::{
    DiagnosticLevel, FatalError, ParseError, ScanError, SemanticError, SemanticErrorKind,
};
use crate::source_location::Span;
use crate::source_manager::SourceManager;

/// Code used for every scanner diagnostic.
pub const SCAN_ERROR_CODE: &str = "E0201";

/// Renders diagnostics against the source they were found in.
pub struct DiagnosticReporter {
    pub source_manager: SourceManager,
}

impl DiagnosticReporter {
    pub fn new(source_manager: SourceManager) -> Self {
        Self { source_manager }
    }

    pub fn report_semantic(&self, error: &SemanticError) -> String {
        let name = error.kind.name();
        let (label, help) = match &error.kind {
            SemanticErrorKind::DuplicateDeclaration { .. } => (
                "already declared in this scope".to_string(),
                "note: each name may be declared only once per scope".to_string(),
            ),
            SemanticErrorKind::VoidVariable { .. } => (
                "declared with type `void`".to_string(),
                "help: only functions may be declared `void`".to_string(),
            ),
            SemanticErrorKind::UndeclaredIdentifier { .. } => (
                "not found in this scope".to_string(),
                format!("help: consider declaring `{}` before using it", name),
            ),
            SemanticErrorKind::InvalidStructName { .. } => (
                "reserved type name".to_string(),
                "help: `bool`, `int` and `void` cannot name a struct type".to_string(),
            ),
        };

        self.render(
            DiagnosticLevel::Error,
            error.kind.code(),
            &format!("{} `{}`", error.message(), name),
            &error.span,
            &label,
            Some(&help),
        )
    }

    pub fn report_scan(&self, error: &ScanError) -> String {
        self.render(error.level, SCAN_ERROR_CODE, &error.message, &error.span, "here", None)
    }

    pub fn report_parse(&self, error: &ParseError) -> String {
        self.render(
            DiagnosticLevel::Error,
            error.error_code,
            &error.message,
            &error.span,
            "syntax error here",
            None,
        )
    }

    /// Fatal errors have no useful source position.
    pub fn report_fatal(&self, error: &FatalError) -> String {
        format!("{}: {}", "internal error".red().bold(), error)
    }

    fn render(
        &self,
        level: DiagnosticLevel,
        code: &str,
        headline: &str,
        span: &Span,
        label: &str,
        help: Option<&str>,
    ) -> String {
        let tag = format!("{}[{}]", level, code);
        let tag = match level {
            DiagnosticLevel::Error => tag.red().bold(),
            DiagnosticLevel::Warning => tag.yellow().bold(),
        };

        let mut output = format!("{}: {}\n", tag, headline);
        output.push_str(&format!("--> {}:{}\n", self.source_manager.name(), span));
        output.push_str(&self.source_manager.get_snippet(span));
        output.push('\n');
        output.push_str(&format!(" | {}\n", label));

        if let Some(help) = help {
            output.push('\n');
            output.push_str(help);
        }

        output
    }
}
