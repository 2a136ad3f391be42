use std::fmt;

use thiserror::Error;

use crate::source_location::Span;
use crate::symbol_table::SymbolTableError;

/// Severity level of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Error,
    Warning,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Error => f.write_str("error"),
            DiagnosticLevel::Warning => f.write_str("warning"),
        }
    }
}

fn level_tag(level: &DiagnosticLevel) -> &'static str {
    match level {
        DiagnosticLevel::Error => "ERROR",
        DiagnosticLevel::Warning => "WARNING",
    }
}

/// A problem found while scanning. Scanning always continues past it.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{span} ***{}*** {message}", level_tag(.level))]
pub struct ScanError {
    pub span: Span,
    pub message: String,
    pub level: DiagnosticLevel,
}

impl ScanError {
    pub fn error(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            level: DiagnosticLevel::Error,
        }
    }

    pub fn warning(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            level: DiagnosticLevel::Warning,
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == DiagnosticLevel::Error
    }
}

/// Error type for parsing errors
#[derive(Debug, Clone, PartialEq, Error)]
#[error("error[{error_code}]: {message} at line {span}")]
pub struct ParseError {
    pub span: Span,
    pub message: String,
    pub error_code: &'static str,
}

impl ParseError {
    pub fn new(span: Span, message: String, error_code: &'static str) -> Self {
        Self {
            span,
            message,
            error_code,
        }
    }

    pub fn unexpected_token(span: Span, message: String) -> Self {
        Self::new(span, message, "E0001")
    }

    pub fn invalid_expression(span: Span, message: String) -> Self {
        Self::new(span, message, "E0002")
    }

    pub fn syntax_error(span: Span, message: String) -> Self {
        Self::new(span, message, "E0003")
    }
}

/// The recoverable name-analysis errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemanticErrorKind {
    /// Name already bound in the relevant scope (or struct registry).
    DuplicateDeclaration { name: String },
    /// A non-function declaration of type `void`.
    VoidVariable { name: String },
    /// Reference with no visible binding.
    UndeclaredIdentifier { name: String },
    /// Struct declared under a primitive type name.
    InvalidStructName { name: String },
}

impl SemanticErrorKind {
    pub fn message(&self) -> &'static str {
        match self {
            SemanticErrorKind::DuplicateDeclaration { .. } => "Multiply declared identifier",
            SemanticErrorKind::VoidVariable { .. } => "Non-function declared void",
            SemanticErrorKind::UndeclaredIdentifier { .. } => "Undeclared identifier",
            SemanticErrorKind::InvalidStructName { .. } => "Invalid name of struct type",
        }
    }

    pub fn name(&self) -> &str {
        match self {
            SemanticErrorKind::DuplicateDeclaration { name }
            | SemanticErrorKind::VoidVariable { name }
            | SemanticErrorKind::UndeclaredIdentifier { name }
            | SemanticErrorKind::InvalidStructName { name } => name,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            SemanticErrorKind::DuplicateDeclaration { .. } => "E0101",
            SemanticErrorKind::VoidVariable { .. } => "E0102",
            SemanticErrorKind::UndeclaredIdentifier { .. } => "E0103",
            SemanticErrorKind::InvalidStructName { .. } => "E0104",
        }
    }
}

/// A semantic error reported during name analysis, positioned at the
/// offending identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{span} ***ERROR*** {}", .kind.message())]
pub struct SemanticError {
    pub kind: SemanticErrorKind,
    pub span: Span,
}

impl SemanticError {
    pub fn new(kind: SemanticErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn line(&self) -> usize {
        self.span.start_line
    }

    pub fn column(&self) -> usize {
        self.span.start_column
    }

    pub fn message(&self) -> &'static str {
        self.kind.message()
    }
}

/// A structural violation that aborts name analysis. Never caused by the
/// input program, only by a broken table discipline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FatalError {
    #[error("internal error during name analysis: {0}")]
    Internal(#[from] SymbolTableError),
}

/// Common error type for compiler errors
#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Fatal(#[from] FatalError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
