use std::fs;
use std::path::Path;

use tracing::{debug, info};

use front_end::ast::Program;
use front_end::diagnostics_reporter::DiagnosticReporter;
use front_end::error::{CompileError, ParseError, ScanError, SemanticError};
use front_end::lexer::Lexer;
use front_end::name_analysis::{analyze_names, NameAnalysis};
use front_end::parser::Parser;
use front_end::source_manager::SourceManager;
use front_end::unparse::unparse;

use crate::config::CompilerConfig;

/// Process exit status of the `minic` driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success = 0,
    CompileErrors = 1,
    IoError = 2,
    InternalError = 3,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn for_error(error: &CompileError) -> Self {
        match error {
            CompileError::Parse(_) => ExitStatus::CompileErrors,
            CompileError::Io(_) => ExitStatus::IoError,
            CompileError::Fatal(_) => ExitStatus::InternalError,
        }
    }
}

/// Everything one `check` run produced.
#[derive(Debug, Default)]
pub struct CompilationResult {
    pub scan_errors: Vec<ScanError>,
    pub parse_error: Option<ParseError>,
    pub semantic_errors: Vec<SemanticError>,
    /// The annotated program, absent when parsing failed.
    pub program: Option<Program>,
    pub analysis: Option<NameAnalysis>,
    /// Rendered diagnostics in the order they were found.
    pub diagnostics: Vec<String>,
}

impl CompilationResult {
    /// Number of errors; scanner warnings are not counted.
    pub fn error_count(&self) -> usize {
        self.scan_errors.iter().filter(|e| e.is_error()).count()
            + usize::from(self.parse_error.is_some())
            + self.semantic_errors.len()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn exit_status(&self) -> ExitStatus {
        if self.has_errors() {
            ExitStatus::CompileErrors
        } else {
            ExitStatus::Success
        }
    }
}

pub struct CompilationPipeline {
    config: CompilerConfig,
}

impl CompilationPipeline {
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    pub fn check_file(&self, path: &Path) -> Result<CompilationResult, CompileError> {
        let source = fs::read_to_string(path)?;
        self.check_source(&path.display().to_string(), &source)
    }

    /// Scan, parse and analyze `source`. Recoverable problems end up in the
    /// result; only a fatal analysis error is returned as `Err`.
    pub fn check_source(
        &self,
        name: &str,
        source: &str,
    ) -> Result<CompilationResult, CompileError> {
        info!(source = name, "checking");
        let reporter = DiagnosticReporter::new(SourceManager::from_source(source).with_name(name));
        let mut result = CompilationResult::default();

        // Step 1: Lexical analysis
        let mut lexer = Lexer::new(source);
        let tokens = lexer.scan_tokens();
        debug!(tokens = tokens.len(), "scanned");
        result.scan_errors = lexer.errors().to_vec();
        for error in &result.scan_errors {
            result.diagnostics.push(reporter.report_scan(error));
        }

        // Step 2: Parsing
        let mut program = match Parser::new(tokens).parse_program() {
            Ok(program) => program,
            Err(error) => {
                result.diagnostics.push(reporter.report_parse(&error));
                result.parse_error = Some(error);
                return Ok(result);
            }
        };

        // Step 3: Name analysis
        let analysis = analyze_names(&mut program, &mut result.semantic_errors)?;
        for error in &result.semantic_errors {
            result.diagnostics.push(reporter.report_semantic(error));
        }

        result.program = Some(program);
        result.analysis = Some(analysis);
        Ok(result)
    }

    /// The annotated program text, when `--unparse` was requested and the
    /// program parsed.
    pub fn unparsed(&self, result: &CompilationResult) -> Option<String> {
        if !self.config.unparse {
            return None;
        }
        result.program.as_ref().map(unparse)
    }

    /// Token dump, one `<lexeme> : <line> : <column>` line per token.
    pub fn tokens_file(&self, path: &Path) -> Result<TokenDump, CompileError> {
        let source = fs::read_to_string(path)?;
        Ok(self.tokens_source(&path.display().to_string(), &source))
    }

    pub fn tokens_source(&self, name: &str, source: &str) -> TokenDump {
        let reporter = DiagnosticReporter::new(SourceManager::from_source(source).with_name(name));
        let mut lexer = Lexer::new(source);
        let tokens = lexer.scan_tokens();

        let mut text = String::new();
        for token in &tokens {
            text.push_str(&token.to_string());
            text.push('\n');
        }

        TokenDump {
            text,
            diagnostics: lexer.errors().iter().map(|e| reporter.report_scan(e)).collect(),
            has_errors: lexer.has_errors(),
        }
    }
}

/// Output of the `tokens` command.
#[derive(Debug)]
pub struct TokenDump {
    pub text: String,
    pub diagnostics: Vec<String>,
    pub has_errors: bool,
}

impl TokenDump {
    pub fn exit_status(&self) -> ExitStatus {
        if self.has_errors {
            ExitStatus::CompileErrors
        } else {
            ExitStatus::Success
        }
    }
}
