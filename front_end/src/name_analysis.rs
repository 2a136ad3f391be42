//! Name analysis for Mini programs
//!
//! A depth-first walk over the AST that declares names, opens and closes a
//! scope for every function body and `if`/`else`/`while` block, and links
//! each identifier to the symbol it resolves to. Semantic errors are reported
//! to a `DiagnosticSink` and the walk carries on; only a broken symbol table
//! discipline (`FatalError`) stops it.

use std::rc::Rc;

use tracing::{debug, info, trace};

use crate::ast::*;
use crate::error::{FatalError, SemanticError, SemanticErrorKind};
use crate::source_location::Span;
use crate::symbol::{FunctionSignature, Symbol};
use crate::symbol_table::{StructInfo, StructRegistry, SymbolTable};
use crate::types::{is_reserved_type_name, TypeDescriptor};

/// Receives every semantic error as it is found. The analysis never branches
/// on what the sink does with it.
pub trait DiagnosticSink {
    fn report(&mut self, error: SemanticError);
}

impl DiagnosticSink for Vec<SemanticError> {
    fn report(&mut self, error: SemanticError) {
        self.push(error);
    }
}

/// Result of name analysis
#[derive(Debug)]
pub struct NameAnalysis {
    /// Every struct type declared by the program.
    pub structs: StructRegistry,
    /// Symbols left in the global scope, sorted by name.
    pub globals: Vec<Rc<Symbol>>,
    /// Number of semantic errors reported.
    pub error_count: usize,
}

impl NameAnalysis {
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn global(&self, name: &str) -> Option<&Rc<Symbol>> {
        self.globals.iter().find(|symbol| symbol.name == name)
    }
}

/// Analyze names in `program`, linking its identifiers in place and reporting
/// semantic errors to `sink`. Each call uses a fresh symbol table and struct
/// registry.
pub fn analyze_names(
    program: &mut Program,
    sink: &mut dyn DiagnosticSink,
) -> Result<NameAnalysis, FatalError> {
    let mut analyzer = NameAnalyzer::new(sink);
    analyzer.analyze_program(program)?;
    analyzer.finish()
}

/// Analyze names in `program`, collecting the semantic errors.
pub fn analyze(program: &mut Program) -> Result<(NameAnalysis, Vec<SemanticError>), FatalError> {
    let mut errors = Vec::new();
    let analysis = analyze_names(program, &mut errors)?;
    Ok((analysis, errors))
}

/// Which kind of symbol a variable-like declaration creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Binding {
    Variable,
    Parameter,
}

pub(crate) struct NameAnalyzer<'a> {
    table: SymbolTable,
    structs: StructRegistry,
    sink: &'a mut dyn DiagnosticSink,
    error_count: usize,
}

impl<'a> NameAnalyzer<'a> {
    pub(crate) fn new(sink: &'a mut dyn DiagnosticSink) -> Self {
        Self {
            table: SymbolTable::new(),
            structs: StructRegistry::new(),
            sink,
            error_count: 0,
        }
    }

    fn finish(self) -> Result<NameAnalysis, FatalError> {
        let globals = self.table.innermost_symbols();
        info!(
            errors = self.error_count,
            structs = self.structs.len(),
            "name analysis finished"
        );
        Ok(NameAnalysis {
            structs: self.structs,
            globals,
            error_count: self.error_count,
        })
    }

    fn analyze_program(&mut self, program: &mut Program) -> Result<(), FatalError> {
        info!(decls = program.decls.len(), "analyzing names for program");
        let depth = self.table.depth();
        self.analyze_decls(&mut program.decls)?;
        debug_assert_eq!(depth, self.table.depth(), "scope depth changed across the program");
        Ok(())
    }

    // ---- Scope management ----

    /// Run `f` inside a fresh innermost scope. The scope is popped on every
    /// exit from `f`, including the error path.
    fn in_scope<F>(&mut self, f: F) -> Result<(), FatalError>
    where
        F: FnOnce(&mut Self) -> Result<(), FatalError>,
    {
        self.table.push_scope();
        let result = f(self);
        self.table.pop_scope()?;
        result
    }

    /// Run `f` against `table` instead of the lexical scope stack, handing
    /// `table` back afterwards.
    fn with_table<F>(&mut self, table: SymbolTable, f: F) -> (SymbolTable, Result<(), FatalError>)
    where
        F: FnOnce(&mut Self) -> Result<(), FatalError>,
    {
        let outer = std::mem::replace(&mut self.table, table);
        let result = f(self);
        let table = std::mem::replace(&mut self.table, outer);
        (table, result)
    }

    fn report(&mut self, kind: SemanticErrorKind, span: Span) {
        debug!(%span, name = kind.name(), "{}", kind.message());
        self.error_count += 1;
        self.sink.report(SemanticError::new(kind, span));
    }

    // ---- Declarations ----

    fn analyze_decls(&mut self, decls: &mut [Decl]) -> Result<(), FatalError> {
        for decl in decls {
            match decl {
                Decl::Var(var) => {
                    self.declare_variable(&var.typ, &mut var.id, Binding::Variable)?;
                }
                Decl::Fn(function) => self.analyze_fn_decl(function)?,
                Decl::Struct(structure) => self.analyze_struct_decl(structure)?,
            }
        }
        Ok(())
    }

    /// Variable, field and formal declarations. Returns the new symbol when
    /// the name was bound.
    fn declare_variable(
        &mut self,
        typ: &TypeNode,
        id: &mut Ident,
        binding: Binding,
    ) -> Result<Option<Rc<Symbol>>, FatalError> {
        let descriptor = typ.descriptor();

        if descriptor.is_void() {
            self.report(SemanticErrorKind::VoidVariable { name: id.name.clone() }, id.span);
            return Ok(None);
        }

        if self.table.lookup_innermost(&id.name)?.is_some() {
            self.report(
                SemanticErrorKind::DuplicateDeclaration { name: id.name.clone() },
                id.span,
            );
            return Ok(None);
        }

        let symbol = Rc::new(match binding {
            Binding::Variable => Symbol::variable(&id.name, descriptor, id.span),
            Binding::Parameter => Symbol::parameter(&id.name, descriptor, id.span),
        });
        self.table.declare(&id.name, Rc::clone(&symbol))?;
        id.link(Rc::clone(&symbol));
        trace!(name = %id.name, typ = %symbol.typ, depth = self.table.depth(), "declared");

        Ok(Some(symbol))
    }

    fn analyze_fn_decl(&mut self, function: &mut FnDecl) -> Result<(), FatalError> {
        let FnDecl {
            return_type,
            id,
            formals,
            body,
        } = function;

        if self.table.lookup_innermost(&id.name)?.is_some() {
            // The body is still analyzed so its own errors surface.
            self.report(
                SemanticErrorKind::DuplicateDeclaration { name: id.name.clone() },
                id.span,
            );
        } else {
            let param_types: Vec<TypeDescriptor> =
                formals.iter().map(|formal| formal.typ.descriptor()).collect();
            let signature = FunctionSignature::new(return_type.descriptor(), param_types);
            let symbol = Rc::new(Symbol::function(&id.name, signature, id.span));
            self.table.declare(&id.name, Rc::clone(&symbol))?;
            trace!(name = %id.name, signature = %symbol.type_descriptor(), "declared function");
            id.link(symbol);
        }

        self.in_scope(|this| {
            for formal in formals.iter_mut() {
                this.declare_variable(&formal.typ, &mut formal.id, Binding::Parameter)?;
            }
            this.analyze_block(body)
        })
    }

    fn analyze_struct_decl(&mut self, structure: &mut StructDecl) -> Result<(), FatalError> {
        let StructDecl { id, fields } = structure;

        if is_reserved_type_name(&id.name) {
            self.report(SemanticErrorKind::InvalidStructName { name: id.name.clone() }, id.span);
            return Ok(());
        }

        if self.structs.contains(&id.name) {
            self.report(
                SemanticErrorKind::DuplicateDeclaration { name: id.name.clone() },
                id.span,
            );
            return Ok(());
        }

        // Registered before the fields are walked, so a nested struct of the
        // same name is a duplicate.
        let symbol = Rc::new(Symbol::structure(&id.name, id.span));
        id.link(Rc::clone(&symbol));
        self.structs.register(StructInfo {
            symbol,
            fields: SymbolTable::new(),
        })?;
        trace!(name = %id.name, "registered struct");

        // First pass: the struct's own frame catches duplicate fields.
        let mut accepted = Vec::new();
        let (field_table, result) = self.with_table(SymbolTable::new(), |this| {
            for field in fields.iter_mut() {
                if let Decl::Var(var) = field {
                    let declared = this.declare_variable(&var.typ, &mut var.id, Binding::Variable)?;
                    if let Some(field_symbol) = declared {
                        accepted.push(field_symbol);
                    }
                } else {
                    this.analyze_decls(std::slice::from_mut(field))?;
                }
            }
            Ok(())
        });
        result?;
        if let Some(info) = self.structs.get_mut(&id.name) {
            info.fields = field_table;
        }

        // Second pass: fields are also visible in the enclosing scope. A field
        // already rejected above is not reported a second time.
        for field_symbol in accepted {
            if self.table.lookup_innermost(&field_symbol.name)?.is_some() {
                self.report(
                    SemanticErrorKind::DuplicateDeclaration {
                        name: field_symbol.name.clone(),
                    },
                    field_symbol.span,
                );
                continue;
            }
            self.table.declare(&field_symbol.name, Rc::clone(&field_symbol))?;
        }
        Ok(())
    }

    // ---- Statements ----

    fn analyze_block(&mut self, block: &mut Block) -> Result<(), FatalError> {
        self.analyze_decls(&mut block.decls)?;
        for stmt in block.stmts.iter_mut() {
            self.analyze_stmt(stmt)?;
        }
        Ok(())
    }

    fn analyze_stmt(&mut self, stmt: &mut Stmt) -> Result<(), FatalError> {
        match stmt {
            Stmt::Assign(expr)
            | Stmt::PostInc(expr)
            | Stmt::PostDec(expr)
            | Stmt::Read(expr)
            | Stmt::Write(expr) => self.analyze_expr(expr),
            Stmt::If { cond, body } | Stmt::While { cond, body } => {
                self.analyze_expr(cond)?;
                self.in_scope(|this| this.analyze_block(body))
            }
            Stmt::IfElse {
                cond,
                then_body,
                else_body,
            } => {
                self.analyze_expr(cond)?;
                self.in_scope(|this| this.analyze_block(then_body))?;
                self.in_scope(|this| this.analyze_block(else_body))
            }
            Stmt::Call(call) => self.analyze_call(call),
            Stmt::Return(value) => match value {
                Some(expr) => self.analyze_expr(expr),
                None => Ok(()),
            },
        }
    }

    // ---- Expressions ----

    fn analyze_expr(&mut self, expr: &mut Expr) -> Result<(), FatalError> {
        match expr {
            Expr::IntLit { .. } | Expr::StrLit { .. } | Expr::True(_) | Expr::False(_) => Ok(()),
            Expr::Id(id) => {
                self.resolve(id);
                Ok(())
            }
            Expr::DotAccess { loc, field } => {
                self.analyze_expr(loc)?;
                self.resolve(field);
                Ok(())
            }
            Expr::Assign { lhs, rhs } => {
                self.analyze_expr(lhs)?;
                self.analyze_expr(rhs)
            }
            Expr::Call(call) => self.analyze_call(call),
            Expr::Unary { operand, .. } => self.analyze_expr(operand),
            Expr::Binary { lhs, rhs, .. } => {
                self.analyze_expr(lhs)?;
                self.analyze_expr(rhs)
            }
        }
    }

    fn analyze_call(&mut self, call: &mut CallExpr) -> Result<(), FatalError> {
        self.resolve(&mut call.callee);
        for arg in call.args.iter_mut() {
            self.analyze_expr(arg)?;
        }
        Ok(())
    }

    /// Link a referencing identifier to the innermost visible binding.
    fn resolve(&mut self, id: &mut Ident) {
        match self.table.lookup_any(&id.name) {
            Some(symbol) => {
                trace!(name = %id.name, span = %id.span, "resolved");
                id.link(symbol);
            }
            None => {
                self.report(
                    SemanticErrorKind::UndeclaredIdentifier { name: id.name.clone() },
                    id.span,
                );
            }
        }
    }
}
