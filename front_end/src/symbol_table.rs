use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::debug;

use crate::symbol::Symbol;

/// Structural misuse of a `SymbolTable`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolTableError {
    /// An operation needing at least one scope frame found none.
    #[error("symbol table has no scope frame")]
    EmptyTable,
    /// `declare` was given an empty name or a nameless symbol.
    #[error("declaration with an absent name or symbol")]
    NullArgument,
    #[error("`{0}` is already declared in the innermost scope")]
    DuplicateName(String),
}

/// One lexical block's declarations.
type Scope = FxHashMap<String, Rc<Symbol>>;

/// The Symbol Table is a stack of scope frames with the innermost scope at
/// the end. Declarations always land in the innermost frame.
#[derive(Debug)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
}

impl SymbolTable {
    /// Create a table holding one (global) frame.
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::default()],
        }
    }

    /// Add `symbol` under `name` to the innermost frame. Outer frames are not
    /// consulted, so shadowing across frames is allowed.
    pub fn declare(&mut self, name: &str, symbol: Rc<Symbol>) -> Result<(), SymbolTableError> {
        let scope = self.scopes.last_mut().ok_or(SymbolTableError::EmptyTable)?;

        if name.is_empty() || symbol.name.is_empty() {
            return Err(SymbolTableError::NullArgument);
        }

        if scope.contains_key(name) {
            return Err(SymbolTableError::DuplicateName(name.to_string()));
        }

        scope.insert(name.to_string(), symbol);
        Ok(())
    }

    /// Look up a symbol in the innermost frame only.
    pub fn lookup_innermost(&self, name: &str) -> Result<Option<Rc<Symbol>>, SymbolTableError> {
        let scope = self.scopes.last().ok_or(SymbolTableError::EmptyTable)?;
        Ok(scope.get(name).cloned())
    }

    /// Look up a symbol from the innermost frame outwards. An empty table
    /// simply has no binding for anything.
    pub fn lookup_any(&self, name: &str) -> Option<Rc<Symbol>> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
            .cloned()
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::default());
        debug!(depth = self.scopes.len(), "entered scope");
    }

    pub fn pop_scope(&mut self) -> Result<(), SymbolTableError> {
        self.scopes.pop().ok_or(SymbolTableError::EmptyTable)?;
        debug!(depth = self.scopes.len(), "left scope");
        Ok(())
    }

    /// Number of live frames.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Symbols of the innermost frame, sorted by name.
    pub fn innermost_symbols(&self) -> Vec<Rc<Symbol>> {
        let mut symbols: Vec<_> = self
            .scopes
            .last()
            .map(|scope| scope.values().cloned().collect())
            .unwrap_or_default();
        symbols.sort_by(|a, b| a.name.cmp(&b.name));
        symbols
    }

    /// Human-readable listing of every frame, innermost first. Debugging aid
    /// only.
    pub fn dump(&self) -> String {
        self.to_string()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Sym Table")?;
        for (depth, scope) in self.scopes.iter().enumerate().rev() {
            let mut names: Vec<&String> = scope.keys().collect();
            names.sort();

            write!(f, "scope {}: {{", depth)?;
            for (i, name) in names.into_iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}={}", name, scope[name])?;
            }
            writeln!(f, "}}")?;
        }
        Ok(())
    }
}

/// A declared struct type and its own field frame.
#[derive(Debug)]
pub struct StructInfo {
    pub symbol: Rc<Symbol>,
    pub fields: SymbolTable,
}

impl StructInfo {
    pub fn field(&self, name: &str) -> Option<Rc<Symbol>> {
        self.fields.lookup_any(name)
    }
}

/// Program-wide struct types. Not block scoped; one registry lives for one
/// analysis run.
#[derive(Debug, Default)]
pub struct StructRegistry {
    structs: FxHashMap<String, StructInfo>,
}

impl StructRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, info: StructInfo) -> Result<(), SymbolTableError> {
        let name = info.symbol.name.clone();
        if name.is_empty() {
            return Err(SymbolTableError::NullArgument);
        }
        if self.structs.contains_key(&name) {
            return Err(SymbolTableError::DuplicateName(name));
        }
        self.structs.insert(name, info);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&StructInfo> {
        self.structs.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut StructInfo> {
        self.structs.get_mut(name)
    }

    pub fn lookup(&self, name: &str) -> Option<Rc<Symbol>> {
        self.structs.get(name).map(|info| Rc::clone(&info.symbol))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.structs.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.structs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structs.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.structs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
