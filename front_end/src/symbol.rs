//! Symbols: the resolved record behind every declared name.

use std::fmt;

use crate::source_location::Span;
use crate::types::TypeDescriptor;

/// Different kinds of symbols
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolKind {
    Variable,
    Parameter,
    Struct,
    Function(FunctionSignature),
}

/// Parameter types in declaration order plus the return type.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSignature {
    pub return_type: TypeDescriptor,
    pub param_types: Vec<TypeDescriptor>,
}

impl FunctionSignature {
    pub fn new(return_type: TypeDescriptor, param_types: Vec<TypeDescriptor>) -> Self {
        Self {
            return_type,
            param_types,
        }
    }

    pub fn arity(&self) -> usize {
        self.param_types.len()
    }
}

/// `int,bool->void`; a function without parameters renders as `->int`.
impl fmt::Display for FunctionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, param) in self.param_types.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", param)?;
        }
        write!(f, "->{}", self.return_type)
    }
}

/// Symbol represents a declared variable, parameter, struct or function.
/// Symbols are immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    /// Declared type; the return type for functions.
    pub typ: TypeDescriptor,
    pub kind: SymbolKind,
    pub span: Span,
}

impl Symbol {
    pub fn variable(name: impl Into<String>, typ: TypeDescriptor, span: Span) -> Self {
        Self {
            name: name.into(),
            typ,
            kind: SymbolKind::Variable,
            span,
        }
    }

    pub fn parameter(name: impl Into<String>, typ: TypeDescriptor, span: Span) -> Self {
        Self {
            name: name.into(),
            typ,
            kind: SymbolKind::Parameter,
            span,
        }
    }

    /// A struct type's symbol is named and typed as the struct itself.
    pub fn structure(name: impl Into<String>, span: Span) -> Self {
        let name = name.into();
        Self {
            typ: TypeDescriptor::Struct(name.clone()),
            name,
            kind: SymbolKind::Struct,
            span,
        }
    }

    pub fn function(name: impl Into<String>, signature: FunctionSignature, span: Span) -> Self {
        Self {
            name: name.into(),
            typ: signature.return_type.clone(),
            kind: SymbolKind::Function(signature),
            span,
        }
    }

    pub fn signature(&self) -> Option<&FunctionSignature> {
        match &self.kind {
            SymbolKind::Function(signature) => Some(signature),
            _ => None,
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, SymbolKind::Function(_))
    }

    /// The display type. Functions render their whole signature; it is only
    /// ever used for display, never for comparisons.
    pub fn type_descriptor(&self) -> String {
        match &self.kind {
            SymbolKind::Function(signature) => signature.to_string(),
            _ => self.typ.to_string(),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}){}", self.type_descriptor(), self.name)
    }
}
