//! The Mini abstract syntax tree.
//!
//! Internal nodes own their children. Identifiers additionally carry an
//! optional link to the symbol they resolve to; it is filled in by name
//! analysis and stays `None` for names that could not be resolved.

use std::rc::Rc;

use crate::source_location::Span;
use crate::symbol::Symbol;
use crate::types::TypeDescriptor;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub decls: Vec<Decl>,
}

impl Program {
    pub fn new(decls: Vec<Decl>) -> Self {
        Self { decls }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Var(VarDecl),
    Fn(FnDecl),
    Struct(StructDecl),
}

impl Decl {
    pub fn id(&self) -> &Ident {
        match self {
            Decl::Var(decl) => &decl.id,
            Decl::Fn(decl) => &decl.id,
            Decl::Struct(decl) => &decl.id,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub typ: TypeNode,
    pub id: Ident,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormalDecl {
    pub typ: TypeNode,
    pub id: Ident,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FnDecl {
    pub return_type: TypeNode,
    pub id: Ident,
    pub formals: Vec<FormalDecl>,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructDecl {
    pub id: Ident,
    pub fields: Vec<Decl>,
}

/// Local declarations followed by statements: a function body or the body of
/// an `if`, `else` or `while`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub decls: Vec<Decl>,
    pub stmts: Vec<Stmt>,
}

impl Block {
    pub fn new(decls: Vec<Decl>, stmts: Vec<Stmt>) -> Self {
        Self { decls, stmts }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeNode {
    Int,
    Bool,
    Void,
    Struct(Ident),
}

impl TypeNode {
    pub fn descriptor(&self) -> TypeDescriptor {
        match self {
            TypeNode::Int => TypeDescriptor::Int,
            TypeNode::Bool => TypeDescriptor::Bool,
            TypeNode::Void => TypeDescriptor::Void,
            TypeNode::Struct(id) => TypeDescriptor::Struct(id.name.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Always holds an `Expr::Assign`.
    Assign(Expr),
    PostInc(Expr),
    PostDec(Expr),
    Read(Expr),
    Write(Expr),
    If {
        cond: Expr,
        body: Block,
    },
    IfElse {
        cond: Expr,
        then_body: Block,
        else_body: Block,
    },
    While {
        cond: Expr,
        body: Block,
    },
    Call(CallExpr),
    Return(Option<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Plus,
    Minus,
    Times,
    Divide,
    And,
    Or,
    Equals,
    NotEquals,
    Less,
    Greater,
    LessEq,
    GreaterEq,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Plus => "+",
            BinaryOp::Minus => "-",
            BinaryOp::Times => "*",
            BinaryOp::Divide => "/",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Equals => "==",
            BinaryOp::NotEquals => "!=",
            BinaryOp::Less => "<",
            BinaryOp::Greater => ">",
            BinaryOp::LessEq => "<=",
            BinaryOp::GreaterEq => ">=",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Ident,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    IntLit {
        span: Span,
        value: i32,
    },
    StrLit {
        span: Span,
        value: String,
    },
    True(Span),
    False(Span),
    Id(Ident),
    DotAccess {
        loc: Box<Expr>,
        field: Ident,
    },
    Assign {
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call(CallExpr),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    /// The position diagnostics use for this expression.
    pub fn span(&self) -> Span {
        match self {
            Expr::IntLit { span, .. } | Expr::StrLit { span, .. } => *span,
            Expr::True(span) | Expr::False(span) => *span,
            Expr::Id(id) => id.span,
            Expr::DotAccess { field, .. } => field.span,
            Expr::Assign { lhs, .. } => lhs.span(),
            Expr::Call(call) => call.callee.span,
            Expr::Unary { operand, .. } => operand.span(),
            Expr::Binary { lhs, .. } => lhs.span(),
        }
    }

    pub fn new_binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn new_unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn new_assign(lhs: Expr, rhs: Expr) -> Self {
        Expr::Assign {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn new_dot(loc: Expr, field: Ident) -> Self {
        Expr::DotAccess {
            loc: Box::new(loc),
            field,
        }
    }
}

/// An identifier occurrence, either declaring or referencing a name.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
    symbol: Option<Rc<Symbol>>,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
            symbol: None,
        }
    }

    /// Record the symbol this identifier resolves to. The identifier does not
    /// own the symbol.
    pub fn link(&mut self, symbol: Rc<Symbol>) {
        self.symbol = Some(symbol);
    }

    pub fn symbol(&self) -> Option<&Rc<Symbol>> {
        self.symbol.as_ref()
    }

    pub fn is_resolved(&self) -> bool {
        self.symbol.is_some()
    }
}
