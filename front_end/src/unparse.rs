//! Turns an AST back into Mini source text.
//!
//! Sub-expressions are fully parenthesised and every identifier that was
//! linked by name analysis is followed by its symbol's type in parentheses,
//! which makes the output handy for checking what analysis resolved.

use crate::ast::*;

const INDENT_WIDTH: usize = 4;

pub fn unparse(program: &Program) -> String {
    let mut unparser = Unparser::default();
    unparser.decls(&program.decls, 0);
    unparser.out
}

/// Unparse a single expression, without the outer parentheses of an
/// assignment.
pub fn unparse_expr(expr: &Expr) -> String {
    let mut unparser = Unparser::default();
    unparser.expr(expr, false);
    unparser.out
}

#[derive(Default)]
struct Unparser {
    out: String,
}

impl Unparser {
    fn indent(&mut self, level: usize) {
        self.out.push_str(&" ".repeat(level));
    }

    fn line(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn decls(&mut self, decls: &[Decl], level: usize) {
        for decl in decls {
            match decl {
                Decl::Var(var) => {
                    self.indent(level);
                    self.typed_name(&var.typ, &var.id);
                    self.line(";");
                }
                Decl::Fn(function) => self.fn_decl(function, level),
                Decl::Struct(structure) => {
                    self.indent(level);
                    self.out.push_str("struct ");
                    self.ident(&structure.id);
                    self.line("{");
                    self.decls(&structure.fields, level + INDENT_WIDTH);
                    self.indent(level);
                    self.line("};\n");
                }
            }
        }
    }

    fn fn_decl(&mut self, function: &FnDecl, level: usize) {
        self.indent(level);
        self.type_node(&function.return_type);
        self.out.push(' ');
        self.ident(&function.id);
        self.out.push('(');
        for (i, formal) in function.formals.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.typed_name(&formal.typ, &formal.id);
        }
        self.line(") {");
        self.block(&function.body, level + INDENT_WIDTH);
        self.line("}\n");
    }

    fn typed_name(&mut self, typ: &TypeNode, id: &Ident) {
        self.type_node(typ);
        self.out.push(' ');
        self.ident(id);
    }

    fn type_node(&mut self, typ: &TypeNode) {
        match typ {
            TypeNode::Int => self.out.push_str("int"),
            TypeNode::Bool => self.out.push_str("bool"),
            TypeNode::Void => self.out.push_str("void"),
            TypeNode::Struct(id) => {
                self.out.push_str("struct ");
                self.ident(id);
            }
        }
    }

    fn block(&mut self, block: &Block, level: usize) {
        self.decls(&block.decls, level);
        for stmt in &block.stmts {
            self.stmt(stmt, level);
        }
    }

    /// `header {` ... `}` around a nested block.
    fn braced(&mut self, header: &str, cond: Option<&Expr>, body: &Block, level: usize) {
        self.indent(level);
        self.out.push_str(header);
        if let Some(cond) = cond {
            self.out.push_str(" (");
            self.expr(cond, true);
            self.out.push(')');
        }
        self.line(" {");
        self.block(body, level + INDENT_WIDTH);
        self.indent(level);
        self.line("}");
    }

    fn stmt(&mut self, stmt: &Stmt, level: usize) {
        match stmt {
            Stmt::Assign(expr) => {
                self.indent(level);
                self.expr(expr, false);
                self.line(";");
            }
            Stmt::PostInc(expr) => {
                self.indent(level);
                self.expr(expr, true);
                self.line("++;");
            }
            Stmt::PostDec(expr) => {
                self.indent(level);
                self.expr(expr, true);
                self.line("--;");
            }
            Stmt::Read(expr) => {
                self.indent(level);
                self.out.push_str("cin >> ");
                self.expr(expr, true);
                self.line(";");
            }
            Stmt::Write(expr) => {
                self.indent(level);
                self.out.push_str("cout << ");
                self.expr(expr, true);
                self.line(";");
            }
            Stmt::If { cond, body } => self.braced("if", Some(cond), body, level),
            Stmt::IfElse {
                cond,
                then_body,
                else_body,
            } => {
                self.braced("if", Some(cond), then_body, level);
                self.braced("else", None, else_body, level);
            }
            Stmt::While { cond, body } => self.braced("while", Some(cond), body, level),
            Stmt::Call(call) => {
                self.indent(level);
                self.call(call);
                self.line(";");
            }
            Stmt::Return(value) => {
                self.indent(level);
                self.out.push_str("return");
                if let Some(expr) = value {
                    self.out.push(' ');
                    self.expr(expr, true);
                }
                self.line(";");
            }
        }
    }

    /// `nested` is false only for an assignment used as a statement.
    fn expr(&mut self, expr: &Expr, nested: bool) {
        match expr {
            Expr::IntLit { value, .. } => self.out.push_str(&value.to_string()),
            Expr::StrLit { value, .. } => self.out.push_str(value),
            Expr::True(_) => self.out.push_str("true"),
            Expr::False(_) => self.out.push_str("false"),
            Expr::Id(id) => self.ident(id),
            Expr::DotAccess { loc, field } => {
                self.out.push('(');
                self.expr(loc, true);
                self.out.push_str(").");
                self.ident(field);
            }
            Expr::Assign { lhs, rhs } => {
                if nested {
                    self.out.push('(');
                }
                self.expr(lhs, true);
                self.out.push_str(" = ");
                self.expr(rhs, true);
                if nested {
                    self.out.push(')');
                }
            }
            Expr::Call(call) => self.call(call),
            Expr::Unary { op, operand } => {
                self.out.push('(');
                self.out.push_str(op.symbol());
                self.expr(operand, true);
                self.out.push(')');
            }
            Expr::Binary { op, lhs, rhs } => {
                self.out.push('(');
                self.expr(lhs, true);
                self.out.push(' ');
                self.out.push_str(op.symbol());
                self.out.push(' ');
                self.expr(rhs, true);
                self.out.push(')');
            }
        }
    }

    fn call(&mut self, call: &CallExpr) {
        self.ident(&call.callee);
        self.out.push('(');
        for (i, arg) in call.args.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.expr(arg, true);
        }
        self.out.push(')');
    }

    fn ident(&mut self, id: &Ident) {
        self.out.push_str(&id.name);
        if let Some(symbol) = id.symbol() {
            self.out.push('(');
            self.out.push_str(&symbol.type_descriptor());
            self.out.push(')');
        }
    }
}
