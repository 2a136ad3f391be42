use tracing::debug;

use crate::ast::*;
use crate::error::{ParseError, ScanError};
use crate::lexer::Lexer;
use crate::source_location::HasSourceLocation;
use crate::token::{Token, TokenType};

pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    scan_errors: Vec<ScanError>,
}

impl Parser {
    /// Build a parser over an already scanned token stream. The stream must
    /// end with an `Eof` token; one is appended if it does not.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !tokens.last().map_or(false, Token::is_eof) {
            let (line, column) = tokens
                .last()
                .map(|token| (token.line, token.column + token.length))
                .unwrap_or((1, 1));
            tokens.push(Token::new(TokenType::Eof, "", line, column));
        }

        Self {
            tokens,
            position: 0,
            scan_errors: Vec::new(),
        }
    }

    /// Scan `source` and build a parser over the result. Scan problems are
    /// kept and available through `scan_errors`.
    pub fn from_source(source: &str) -> Self {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.scan_tokens();
        let mut parser = Self::new(tokens);
        parser.scan_errors = lexer.errors().to_vec();
        parser
    }

    pub fn scan_errors(&self) -> &[ScanError] {
        &self.scan_errors
    }

    /// program ::= decl*
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut decls = Vec::new();
        while !self.check(&TokenType::Eof) {
            decls.push(self.parse_decl()?);
        }
        debug!(decls = decls.len(), "parsed program");
        Ok(Program::new(decls))
    }

    fn parse_decl(&mut self) -> Result<Decl, ParseError> {
        if self.check(&TokenType::Struct) {
            let is_struct_decl = matches!(self.peek_at(1), TokenType::Identifier(_))
                && *self.peek_at(2) == TokenType::LeftBrace;
            if is_struct_decl {
                return self.parse_struct_decl().map(Decl::Struct);
            }
            return self.parse_var_decl().map(Decl::Var);
        }

        let typ = self.parse_type()?;
        let id = self.parse_ident()?;

        if self.check(&TokenType::LeftParen) {
            self.parse_fn_decl(typ, id).map(Decl::Fn)
        } else {
            self.consume(TokenType::Semicolon, "after variable declaration")?;
            Ok(Decl::Var(VarDecl { typ, id }))
        }
    }

    /// varDecl ::= type id ';' | 'struct' id id ';'
    fn parse_var_decl(&mut self) -> Result<VarDecl, ParseError> {
        let typ = self.parse_type()?;
        let id = self.parse_ident()?;
        self.consume(TokenType::Semicolon, "after variable declaration")?;
        Ok(VarDecl { typ, id })
    }

    /// structDecl ::= 'struct' id '{' varDecl+ '}' ';'
    fn parse_struct_decl(&mut self) -> Result<StructDecl, ParseError> {
        self.consume(TokenType::Struct, "to start a struct declaration")?;
        let id = self.parse_ident()?;
        self.consume(TokenType::LeftBrace, "after struct name")?;

        let mut fields = Vec::new();
        while !self.check(&TokenType::RightBrace) {
            if !self.at_type_start() {
                return Err(self.unexpected("a field declaration"));
            }
            fields.push(Decl::Var(self.parse_var_decl()?));
        }
        if fields.is_empty() {
            return Err(ParseError::syntax_error(
                self.peek().get_span(),
                format!("struct `{}` must declare at least one field", id.name),
            ));
        }

        self.consume(TokenType::RightBrace, "to close struct body")?;
        self.consume(TokenType::Semicolon, "after struct declaration")?;
        Ok(StructDecl { id, fields })
    }

    fn parse_fn_decl(&mut self, return_type: TypeNode, id: Ident) -> Result<FnDecl, ParseError> {
        self.consume(TokenType::LeftParen, "after function name")?;

        let mut formals = Vec::new();
        if !self.check(&TokenType::RightParen) {
            loop {
                let typ = self.parse_type()?;
                let formal_id = self.parse_ident()?;
                formals.push(FormalDecl { typ, id: formal_id });

                if !self.match_token(&TokenType::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenType::RightParen, "after formal parameters")?;

        let body = self.parse_block()?;
        Ok(FnDecl {
            return_type,
            id,
            formals,
            body,
        })
    }

    /// block ::= '{' varDecl* stmt* '}'
    fn parse_block(&mut self) -> Result<Block, ParseError> {
        self.consume(TokenType::LeftBrace, "to open a block")?;

        let mut decls = Vec::new();
        while self.at_type_start() {
            decls.push(Decl::Var(self.parse_var_decl()?));
        }

        let mut stmts = Vec::new();
        while !self.check(&TokenType::RightBrace) {
            if self.check(&TokenType::Eof) {
                return Err(self.unexpected("`}`"));
            }
            stmts.push(self.parse_statement()?);
        }

        self.consume(TokenType::RightBrace, "to close a block")?;
        Ok(Block::new(decls, stmts))
    }

    fn parse_type(&mut self) -> Result<TypeNode, ParseError> {
        match self.peek().token_type {
            TokenType::Int => {
                self.advance();
                Ok(TypeNode::Int)
            }
            TokenType::Bool => {
                self.advance();
                Ok(TypeNode::Bool)
            }
            TokenType::Void => {
                self.advance();
                Ok(TypeNode::Void)
            }
            TokenType::Struct => {
                self.advance();
                Ok(TypeNode::Struct(self.parse_ident()?))
            }
            _ => Err(self.unexpected("a type")),
        }
    }

    fn parse_ident(&mut self) -> Result<Ident, ParseError> {
        let span = self.peek().get_span();
        match self.peek().token_type.clone() {
            TokenType::Identifier(name) => {
                self.advance();
                Ok(Ident::new(name, span))
            }
            _ => Err(self.unexpected("an identifier")),
        }
    }

    fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        match self.peek().token_type {
            TokenType::Cin => {
                self.advance();
                self.consume(TokenType::ReadOp, "after `cin`")?;
                let target = self.parse_loc()?;
                self.consume(TokenType::Semicolon, "after read statement")?;
                Ok(Stmt::Read(target))
            }
            TokenType::Cout => {
                self.advance();
                self.consume(TokenType::WriteOp, "after `cout`")?;
                let value = self.parse_expression()?;
                self.consume(TokenType::Semicolon, "after write statement")?;
                Ok(Stmt::Write(value))
            }
            TokenType::If => {
                self.advance();
                let cond = self.parse_condition()?;
                let then_body = self.parse_block()?;
                if self.match_token(&TokenType::Else) {
                    let else_body = self.parse_block()?;
                    Ok(Stmt::IfElse {
                        cond,
                        then_body,
                        else_body,
                    })
                } else {
                    Ok(Stmt::If { cond, body: then_body })
                }
            }
            TokenType::While => {
                self.advance();
                let cond = self.parse_condition()?;
                let body = self.parse_block()?;
                Ok(Stmt::While { cond, body })
            }
            TokenType::Return => {
                self.advance();
                let value = if self.check(&TokenType::Semicolon) {
                    None
                } else {
                    Some(self.parse_expression()?)
                };
                self.consume(TokenType::Semicolon, "after return statement")?;
                Ok(Stmt::Return(value))
            }
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_condition(&mut self) -> Result<Expr, ParseError> {
        self.consume(TokenType::LeftParen, "before condition")?;
        let cond = self.parse_expression()?;
        self.consume(TokenType::RightParen, "after condition")?;
        Ok(cond)
    }

    /// Assignments, `loc++`, `loc--` and calls.
    fn parse_expression_statement(&mut self) -> Result<Stmt, ParseError> {
        let start = self.peek().get_span();
        let expr = self.parse_expression()?;

        let stmt = match expr {
            Expr::Assign { .. } => Stmt::Assign(expr),
            Expr::Call(call) => Stmt::Call(call),
            loc @ (Expr::Id(_) | Expr::DotAccess { .. }) => {
                if self.match_token(&TokenType::PlusPlus) {
                    Stmt::PostInc(loc)
                } else if self.match_token(&TokenType::MinusMinus) {
                    Stmt::PostDec(loc)
                } else {
                    return Err(self.unexpected("`=`, `++` or `--`"));
                }
            }
            _ => {
                return Err(ParseError::invalid_expression(
                    start,
                    "expression cannot be used as a statement".to_string(),
                ))
            }
        };

        self.consume(TokenType::Semicolon, "after statement")?;
        Ok(stmt)
    }

    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> Result<Expr, ParseError> {
        let lhs = self.parse_or()?;

        if self.check(&TokenType::Equal) {
            let span = self.peek().get_span();
            self.advance();
            if !matches!(lhs, Expr::Id(_) | Expr::DotAccess { .. }) {
                return Err(ParseError::invalid_expression(
                    span,
                    "left side of `=` must be a name or field access".to_string(),
                ));
            }
            let rhs = self.parse_assignment()?;
            return Ok(Expr::new_assign(lhs, rhs));
        }

        Ok(lhs)
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_and()?;
        while self.match_token(&TokenType::OrOr) {
            let rhs = self.parse_and()?;
            expr = Expr::new_binary(BinaryOp::Or, expr, rhs);
        }
        Ok(expr)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_relational()?;
        while self.match_token(&TokenType::AndAnd) {
            let rhs = self.parse_relational()?;
            expr = Expr::new_binary(BinaryOp::And, expr, rhs);
        }
        Ok(expr)
    }

    /// Relational and equality operators do not chain.
    fn parse_relational(&mut self) -> Result<Expr, ParseError> {
        let lhs = self.parse_additive()?;

        let Some(op) = self.relational_op() else {
            return Ok(lhs);
        };
        self.advance();
        let rhs = self.parse_additive()?;

        if self.relational_op().is_some() {
            return Err(ParseError::invalid_expression(
                self.peek().get_span(),
                "comparison operators cannot be chained".to_string(),
            ));
        }

        Ok(Expr::new_binary(op, lhs, rhs))
    }

    fn relational_op(&self) -> Option<BinaryOp> {
        let op = match self.peek().token_type {
            TokenType::EqualEqual => BinaryOp::Equals,
            TokenType::BangEqual => BinaryOp::NotEquals,
            TokenType::Less => BinaryOp::Less,
            TokenType::Greater => BinaryOp::Greater,
            TokenType::LessEqual => BinaryOp::LessEq,
            TokenType::GreaterEqual => BinaryOp::GreaterEq,
            _ => return None,
        };
        Some(op)
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_multiplicative()?;
        loop {
            let op = match self.peek().token_type {
                TokenType::Plus => BinaryOp::Plus,
                TokenType::Minus => BinaryOp::Minus,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_multiplicative()?;
            expr = Expr::new_binary(op, expr, rhs);
        }
        Ok(expr)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_unary()?;
        loop {
            let op = match self.peek().token_type {
                TokenType::Star => BinaryOp::Times,
                TokenType::Slash => BinaryOp::Divide,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_unary()?;
            expr = Expr::new_binary(op, expr, rhs);
        }
        Ok(expr)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if self.match_token(&TokenType::Bang) {
            let operand = self.parse_unary()?;
            return Ok(Expr::new_unary(UnaryOp::Not, operand));
        }
        if self.match_token(&TokenType::Minus) {
            let operand = self.parse_unary()?;
            return Ok(Expr::new_unary(UnaryOp::Neg, operand));
        }
        self.parse_term()
    }

    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        let token = self.peek().clone();
        let span = token.get_span();

        match token.token_type {
            TokenType::IntLiteral(value) => {
                self.advance();
                Ok(Expr::IntLit { span, value })
            }
            TokenType::StringLiteral(value) => {
                self.advance();
                Ok(Expr::StrLit { span, value })
            }
            TokenType::True => {
                self.advance();
                Ok(Expr::True(span))
            }
            TokenType::False => {
                self.advance();
                Ok(Expr::False(span))
            }
            TokenType::LeftParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.consume(TokenType::RightParen, "after parenthesized expression")?;
                Ok(expr)
            }
            TokenType::Identifier(_) => {
                if *self.peek_at(1) == TokenType::LeftParen {
                    self.parse_call().map(Expr::Call)
                } else {
                    self.parse_loc()
                }
            }
            _ => Err(ParseError::invalid_expression(
                span,
                format!("expected an expression, found {}", token.token_type.describe()),
            )),
        }
    }

    /// call ::= id '(' [exp (',' exp)*] ')'
    fn parse_call(&mut self) -> Result<CallExpr, ParseError> {
        let callee = self.parse_ident()?;
        self.consume(TokenType::LeftParen, "after function name")?;

        let mut args = Vec::new();
        if !self.check(&TokenType::RightParen) {
            loop {
                args.push(self.parse_expression()?);
                if !self.match_token(&TokenType::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenType::RightParen, "after call arguments")?;
        Ok(CallExpr { callee, args })
    }

    /// loc ::= id | loc '.' id
    fn parse_loc(&mut self) -> Result<Expr, ParseError> {
        let mut loc = Expr::Id(self.parse_ident()?);
        while self.match_token(&TokenType::Dot) {
            let field = self.parse_ident()?;
            loc = Expr::new_dot(loc, field);
        }
        Ok(loc)
    }

    fn at_type_start(&self) -> bool {
        matches!(
            self.peek().token_type,
            TokenType::Int | TokenType::Bool | TokenType::Void | TokenType::Struct
        )
    }

    fn consume(&mut self, expected: TokenType, context: &str) -> Result<&Token, ParseError> {
        if self.check(&expected) {
            return Ok(self.advance());
        }
        Err(self.unexpected(&format!("`{}` {}", expected, context)))
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let token = self.peek();
        ParseError::unexpected_token(
            token.get_span(),
            format!("expected {}, found {}", expected, token.token_type.describe()),
        )
    }

    fn match_token(&mut self, token_type: &TokenType) -> bool {
        if self.check(token_type) {
            self.advance();
            return true;
        }
        false
    }

    fn check(&self, token_type: &TokenType) -> bool {
        &self.peek().token_type == token_type
    }

    fn peek(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.position.min(last)]
    }

    fn peek_at(&self, offset: usize) -> &TokenType {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.position + offset).min(last)].token_type
    }

    fn advance(&mut self) -> &Token {
        let index = self.position.min(self.tokens.len() - 1);
        if !self.tokens[index].is_eof() {
            self.position += 1;
        }
        &self.tokens[index]
    }
}

/// Scan and parse `source` in one step.
pub fn parse_source(source: &str) -> Result<Program, ParseError> {
    Parser::from_source(source).parse_program()
}
