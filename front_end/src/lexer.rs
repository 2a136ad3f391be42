use tracing::{trace, warn};

use crate::error::ScanError;
use crate::source_location::Span;
use crate::token::{Token, TokenType};

pub struct Lexer {
    source: Vec<char>,
    tokens: Vec<Token>,
    errors: Vec<ScanError>,
    start: usize,
    current: usize,
    line: usize,
    column: usize,
    start_column: usize,
}

impl Lexer {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into().chars().collect(),
            tokens: Vec::new(),
            errors: Vec::new(),
            start: 0,
            current: 0,
            line: 1,
            column: 1,
            start_column: 1,
        }
    }

    /// Scan the whole input. The last token is always `Eof`.
    pub fn scan_tokens(&mut self) -> Vec<Token> {
        while !self.is_at_end() {
            self.start = self.current;
            self.start_column = self.column;
            self.scan_token();
        }

        self.tokens.push(Token::new(TokenType::Eof, "", self.line, self.column));
        trace!(count = self.tokens.len(), "scanned tokens");
        std::mem::take(&mut self.tokens)
    }

    pub fn errors(&self) -> &[ScanError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        self.errors.iter().any(ScanError::is_error)
    }

    fn scan_token(&mut self) {
        let c = self.advance();
        match c {
            ' ' | '\t' | '\r' => {}
            '\n' => self.newline(),
            '{' => self.add_token(TokenType::LeftBrace),
            '}' => self.add_token(TokenType::RightBrace),
            '(' => self.add_token(TokenType::LeftParen),
            ')' => self.add_token(TokenType::RightParen),
            ';' => self.add_token(TokenType::Semicolon),
            ',' => self.add_token(TokenType::Comma),
            '.' => self.add_token(TokenType::Dot),
            '*' => self.add_token(TokenType::Star),
            '#' => self.skip_comment(),
            '/' => {
                if self.match_char('/') {
                    self.skip_comment();
                } else {
                    self.add_token(TokenType::Slash);
                }
            }
            '+' => {
                let token_type = if self.match_char('+') {
                    TokenType::PlusPlus
                } else {
                    TokenType::Plus
                };
                self.add_token(token_type);
            }
            '-' => {
                let token_type = if self.match_char('-') {
                    TokenType::MinusMinus
                } else {
                    TokenType::Minus
                };
                self.add_token(token_type);
            }
            '!' => {
                let token_type = if self.match_char('=') {
                    TokenType::BangEqual
                } else {
                    TokenType::Bang
                };
                self.add_token(token_type);
            }
            '=' => {
                let token_type = if self.match_char('=') {
                    TokenType::EqualEqual
                } else {
                    TokenType::Equal
                };
                self.add_token(token_type);
            }
            '<' => {
                let token_type = if self.match_char('<') {
                    TokenType::WriteOp
                } else if self.match_char('=') {
                    TokenType::LessEqual
                } else {
                    TokenType::Less
                };
                self.add_token(token_type);
            }
            '>' => {
                let token_type = if self.match_char('>') {
                    TokenType::ReadOp
                } else if self.match_char('=') {
                    TokenType::GreaterEqual
                } else {
                    TokenType::Greater
                };
                self.add_token(token_type);
            }
            '&' => {
                if self.match_char('&') {
                    self.add_token(TokenType::AndAnd);
                } else {
                    self.illegal_character(c);
                }
            }
            '|' => {
                if self.match_char('|') {
                    self.add_token(TokenType::OrOr);
                } else {
                    self.illegal_character(c);
                }
            }
            '"' => self.scan_string(),
            c if c.is_ascii_digit() => self.scan_number(),
            c if c.is_ascii_alphabetic() || c == '_' => self.scan_keyword(),
            c => self.illegal_character(c),
        }
    }

    fn scan_keyword(&mut self) {
        while self.is_alphanumeric(self.peek()) {
            self.advance();
        }

        let text = self.lexeme();
        let token_type = TokenType::keyword(&text).unwrap_or(TokenType::Identifier(text));
        self.add_token(token_type);
    }

    fn scan_number(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        let text = self.lexeme();
        let value = match text.parse::<i32>() {
            Ok(value) => value,
            Err(_) => {
                let span = self.current_span();
                warn!(%span, literal = %text, "integer literal too large");
                self.errors.push(ScanError::warning(
                    span,
                    "integer literal too large; using max value",
                ));
                i32::MAX
            }
        };
        self.add_token(TokenType::IntLiteral(value));
    }

    fn scan_string(&mut self) {
        let mut bad_escape = false;

        loop {
            if self.is_at_end() || self.peek() == '\n' {
                // Unterminated; the newline itself is left for scan_token.
                let message = if bad_escape {
                    "unterminated string literal with bad escaped character ignored"
                } else {
                    "unterminated string literal ignored"
                };
                self.errors.push(ScanError::error(self.current_span(), message));
                return;
            }

            match self.advance() {
                '"' => break,
                '\\' => {
                    if self.is_at_end() || self.peek() == '\n' {
                        bad_escape = true;
                    } else if !matches!(self.advance(), 'n' | 't' | '\'' | '"' | '?' | '\\') {
                        bad_escape = true;
                    }
                }
                _ => {}
            }
        }

        if bad_escape {
            self.errors.push(ScanError::error(
                self.current_span(),
                "string literal with bad escaped character ignored",
            ));
            return;
        }

        let text = self.lexeme();
        self.add_token(TokenType::StringLiteral(text));
    }

    fn skip_comment(&mut self) {
        while self.peek() != '\n' && !self.is_at_end() {
            self.advance();
        }
    }

    fn illegal_character(&mut self, c: char) {
        let span = Span::point(self.line, self.start_column);
        self.errors.push(ScanError::error(span, format!("illegal character ignored: {}", c)));
    }

    fn add_token(&mut self, token_type: TokenType) {
        let text = self.lexeme();
        self.tokens.push(Token::new(token_type, &text, self.line, self.start_column));
    }

    fn lexeme(&self) -> String {
        self.source[self.start..self.current].iter().collect()
    }

    fn current_span(&self) -> Span {
        let end_column = self.column.saturating_sub(1).max(self.start_column);
        Span::new(self.line, self.start_column, self.line, end_column)
    }

    fn newline(&mut self) {
        self.line += 1;
        self.column = 1;
    }

    fn advance(&mut self) -> char {
        let c = self.source[self.current];
        self.current += 1;
        self.column += 1;
        c
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() != expected {
            return false;
        }
        self.advance();
        true
    }

    fn peek(&self) -> char {
        self.source.get(self.current).copied().unwrap_or('\0')
    }

    fn is_alphanumeric(&self, c: char) -> bool {
        c.is_ascii_alphanumeric() || c == '_'
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }
}

/// Scan `source`, returning the tokens together with any scan problems.
pub fn tokenize(source: &str) -> (Vec<Token>, Vec<ScanError>) {
    let mut lexer = Lexer::new(source);
    let tokens = lexer.scan_tokens();
    (tokens, lexer.errors)
}
