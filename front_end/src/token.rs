use std::fmt;

#[derive(Debug, PartialEq, Clone)]
pub enum TokenType {
    // Reserved words
    Bool, Int, Void, True, False, Struct,
    Cin, Cout, If, Else, While, Return,

    Identifier(String),
    IntLiteral(i32),
    StringLiteral(String),  // Keeps the quotes and escapes as written

    // Single-character tokens
    LeftBrace, RightBrace, LeftParen, RightParen,
    Semicolon, Comma, Dot,
    Plus, Minus, Star, Slash,
    Bang, // '!'
    Less, Greater,
    Equal, // '='

    // Two-character tokens
    WriteOp, ReadOp, // '<<', '>>'
    PlusPlus, MinusMinus, // '++', '--'
    AndAnd, OrOr, // '&&', '||'
    EqualEqual, BangEqual, // '==', '!='
    LessEqual, GreaterEqual, // '<=', '>='

    Eof,
}

impl TokenType {
    /// Map a scanned word onto its reserved-word token, if it is one.
    pub fn keyword(word: &str) -> Option<TokenType> {
        let token_type = match word {
            "bool" => TokenType::Bool,
            "int" => TokenType::Int,
            "void" => TokenType::Void,
            "true" => TokenType::True,
            "false" => TokenType::False,
            "struct" => TokenType::Struct,
            "cin" => TokenType::Cin,
            "cout" => TokenType::Cout,
            "if" => TokenType::If,
            "else" => TokenType::Else,
            "while" => TokenType::While,
            "return" => TokenType::Return,
            _ => return None,
        };
        Some(token_type)
    }

    /// Human-readable name used in parser error messages.
    pub fn describe(&self) -> String {
        match self {
            TokenType::Identifier(name) => format!("identifier `{}`", name),
            TokenType::IntLiteral(value) => format!("integer literal `{}`", value),
            TokenType::StringLiteral(value) => format!("string literal {}", value),
            TokenType::Eof => "end of file".to_string(),
            other => format!("`{}`", other),
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenType::Bool => "bool",
            TokenType::Int => "int",
            TokenType::Void => "void",
            TokenType::True => "true",
            TokenType::False => "false",
            TokenType::Struct => "struct",
            TokenType::Cin => "cin",
            TokenType::Cout => "cout",
            TokenType::If => "if",
            TokenType::Else => "else",
            TokenType::While => "while",
            TokenType::Return => "return",
            TokenType::Identifier(name) => return write!(f, "{}", name),
            TokenType::IntLiteral(value) => return write!(f, "{}", value),
            TokenType::StringLiteral(value) => return write!(f, "{}", value),
            TokenType::LeftBrace => "{",
            TokenType::RightBrace => "}",
            TokenType::LeftParen => "(",
            TokenType::RightParen => ")",
            TokenType::Semicolon => ";",
            TokenType::Comma => ",",
            TokenType::Dot => ".",
            TokenType::Plus => "+",
            TokenType::Minus => "-",
            TokenType::Star => "*",
            TokenType::Slash => "/",
            TokenType::Bang => "!",
            TokenType::Less => "<",
            TokenType::Greater => ">",
            TokenType::Equal => "=",
            TokenType::WriteOp => "<<",
            TokenType::ReadOp => ">>",
            TokenType::PlusPlus => "++",
            TokenType::MinusMinus => "--",
            TokenType::AndAnd => "&&",
            TokenType::OrOr => "||",
            TokenType::EqualEqual => "==",
            TokenType::BangEqual => "!=",
            TokenType::LessEqual => "<=",
            TokenType::GreaterEqual => ">=",
            TokenType::Eof => "EOF",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub token_type: TokenType,
    pub lexeme: String,
    pub line: usize,
    pub column: usize,
    pub length: usize,
}

impl Token {
    pub fn new(token_type: TokenType, lexeme: &str, line: usize, column: usize) -> Self {
        Self {
            token_type,
            lexeme: lexeme.to_string(),
            line,
            column,
            length: lexeme.chars().count(),
        }
    }

    pub fn is_eof(&self) -> bool {
        self.token_type == TokenType::Eof
    }
}

/// Token dump format: `<lexeme> : <line> : <column>`.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {} : {}", self.token_type, self.line, self.column)
    }
}
