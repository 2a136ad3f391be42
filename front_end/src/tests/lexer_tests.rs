use crate::error::DiagnosticLevel;
use crate::lexer::{tokenize, Lexer};
use crate::token::TokenType;

fn token_types(source: &str) -> Vec<TokenType> {
    let (tokens, _) = tokenize(source);
    tokens.into_iter().map(|token| token.token_type).collect()
}

#[test]
fn test_reserved_words() {
    let types = token_types("bool int void true false struct cin cout if else while return");

    assert_eq!(
        types,
        vec![
            TokenType::Bool,
            TokenType::Int,
            TokenType::Void,
            TokenType::True,
            TokenType::False,
            TokenType::Struct,
            TokenType::Cin,
            TokenType::Cout,
            TokenType::If,
            TokenType::Else,
            TokenType::While,
            TokenType::Return,
            TokenType::Eof,
        ]
    );
}

#[test]
fn test_identifiers_are_not_keywords() {
    let types = token_types("integer _tmp while2 Int");

    assert_eq!(types[0], TokenType::Identifier("integer".to_string()));
    assert_eq!(types[1], TokenType::Identifier("_tmp".to_string()));
    assert_eq!(types[2], TokenType::Identifier("while2".to_string()));
    // Reserved words are case sensitive
    assert_eq!(types[3], TokenType::Identifier("Int".to_string()));
}

#[test]
fn test_operators_prefer_longest_match() {
    let types = token_types("<< >> ++ -- && || == != <= >= < > = ! + - * /");

    assert_eq!(
        types,
        vec![
            TokenType::WriteOp,
            TokenType::ReadOp,
            TokenType::PlusPlus,
            TokenType::MinusMinus,
            TokenType::AndAnd,
            TokenType::OrOr,
            TokenType::EqualEqual,
            TokenType::BangEqual,
            TokenType::LessEqual,
            TokenType::GreaterEqual,
            TokenType::Less,
            TokenType::Greater,
            TokenType::Equal,
            TokenType::Bang,
            TokenType::Plus,
            TokenType::Minus,
            TokenType::Star,
            TokenType::Slash,
            TokenType::Eof,
        ]
    );
}

#[test]
fn test_positions_are_one_based() {
    let mut lexer = Lexer::new("int x;\n  while (x) {}");
    let tokens = lexer.scan_tokens();

    assert_eq!((tokens[0].line, tokens[0].column), (1, 1), "int");
    assert_eq!((tokens[1].line, tokens[1].column), (1, 5), "x");
    assert_eq!((tokens[2].line, tokens[2].column), (1, 6), ";");
    assert_eq!((tokens[3].line, tokens[3].column), (2, 3), "while");
    assert_eq!((tokens[4].line, tokens[4].column), (2, 9), "(");
    assert_eq!(tokens[3].length, 5);
}

#[test]
fn test_eof_is_always_last() {
    let mut lexer = Lexer::new("");
    let tokens = lexer.scan_tokens();

    assert_eq!(tokens.len(), 1);
    assert!(tokens[0].is_eof());
    assert_eq!(tokens[0].to_string(), "EOF : 1 : 1");
}

#[test]
fn test_token_dump_format() {
    let mut lexer = Lexer::new("\n\n    while");
    let tokens = lexer.scan_tokens();

    assert_eq!(tokens[0].to_string(), "while : 3 : 5");
}

#[test]
fn test_comments_produce_no_tokens() {
    let source = "// a comment\n# another one\nint // trailing\n";
    let mut lexer = Lexer::new(source);
    let tokens = lexer.scan_tokens();

    assert_eq!(tokens.len(), 2, "only `int` and EOF expected, got {:?}", tokens);
    assert_eq!(tokens[0].token_type, TokenType::Int);
    assert_eq!(tokens[0].line, 3);
    assert!(!lexer.has_errors());
}

#[test]
fn test_division_is_not_a_comment() {
    let types = token_types("a / b");
    assert_eq!(types[1], TokenType::Slash);
}

#[test]
fn test_integer_literals() {
    let types = token_types("0 42 2147483647");

    assert_eq!(types[0], TokenType::IntLiteral(0));
    assert_eq!(types[1], TokenType::IntLiteral(42));
    assert_eq!(types[2], TokenType::IntLiteral(i32::MAX));
}

#[test]
fn test_integer_overflow_is_a_warning() {
    let mut lexer = Lexer::new("99999999999");
    let tokens = lexer.scan_tokens();

    assert_eq!(tokens[0].token_type, TokenType::IntLiteral(i32::MAX));
    assert_eq!(lexer.errors().len(), 1);
    assert_eq!(lexer.errors()[0].level, DiagnosticLevel::Warning);
    assert_eq!(lexer.errors()[0].message, "integer literal too large; using max value");
    assert!(!lexer.has_errors(), "a warning alone is not an error");
}

#[test]
fn test_string_literal_keeps_quotes_and_escapes() {
    let types = token_types(r#"cout << "hi\n\t\"there\"";"#);

    assert_eq!(
        types[2],
        TokenType::StringLiteral(r#""hi\n\t\"there\"""#.to_string())
    );
    assert_eq!(types[3], TokenType::Semicolon);
}

#[test]
fn test_unterminated_string() {
    let (tokens, errors) = tokenize("\"abc\nint");

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "unterminated string literal ignored");
    assert_eq!((errors[0].span.line(), errors[0].span.column()), (1, 1));
    // Scanning resumes on the next line
    assert_eq!(tokens[0].token_type, TokenType::Int);
    assert_eq!(tokens[0].line, 2);
}

#[test]
fn test_nul_character_inside_string() {
    let (tokens, errors) = tokenize("\"a\0b\";");

    assert!(errors.is_empty(), "{:?}", errors);
    assert_eq!(tokens[0].token_type, TokenType::StringLiteral("\"a\0b\"".to_string()));
    assert_eq!(tokens[1].token_type, TokenType::Semicolon);
}

#[test]
fn test_bad_escape_in_string() {
    let (tokens, errors) = tokenize(r#""a\qb" x"#);

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "string literal with bad escaped character ignored");
    assert_eq!(tokens[0].token_type, TokenType::Identifier("x".to_string()));
}

#[test]
fn test_unterminated_string_with_bad_escape() {
    let (_, errors) = tokenize(r#""a\q"#);

    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].message,
        "unterminated string literal with bad escaped character ignored"
    );
}

#[test]
fn test_illegal_characters_are_skipped() {
    let (tokens, errors) = tokenize("x @ y & z");

    let names: Vec<_> = tokens
        .iter()
        .filter_map(|token| match &token.token_type {
            TokenType::Identifier(name) => Some(name.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(names, vec!["x", "y", "z"]);

    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].message, "illegal character ignored: @");
    assert_eq!(errors[1].message, "illegal character ignored: &");
    assert_eq!(errors[0].to_string(), "1:3 ***ERROR*** illegal character ignored: @");
}
