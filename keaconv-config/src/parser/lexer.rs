//! Lexer for ISC DHCP configuration files
//!
//! Tokenizes dhcpd.conf style sources.
//!
//! Key features:
//! - Free form: whitespace and newlines are insignificant
//! - `#` comments run to the end of the line (skipped)
//! - Words are classified after matching: keyword, number, hex-looking
//!   number-or-name, or plain name
//! - A trailing `Eof` token is always present

use crate::parser::keyword::Keyword;
use logos::{Logos, Span};
use std::fmt;

/// Source location for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Location {
    pub start: usize,
    pub end: usize,
}

impl From<Span> for Location {
    fn from(span: Span) -> Self {
        Self {
            start: span.start,
            end: span.end,
        }
    }
}

/// A token with its location in the source
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub value: T,
    pub span: Location,
}

impl<T> Spanned<T> {
    pub fn new(value: T, span: impl Into<Location>) -> Self {
        Self {
            value,
            span: span.into(),
        }
    }
}

/// Raw lexemes, before word classification
#[derive(Logos, Debug, Clone, PartialEq)]
enum Lexeme {
    #[regex(r"[ \t\r\n\f]+", logos::skip)]
    Whitespace,

    #[regex(r"#[^\n]*", logos::skip)]
    Comment,

    // ============================================================
    // Punctuation
    // ============================================================
    #[token(";")]
    Semicolon,
    #[token("{")]
    BraceOpen,
    #[token("}")]
    BraceClose,
    #[token("(")]
    ParenOpen,
    #[token(")")]
    ParenClose,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token(":")]
    Colon,
    #[token("=")]
    #[token("==")]
    Equal,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,
    #[token("&")]
    Ampersand,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Asterisk,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,

    // ============================================================
    // Values
    // ============================================================

    /// Quoted string literal: "..."
    #[regex(r#""([^"\\]|\\.)*""#, |lex| {
        let s = lex.slice();
        unescape_string(&s[1..s.len()-1])
    })]
    QuotedString(String),

    /// Negative decimal number
    #[regex(r"-[0-9]+", |lex| lex.slice().to_string())]
    Negative(String),

    /// Names, numbers and keywords
    #[regex(r"[0-9A-Za-z_][0-9A-Za-z_\-]*", |lex| lex.slice().to_string())]
    Word(String),
}

/// Token types
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Keyword(Keyword),
    /// Identifier that is neither a keyword nor hex-looking
    Name(String),
    /// Decimal digits, optionally negative, or `0x` prefixed hex
    Number(String),
    /// Only hex digits, at least one letter: a number or a name
    NumberOrName(String),
    /// Quoted string, unescaped
    String(String),

    Semicolon,
    BraceOpen,
    BraceClose,
    ParenOpen,
    ParenClose,
    Comma,
    Dot,
    Colon,
    Equal,
    Bang,
    Tilde,
    Ampersand,
    Pipe,
    Caret,
    Plus,
    Minus,
    Asterisk,
    Slash,
    Percent,

    Eof,
}

impl Token {
    /// Keywords, names and number-or-names are identifiers
    pub fn is_identifier(&self) -> bool {
        matches!(
            self,
            Token::Keyword(_) | Token::Name(_) | Token::NumberOrName(_)
        )
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self, Token::Keyword(k) if *k == keyword)
    }

    fn from_lexeme(lexeme: Lexeme) -> Option<Token> {
        let token = match lexeme {
            Lexeme::Whitespace | Lexeme::Comment => return None,
            Lexeme::Semicolon => Token::Semicolon,
            Lexeme::BraceOpen => Token::BraceOpen,
            Lexeme::BraceClose => Token::BraceClose,
            Lexeme::ParenOpen => Token::ParenOpen,
            Lexeme::ParenClose => Token::ParenClose,
            Lexeme::Comma => Token::Comma,
            Lexeme::Dot => Token::Dot,
            Lexeme::Colon => Token::Colon,
            Lexeme::Equal => Token::Equal,
            Lexeme::Bang => Token::Bang,
            Lexeme::Tilde => Token::Tilde,
            Lexeme::Ampersand => Token::Ampersand,
            Lexeme::Pipe => Token::Pipe,
            Lexeme::Caret => Token::Caret,
            Lexeme::Plus => Token::Plus,
            Lexeme::Minus => Token::Minus,
            Lexeme::Asterisk => Token::Asterisk,
            Lexeme::Slash => Token::Slash,
            Lexeme::Percent => Token::Percent,
            Lexeme::QuotedString(s) => Token::String(s),
            Lexeme::Negative(s) => Token::Number(s),
            Lexeme::Word(word) => classify_word(word),
        };
        Some(token)
    }
}

fn classify_word(word: String) -> Token {
    if let Some(keyword) = Keyword::lookup(&word) {
        return Token::Keyword(keyword);
    }
    let hex_prefixed = word.len() > 2
        && (word.starts_with("0x") || word.starts_with("0X"))
        && word[2..].bytes().all(|b| b.is_ascii_hexdigit());
    if word.bytes().all(|b| b.is_ascii_digit()) || hex_prefixed {
        Token::Number(word)
    } else if word.bytes().all(|b| b.is_ascii_hexdigit()) {
        Token::NumberOrName(word)
    } else {
        Token::Name(word)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Keyword(k) => write!(f, "{}", k.as_str()),
            Token::Name(s) | Token::Number(s) | Token::NumberOrName(s) => write!(f, "{}", s),
            Token::String(s) => write!(f, "\"{}\"", s),
            Token::Semicolon => write!(f, ";"),
            Token::BraceOpen => write!(f, "{{"),
            Token::BraceClose => write!(f, "}}"),
            Token::ParenOpen => write!(f, "("),
            Token::ParenClose => write!(f, ")"),
            Token::Comma => write!(f, ","),
            Token::Dot => write!(f, "."),
            Token::Colon => write!(f, ":"),
            Token::Equal => write!(f, "="),
            Token::Bang => write!(f, "!"),
            Token::Tilde => write!(f, "~"),
            Token::Ampersand => write!(f, "&"),
            Token::Pipe => write!(f, "|"),
            Token::Caret => write!(f, "^"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Asterisk => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Percent => write!(f, "%"),
            Token::Eof => write!(f, "end of file"),
        }
    }
}

/// Unescape a string literal
fn unescape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => result.push('\n'),
                Some('r') => result.push('\r'),
                Some('t') => result.push('\t'),
                Some('\\') => result.push('\\'),
                Some('"') => result.push('"'),
                Some(c) => {
                    result.push('\\');
                    result.push(c);
                }
                None => result.push('\\'),
            }
        } else {
            result.push(c);
        }
    }

    result
}

/// Lexer result type
pub type LexResult = Result<Vec<Spanned<Token>>, LexError>;

/// Lexer error
#[derive(Debug, Clone, thiserror::Error)]
pub enum LexError {
    #[error("Unexpected character at position {position}")]
    UnexpectedChar { position: usize },
}

/// Tokenize a configuration source string
pub fn tokenize(source: &str) -> LexResult {
    let lexer = Lexeme::lexer(source);
    let mut tokens = Vec::new();

    for (result, span) in lexer.spanned() {
        match result {
            Ok(lexeme) => {
                if let Some(token) = Token::from_lexeme(lexeme) {
                    tokens.push(Spanned::new(token, span));
                }
            }
            Err(_) => return Err(LexError::UnexpectedChar { position: span.start }),
        }
    }

    let end = source.len();
    tokens.push(Spanned::new(Token::Eof, Location { start: end, end }));
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source).unwrap().into_iter().map(|t| t.value).collect()
    }

    #[test]
    fn test_statement() {
        let tokens = kinds("option routers 10.0.0.1;");
        assert_eq!(
            tokens,
            vec![
                Token::Keyword(Keyword::Option),
                Token::Name("routers".to_string()),
                Token::Number("10".to_string()),
                Token::Dot,
                Token::Number("0".to_string()),
                Token::Dot,
                Token::Number("0".to_string()),
                Token::Dot,
                Token::Number("1".to_string()),
                Token::Semicolon,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_word_classification() {
        let tokens = kinds("aa 0x1F -12 beef-cake IF");
        assert_eq!(tokens[0], Token::NumberOrName("aa".to_string()));
        assert_eq!(tokens[1], Token::Number("0x1F".to_string()));
        assert_eq!(tokens[2], Token::Number("-12".to_string()));
        assert_eq!(tokens[3], Token::Name("beef-cake".to_string()));
        assert_eq!(tokens[4], Token::Keyword(Keyword::If));
        assert!(tokens[0].is_identifier());
        assert!(!tokens[1].is_identifier());
    }

    #[test]
    fn test_operators_and_comments() {
        let tokens = kinds("a == b # trailing\n!= ~~ - 1");
        assert_eq!(tokens[1], Token::Equal);
        assert_eq!(tokens[3], Token::Bang);
        assert_eq!(tokens[4], Token::Equal);
        assert_eq!(tokens[5], Token::Tilde);
        assert_eq!(tokens[6], Token::Tilde);
        assert_eq!(tokens[7], Token::Minus);
        assert_eq!(tokens[8], Token::Number("1".to_string()));
    }

    #[test]
    fn test_quoted_string() {
        let tokens = kinds(r#""a \"quoted\" word""#);
        assert_eq!(tokens[0], Token::String("a \"quoted\" word".to_string()));
    }

    #[test]
    fn test_spans() {
        let tokens = tokenize("ab:cd").unwrap();
        assert_eq!(tokens[0].span, Location { start: 0, end: 2 });
        assert_eq!(tokens[1].span, Location { start: 2, end: 3 });
        assert_eq!(tokens[3].value, Token::Eof);
    }

    #[test]
    fn test_unexpected_char() {
        assert!(matches!(
            tokenize("option $x;"),
            Err(LexError::UnexpectedChar { position: 7 })
        ));
    }
}
