//! ISC DHCP configuration parser
//!
//! Recursive descent parser that turns tokens into an annotated element
//! tree. The grammar is spread over sibling modules, each adding an
//! `impl Parser` block: literals in `aggregate`, expressions in `primary`
//! and `expression`, executable statements in `statement`, options in
//! `options`, server parameters in `rewriter` and declarations in
//! `declarations`.

use crate::diagnostics::Diagnostic;
use crate::parser::keyword::Keyword;
use crate::parser::lexer::{LexError, Token};
use crate::parser::numeric::NumberError;
use crate::parser::scope::DeclStack;
use crate::parser::stream::{Lexed, TokenStream};
use crate::session::Session;
use keaconv_core::config::TranslateConfig;
use keaconv_core::{Element, Map};
use thiserror::Error;

/// Parser error types
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Lexer error: {0}")]
    Lex(#[from] LexError),

    #[error("Unexpected token at position {position}: expected {expected}, found {found}")]
    UnexpectedToken {
        position: usize,
        expected: String,
        found: String,
    },

    #[error("Unexpected end of file, expected {expected}")]
    UnexpectedEof { expected: String },

    #[error("Invalid syntax at position {position}: {message}")]
    InvalidSyntax { position: usize, message: String },

    #[error("Invalid digit at position {position}: {message}")]
    InvalidDigit { position: usize, message: String },

    #[error("Numeric overflow at position {position}: {message}")]
    Overflow { position: usize, message: String },

    #[error("Too few numbers at position {position}")]
    TooFewElements { position: usize },

    #[error("Expecting a {expected} expression at position {position}")]
    NotAnExpression { position: usize, expected: String },

    #[error("Incompatible operand types at position {position}: {message}")]
    IncompatibleOperandTypes { position: usize, message: String },

    #[error("Unknown option at position {position}: {message}")]
    UnknownOption { position: usize, message: String },

    #[error("No option space named {name} at position {position}")]
    UnknownSpace { position: usize, name: String },

    #[error("{name}: host unknown (position {position})")]
    HostUnknown { position: usize, name: String },

    #[error("Internal error at position {position}: {message}")]
    Internal { position: usize, message: String },
}

impl ParseError {
    /// Byte offset of the error in the source, when known
    pub fn position(&self) -> Option<usize> {
        match self {
            ParseError::Lex(LexError::UnexpectedChar { position }) => Some(*position),
            ParseError::UnexpectedEof { .. } => None,
            ParseError::UnexpectedToken { position, .. }
            | ParseError::InvalidSyntax { position, .. }
            | ParseError::InvalidDigit { position, .. }
            | ParseError::Overflow { position, .. }
            | ParseError::TooFewElements { position }
            | ParseError::NotAnExpression { position, .. }
            | ParseError::IncompatibleOperandTypes { position, .. }
            | ParseError::UnknownOption { position, .. }
            | ParseError::UnknownSpace { position, .. }
            | ParseError::HostUnknown { position, .. }
            | ParseError::Internal { position, .. } => Some(*position),
        }
    }

    pub(crate) fn number(error: NumberError, position: usize) -> Self {
        let message = error.to_string();
        match error {
            NumberError::Bogus { .. } | NumberError::InvalidDigit { .. } => {
                ParseError::InvalidDigit { position, message }
            }
            NumberError::Overflow { .. } => ParseError::Overflow { position, message },
            NumberError::UnsupportedWidth(_) => ParseError::Internal { position, message },
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Result of parsing one statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementOutcome {
    Parsed,
    /// The current token does not start a statement; nothing was consumed
    NotAStatement,
    /// The statement was recognized but dropped, input resynchronized
    Malformed,
}

/// Output of a translation
#[derive(Debug)]
pub struct Translation {
    /// `{"Dhcp4": {...}}` or `{"Dhcp6": {...}}`
    pub root: Element,
    /// Constructs without a Kea equivalent
    pub issues: usize,
    /// Statements dropped after resynchronization
    pub diagnostics: Vec<Diagnostic>,
}

/// Map holding a single `tag` entry, the shape of expression and
/// statement nodes
pub(crate) fn tagged(tag: &str, value: impl Into<Element>) -> Element {
    let mut map = Map::new();
    map.set(tag, value);
    Element::map(map)
}

/// Parser state
pub struct Parser {
    pub(crate) stream: TokenStream,
    pub(crate) session: Session,
    pub(crate) stack: DeclStack,
}

impl Parser {
    /// Create a new parser from source code
    pub fn new(source: &str, session: Session) -> ParseResult<Self> {
        let stream = TokenStream::new(source)?;
        Ok(Self {
            stream,
            session,
            stack: DeclStack::new(),
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    // ========================================
    // Token helpers
    // ========================================

    pub(crate) fn peek(&self) -> &Token {
        self.stream.peek()
    }

    pub(crate) fn peek_keyword(&self, keyword: Keyword) -> bool {
        self.stream.peek().is_keyword(keyword)
    }

    pub(crate) fn position(&self) -> usize {
        self.stream.position()
    }

    /// Consume the current token if it matches
    pub(crate) fn eat(&mut self, token: &Token) -> bool {
        if self.stream.check(token) {
            self.stream.skip();
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_keyword(&mut self, keyword: Keyword) -> bool {
        if self.peek_keyword(keyword) {
            self.stream.skip();
            true
        } else {
            false
        }
    }

    /// Error for the current token, which is not what the grammar wants
    pub(crate) fn unexpected(&self, expected: &str) -> ParseError {
        if self.stream.is_eof() {
            ParseError::UnexpectedEof {
                expected: expected.to_string(),
            }
        } else {
            ParseError::UnexpectedToken {
                position: self.position(),
                expected: expected.to_string(),
                found: self.peek().to_string(),
            }
        }
    }

    pub(crate) fn syntax(&self, message: impl Into<String>) -> ParseError {
        ParseError::InvalidSyntax {
            position: self.position(),
            message: message.into(),
        }
    }

    pub(crate) fn expect(&mut self, expected: Token) -> ParseResult<Lexed> {
        if self.stream.check(&expected) {
            Ok(self.stream.next())
        } else {
            Err(self.unexpected(&format!("'{}'", expected)))
        }
    }

    pub(crate) fn expect_keyword(&mut self, keyword: Keyword) -> ParseResult<()> {
        if self.eat_keyword(keyword) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{}'", keyword.as_str())))
        }
    }

    pub(crate) fn expect_semi(&mut self) -> ParseResult<()> {
        self.expect(Token::Semicolon).map(|_| ())
    }

    pub(crate) fn expect_identifier(&mut self, expected: &str) -> ParseResult<String> {
        if self.peek().is_identifier() {
            Ok(self.stream.next().text)
        } else {
            Err(self.unexpected(expected))
        }
    }

    pub(crate) fn expect_string(&mut self) -> ParseResult<String> {
        match self.peek() {
            Token::String(_) => Ok(self.stream.next().text),
            _ => Err(self.unexpected("string")),
        }
    }

    pub(crate) fn expect_number(&mut self) -> ParseResult<Lexed> {
        match self.peek() {
            Token::Number(_) => Ok(self.stream.next()),
            _ => Err(self.unexpected("number")),
        }
    }

    /// Drop a recognized statement that cannot be completed and resume
    /// after it
    pub(crate) fn resynchronize(&mut self, position: usize, message: &str) -> StatementOutcome {
        self.session.warn(position, message);
        self.session.issue();
        self.stream.skip_to_semi();
        StatementOutcome::Malformed
    }
}

/// Parse and translate a configuration source string
pub fn parse(source: &str, config: &TranslateConfig) -> ParseResult<Translation> {
    let parser = Parser::new(source, Session::from_config(config))?;
    parser.parse_document()
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    #[test]
    fn test_expect_helpers() {
        let mut p = parser("foo \"bar\" 12 ;");
        assert_eq!(p.expect_identifier("name").unwrap(), "foo");
        assert_eq!(p.expect_string().unwrap(), "bar");
        assert_eq!(p.expect_number().unwrap().text, "12");
        assert!(p.expect_semi().is_ok());
        assert!(matches!(p.expect_semi(), Err(ParseError::UnexpectedEof { .. })));
    }

    #[test]
    fn test_unexpected_token_reports_position() {
        let mut p = parser("a b");
        p.stream.skip();
        let err = p.expect_semi().unwrap_err();
        assert_eq!(err.position(), Some(2));
        assert!(err.to_string().contains("found b"));
    }

    #[test]
    fn test_number_error_mapping() {
        let err = ParseError::number(NumberError::UnsupportedWidth(12), 4);
        assert!(matches!(err, ParseError::Internal { position: 4, .. }));
    }

    #[test]
    fn test_parse_entry_point() {
        let translation = parse("default-lease-time 600;", &TranslateConfig::default()).unwrap();
        let dhcp4 = translation.root.as_map().unwrap().get("Dhcp4").unwrap();
        assert_eq!(
            dhcp4.as_map().unwrap().get("valid-lifetime").and_then(Element::as_integer),
            Some(600)
        );
    }
}
