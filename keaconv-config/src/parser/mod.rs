//! Parser module for ISC DHCP configurations
//!
//! This module provides the lexer, token stream, expression and statement
//! parsers, and the declaration driver producing the Kea element tree.

mod aggregate;
pub mod context;
mod declarations;
mod expression;
pub mod keyword;
pub mod lexer;
pub mod numeric;
mod options;
#[allow(clippy::module_inception)]
mod parser;
mod primary;
mod rewriter;
pub mod scope;
mod statement;
pub mod stream;

pub use aggregate::{hex_string, Aggregate};
pub use context::{classify, Context};
pub use expression::BinaryOp;
pub use keyword::Keyword;
pub use lexer::{tokenize, LexError, Location, Spanned, Token};
pub use options::OptionVariant;
pub use parser::{parse, ParseError, ParseResult, Parser, StatementOutcome, Translation};
pub use scope::{DeclStack, FrameKind};
