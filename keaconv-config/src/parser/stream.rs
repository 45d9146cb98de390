//! Token stream with one token lookahead and bounded rewind

use crate::parser::lexer::{tokenize, LexError, Location, Spanned, Token};

/// A consumed token together with its text
#[derive(Debug, Clone, PartialEq)]
pub struct Lexed {
    pub token: Token,
    /// Source spelling, or the unescaped value for quoted strings
    pub text: String,
    pub span: Location,
}

/// Cursor over the tokens of one source
pub struct TokenStream {
    source: String,
    tokens: Vec<Spanned<Token>>,
    pos: usize,
    saved: Vec<usize>,
}

impl TokenStream {
    pub fn new(source: &str) -> Result<Self, LexError> {
        let tokens = tokenize(source)?;
        Ok(Self {
            source: source.to_string(),
            tokens,
            pos: 0,
            saved: Vec::new(),
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    fn at(&self, index: usize) -> &Spanned<Token> {
        // tokenize always ends the list with Eof
        let last = self.tokens.len() - 1;
        &self.tokens[index.min(last)]
    }

    pub fn peek(&self) -> &Token {
        &self.at(self.pos).value
    }

    /// Token `n` positions ahead of the current one
    pub fn peek_nth(&self, n: usize) -> &Token {
        &self.at(self.pos + n).value
    }

    pub fn check(&self, token: &Token) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(token)
    }

    /// Text of the current token
    pub fn text(&self) -> &str {
        let spanned = self.at(self.pos);
        match &spanned.value {
            Token::String(s) => s.as_str(),
            Token::Eof => "",
            _ => &self.source[spanned.span.start..spanned.span.end],
        }
    }

    pub fn span(&self) -> Location {
        self.at(self.pos).span
    }

    pub fn position(&self) -> usize {
        self.span().start
    }

    pub fn next(&mut self) -> Lexed {
        let lexed = Lexed {
            token: self.peek().clone(),
            text: self.text().to_string(),
            span: self.span(),
        };
        self.skip();
        lexed
    }

    pub fn skip(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.peek(), Token::Eof)
    }

    /// The current token starts exactly where the previous one ended
    pub fn is_adjacent(&self) -> bool {
        self.pos > 0 && self.at(self.pos - 1).span.end == self.span().start
    }

    // ========================================
    // Rewind
    // ========================================

    pub fn save_state(&mut self) {
        self.saved.push(self.pos);
    }

    pub fn restore_state(&mut self) {
        if let Some(pos) = self.saved.pop() {
            self.pos = pos;
        }
    }

    // ========================================
    // Resynchronization
    // ========================================

    /// Skip past the end of the current statement
    pub fn skip_to_semi(&mut self) {
        self.skip_to_rbrace(0);
    }

    /// Skip past `depth` unmatched closing braces. With a depth of zero the
    /// skip also ends after a `;` seen outside any brace, or after the `}`
    /// closing a block opened during the skip.
    pub fn skip_to_rbrace(&mut self, mut depth: usize) {
        loop {
            match self.peek() {
                Token::Eof => return,
                Token::BraceClose => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        self.skip();
                        return;
                    }
                }
                Token::BraceOpen => depth += 1,
                Token::Semicolon if depth == 0 => {
                    self.skip();
                    return;
                }
                _ => {}
            }
            self.skip();
        }
    }

    /// 1-based line and column of a byte offset
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.source.len());
        let before = &self.source[..offset];
        let line = before.matches('\n').count() + 1;
        let column = before.rfind('\n').map_or(offset, |nl| offset - nl - 1) + 1;
        (line, column)
    }
}
