//! Lexer implementation using logos

use super::token::{Token, TokenKind};
use crate::common::Span;
use log::trace;
use logos::Logos;

/// Lexer for C source code
///
/// Never fails: text the token set does not cover (a stray `` ` ``, an
/// apostrophe in an `#if 0` block) becomes [`TokenKind::Unknown`] and lexing
/// resumes right after it.
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
    at_eof: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code
    pub fn new(source: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            at_eof: false,
        }
    }

    /// Get the next token
    pub fn next_token(&mut self) -> Token {
        if self.at_eof {
            let len = self.inner.source().len();
            return Token::new(TokenKind::Eof, Span::new(len, len));
        }

        match self.inner.next() {
            Some(Ok(kind)) => Token::new(kind, self.inner.span().into()),
            Some(Err(())) => {
                let span: Span = self.inner.span().into();
                trace!("unrecognised text {:?} at {:?}", self.inner.slice(), span);
                Token::new(TokenKind::Unknown(self.inner.slice().to_string()), span)
            }
            None => {
                self.at_eof = true;
                let len = self.inner.source().len();
                Token::new(TokenKind::Eof, Span::new(len, len))
            }
        }
    }

    /// Tokenize the entire source, ending with a single `Eof`
    pub fn tokenize_all(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = matches!(token.kind, TokenKind::Eof);
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }
}
