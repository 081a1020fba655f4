//! Lexer for the declaration-level subset of C the checker reads

mod token;
mod scanner;

pub use token::{Token, TokenKind};
pub use scanner::Lexer;
