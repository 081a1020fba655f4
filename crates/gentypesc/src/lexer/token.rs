//! Token definitions for the C declaration lexer
//!
//! Only what matters for reading `typedef`s is told apart: type keywords,
//! qualifiers, identifiers and the separators that bound a declaration.
//! Every other operator collapses into [`TokenKind::Operator`], anything
//! unrecognised into [`TokenKind::Unknown`], and preprocessor lines are
//! skipped whole.

use crate::common::Span;
use logos::Logos;

/// Token with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f\v]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*[^*]*\*+(?:[^/*][^*]*\*+)*/")]
#[logos(skip r"#[^\n]*")]
pub enum TokenKind {
    // === Type keywords ===
    #[token("typedef")]
    Typedef,
    #[token("signed")]
    #[token("__signed__")]
    Signed,
    #[token("unsigned")]
    Unsigned,
    #[token("char")]
    Char,
    #[token("short")]
    Short,
    #[token("int")]
    Int,
    #[token("long")]
    Long,
    #[token("float")]
    Float,
    #[token("double")]
    Double,
    #[token("void")]
    Void,
    #[token("_Bool")]
    Bool,
    #[token("struct")]
    Struct,
    #[token("union")]
    Union,
    #[token("enum")]
    Enum,

    // === Qualifiers ===
    #[token("const")]
    Const,
    #[token("volatile")]
    #[token("__volatile__")]
    Volatile,

    // GCC accepts `$` in identifiers
    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*", |lex| lex.slice().to_string())]
    Identifier(String),

    // Numbers of any base or suffix; the checker never evaluates them
    #[regex(r"[0-9][0-9a-zA-Z_]*(\.[0-9a-zA-Z_]*)?([eEpP][+-]?[0-9]+[a-zA-Z]*)?", |lex| lex.slice().to_string())]
    #[regex(r"\.[0-9][0-9a-zA-Z_]*([eEpP][+-]?[0-9]+[a-zA-Z]*)?", |lex| lex.slice().to_string())]
    Number(String),

    #[regex(r"'([^'\\\n]|\\.)*'", |lex| lex.slice().to_string())]
    CharLiteral(String),

    #[regex(r#""([^"\\\n]|\\.)*""#, |lex| lex.slice().to_string())]
    StringLiteral(String),

    // === Separators ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(";")]
    Semi,
    #[token(",")]
    Comma,
    #[token("*")]
    Star,

    /// Any other operator or punctuator, e.g. `+=` or `->`
    #[regex(r"[-+/%=<>!&|^~.?:]+", |lex| lex.slice().to_string())]
    Operator(String),

    /// Text no other token matches, e.g. an unterminated quote
    Unknown(String),

    // Special
    Eof,
}

impl TokenKind {
    /// Check if this token is an arithmetic type specifier keyword
    pub fn is_arithmetic_specifier(&self) -> bool {
        matches!(
            self,
            TokenKind::Signed
                | TokenKind::Unsigned
                | TokenKind::Char
                | TokenKind::Short
                | TokenKind::Int
                | TokenKind::Long
                | TokenKind::Float
                | TokenKind::Double
        )
    }

    pub fn is_qualifier(&self) -> bool {
        matches!(self, TokenKind::Const | TokenKind::Volatile)
    }

    pub fn opens_group(&self) -> bool {
        matches!(self, TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace)
    }

    pub fn closes_group(&self) -> bool {
        matches!(self, TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace)
    }
}
