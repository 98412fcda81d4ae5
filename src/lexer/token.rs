//! Token definitions

use crate::span::Span;
use logos::Logos;

/// Kind of a source token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A lexical defect; the token text is the message
    Error,
    /// Placeholder kind, never produced by the lexer
    None,
    Semicolon,
    Assign,
    Comma,
    LBrace,
    RBrace,
    LParen,
    RParen,
    LSquareBrace,
    RSquareBrace,
    Dot,
    Colon,
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Lt,
    Gt,
    Leq,
    Geq,
    And,
    Or,
    Not,
    IntLiteral,
    StringLiteral,
    BooleanLiteral,
    Keyword,
    Identifier,
    EoF,
}

/// A source token: kind, original text, 1-based line, byte span
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, span: Span) -> Self {
        Token {
            kind,
            text: text.into(),
            line,
            span,
        }
    }

    pub fn error(message: impl Into<String>, line: usize, span: Span) -> Self {
        Token::new(TokenKind::Error, message, line, span)
    }
}

/// Lexical defects surfaced as in-stream `Error` tokens
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub enum LexicalError {
    #[default]
    UnrecognizedCharacter,
    UnterminatedString,
    InvalidEscape(char),
    InvalidStringChar(char),
    LeadingZero,
    InvalidNumber,
}

impl LexicalError {
    /// Render the message carried by the resulting `Error` token
    pub fn message(&self, slice: &str) -> String {
        match self {
            LexicalError::UnrecognizedCharacter => {
                format!("unrecognized character '{slice}'")
            }
            LexicalError::UnterminatedString => "unterminated string literal".to_string(),
            LexicalError::InvalidEscape(c) => format!("invalid escape sequence \\{c}"),
            LexicalError::InvalidStringChar(c) => {
                format!("invalid character in string (ASCII {})", *c as u32)
            }
            LexicalError::LeadingZero => "invalid number with leading zero".to_string(),
            LexicalError::InvalidNumber => format!("invalid token '{slice}'"),
        }
    }
}

/// String literals must close on the same line; escapes stay in source form
fn check_string(lex: &mut logos::Lexer<RawToken>) -> Result<(), LexicalError> {
    let slice = lex.slice();
    let inner = &slice[1..slice.len() - 1];
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('"' | '\\' | 'n' | 't') => {}
                Some(other) => return Err(LexicalError::InvalidEscape(other)),
                None => return Err(LexicalError::UnterminatedString),
            }
        } else if !(' '..='~').contains(&c) {
            return Err(LexicalError::InvalidStringChar(c));
        }
    }
    Ok(())
}

fn unterminated_string(_: &mut logos::Lexer<RawToken>) -> Result<(), LexicalError> {
    Err(LexicalError::UnterminatedString)
}

fn leading_zero(_: &mut logos::Lexer<RawToken>) -> Result<(), LexicalError> {
    Err(LexicalError::LeadingZero)
}

fn invalid_number(_: &mut logos::Lexer<RawToken>) -> Result<(), LexicalError> {
    Err(LexicalError::InvalidNumber)
}

/// Raw lexeme shapes; `tokenize` classifies keywords and attaches lines
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(error = LexicalError)]
#[logos(skip r"[ \t\n\r\f\x0B]+")]
#[logos(skip r"//[^\n]*")]
pub enum RawToken {
    #[regex(r#""([^"\\\n]|\\[^\n])*""#, check_string)]
    Str,

    // An opening quote that never closes before end of line
    #[regex(r#""([^"\\\n]|\\[^\n])*\\?"#, unterminated_string)]
    UnterminatedStr,

    #[regex(r"0|[1-9][0-9]*")]
    Int,

    #[regex(r"0[0-9]+", leading_zero)]
    LeadingZeroInt,

    // Digits running straight into an identifier, e.g. `123abc`
    #[regex(r"[1-9][0-9]*[A-Za-z_][A-Za-z0-9_]*", invalid_number)]
    IntIdent,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    #[token("<=")]
    Leq,
    #[token(">=")]
    Geq,
    #[token("==")]
    Eq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,

    #[token(";")]
    Semicolon,
    #[token("=")]
    Assign,
    #[token(",")]
    Comma,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LSquareBrace,
    #[token("]")]
    RSquareBrace,
    #[token("+")]
    Add,
    #[token("-")]
    Sub,
    #[token("*")]
    Mul,
    #[token("/")]
    Div,
    #[token("&")]
    And,
    #[token("|")]
    Or,
    #[token("!")]
    Not,
    #[token(".")]
    Dot,
    #[token(":")]
    Colon,
}
