//! Lexer implementation using logos
//!
//! Lexical defects do not abort scanning: each becomes an in-stream `Error`
//! token whose text is the message, and the stream always ends with `EoF`.

mod token;

pub use token::{LexicalError, Token, TokenKind};

use crate::span::{line_col, Span};
use logos::Logos;
use std::io::{self, Write};
use token::RawToken;

/// Tokenize source code
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut open_brackets: Vec<Token> = Vec::new();
    let mut lexer = RawToken::lexer(source);

    while let Some(result) = lexer.next() {
        let span = Span::from(lexer.span());
        let line = line_col(source, span.start).0;
        match result {
            Ok(raw) => {
                let token = classify(raw, lexer.slice(), line, span);
                balance_brackets(&token, &mut open_brackets, &mut tokens);
                tokens.push(token);
            }
            Err(err) => {
                tokens.push(Token::error(err.message(lexer.slice()), line, span));
            }
        }
    }

    // Unmatched openers are reported innermost-first, at the opener's line
    while let Some(open) = open_brackets.pop() {
        tokens.push(Token::error(
            format!("unmatched '{}'", open.text),
            open.line,
            open.span,
        ));
    }

    let end = Span::new(source.len(), source.len());
    tokens.push(Token::new(TokenKind::EoF, "", source.lines().count(), end));
    tokens
}

/// Whether any `Error` token was produced
pub fn has_errors(tokens: &[Token]) -> bool {
    tokens.iter().any(|t| t.kind == TokenKind::Error)
}

fn classify(raw: RawToken, text: &str, line: usize, span: Span) -> Token {
    let kind = match raw {
        RawToken::Str => TokenKind::StringLiteral,
        RawToken::Int => TokenKind::IntLiteral,
        RawToken::Ident => match text {
            "global" | "return" | "while" | "if" | "else" | "fun" | "None" => TokenKind::Keyword,
            "true" | "false" => TokenKind::BooleanLiteral,
            _ => TokenKind::Identifier,
        },
        RawToken::Leq => TokenKind::Leq,
        RawToken::Geq => TokenKind::Geq,
        RawToken::Eq => TokenKind::Eq,
        RawToken::Lt => TokenKind::Lt,
        RawToken::Gt => TokenKind::Gt,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::Assign => TokenKind::Assign,
        RawToken::Comma => TokenKind::Comma,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LSquareBrace => TokenKind::LSquareBrace,
        RawToken::RSquareBrace => TokenKind::RSquareBrace,
        RawToken::Add => TokenKind::Add,
        RawToken::Sub => TokenKind::Sub,
        RawToken::Mul => TokenKind::Mul,
        RawToken::Div => TokenKind::Div,
        RawToken::And => TokenKind::And,
        RawToken::Or => TokenKind::Or,
        RawToken::Not => TokenKind::Not,
        RawToken::Dot => TokenKind::Dot,
        RawToken::Colon => TokenKind::Colon,
        // These shapes always error out through their callbacks
        RawToken::UnterminatedStr | RawToken::LeadingZeroInt | RawToken::IntIdent => {
            TokenKind::Error
        }
    };
    Token::new(kind, text, line, span)
}

/// Track open `{`, `(`, `[`; a mismatched closer emits its error token
/// before the closer itself
fn balance_brackets(token: &Token, open: &mut Vec<Token>, tokens: &mut Vec<Token>) {
    match token.kind {
        TokenKind::LBrace | TokenKind::LParen | TokenKind::LSquareBrace => {
            open.push(token.clone());
        }
        TokenKind::RBrace | TokenKind::RParen | TokenKind::RSquareBrace => {
            let expected = match token.kind {
                TokenKind::RBrace => TokenKind::LBrace,
                TokenKind::RParen => TokenKind::LParen,
                _ => TokenKind::LSquareBrace,
            };
            if open.last().map(|t| t.kind) == Some(expected) {
                open.pop();
            } else {
                tokens.push(Token::error(
                    format!("unmatched '{}'", token.text),
                    token.line,
                    token.span,
                ));
            }
        }
        _ => {}
    }
}

fn kind_label(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::StringLiteral => " STRINGLITERAL",
        TokenKind::IntLiteral => " INTLITERAL",
        TokenKind::BooleanLiteral => " BOOLEANLITERAL",
        TokenKind::Identifier => " IDENTIFIER",
        _ => "",
    }
}

/// List every non-error token as `<line>[ <KIND>] <text>`
pub fn print_tokens<W: Write>(tokens: &[Token], out: &mut W) -> io::Result<()> {
    for t in tokens {
        if t.kind == TokenKind::EoF || t.kind == TokenKind::Error {
            continue;
        }
        writeln!(out, "{}{} {}", t.line, kind_label(t.kind), t.text)?;
    }
    Ok(())
}

/// List the full stream, errors included, in production order
pub fn print_errors<W: Write>(tokens: &[Token], out: &mut W) -> io::Result<()> {
    for t in tokens {
        if t.kind == TokenKind::EoF {
            continue;
        }
        let label = if t.kind == TokenKind::Error {
            " ERROR line"
        } else {
            kind_label(t.kind)
        };
        writeln!(out, "{}{} {}", t.line, label, t.text)?;
    }
    Ok(())
}
