//! Bytecode lexer using logos
//!
//! Unlike the source lexer, any defect here aborts immediately with a
//! diagnostic citing 1-based line and column. String escapes are decoded
//! into the token text.

use super::Operation;
use crate::error::CompileError;
use crate::span::{line_col, Span};
use logos::Logos;

/// Lexical defects; rendered into a `CompileError` by `lex`
#[derive(Default, Debug, Clone, PartialEq)]
pub enum BytecodeLexError {
    #[default]
    UnexpectedCharacter,
    UnterminatedString,
    InvalidEscape(char),
    IntOutOfRange,
}

fn parse_int(lex: &mut logos::Lexer<Tok>) -> Result<i32, BytecodeLexError> {
    lex.slice()
        .parse::<i32>()
        .map_err(|_| BytecodeLexError::IntOutOfRange)
}

/// Decode `\\ \" \n \t` into the characters they denote
fn decode_string(lex: &mut logos::Lexer<Tok>) -> Result<String, BytecodeLexError> {
    let slice = lex.slice();
    let inner = &slice[1..slice.len() - 1];
    let mut decoded = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('\\') => decoded.push('\\'),
                Some('"') => decoded.push('"'),
                Some('n') => decoded.push('\n'),
                Some('t') => decoded.push('\t'),
                Some(other) => return Err(BytecodeLexError::InvalidEscape(other)),
                None => return Err(BytecodeLexError::UnterminatedString),
            }
        } else {
            decoded.push(c);
        }
    }
    Ok(decoded)
}

fn unterminated_string(_: &mut logos::Lexer<Tok>) -> Result<String, BytecodeLexError> {
    Err(BytecodeLexError::UnterminatedString)
}

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(error = BytecodeLexError)]
#[logos(skip r"[ \t\n\r\f\x0B]+")]
#[logos(skip r"//[^\n]*")]
pub enum Tok {
    // Section keywords
    #[token("function")]
    Function,
    #[token("functions")]
    Functions,
    #[token("constants")]
    Constants,
    #[token("parameter_count")]
    ParameterCount,
    #[token("local_vars")]
    LocalVars,
    #[token("local_ref_vars")]
    LocalRefVars,
    #[token("free_vars")]
    FreeVars,
    #[token("names")]
    Names,
    #[token("instructions")]
    Instructions,

    // Constant keywords
    #[token("None")]
    None,
    #[token("true")]
    True,
    #[token("false")]
    False,

    // Instruction mnemonics
    #[token("load_const", |_| Operation::LoadConst)]
    #[token("load_func", |_| Operation::LoadFunc)]
    #[token("load_local", |_| Operation::LoadLocal)]
    #[token("store_local", |_| Operation::StoreLocal)]
    #[token("load_global", |_| Operation::LoadGlobal)]
    #[token("store_global", |_| Operation::StoreGlobal)]
    #[token("push_ref", |_| Operation::PushReference)]
    #[token("load_ref", |_| Operation::LoadReference)]
    #[token("store_ref", |_| Operation::StoreReference)]
    #[token("alloc_record", |_| Operation::AllocRecord)]
    #[token("field_load", |_| Operation::FieldLoad)]
    #[token("field_store", |_| Operation::FieldStore)]
    #[token("index_load", |_| Operation::IndexLoad)]
    #[token("index_store", |_| Operation::IndexStore)]
    #[token("alloc_closure", |_| Operation::AllocClosure)]
    #[token("call", |_| Operation::Call)]
    #[token("return", |_| Operation::Return)]
    #[token("add", |_| Operation::Add)]
    #[token("sub", |_| Operation::Sub)]
    #[token("mul", |_| Operation::Mul)]
    #[token("div", |_| Operation::Div)]
    #[token("neg", |_| Operation::Neg)]
    #[token("gt", |_| Operation::Gt)]
    #[token("geq", |_| Operation::Geq)]
    #[token("eq", |_| Operation::Eq)]
    #[token("and", |_| Operation::And)]
    #[token("or", |_| Operation::Or)]
    #[token("not", |_| Operation::Not)]
    #[token("goto", |_| Operation::Goto)]
    #[token("if", |_| Operation::If)]
    #[token("dup", |_| Operation::Dup)]
    #[token("swap", |_| Operation::Swap)]
    #[token("pop", |_| Operation::Pop)]
    Op(Operation),

    // A bare `-` with no digit after it matches nothing and errors out
    #[regex(r"-?[0-9]+", parse_int)]
    Int(i32),

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),

    #[regex(r#""([^"\\]|\\.)*""#, decode_string)]
    Str(String),

    #[regex(r#""([^"\\]|\\.)*"#, unterminated_string)]
    UnterminatedStr(String),

    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("=")]
    Assign,
    #[token(",")]
    Comma,
}

impl Tok {
    /// Token text for diagnostics
    pub fn text(&self) -> String {
        match self {
            Tok::Function => "function".into(),
            Tok::Functions => "functions".into(),
            Tok::Constants => "constants".into(),
            Tok::ParameterCount => "parameter_count".into(),
            Tok::LocalVars => "local_vars".into(),
            Tok::LocalRefVars => "local_ref_vars".into(),
            Tok::FreeVars => "free_vars".into(),
            Tok::Names => "names".into(),
            Tok::Instructions => "instructions".into(),
            Tok::None => "None".into(),
            Tok::True => "true".into(),
            Tok::False => "false".into(),
            Tok::Op(op) => op.mnemonic().into(),
            Tok::Int(n) => n.to_string(),
            Tok::Ident(name) => name.clone(),
            Tok::Str(s) | Tok::UnterminatedStr(s) => format!("\"{s}\""),
            Tok::LBracket => "[".into(),
            Tok::RBracket => "]".into(),
            Tok::LParen => "(".into(),
            Tok::RParen => ")".into(),
            Tok::LBrace => "{".into(),
            Tok::RBrace => "}".into(),
            Tok::Assign => "=".into(),
            Tok::Comma => ",".into(),
        }
    }
}

/// Tokenize; the first defect aborts the lex
pub fn lex(source: &str) -> crate::error::Result<Vec<(Tok, Span)>> {
    let mut tokens = Vec::new();
    let mut lexer = Tok::lexer(source);
    while let Some(result) = lexer.next() {
        let span = Span::from(lexer.span());
        match result {
            Ok(tok) => tokens.push((tok, span)),
            Err(err) => {
                let (line, col) = line_col(source, span.start);
                let message = match err {
                    BytecodeLexError::UnexpectedCharacter => format!(
                        "unexpected character '{}' at line {line}, column {col}",
                        lexer.slice()
                    ),
                    BytecodeLexError::UnterminatedString => {
                        format!("unterminated string literal at line {line}, column {col}")
                    }
                    BytecodeLexError::InvalidEscape(c) => {
                        format!("invalid escape sequence '\\{c}' at line {line}, column {col}")
                    }
                    BytecodeLexError::IntOutOfRange => {
                        format!("integer literal out of range at line {line}, column {col}")
                    }
                };
                return Err(CompileError::lexer(message, span));
            }
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(source: &str) -> Vec<Tok> {
        lex(source)
            .expect("input should lex")
            .into_iter()
            .map(|(tok, _)| tok)
            .collect()
    }

    #[test]
    fn test_keywords_and_symbols() {
        assert_eq!(
            toks("function { } [ ] = ,"),
            vec![
                Tok::Function,
                Tok::LBrace,
                Tok::RBrace,
                Tok::LBracket,
                Tok::RBracket,
                Tok::Assign,
                Tok::Comma,
            ]
        );
    }

    #[test]
    fn test_mnemonics_lex_as_operations() {
        assert_eq!(
            toks("load_const 3 pop"),
            vec![Tok::Op(Operation::LoadConst), Tok::Int(3), Tok::Op(Operation::Pop)]
        );
    }

    #[test]
    fn test_signed_integers() {
        assert_eq!(toks("-12 0 7"), vec![Tok::Int(-12), Tok::Int(0), Tok::Int(7)]);
    }

    #[test]
    fn test_bare_minus_is_an_error() {
        let err = lex("- 1").expect_err("bare minus should not lex");
        assert!(format!("{err}").contains("unexpected character '-'"));
    }

    #[test]
    fn test_identifier_vs_keyword() {
        assert_eq!(
            toks("foo load_constant"),
            vec![
                Tok::Ident("foo".into()),
                Tok::Ident("load_constant".into())
            ]
        );
    }

    #[test]
    fn test_string_escapes_are_decoded() {
        assert_eq!(
            toks(r#""a\nb\t\"\\""#),
            vec![Tok::Str("a\nb\t\"\\".into())]
        );
    }

    #[test]
    fn test_invalid_escape_is_an_error() {
        let err = lex(r#""a\qb""#).expect_err("invalid escape should not lex");
        assert!(format!("{err}").contains("invalid escape sequence '\\q'"));
    }

    #[test]
    fn test_unterminated_string_is_an_error() {
        let err = lex("\"abc").expect_err("unterminated string should not lex");
        assert!(format!("{err}").contains("unterminated string literal"));
    }

    #[test]
    fn test_comments_and_newlines_are_skipped() {
        assert_eq!(
            toks("// header\nadd // trailing\nsub"),
            vec![Tok::Op(Operation::Add), Tok::Op(Operation::Sub)]
        );
    }

    #[test]
    fn test_error_cites_line_and_column() {
        let err = lex("add\n  @").expect_err("at-sign should not lex");
        assert!(format!("{err}").contains("line 2, column 3"), "got: {err}");
    }

    #[test]
    fn test_int_out_of_range() {
        let err = lex("99999999999").expect_err("overflowing int should not lex");
        assert!(format!("{err}").contains("out of range"));
    }
}
