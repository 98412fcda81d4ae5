//! Front-end and reference interpreter for the MITScript language
//!
//! The pipeline: `lexer` turns source text into a token stream, `parser`
//! builds the `ast`, and `interp` evaluates it. `bytecode` holds the
//! textual bytecode front-end (lexer, parser, pretty-printer) used by the
//! `vm` subcommand.

pub mod ast;
pub mod bytecode;
pub mod error;
pub mod interp;
pub mod lexer;
pub mod parser;
mod span;

pub use error::{CompileError, Result};
pub use span::Span;
