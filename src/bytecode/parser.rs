//! Bytecode parser
//!
//! Exactly one top-level `function { ... }` block with its sections in
//! fixed order; every list tolerates a trailing comma.

use super::lexer::{lex, Tok};
use super::{Constant, Function, Instruction};
use crate::error::{CompileError, Result};
use crate::span::{line_col, Span};

/// Lex and parse a bytecode text
pub fn parse(source: &str) -> Result<Function> {
    let tokens = lex(source)?;
    let mut parser = Parser {
        source,
        tokens,
        pos: 0,
    };
    let function = parser.function()?;
    if !parser.at_end() {
        return Err(parser.error("unexpected tokens after function definition"));
    }
    Ok(function)
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<(Tok, Span)>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn function(&mut self) -> Result<Function> {
        self.expect(&Tok::Function, "'function' keyword")?;
        self.expect(&Tok::LBrace, "'{' after 'function'")?;

        self.section_header(&Tok::Functions, "functions")?;
        let functions = self.function_list()?;
        self.close_list("functions")?;

        self.section_header(&Tok::Constants, "constants")?;
        let constants = self.constant_list()?;
        self.close_list("constants")?;

        self.expect(&Tok::ParameterCount, "'parameter_count' keyword")?;
        self.expect(&Tok::Assign, "'=' after 'parameter_count'")?;
        let parameter_count = self.unsigned_int("integer for parameter count")?;
        self.expect(&Tok::Comma, "',' after parameter count")?;

        let local_vars = self.ident_section(&Tok::LocalVars, "local_vars")?;
        let local_ref_vars = self.ident_section(&Tok::LocalRefVars, "local_ref_vars")?;
        let free_vars = self.ident_section(&Tok::FreeVars, "free_vars")?;
        let names = self.ident_section(&Tok::Names, "names")?;

        self.section_header(&Tok::Instructions, "instructions")?;
        let instructions = self.instruction_list()?;
        self.expect(&Tok::RBracket, "']' after instructions list")?;

        self.expect(&Tok::RBrace, "'}' to end function")?;

        Ok(Function {
            functions,
            constants,
            parameter_count,
            local_vars,
            local_ref_vars,
            free_vars,
            names,
            instructions,
        })
    }

    fn section_header(&mut self, keyword: &Tok, name: &str) -> Result<()> {
        self.expect(keyword, &format!("'{name}' keyword"))?;
        self.expect(&Tok::Assign, &format!("'=' after '{name}'"))?;
        self.expect(&Tok::LBracket, &format!("'[' after '{name} ='"))?;
        Ok(())
    }

    fn close_list(&mut self, name: &str) -> Result<()> {
        self.expect(&Tok::RBracket, &format!("']' after {name} list"))?;
        self.expect(&Tok::Comma, &format!("',' after {name} list"))?;
        Ok(())
    }

    fn ident_section(&mut self, keyword: &Tok, name: &str) -> Result<Vec<String>> {
        self.section_header(keyword, name)?;
        let list = self.ident_list()?;
        self.close_list(name)?;
        Ok(list)
    }

    fn function_list(&mut self) -> Result<Vec<Function>> {
        let mut list = Vec::new();
        if self.check(&Tok::RBracket) {
            return Ok(list);
        }
        list.push(self.function()?);
        while self.match_tok(&Tok::Comma) {
            if self.check(&Tok::RBracket) {
                break;
            }
            list.push(self.function()?);
        }
        Ok(list)
    }

    fn constant_list(&mut self) -> Result<Vec<Constant>> {
        let mut list = Vec::new();
        if self.check(&Tok::RBracket) {
            return Ok(list);
        }
        list.push(self.constant()?);
        while self.match_tok(&Tok::Comma) {
            if self.check(&Tok::RBracket) {
                break;
            }
            list.push(self.constant()?);
        }
        Ok(list)
    }

    fn constant(&mut self) -> Result<Constant> {
        if self.match_tok(&Tok::None) {
            return Ok(Constant::None);
        }
        if self.match_tok(&Tok::True) {
            return Ok(Constant::Boolean(true));
        }
        if self.match_tok(&Tok::False) {
            return Ok(Constant::Boolean(false));
        }
        match self.peek() {
            Some(Tok::Int(n)) => {
                let n = *n;
                self.bump();
                Ok(Constant::Integer(n))
            }
            Some(Tok::Str(s)) => {
                let s = s.clone();
                self.bump();
                Ok(Constant::String(s))
            }
            _ => Err(self.error("expected constant")),
        }
    }

    fn ident_list(&mut self) -> Result<Vec<String>> {
        let mut list = Vec::new();
        if self.check(&Tok::RBracket) {
            return Ok(list);
        }
        list.push(self.ident("identifier")?);
        while self.match_tok(&Tok::Comma) {
            if self.check(&Tok::RBracket) {
                break;
            }
            list.push(self.ident("identifier after comma")?);
        }
        Ok(list)
    }

    /// Instructions have no separators; read until the closing bracket
    fn instruction_list(&mut self) -> Result<Vec<Instruction>> {
        let mut list = Vec::new();
        while !self.check(&Tok::RBracket) && !self.at_end() {
            list.push(self.instruction()?);
        }
        Ok(list)
    }

    fn instruction(&mut self) -> Result<Instruction> {
        let op = match self.peek() {
            Some(Tok::Op(op)) => *op,
            _ => return Err(self.error("expected instruction")),
        };
        self.bump();
        if op.has_operand() {
            let operand = self.int(&format!("integer operand for {}", op.mnemonic()))?;
            Ok(Instruction::with_operand(op, operand))
        } else {
            Ok(Instruction::new(op))
        }
    }

    // Token helpers

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Tok> {
        self.tokens.get(self.pos).map(|(tok, _)| tok)
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn check(&self, tok: &Tok) -> bool {
        self.peek() == Some(tok)
    }

    fn match_tok(&mut self, tok: &Tok) -> bool {
        if self.check(tok) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, tok: &Tok, what: &str) -> Result<()> {
        if self.match_tok(tok) {
            Ok(())
        } else {
            Err(self.error(format!("expected {what}")))
        }
    }

    fn int(&mut self, what: &str) -> Result<i32> {
        match self.peek() {
            Some(Tok::Int(n)) => {
                let n = *n;
                self.bump();
                Ok(n)
            }
            _ => Err(self.error(format!("expected {what}"))),
        }
    }

    fn unsigned_int(&mut self, what: &str) -> Result<u32> {
        let n = self.int(what)?;
        u32::try_from(n).map_err(|_| self.error(format!("expected non-negative {what}")))
    }

    fn ident(&mut self, what: &str) -> Result<String> {
        match self.peek() {
            Some(Tok::Ident(name)) => {
                let name = name.clone();
                self.bump();
                Ok(name)
            }
            _ => Err(self.error(format!("expected {what}"))),
        }
    }

    fn error(&self, message: impl Into<String>) -> CompileError {
        match self.tokens.get(self.pos) {
            Some((tok, span)) => {
                let (line, col) = line_col(self.source, span.start);
                CompileError::parser(
                    format!(
                        "{} at line {line}, column {col} (found '{}')",
                        message.into(),
                        tok.text()
                    ),
                    *span,
                )
            }
            None => {
                let span = Span::new(self.source.len(), self.source.len());
                let (line, col) = line_col(self.source, span.start);
                CompileError::parser(
                    format!(
                        "{} at line {line}, column {col} (found end of input)",
                        message.into()
                    ),
                    span,
                )
            }
        }
    }
}
