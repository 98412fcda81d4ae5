//! Canonical pretty-printer for bytecode trees
//!
//! The layout is fixed: tabs for indentation, one level per nested
//! `function { ... }` and one more inside the `functions` and
//! `instructions` brackets. Feeding the output back through the parser
//! yields a structurally identical tree.

use super::{Constant, Function, Instruction};
use std::fmt::Write;

/// Render the canonical textual form (no trailing newline)
pub fn to_text(function: &Function) -> String {
    let mut out = String::new();
    Printer { indent: 0 }.function(function, &mut out);
    out
}

struct Printer {
    indent: usize,
}

impl Printer {
    fn function(&mut self, function: &Function, out: &mut String) {
        self.line(out, "function");
        self.line(out, "{");
        self.indent += 1;

        self.pad(out);
        out.push_str("functions =");
        if function.functions.is_empty() {
            out.push_str(" [],\n");
        } else {
            out.push('\n');
            self.line(out, "[");
            self.indent += 1;
            for (i, nested) in function.functions.iter().enumerate() {
                self.function(nested, out);
                if i != function.functions.len() - 1 {
                    out.push_str(",\n");
                }
            }
            self.indent -= 1;
            out.push('\n');
            self.line(out, "],");
        }

        self.pad(out);
        out.push_str("constants = [");
        for (i, constant) in function.constants.iter().enumerate() {
            if i != 0 {
                out.push_str(", ");
            }
            push_constant(constant, out);
        }
        out.push_str("],\n");

        self.pad(out);
        let _ = writeln!(out, "parameter_count = {},", function.parameter_count);

        self.name_list(out, "local_vars", &function.local_vars);
        self.name_list(out, "local_ref_vars", &function.local_ref_vars);
        self.name_list(out, "free_vars", &function.free_vars);
        self.name_list(out, "names", &function.names);

        self.line(out, "instructions = ");
        self.line(out, "[");
        self.indent += 1;
        for instruction in &function.instructions {
            self.pad(out);
            push_instruction(instruction, out);
            out.push('\n');
        }
        self.indent -= 1;
        self.line(out, "]");

        self.indent -= 1;
        self.pad(out);
        out.push('}');
    }

    fn name_list(&mut self, out: &mut String, name: &str, names: &[String]) {
        self.pad(out);
        out.push_str(name);
        out.push_str(" = [");
        for (i, entry) in names.iter().enumerate() {
            if i != 0 {
                out.push_str(", ");
            }
            out.push_str(entry);
        }
        out.push_str("],\n");
    }

    fn line(&self, out: &mut String, text: &str) {
        self.pad(out);
        out.push_str(text);
        out.push('\n');
    }

    fn pad(&self, out: &mut String) {
        for _ in 0..self.indent {
            out.push('\t');
        }
    }
}

fn push_constant(constant: &Constant, out: &mut String) {
    match constant {
        Constant::None => out.push_str("None"),
        Constant::Boolean(true) => out.push_str("true"),
        Constant::Boolean(false) => out.push_str("false"),
        Constant::Integer(n) => {
            let _ = write!(out, "{n}");
        }
        Constant::String(s) => {
            out.push('"');
            out.push_str(&escape(s));
            out.push('"');
        }
    }
}

fn push_instruction(instruction: &Instruction, out: &mut String) {
    out.push_str(instruction.operation.mnemonic());
    if let Some(operand) = instruction.operand {
        let _ = write!(out, "\t{operand}");
    }
}

/// Re-escape `\`, `"`, newline, and tab for the textual form
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            _ => out.push(c),
        }
    }
    out
}
