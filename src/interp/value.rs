//! Runtime values for the interpreter

use super::frame::FrameRef;
use crate::ast::FunDecl;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Runtime value
#[derive(Debug, Clone)]
pub enum Value {
    /// The unit value
    None,
    /// Boolean
    Bool(bool),
    /// 32-bit signed integer
    Int(i32),
    /// Immutable string contents
    Str(Rc<String>),
    /// Heap record handle; identity is the handle
    Record(Rc<RefCell<Record>>),
    /// Function handle
    Function(Rc<Function>),
}

/// A record: ordered (field name, value) pairs. Reads scan by name, so the
/// writers below keep names unique.
#[derive(Debug, Clone, Default)]
pub struct Record {
    pub fields: Vec<(String, Value)>,
}

impl Record {
    /// Field lookup in insertion order; a missing field reads as None
    pub fn load(&self, name: &str) -> Value {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.clone())
            .unwrap_or(Value::None)
    }

    /// Update in place when the field exists, append otherwise
    pub fn store(&mut self, name: &str, value: Value) {
        for (field, slot) in &mut self.fields {
            if field == name {
                *slot = value;
                return;
            }
        }
        self.fields.push((name.to_string(), value));
    }
}

/// The three process-wide native functions, dispatched by identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeFn {
    Print,
    Input,
    Intcast,
}

impl NativeFn {
    pub fn arity(self) -> usize {
        match self {
            NativeFn::Print | NativeFn::Intcast => 1,
            NativeFn::Input => 0,
        }
    }
}

/// A function value: native, or a closure over the frame current at its
/// declaration
#[derive(Debug, Clone)]
pub enum Function {
    Native(NativeFn),
    Closure(Closure),
}

#[derive(Debug, Clone)]
pub struct Closure {
    /// The enclosing frame captured when the `fun` expression evaluated
    pub context: FrameRef,
    pub decl: Rc<FunDecl>,
}

impl Function {
    pub fn arity(&self) -> usize {
        match self {
            Function::Native(native) => native.arity(),
            Function::Closure(closure) => closure.decl.params.len(),
        }
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Function::Native(a), Function::Native(b)) => a == b,
            // Same captured frame and same declaration site
            (Function::Closure(a), Function::Closure(b)) => {
                Rc::ptr_eq(&a.context, &b.context) && Rc::ptr_eq(&a.decl, &b.decl)
            }
            _ => false,
        }
    }
}

impl Value {
    /// Get type name for debugging
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "None",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Str(_) => "string",
            Value::Record(_) => "record",
            Value::Function(_) => "function",
        }
    }
}

impl PartialEq for Value {
    /// Tags must match; mismatched tags compare unequal, never fault
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(b) => write!(f, "{}", if *b { "true" } else { "false" }),
            Value::Int(n) => write!(f, "{n}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Function(_) => write!(f, "FUNCTION"),
            Value::Record(record) => {
                let record = record.borrow();
                if record.fields.is_empty() {
                    return write!(f, "{{}}");
                }
                let mut names: Vec<&String> = record.fields.iter().map(|(n, _)| n).collect();
                names.sort();
                write!(f, "{{ ")?;
                for (i, name) in names.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    if let Some((_, value)) =
                        record.fields.iter().find(|(field, _)| field == *name)
                    {
                        write!(f, "{name}:{value}")?;
                    }
                }
                write!(f, " }}")
            }
        }
    }
}
