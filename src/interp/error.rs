//! Runtime faults
//!
//! `Return` is not a fault: it rides the error channel so that every
//! enclosing block and loop unwinds, and the nearest call boundary consumes
//! it. No fault is catchable by the interpreted program.

use super::value::Value;
use std::fmt;

/// Runtime error during interpretation
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// Read of a name with no binding anywhere in scope
    UninitializedVariable,
    /// Operand tag mismatch
    IllegalCast,
    /// Division by zero
    IllegalArithmetic,
    /// Arity mismatch or other semantic fault
    Runtime,
    /// Control flow: early return carrying the produced value
    Return(Box<Value>),
}

impl RuntimeError {
    /// The canonical exception name printed on exit
    pub fn name(&self) -> &'static str {
        match self {
            RuntimeError::UninitializedVariable => "UninitializedVariableException",
            RuntimeError::IllegalCast => "IllegalCastException",
            RuntimeError::IllegalArithmetic => "IllegalArithmeticException",
            RuntimeError::Runtime | RuntimeError::Return(_) => "RuntimeException",
        }
    }

    pub fn ret(value: Value) -> Self {
        RuntimeError::Return(Box::new(value))
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::error::Error for RuntimeError {}

/// Result type for interpreter operations
pub type InterpResult<T> = Result<T, RuntimeError>;
