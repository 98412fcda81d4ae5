//! Tree-walking interpreter: runtime values, frames, and the evaluator

mod error;
mod eval;
mod frame;
mod value;

pub use error::{InterpResult, RuntimeError};
pub use eval::Interpreter;
pub use frame::{Frame, FrameRef};
pub use value::{Closure, Function, NativeFn, Record, Value};
