//! Frames: lexical scope instances
//!
//! A frame maps names to values, points at its lexically enclosing frame,
//! and carries the set of names its function declared `global` together
//! with a handle on the root frame. The root frame is its own global frame,
//! represented as `global_frame: None` to avoid a reference cycle.

use super::error::{InterpResult, RuntimeError};
use super::value::Value;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Shared reference to a frame
pub type FrameRef = Rc<RefCell<Frame>>;

#[derive(Debug)]
pub struct Frame {
    /// Variable bindings in this scope
    vars: HashMap<String, Value>,
    /// Lexically enclosing frame
    parent: Option<FrameRef>,
    /// Names declared `global` by the function this frame belongs to
    globals: HashSet<String>,
    /// The root frame, or None when this frame is the root
    global_frame: Option<FrameRef>,
}

impl Frame {
    /// Create the root frame; `globals` is the pre-declared builtin set
    pub fn root(globals: HashSet<String>) -> FrameRef {
        Rc::new(RefCell::new(Frame {
            vars: HashMap::new(),
            parent: None,
            globals,
            global_frame: None,
        }))
    }

    /// Create a call frame under `parent` with the callee's global set
    pub fn with_parent(parent: FrameRef, globals: HashSet<String>) -> FrameRef {
        let global_frame = Some(Self::global_frame_of(&parent));
        Rc::new(RefCell::new(Frame {
            vars: HashMap::new(),
            parent: Some(parent),
            globals,
            global_frame,
        }))
    }

    /// Resolve the root frame reachable from `frame`
    pub fn global_frame_of(frame: &FrameRef) -> FrameRef {
        match &frame.borrow().global_frame {
            Some(global) => Rc::clone(global),
            None => Rc::clone(frame),
        }
    }

    /// Bind or overwrite a variable in this frame
    pub fn define(&mut self, name: String, value: Value) {
        self.vars.insert(name, value);
    }

    pub fn is_global(&self, name: &str) -> bool {
        self.globals.contains(name)
    }

    /// Read a name: a declared-global routes to the root frame, otherwise
    /// the frame chain is walked, re-applying the global rule at each level
    pub fn lookup_read(name: &str, frame: &FrameRef) -> InterpResult<Value> {
        let mut current = Rc::clone(frame);
        loop {
            let next = {
                let f = current.borrow();
                if f.is_global(name) {
                    drop(f);
                    let global = Self::global_frame_of(&current);
                    let value = global.borrow().vars.get(name).cloned();
                    return value.ok_or(RuntimeError::UninitializedVariable);
                }
                if let Some(value) = f.vars.get(name) {
                    return Ok(value.clone());
                }
                match &f.parent {
                    Some(parent) => Rc::clone(parent),
                    None => return Err(RuntimeError::UninitializedVariable),
                }
            };
            current = next;
        }
    }

    /// The frame a write to `name` lands in: the root for declared globals,
    /// the current frame otherwise. Writes never walk the chain.
    pub fn lookup_write(name: &str, frame: &FrameRef) -> FrameRef {
        if frame.borrow().is_global(name) {
            Self::global_frame_of(frame)
        } else {
            Rc::clone(frame)
        }
    }
}
