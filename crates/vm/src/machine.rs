//! VM state management: data stack, current frame, call stack, observer.

use std::collections::HashMap;

use crate::error::Fault;
use waffle_common::{Instruction, Value};

/// A call's isolated local-variable storage plus its return address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Local-slot key → value. Never shared between caller and callee.
    pub locals: HashMap<Value, Value>,
    /// Address of the `call` instruction that created this frame; the
    /// root frame uses 0. `goback` resumes the caller at `origin + 1`.
    pub origin: usize,
}

impl Frame {
    /// A fresh frame with empty locals.
    pub fn new(origin: usize) -> Self {
        Self {
            locals: HashMap::new(),
            origin,
        }
    }
}

/// Snapshot handed to the observer after each executed instruction.
pub struct Trace<'a> {
    /// Address of the instruction that just executed.
    pub address: usize,
    /// The instruction itself.
    pub instruction: &'a Instruction,
    /// The data stack, bottom-first (top is last).
    pub data_stack: &'a [Value],
    /// The current frame's locals.
    pub locals: &'a HashMap<Value, Value>,
}

/// Synchronous post-instruction hook. Shared references keep it from
/// mutating machine state.
pub type Observer = Box<dyn FnMut(&Trace<'_>)>;

/// The Waffle virtual machine.
///
/// One instance may run many programs sequentially; [`Machine::run`]
/// fully reinitializes the state each time. After a run or a
/// [`Machine::step`] — faulted or not — the accessors expose the final
/// state.
pub struct Machine {
    /// Program counter: the address of the instruction about to execute.
    pub(crate) pc: usize,
    /// False once `halt` executes or a fault stops the machine.
    pub(crate) running: bool,
    /// The current frame. Exactly one frame is current at any time.
    pub(crate) frame: Frame,
    /// Suspended frames of the active call chain, callers below callees.
    pub(crate) call_stack: Vec<Frame>,
    /// The single operand stack shared across all frames.
    pub(crate) data_stack: Vec<Value>,
    pub(crate) observer: Option<Observer>,
}

impl Machine {
    /// Create a machine in its initial state: pc 0, running, empty
    /// stacks, root frame with origin 0.
    pub fn new() -> Self {
        Self {
            pc: 0,
            running: true,
            frame: Frame::new(0),
            call_stack: Vec::new(),
            data_stack: Vec::new(),
            observer: None,
        }
    }

    /// Reinitialize all machine state. The observer is kept.
    pub fn reset(&mut self) {
        self.pc = 0;
        self.running = true;
        self.frame = Frame::new(0);
        self.call_stack.clear();
        self.data_stack.clear();
    }

    /// Install a post-instruction observer.
    pub fn set_observer(&mut self, observer: Observer) {
        self.observer = Some(observer);
    }

    /// Remove the observer, if any.
    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    /// The data stack, bottom-first (top is last).
    pub fn data_stack(&self) -> &[Value] {
        &self.data_stack
    }

    /// The current frame.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// The current frame's locals.
    pub fn locals(&self) -> &HashMap<Value, Value> {
        &self.frame.locals
    }

    /// True until `halt` executes or a fault stops the machine.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current nesting depth of active calls.
    pub fn call_depth(&self) -> usize {
        self.call_stack.len()
    }

    /// Pop a value from the data stack.
    pub(crate) fn pop(&mut self, at: usize) -> Result<Value, Fault> {
        self.data_stack
            .pop()
            .ok_or(Fault::StackUnderflow { at })
    }

    /// Invoke the observer, if installed, for the instruction at `address`.
    pub(crate) fn notify(&mut self, address: usize, instruction: &Instruction) {
        if let Some(observer) = self.observer.as_mut() {
            observer(&Trace {
                address,
                instruction,
                data_stack: &self.data_stack,
                locals: &self.frame.locals,
            });
        }
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}
