//! Waffle virtual machine — executes decoded instruction sequences.
//!
//! The VM is a stack machine with:
//! - A single data stack shared across all frames
//! - Per-call frames holding isolated local variables
//! - A call stack of suspended frames
//!
//! Execution is single-threaded, synchronous, and deterministic; the VM
//! itself performs no I/O. An optional [`machine::Trace`] observer fires
//! after each executed instruction.
//!
//! # Usage
//!
//! ```
//! use waffle_common::{Instruction, Program, Value};
//! use waffle_vm::run;
//!
//! let program = Program::new(vec![
//!     Instruction::Push(Value::Int(2)),
//!     Instruction::Push(Value::Int(3)),
//!     Instruction::Add,
//!     Instruction::Halt,
//! ]);
//!
//! let stack = run(&program).unwrap();
//! assert_eq!(stack, vec![Value::Int(5)]);
//! ```
//!
//! For state inspection after a run (or after a fault), hold a
//! [`Machine`] and call [`Machine::run`] directly:
//!
//! ```
//! use waffle_common::{Instruction, Program, Value};
//! use waffle_vm::Machine;
//!
//! let program = Program::new(vec![Instruction::Pop]);
//! let mut machine = Machine::new();
//! assert!(machine.run(&program).is_err());
//! assert!(!machine.is_running());
//! ```

pub mod error;
pub mod execute;
pub mod machine;

pub use error::Fault;
pub use machine::{Frame, Machine, Observer, Trace};

use waffle_common::{Program, Value};

/// Execute a program on a fresh machine and return the final data stack.
///
/// # Errors
///
/// Returns the [`Fault`] that stopped execution. Callers that need the
/// machine state at the fault should use [`Machine::run`] instead.
pub fn run(program: &Program) -> Result<Vec<Value>, Fault> {
    let mut machine = Machine::new();
    machine.run(program)?;
    Ok(machine.data_stack().to_vec())
}
