//! Runtime faults for the Waffle VM.
//!
//! A fault stops execution immediately and leaves the machine state as it
//! was when the violation was detected. Every variant carries the address
//! (`at`) of the faulting instruction.

use thiserror::Error;
use waffle_common::{Value, ValueKind};

/// Errors that occur during program execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Fault {
    /// A data-stack operation needed more values than were present.
    #[error("stack underflow at address {at}")]
    StackUnderflow { at: usize },

    /// `load` or `forget` on a key with no binding in the current frame.
    #[error("undefined local '{key}' at address {at}")]
    UndefinedLocal { at: usize, key: Value },

    /// `less`/`greater` on kinds with no defined ordering.
    #[error("cannot order {lhs} against {rhs} at address {at}")]
    IncomparableTypes {
        at: usize,
        lhs: ValueKind,
        rhs: ValueKind,
    },

    /// An operand kind the instruction does not accept (non-numeric
    /// arithmetic operand, non-boolean jump condition).
    #[error("unsupported {operand} operand at address {at}")]
    UnsupportedOperandType { at: usize, operand: ValueKind },

    /// `divide` with a numerically zero divisor.
    #[error("division by zero at address {at}")]
    DivisionByZero { at: usize },

    /// Jump or call target outside the program.
    #[error("target {target} out of range (program length {len}) at address {at}")]
    InvalidAddress { at: usize, target: usize, len: usize },

    /// `goback` with no suspended frame to return to.
    #[error("goback with empty call stack at address {at}")]
    EmptyCallStack { at: usize },
}

impl Fault {
    /// The address of the instruction that faulted.
    pub fn address(&self) -> usize {
        match self {
            Fault::StackUnderflow { at }
            | Fault::UndefinedLocal { at, .. }
            | Fault::IncomparableTypes { at, .. }
            | Fault::UnsupportedOperandType { at, .. }
            | Fault::DivisionByZero { at }
            | Fault::InvalidAddress { at, .. }
            | Fault::EmptyCallStack { at } => *at,
        }
    }
}
