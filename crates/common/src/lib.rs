//! Waffle common types.
//!
//! This crate provides the foundational data structures shared by the
//! decoder and the VM:
//!
//! - [`Value`] — the tagged value union (int, float, bool, text)
//! - [`Opcode`] — the opcode table with mnemonics and operand arity
//! - [`Instruction`] — an opcode plus its operand, one enum variant each
//! - [`Program`] — an ordered, immutable instruction sequence
//!
//! It has no dependencies.

pub mod instruction;
pub mod opcode;
pub mod program;
pub mod value;

// Re-export commonly used types at the crate root.
pub use instruction::Instruction;
pub use opcode::{Opcode, OperandKind};
pub use program::Program;
pub use value::{Value, ValueKind};
