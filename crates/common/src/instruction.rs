//! Executable instruction representation.
//!
//! Each variant carries exactly the operand its opcode requires, so a
//! decoded program can never reach the VM with a missing or extra
//! operand. Addresses are absolute indices into the owning
//! [`crate::Program`].

use std::fmt;

use crate::opcode::Opcode;
use crate::value::Value;

/// A single decoded instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// Push a value onto the data stack.
    Push(Value),
    /// Remove and discard the top of the data stack.
    Pop,
    /// Push a copy of the top of the data stack.
    Duplicate,
    /// Exchange the top two elements of the data stack.
    Swap,
    /// Push the current frame's local bound to the key.
    Load(Value),
    /// Pop the top of the data stack into the current frame's local.
    Store(Value),
    /// Remove the key from the current frame's locals.
    Forget(Value),
    /// Pop b, pop a, push a + b.
    Add,
    /// Pop b, pop a, push a - b.
    Subtract,
    /// Pop b, pop a, push a * b.
    Multiply,
    /// Pop b, pop a, push a / b (always a float).
    Divide,
    /// Pop a, push -a.
    Negate,
    /// Pop b, pop a, push the boolean a == b.
    Equal,
    /// Pop b, pop a, push the boolean a < b.
    Less,
    /// Pop b, pop a, push the boolean a > b.
    Greater,
    /// Unconditional absolute jump.
    Jump(usize),
    /// Pop a boolean; jump if true.
    TrueJump(usize),
    /// Pop a boolean; jump if false.
    FalseJump(usize),
    /// Push the current frame, enter a fresh frame, jump to the target.
    Call(usize),
    /// Pop the call stack into the current frame, resume after the call.
    GoBack,
    /// Stop execution.
    Halt,
}

impl Instruction {
    /// Returns the opcode tag for this instruction.
    pub fn opcode(&self) -> Opcode {
        match self {
            Instruction::Push(_) => Opcode::Push,
            Instruction::Pop => Opcode::Pop,
            Instruction::Duplicate => Opcode::Duplicate,
            Instruction::Swap => Opcode::Swap,
            Instruction::Load(_) => Opcode::Load,
            Instruction::Store(_) => Opcode::Store,
            Instruction::Forget(_) => Opcode::Forget,
            Instruction::Add => Opcode::Add,
            Instruction::Subtract => Opcode::Subtract,
            Instruction::Multiply => Opcode::Multiply,
            Instruction::Divide => Opcode::Divide,
            Instruction::Negate => Opcode::Negate,
            Instruction::Equal => Opcode::Equal,
            Instruction::Less => Opcode::Less,
            Instruction::Greater => Opcode::Greater,
            Instruction::Jump(_) => Opcode::Jump,
            Instruction::TrueJump(_) => Opcode::TrueJump,
            Instruction::FalseJump(_) => Opcode::FalseJump,
            Instruction::Call(_) => Opcode::Call,
            Instruction::GoBack => Opcode::GoBack,
            Instruction::Halt => Opcode::Halt,
        }
    }
}

impl fmt::Display for Instruction {
    /// Text-format rendering: mnemonic plus operand, text operands
    /// re-quoted. Used by trace output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Push(v) => write!(f, "push {}", QuotedText(v)),
            Instruction::Load(k) => write!(f, "load {}", QuotedText(k)),
            Instruction::Store(k) => write!(f, "store {}", QuotedText(k)),
            Instruction::Forget(k) => write!(f, "forget {}", QuotedText(k)),
            Instruction::Jump(t) => write!(f, "jump {t}"),
            Instruction::TrueJump(t) => write!(f, "truejump {t}"),
            Instruction::FalseJump(t) => write!(f, "falsejump {t}"),
            Instruction::Call(t) => write!(f, "call {t}"),
            other => f.write_str(other.opcode().mnemonic()),
        }
    }
}

/// Wraps text operands in single quotes; everything else displays as-is.
struct QuotedText<'a>(&'a Value);

impl fmt::Display for QuotedText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Value::Text(s) => write!(f, "'{s}'"),
            other => write!(f, "{other}"),
        }
    }
}
