//! Opcode definitions for the Waffle instruction set.
//!
//! The opcode table pairs each mnemonic with its operand arity. The
//! decoder drives its parsing off [`Opcode::operand`]; the VM dispatches
//! on [`crate::Instruction`] variants instead, so an executable
//! instruction can never carry the wrong operand shape.

/// Identifies the operation an instruction performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // Stack operations
    Push,
    Pop,
    Duplicate,
    Swap,
    // Local variable operations
    Load,
    Store,
    Forget,
    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,
    Negate,
    // Comparison
    Equal,
    Less,
    Greater,
    // Control flow
    Jump,
    TrueJump,
    FalseJump,
    // Function calls
    Call,
    GoBack,
    // Program lifecycle
    Halt,
}

/// What kind of operand token an opcode expects in the text format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    /// No operand token allowed.
    None,
    /// Any classified value (int, float, or text literal).
    Value,
    /// A nonnegative integer instruction address.
    Address,
    /// A local-slot key; any classified value.
    Key,
}

/// All opcodes, in definition order. Used for mnemonic lookup and
/// exhaustive tests.
pub const ALL_OPCODES: [Opcode; 21] = [
    Opcode::Push,
    Opcode::Pop,
    Opcode::Duplicate,
    Opcode::Swap,
    Opcode::Load,
    Opcode::Store,
    Opcode::Forget,
    Opcode::Add,
    Opcode::Subtract,
    Opcode::Multiply,
    Opcode::Divide,
    Opcode::Negate,
    Opcode::Equal,
    Opcode::Less,
    Opcode::Greater,
    Opcode::Jump,
    Opcode::TrueJump,
    Opcode::FalseJump,
    Opcode::Call,
    Opcode::GoBack,
    Opcode::Halt,
];

impl Opcode {
    /// Returns the text-format mnemonic for this opcode.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Push => "push",
            Opcode::Pop => "pop",
            Opcode::Duplicate => "duplicate",
            Opcode::Swap => "swap",
            Opcode::Load => "load",
            Opcode::Store => "store",
            Opcode::Forget => "forget",
            Opcode::Add => "add",
            Opcode::Subtract => "subtract",
            Opcode::Multiply => "multiply",
            Opcode::Divide => "divide",
            Opcode::Negate => "negate",
            Opcode::Equal => "equal",
            Opcode::Less => "less",
            Opcode::Greater => "greater",
            Opcode::Jump => "jump",
            Opcode::TrueJump => "truejump",
            Opcode::FalseJump => "falsejump",
            Opcode::Call => "call",
            Opcode::GoBack => "goback",
            Opcode::Halt => "halt",
        }
    }

    /// Returns the operand kind this opcode expects.
    pub fn operand(&self) -> OperandKind {
        match self {
            Opcode::Push => OperandKind::Value,
            Opcode::Load | Opcode::Store | Opcode::Forget => OperandKind::Key,
            Opcode::Jump | Opcode::TrueJump | Opcode::FalseJump | Opcode::Call => {
                OperandKind::Address
            }
            Opcode::Pop
            | Opcode::Duplicate
            | Opcode::Swap
            | Opcode::Add
            | Opcode::Subtract
            | Opcode::Multiply
            | Opcode::Divide
            | Opcode::Negate
            | Opcode::Equal
            | Opcode::Less
            | Opcode::Greater
            | Opcode::GoBack
            | Opcode::Halt => OperandKind::None,
        }
    }

    /// Case-insensitive mnemonic lookup.
    pub fn from_mnemonic(token: &str) -> Option<Opcode> {
        ALL_OPCODES
            .iter()
            .find(|op| op.mnemonic().eq_ignore_ascii_case(token))
            .copied()
    }
}
