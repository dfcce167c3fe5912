//! Waffle text bytecode decoder.
//!
//! The external format is newline-separated: one case-insensitive
//! mnemonic per line, followed by at most one whitespace-separated
//! operand token. Everything from the first `;` onward is a comment;
//! blank lines are skipped. Decoding aborts on the first error and never
//! produces a partial program.
//!
//! # Usage
//!
//! ```
//! use waffle_decoder::decode;
//!
//! let program = decode("push 2\npush 3\nadd ; sum\nhalt\n").unwrap();
//! assert_eq!(program.len(), 4);
//! ```

pub mod error;

mod scanner;

pub use error::DecodeError;

use scanner::classify;
use waffle_common::{Instruction, Opcode, Program, Value};

/// Decode a whole source text into a program.
///
/// Returns the first error encountered; no instruction of an erroneous
/// source ever executes.
pub fn decode(text: &str) -> Result<Program, DecodeError> {
    let mut instructions = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        if let Some(instruction) = decode_line(line, idx + 1)? {
            instructions.push(instruction);
        }
    }

    Ok(Program::new(instructions))
}

/// Decode a single line, for interactive line-at-a-time use.
///
/// Returns `Ok(None)` for blank and comment-only lines. `line_num` is
/// the 1-based position reported in errors.
pub fn decode_line(line: &str, line_num: usize) -> Result<Option<Instruction>, DecodeError> {
    // Strip comment, then tokenize.
    let line = match line.find(';') {
        Some(pos) => &line[..pos],
        None => line,
    };
    let mut tokens = line.split_whitespace();

    let Some(mnemonic) = tokens.next() else {
        return Ok(None);
    };
    let opcode = Opcode::from_mnemonic(mnemonic).ok_or_else(|| DecodeError::UnknownOpcode {
        line: line_num,
        token: mnemonic.to_string(),
    })?;

    let operand = tokens.next();
    if let Some(extra) = tokens.next() {
        return Err(malformed(
            line_num,
            opcode,
            format!("unexpected extra token '{extra}'"),
        ));
    }

    build(opcode, operand, line_num).map(Some)
}

fn build(
    opcode: Opcode,
    operand: Option<&str>,
    line: usize,
) -> Result<Instruction, DecodeError> {
    let instruction = match opcode {
        Opcode::Push => Instruction::Push(value_operand(opcode, operand, line)?),
        Opcode::Load => Instruction::Load(value_operand(opcode, operand, line)?),
        Opcode::Store => Instruction::Store(value_operand(opcode, operand, line)?),
        Opcode::Forget => Instruction::Forget(value_operand(opcode, operand, line)?),

        Opcode::Jump => Instruction::Jump(address_operand(opcode, operand, line)?),
        Opcode::TrueJump => Instruction::TrueJump(address_operand(opcode, operand, line)?),
        Opcode::FalseJump => Instruction::FalseJump(address_operand(opcode, operand, line)?),
        Opcode::Call => Instruction::Call(address_operand(opcode, operand, line)?),

        Opcode::Pop => no_operand(opcode, operand, line, Instruction::Pop)?,
        Opcode::Duplicate => no_operand(opcode, operand, line, Instruction::Duplicate)?,
        Opcode::Swap => no_operand(opcode, operand, line, Instruction::Swap)?,
        Opcode::Add => no_operand(opcode, operand, line, Instruction::Add)?,
        Opcode::Subtract => no_operand(opcode, operand, line, Instruction::Subtract)?,
        Opcode::Multiply => no_operand(opcode, operand, line, Instruction::Multiply)?,
        Opcode::Divide => no_operand(opcode, operand, line, Instruction::Divide)?,
        Opcode::Negate => no_operand(opcode, operand, line, Instruction::Negate)?,
        Opcode::Equal => no_operand(opcode, operand, line, Instruction::Equal)?,
        Opcode::Less => no_operand(opcode, operand, line, Instruction::Less)?,
        Opcode::Greater => no_operand(opcode, operand, line, Instruction::Greater)?,
        Opcode::GoBack => no_operand(opcode, operand, line, Instruction::GoBack)?,
        Opcode::Halt => no_operand(opcode, operand, line, Instruction::Halt)?,
    };

    Ok(instruction)
}

fn malformed(line: usize, opcode: Opcode, reason: String) -> DecodeError {
    DecodeError::MalformedOperand {
        line,
        opcode: opcode.mnemonic(),
        reason,
    }
}

fn required<'a>(
    opcode: Opcode,
    operand: Option<&'a str>,
    line: usize,
) -> Result<&'a str, DecodeError> {
    operand.ok_or_else(|| malformed(line, opcode, "missing operand".to_string()))
}

fn no_operand(
    opcode: Opcode,
    operand: Option<&str>,
    line: usize,
    instruction: Instruction,
) -> Result<Instruction, DecodeError> {
    match operand {
        None => Ok(instruction),
        Some(token) => Err(malformed(
            line,
            opcode,
            format!("takes no operand, found '{token}'"),
        )),
    }
}

/// A value or local-slot key operand: any classifiable token.
fn value_operand(
    opcode: Opcode,
    operand: Option<&str>,
    line: usize,
) -> Result<Value, DecodeError> {
    let token = required(opcode, operand, line)?;
    classify(token).map_err(|reason| malformed(line, opcode, reason))
}

/// An absolute instruction address: a nonnegative integer token.
fn address_operand(
    opcode: Opcode,
    operand: Option<&str>,
    line: usize,
) -> Result<usize, DecodeError> {
    let token = required(opcode, operand, line)?;
    match classify(token).map_err(|reason| malformed(line, opcode, reason))? {
        Value::Int(n) if n >= 0 => usize::try_from(n)
            .map_err(|_| malformed(line, opcode, format!("address '{token}' out of range"))),
        _ => Err(malformed(
            line,
            opcode,
            format!("'{token}' is not a nonnegative integer address"),
        )),
    }
}
