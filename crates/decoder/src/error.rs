//! Decode errors for the Waffle text format.

use thiserror::Error;

/// Errors produced while decoding text into a program.
///
/// Decoding aborts on the first error; no partial program is produced.
/// `line` is the 1-based source line of the offending input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The line's first token is not a known mnemonic.
    #[error("line {line}: unknown opcode '{token}'")]
    UnknownOpcode { line: usize, token: String },

    /// The operand is missing, extra, or cannot be classified as the
    /// kind the opcode requires.
    #[error("line {line}: {opcode}: {reason}")]
    MalformedOperand {
        line: usize,
        opcode: &'static str,
        reason: String,
    },
}

impl DecodeError {
    /// The 1-based source line the error points at.
    pub fn line(&self) -> usize {
        match self {
            DecodeError::UnknownOpcode { line, .. }
            | DecodeError::MalformedOperand { line, .. } => *line,
        }
    }
}
