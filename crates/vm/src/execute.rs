//! Fetch-decode-execute loop and instruction dispatch.

use std::cmp::Ordering;
use std::mem;

use crate::error::Fault;
use crate::machine::{Frame, Machine};
use waffle_common::{Instruction, Program, Value};

impl Machine {
    /// Run a program from a fresh state until it halts or faults.
    ///
    /// State is fully reinitialized first (pc 0, running, empty stacks,
    /// root frame). Execution ends when `halt` runs or the pc advances
    /// past the last instruction — both clean halts. A fault stops the
    /// loop at once, clears the running flag, and leaves the stacks and
    /// frame exactly as they were when the violation was detected.
    pub fn run(&mut self, program: &Program) -> Result<(), Fault> {
        self.reset();

        while self.running && self.pc < program.len() {
            let at = self.pc;
            let instruction = &program.instructions[at];
            // Advance first; jump/call reassign pc to their target, so
            // fall-through and jumps land uniformly.
            self.pc = at + 1;

            if let Err(fault) = self.dispatch(instruction, at, program.len()) {
                self.running = false;
                return Err(fault);
            }
            self.notify(at, instruction);
        }

        Ok(())
    }

    /// Execute exactly one instruction against the live machine state.
    ///
    /// No reset happens first; this is the interactive, line-at-a-time
    /// entry point. There is no program to bound jump targets, so
    /// addresses are accepted as given. A faulted instruction leaves the
    /// state as of the fault and is never re-executed automatically; the
    /// caller may continue with its next instruction.
    pub fn step(&mut self, instruction: &Instruction) -> Result<(), Fault> {
        let at = self.pc;
        self.pc = at + 1;

        if let Err(fault) = self.dispatch(instruction, at, usize::MAX) {
            self.running = false;
            return Err(fault);
        }
        self.notify(at, instruction);
        Ok(())
    }

    /// Dispatch a single instruction. `at` is its address and `len` the
    /// program length bounding jump targets (`usize::MAX` when stepping).
    fn dispatch(&mut self, instruction: &Instruction, at: usize, len: usize) -> Result<(), Fault> {
        match instruction {
            Instruction::Push(value) => self.data_stack.push(value.clone()),
            Instruction::Pop => {
                // Discarded outright; the popped value is not surfaced.
                self.pop(at)?;
            }
            Instruction::Duplicate => {
                let top = self
                    .data_stack
                    .last()
                    .cloned()
                    .ok_or(Fault::StackUnderflow { at })?;
                self.data_stack.push(top);
            }
            Instruction::Swap => {
                let n = self.data_stack.len();
                if n < 2 {
                    return Err(Fault::StackUnderflow { at });
                }
                self.data_stack.swap(n - 2, n - 1);
            }

            Instruction::Load(key) => {
                let value = self
                    .frame
                    .locals
                    .get(key)
                    .cloned()
                    .ok_or_else(|| Fault::UndefinedLocal {
                        at,
                        key: key.clone(),
                    })?;
                self.data_stack.push(value);
            }
            Instruction::Store(key) => {
                let value = self.pop(at)?;
                self.frame.locals.insert(key.clone(), value);
            }
            Instruction::Forget(key) => {
                self.frame
                    .locals
                    .remove(key)
                    .ok_or_else(|| Fault::UndefinedLocal {
                        at,
                        key: key.clone(),
                    })?;
            }

            Instruction::Add => self.arithmetic(at, i64::wrapping_add, |a, b| a + b)?,
            Instruction::Subtract => self.arithmetic(at, i64::wrapping_sub, |a, b| a - b)?,
            Instruction::Multiply => self.arithmetic(at, i64::wrapping_mul, |a, b| a * b)?,
            Instruction::Divide => self.divide(at)?,
            Instruction::Negate => self.negate(at)?,

            Instruction::Equal => {
                let b = self.pop(at)?;
                let a = self.pop(at)?;
                self.data_stack.push(Value::Bool(a == b));
            }
            Instruction::Less => self.order(at, Ordering::Less)?,
            Instruction::Greater => self.order(at, Ordering::Greater)?,

            Instruction::Jump(target) => self.jump(at, *target, len)?,
            Instruction::TrueJump(target) => {
                if self.condition(at)? {
                    self.jump(at, *target, len)?;
                }
            }
            Instruction::FalseJump(target) => {
                if !self.condition(at)? {
                    self.jump(at, *target, len)?;
                }
            }

            Instruction::Call(target) => {
                if *target >= len {
                    return Err(Fault::InvalidAddress {
                        at,
                        target: *target,
                        len,
                    });
                }
                // The new frame records the call site, not the target,
                // so goback resumes at origin + 1.
                let caller = mem::replace(&mut self.frame, Frame::new(at));
                self.call_stack.push(caller);
                self.pc = *target;
            }
            Instruction::GoBack => {
                let caller = self.call_stack.pop().ok_or(Fault::EmptyCallStack { at })?;
                let finished = mem::replace(&mut self.frame, caller);
                self.pc = finished.origin + 1;
            }

            Instruction::Halt => self.running = false,
        }

        Ok(())
    }

    fn jump(&mut self, at: usize, target: usize, len: usize) -> Result<(), Fault> {
        if target >= len {
            return Err(Fault::InvalidAddress { at, target, len });
        }
        self.pc = target;
        Ok(())
    }

    /// Pop the condition for truejump/falsejump. Booleans only.
    fn condition(&mut self, at: usize) -> Result<bool, Fault> {
        match self.pop(at)? {
            Value::Bool(b) => Ok(b),
            other => Err(Fault::UnsupportedOperandType {
                at,
                operand: other.kind(),
            }),
        }
    }

    /// Pop b, pop a, push a ∘ b. Int stays int (wrapping); any float
    /// operand promotes the result to float.
    fn arithmetic(
        &mut self,
        at: usize,
        int_op: fn(i64, i64) -> i64,
        float_op: fn(f64, f64) -> f64,
    ) -> Result<(), Fault> {
        let b = self.pop(at)?;
        let a = self.pop(at)?;
        let result = match (&a, &b) {
            (Value::Int(x), Value::Int(y)) => Value::Int(int_op(*x, *y)),
            (Value::Int(x), Value::Float(y)) => Value::Float(float_op(*x as f64, *y)),
            (Value::Float(x), Value::Int(y)) => Value::Float(float_op(*x, *y as f64)),
            (Value::Float(x), Value::Float(y)) => Value::Float(float_op(*x, *y)),
            _ => {
                let operand = if a.kind().is_numeric() {
                    b.kind()
                } else {
                    a.kind()
                };
                return Err(Fault::UnsupportedOperandType { at, operand });
            }
        };
        self.data_stack.push(result);
        Ok(())
    }

    /// True division: always computes in f64 and pushes a float, even
    /// for two ints. A numerically zero divisor is its own fault.
    fn divide(&mut self, at: usize) -> Result<(), Fault> {
        let b = self.pop(at)?;
        let a = self.pop(at)?;
        let x = Self::as_float(at, &a)?;
        let y = Self::as_float(at, &b)?;
        if y == 0.0 {
            return Err(Fault::DivisionByZero { at });
        }
        self.data_stack.push(Value::Float(x / y));
        Ok(())
    }

    fn negate(&mut self, at: usize) -> Result<(), Fault> {
        let result = match self.pop(at)? {
            Value::Int(n) => Value::Int(n.wrapping_neg()),
            Value::Float(x) => Value::Float(-x),
            other => {
                return Err(Fault::UnsupportedOperandType {
                    at,
                    operand: other.kind(),
                })
            }
        };
        self.data_stack.push(result);
        Ok(())
    }

    /// Pop b, pop a, push the boolean of `a cmp b == wanted`. Numeric
    /// kinds order against each other (ints exactly, mixed via f64);
    /// text orders lexicographically against text; everything else is
    /// incomparable.
    fn order(&mut self, at: usize, wanted: Ordering) -> Result<(), Fault> {
        let b = self.pop(at)?;
        let a = self.pop(at)?;
        let ordering = match (&a, &b) {
            (Value::Int(x), Value::Int(y)) => Some(x.cmp(y)),
            (Value::Int(x), Value::Float(y)) => (*x as f64).partial_cmp(y),
            (Value::Float(x), Value::Int(y)) => x.partial_cmp(&(*y as f64)),
            (Value::Float(x), Value::Float(y)) => x.partial_cmp(y),
            (Value::Text(x), Value::Text(y)) => Some(x.cmp(y)),
            _ => {
                return Err(Fault::IncomparableTypes {
                    at,
                    lhs: a.kind(),
                    rhs: b.kind(),
                })
            }
        };
        // NaN orders against nothing: both less and greater come out false.
        self.data_stack.push(Value::Bool(ordering == Some(wanted)));
        Ok(())
    }

    fn as_float(at: usize, value: &Value) -> Result<f64, Fault> {
        match value {
            Value::Int(n) => Ok(*n as f64),
            Value::Float(x) => Ok(*x),
            other => Err(Fault::UnsupportedOperandType {
                at,
                operand: other.kind(),
            }),
        }
    }
}
