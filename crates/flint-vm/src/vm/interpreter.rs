//! The bytecode interpreter.

use tracing::trace;

use crate::chunk::{Chunk, OpCode, debug::disassemble_instruction};
use crate::compiler;
use crate::error::{InterpretError, RuntimeError};
use crate::value::Value;

/// Maximum depth of the operand stack.
pub const STACK_MAX: usize = 256;

/// The Flint virtual machine.
///
/// Holds the operand stack; the chunk being executed and the instruction
/// pointer live only for the duration of [`Vm::run`], so a single machine
/// can execute any number of chunks in turn.
pub struct Vm {
    stack: Vec<Value>,
}

impl Vm {
    /// Creates a machine with an empty stack.
    pub fn new() -> Self {
        Self {
            stack: Vec::with_capacity(STACK_MAX),
        }
    }

    /// Compiles and executes a source string.
    ///
    /// Returns the value left on top of the stack by the final return, or
    /// nil if the stack was empty. The two failure phases are kept apart:
    /// diagnostics from compilation arrive as [`InterpretError::Compile`]
    /// and the chunk never runs, while execution faults arrive as
    /// [`InterpretError::Runtime`].
    pub fn interpret(&mut self, source: &str) -> Result<Value, InterpretError> {
        let chunk = compiler::compile(source).map_err(InterpretError::Compile)?;
        let value = self.run(&chunk)?;
        Ok(value)
    }

    /// Executes a compiled chunk from its first instruction.
    pub fn run(&mut self, chunk: &Chunk) -> Result<Value, RuntimeError> {
        self.stack.clear();
        let code = chunk.code();
        // Keeping the instruction pointer in a local lets the optimizer
        // hold it in a register across the dispatch loop.
        let mut ip = 0usize;

        loop {
            let offset = ip;
            let Some(&byte) = code.get(ip) else {
                return Err(self.fault(chunk, offset, "Ran off the end of the chunk."));
            };
            ip += 1;

            if tracing::enabled!(tracing::Level::TRACE) {
                self.trace_instruction(chunk, offset);
            }

            let Some(op) = OpCode::from_byte(byte) else {
                return Err(self.fault(chunk, offset, format!("Unknown opcode {byte}.")));
            };

            match op {
                OpCode::Constant => {
                    let Some(&index) = code.get(ip) else {
                        return Err(self.fault(chunk, offset, "Missing constant operand."));
                    };
                    ip += 1;
                    let Some(value) = chunk.constant(index as usize) else {
                        return Err(self.fault(
                            chunk,
                            offset,
                            format!("Constant index {index} out of range."),
                        ));
                    };
                    self.push(chunk, offset, value)?;
                }
                OpCode::Nil => self.push(chunk, offset, Value::nil())?,
                OpCode::True => self.push(chunk, offset, Value::boolean(true))?,
                OpCode::False => self.push(chunk, offset, Value::boolean(false))?,
                OpCode::Equal => {
                    let b = self.pop(chunk, offset)?;
                    let a = self.pop(chunk, offset)?;
                    self.push(chunk, offset, Value::boolean(a == b))?;
                }
                OpCode::Greater => {
                    self.binary_numbers(chunk, offset, |a, b| Value::boolean(a > b))?;
                }
                OpCode::Less => {
                    self.binary_numbers(chunk, offset, |a, b| Value::boolean(a < b))?;
                }
                OpCode::Add => {
                    self.binary_numbers(chunk, offset, |a, b| Value::number(a + b))?;
                }
                OpCode::Subtract => {
                    self.binary_numbers(chunk, offset, |a, b| Value::number(a - b))?;
                }
                OpCode::Multiply => {
                    self.binary_numbers(chunk, offset, |a, b| Value::number(a * b))?;
                }
                OpCode::Divide => {
                    self.binary_numbers(chunk, offset, |a, b| Value::number(a / b))?;
                }
                OpCode::Not => {
                    let value = self.pop(chunk, offset)?;
                    self.push(chunk, offset, Value::boolean(is_falsey(value)))?;
                }
                OpCode::Negate => {
                    let value = self.pop(chunk, offset)?;
                    if !value.is_number() {
                        return Err(self.fault(chunk, offset, "Operand must be a number."));
                    }
                    self.push(chunk, offset, Value::number(-value.as_number()))?;
                }
                OpCode::Return => {
                    return Ok(self.stack.pop().unwrap_or_else(Value::nil));
                }
            }
        }
    }

    fn push(&mut self, chunk: &Chunk, offset: usize, value: Value) -> Result<(), RuntimeError> {
        if self.stack.len() >= STACK_MAX {
            return Err(self.fault(chunk, offset, "Stack overflow."));
        }
        self.stack.push(value);
        Ok(())
    }

    fn pop(&mut self, chunk: &Chunk, offset: usize) -> Result<Value, RuntimeError> {
        match self.stack.pop() {
            Some(value) => Ok(value),
            None => Err(self.fault(chunk, offset, "Stack underflow.")),
        }
    }

    /// Pops two numeric operands and pushes `f(a, b)` with `a` the deeper
    /// of the two.
    fn binary_numbers(
        &mut self,
        chunk: &Chunk,
        offset: usize,
        f: impl FnOnce(f64, f64) -> Value,
    ) -> Result<(), RuntimeError> {
        let b = self.pop(chunk, offset)?;
        let a = self.pop(chunk, offset)?;
        if !a.is_number() || !b.is_number() {
            return Err(self.fault(chunk, offset, "Operands must be numbers."));
        }
        self.push(chunk, offset, f(a.as_number(), b.as_number()))
    }

    fn fault(&self, chunk: &Chunk, offset: usize, message: impl Into<String>) -> RuntimeError {
        RuntimeError {
            line: chunk.line(offset).unwrap_or(0),
            message: message.into(),
        }
    }

    fn trace_instruction(&self, chunk: &Chunk, offset: usize) {
        let mut listing = String::new();
        disassemble_instruction(chunk, offset, &mut listing);
        let stack: Vec<String> = self.stack.iter().map(|v| format!("[ {v} ]")).collect();
        trace!("{:>10} {}", stack.join(""), listing.trim_end());
    }
}

impl Default for Vm {
    fn default() -> Self {
        Self::new()
    }
}

/// Nil and false are falsey; every other value is truthy.
fn is_falsey(value: Value) -> bool {
    value.is_nil() || (value.is_bool() && !value.as_bool())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_chunk(chunk: &Chunk) -> Result<Value, RuntimeError> {
        Vm::new().run(chunk)
    }

    fn interpret(source: &str) -> Result<Value, InterpretError> {
        Vm::new().interpret(source)
    }

    #[test]
    fn test_return_on_empty_stack_yields_nil() {
        let mut chunk = Chunk::new();
        chunk.write_op(OpCode::Return, 1);
        let value = run_chunk(&chunk).unwrap();
        assert!(value.is_nil());
    }

    #[test]
    fn test_constant_then_return_yields_the_constant() {
        let mut chunk = Chunk::new();
        let index = chunk.add_constant(Value::number(42.0));
        chunk.write_op(OpCode::Constant, 1);
        chunk.write(index as u8, 1);
        chunk.write_op(OpCode::Return, 1);
        let value = run_chunk(&chunk).unwrap();
        assert_eq!(value.as_number(), 42.0);
    }

    #[test]
    fn test_arithmetic_on_empty_stack_is_a_runtime_error() {
        let mut chunk = Chunk::new();
        chunk.write_op(OpCode::Add, 3);
        let error = run_chunk(&chunk).unwrap_err();
        assert_eq!(error.message, "Stack underflow.");
        assert_eq!(error.line, 3);
    }

    #[test]
    fn test_unknown_opcode_is_a_runtime_error() {
        let mut chunk = Chunk::new();
        chunk.write(0xff, 7);
        let error = run_chunk(&chunk).unwrap_err();
        assert_eq!(error.message, "Unknown opcode 255.");
        assert_eq!(error.line, 7);
    }

    #[test]
    fn test_running_off_the_end_is_a_runtime_error() {
        let mut chunk = Chunk::new();
        let index = chunk.add_constant(Value::number(1.0));
        chunk.write_op(OpCode::Constant, 1);
        chunk.write(index as u8, 1);
        // No return
        let error = run_chunk(&chunk).unwrap_err();
        assert_eq!(error.message, "Ran off the end of the chunk.");
    }

    #[test]
    fn test_arithmetic_expression() {
        let value = interpret("(1 + 2) * 3 - 4 / 2").unwrap();
        assert_eq!(value.as_number(), 7.0);
    }

    #[test]
    fn test_comparison_and_negation() {
        assert!(interpret("1 < 2").unwrap().as_bool());
        assert!(!interpret("1 > 2").unwrap().as_bool());
        assert!(interpret("!(1 > 2)").unwrap().as_bool());
        assert!(interpret("2 >= 2").unwrap().as_bool());
        assert!(interpret("1 != 2").unwrap().as_bool());
    }

    #[test]
    fn test_equality_across_kinds_is_false() {
        assert!(!interpret("1 == true").unwrap().as_bool());
        assert!(!interpret("nil == false").unwrap().as_bool());
    }

    #[test]
    fn test_falsiness() {
        assert!(interpret("!nil").unwrap().as_bool());
        assert!(interpret("!false").unwrap().as_bool());
        assert!(!interpret("!0").unwrap().as_bool());
        assert!(!interpret("!true").unwrap().as_bool());
    }

    #[test]
    fn test_negate_requires_a_number() {
        let error = interpret("-true").unwrap_err();
        assert_eq!(
            error.to_string(),
            "[line 1] Operand must be a number."
        );
    }

    #[test]
    fn test_add_requires_numbers() {
        let error = interpret("1 + nil").unwrap_err();
        assert_eq!(error.to_string(), "[line 1] Operands must be numbers.");
    }

    #[test]
    fn test_compile_errors_never_run() {
        let error = interpret("1 +").unwrap_err();
        assert!(matches!(error, InterpretError::Compile(_)));
    }

    #[test]
    fn test_stack_overflow_is_reported() {
        let mut chunk = Chunk::new();
        for _ in 0..=STACK_MAX {
            chunk.write_op(OpCode::Nil, 1);
        }
        chunk.write_op(OpCode::Return, 1);
        let error = run_chunk(&chunk).unwrap_err();
        assert_eq!(error.message, "Stack overflow.");
    }

    #[test]
    fn test_machine_is_reusable_across_runs() {
        let mut vm = Vm::new();
        assert_eq!(vm.interpret("1 + 1").unwrap().as_number(), 2.0);
        assert!(vm.interpret("1 +").is_err());
        assert_eq!(vm.interpret("2 * 3").unwrap().as_number(), 6.0);
    }
}
