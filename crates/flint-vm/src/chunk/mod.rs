//! Bytecode chunks.
//!
//! A chunk is a self-contained unit of compiled bytecode: the instruction
//! bytes (an opcode followed by zero or more operand bytes), a parallel
//! table mapping every byte to the source line that produced it, and the
//! constant pool those instructions index into. A chunk is created empty,
//! grown by appends only, and released as a unit.
//!
//! ## Structure
//!
//! - `debug.rs` - Human-readable disassembly

pub mod debug;

use crate::memory::DynArray;
use crate::value::{Value, ValueArray};

/// Operation codes understood by the VM.
///
/// The wire shape is one opcode byte followed by that opcode's operand
/// bytes; only `Constant` carries an operand today, a one-byte index into
/// the chunk's constant pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OpCode {
    /// Push a constant from the pool; one operand byte, the pool index
    Constant,
    /// Push nil
    Nil,
    /// Push true
    True,
    /// Push false
    False,
    /// Pop two values, push whether they are equal
    Equal,
    /// Pop two numbers, push whether the first is greater
    Greater,
    /// Pop two numbers, push whether the first is smaller
    Less,
    /// Pop two numbers, push their sum
    Add,
    /// Pop two numbers, push their difference
    Subtract,
    /// Pop two numbers, push their product
    Multiply,
    /// Pop two numbers, push their quotient
    Divide,
    /// Pop a value, push its logical negation
    Not,
    /// Pop a number, push its arithmetic negation
    Negate,
    /// Halt execution, yielding the top of the stack
    Return,
}

impl OpCode {
    /// Decodes an instruction byte, or `None` for bytes that spell no
    /// opcode.
    pub fn from_byte(byte: u8) -> Option<OpCode> {
        Some(match byte {
            0 => OpCode::Constant,
            1 => OpCode::Nil,
            2 => OpCode::True,
            3 => OpCode::False,
            4 => OpCode::Equal,
            5 => OpCode::Greater,
            6 => OpCode::Less,
            7 => OpCode::Add,
            8 => OpCode::Subtract,
            9 => OpCode::Multiply,
            10 => OpCode::Divide,
            11 => OpCode::Not,
            12 => OpCode::Negate,
            13 => OpCode::Return,
            _ => return None,
        })
    }

    /// Returns the mnemonic used by the disassembler.
    pub fn name(self) -> &'static str {
        match self {
            OpCode::Constant => "OP_CONSTANT",
            OpCode::Nil => "OP_NIL",
            OpCode::True => "OP_TRUE",
            OpCode::False => "OP_FALSE",
            OpCode::Equal => "OP_EQUAL",
            OpCode::Greater => "OP_GREATER",
            OpCode::Less => "OP_LESS",
            OpCode::Add => "OP_ADD",
            OpCode::Subtract => "OP_SUBTRACT",
            OpCode::Multiply => "OP_MULTIPLY",
            OpCode::Divide => "OP_DIVIDE",
            OpCode::Not => "OP_NOT",
            OpCode::Negate => "OP_NEGATE",
            OpCode::Return => "OP_RETURN",
        }
    }
}

/// A unit of compiled bytecode plus its constant pool and line table.
///
/// Invariant: the line table is always exactly as long as the code array,
/// so the source line of any instruction byte can be looked up by offset.
#[derive(Debug, Default)]
pub struct Chunk {
    code: DynArray<u8>,
    lines: DynArray<u32>,
    constants: ValueArray,
}

impl Chunk {
    /// Creates an empty chunk.
    pub fn new() -> Self {
        Self {
            code: DynArray::new(),
            lines: DynArray::new(),
            constants: ValueArray::new(),
        }
    }

    /// Appends one instruction or operand byte, recording the source line
    /// it came from.
    pub fn write(&mut self, byte: u8, line: u32) {
        self.code.push(byte);
        self.lines.push(line);
        debug_assert_eq!(self.code.len(), self.lines.len());
    }

    /// Appends an opcode byte.
    pub fn write_op(&mut self, op: OpCode, line: u32) {
        self.write(op as u8, line);
    }

    /// Appends a value to the constant pool and returns its index.
    ///
    /// The caller encodes the index as an operand byte in a following
    /// [`write`](Chunk::write); whether it fits the operand width is the
    /// caller's problem, not the pool's.
    pub fn add_constant(&mut self, value: Value) -> usize {
        self.constants.push(value);
        self.constants.len() - 1
    }

    /// Views the instruction bytes.
    pub fn code(&self) -> &[u8] {
        self.code.as_slice()
    }

    /// Returns the number of instruction bytes.
    pub fn len(&self) -> usize {
        self.code.len()
    }

    /// Returns true if no bytes have been written.
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Returns the source line of the byte at `offset`, if in bounds.
    pub fn line(&self, offset: usize) -> Option<u32> {
        self.lines.get(offset)
    }

    /// Returns the constant at `index`, if in bounds.
    pub fn constant(&self, index: usize) -> Option<Value> {
        self.constants.get(index)
    }

    /// Views the constant pool.
    pub fn constants(&self) -> &ValueArray {
        &self.constants
    }

    /// Releases all backing storage and resets the chunk to empty.
    pub fn free(&mut self) {
        self.code.free();
        self.lines.free();
        self.constants.free();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_bytes_round_trip() {
        let ops = [
            OpCode::Constant,
            OpCode::Nil,
            OpCode::True,
            OpCode::False,
            OpCode::Equal,
            OpCode::Greater,
            OpCode::Less,
            OpCode::Add,
            OpCode::Subtract,
            OpCode::Multiply,
            OpCode::Divide,
            OpCode::Not,
            OpCode::Negate,
            OpCode::Return,
        ];
        for op in ops {
            assert_eq!(OpCode::from_byte(op as u8), Some(op));
        }
        assert_eq!(OpCode::from_byte(14), None);
        assert_eq!(OpCode::from_byte(255), None);
    }

    #[test]
    fn test_write_keeps_code_and_lines_in_lockstep() {
        let mut chunk = Chunk::new();
        chunk.write_op(OpCode::Return, 1);
        chunk.write_op(OpCode::Nil, 2);
        chunk.write(0x07, 2);

        assert_eq!(chunk.len(), 3);
        assert_eq!(chunk.code(), &[OpCode::Return as u8, OpCode::Nil as u8, 0x07]);
        assert_eq!(chunk.line(0), Some(1));
        assert_eq!(chunk.line(1), Some(2));
        assert_eq!(chunk.line(2), Some(2));
        assert_eq!(chunk.line(3), None);
    }

    #[test]
    fn test_lockstep_invariant_over_many_writes() {
        let mut chunk = Chunk::new();
        for i in 0..300u32 {
            chunk.write((i % 14) as u8, i);
            assert_eq!(chunk.len(), chunk.lines.len());
        }
        assert_eq!(chunk.len(), 300);
    }

    #[test]
    fn test_add_constant_returns_sequential_indices() {
        let mut chunk = Chunk::new();
        for i in 0..10 {
            let index = chunk.add_constant(Value::number(i as f64));
            assert_eq!(index, i);
        }
        assert_eq!(chunk.constants().len(), 10);
        assert_eq!(chunk.constant(3), Some(Value::number(3.0)));
        assert_eq!(chunk.constant(10), None);
    }

    #[test]
    fn test_free_resets_everything() {
        let mut chunk = Chunk::new();
        chunk.write_op(OpCode::Return, 1);
        chunk.add_constant(Value::nil());

        chunk.free();
        assert!(chunk.is_empty());
        assert_eq!(chunk.constants().len(), 0);
        assert_eq!(chunk.line(0), None);
    }
}
