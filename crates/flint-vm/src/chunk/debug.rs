//! Human-readable chunk disassembly.
//!
//! Used by compiler debug logging, VM execution tracing, and tests. The
//! listing format is one instruction per row: byte offset, source line
//! (`|` when unchanged from the previous instruction), mnemonic, and any
//! operand with its resolved constant.

use std::fmt::Write;

use super::{Chunk, OpCode};

/// Renders every instruction in a chunk under a name banner.
pub fn disassemble_chunk(chunk: &Chunk, name: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", name);

    let mut offset = 0;
    while offset < chunk.len() {
        offset = disassemble_instruction(chunk, offset, &mut out);
    }
    out
}

/// Renders the instruction at `offset` into `out`, returning the offset of
/// the next instruction.
pub fn disassemble_instruction(chunk: &Chunk, offset: usize, out: &mut String) -> usize {
    let _ = write!(out, "{:04} ", offset);

    let line = chunk.line(offset);
    if offset > 0 && line == chunk.line(offset - 1) {
        let _ = write!(out, "   | ");
    } else {
        let _ = write!(out, "{:4} ", line.unwrap_or(0));
    }

    let Some(byte) = chunk.code().get(offset).copied() else {
        let _ = writeln!(out, "<end of chunk>");
        return offset + 1;
    };

    match OpCode::from_byte(byte) {
        Some(OpCode::Constant) => constant_instruction(chunk, OpCode::Constant, offset, out),
        Some(op) => simple_instruction(op, offset, out),
        None => {
            let _ = writeln!(out, "Unknown opcode {}", byte);
            offset + 1
        }
    }
}

fn simple_instruction(op: OpCode, offset: usize, out: &mut String) -> usize {
    let _ = writeln!(out, "{}", op.name());
    offset + 1
}

fn constant_instruction(chunk: &Chunk, op: OpCode, offset: usize, out: &mut String) -> usize {
    let Some(index) = chunk.code().get(offset + 1).copied() else {
        let _ = writeln!(out, "{:<16} <truncated>", op.name());
        return offset + 2;
    };

    let _ = write!(out, "{:<16} {:4} '", op.name(), index);
    match chunk.constant(index as usize) {
        Some(value) => {
            let _ = write!(out, "{}", value);
        }
        None => {
            let _ = write!(out, "<bad constant>");
        }
    }
    let _ = writeln!(out, "'");
    offset + 2
}
