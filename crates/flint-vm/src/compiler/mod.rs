//! Bytecode compiler for Flint.
//!
//! Transforms source text into bytecode that can be executed by the VM.
//!
//! # Module Structure
//!
//! - `parser`: Token stream management and error reporting
//! - `codegen`: Single-pass Pratt parsing and instruction emission

pub mod codegen;
pub mod parser;

pub use codegen::Compiler;
pub use parser::Parser;

use crate::chunk::Chunk;
use crate::error::CompileError;

/// Compiles Flint source into a chunk, or returns every diagnostic found.
pub fn compile(source: &str) -> Result<Chunk, Vec<CompileError>> {
    Compiler::new(source).compile()
}
