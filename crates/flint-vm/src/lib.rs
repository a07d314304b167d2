// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2026 Pegasus Heavy Industries, LLC

//! # flint-vm
//!
//! The Flint bytecode virtual machine: a compact, single-pass scripting
//! engine in Rust.
//!
//! ## Overview
//!
//! This crate provides the full execution pipeline:
//! - Lexer for Flint source text
//! - Single-pass Pratt compiler emitting bytecode chunks
//! - Stack-based interpreter with two value encodings, selected at build
//!   time by the `nan-boxing` feature
//! - A raw reallocation primitive that every dynamic buffer funnels
//!   through
//!
//! ## Quick Start
//!
//! ```rust
//! use flint_vm::Vm;
//!
//! let mut vm = Vm::new();
//! let value = vm.interpret("(1 + 2) * 3").unwrap();
//! assert_eq!(value.as_number(), 9.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chunk;
pub mod compiler;
pub mod error;
pub mod lexer;
pub mod memory;
pub mod value;
pub mod vm;

// Re-exports for convenience
pub use chunk::{Chunk, OpCode};
pub use error::{CompileError, InterpretError, RuntimeError};
pub use value::Value;
pub use vm::Vm;
