//! The Flint virtual machine.
//!
//! A stack machine that executes compiled chunks one instruction at a
//! time.
//!
//! # Module Structure
//!
//! - `interpreter`: The dispatch loop and operand stack

pub mod interpreter;

pub use interpreter::{STACK_MAX, Vm};
