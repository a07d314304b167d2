//! Error types for compilation and execution.
//!
//! The two phases fail differently and callers need to tell them apart:
//! compile errors are collected per occurrence while scanning continues,
//! and the chunk never runs; a runtime error halts execution immediately.
//! Allocation failure belongs to neither taxonomy — it is fatal and
//! terminates the process from inside [`crate::memory`].

use thiserror::Error;

/// A compile-time diagnostic anchored to a source line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[line {line}] Error{location}: {message}")]
pub struct CompileError {
    /// Source line of the offending token
    pub line: u32,
    /// Rendered location suffix: ` at 'lexeme'`, ` at end`, or empty when
    /// the token itself was a lexical error
    pub location: String,
    /// What went wrong
    pub message: String,
}

impl CompileError {
    /// A diagnostic pointing at a token's lexeme.
    pub fn at_token(line: u32, lexeme: &str, message: impl Into<String>) -> Self {
        Self {
            line,
            location: format!(" at '{}'", lexeme),
            message: message.into(),
        }
    }

    /// A diagnostic pointing at the end of input.
    pub fn at_end(line: u32, message: impl Into<String>) -> Self {
        Self {
            line,
            location: " at end".to_string(),
            message: message.into(),
        }
    }

    /// A diagnostic with no usable lexeme, as for lexical errors.
    pub fn bare(line: u32, message: impl Into<String>) -> Self {
        Self {
            line,
            location: String::new(),
            message: message.into(),
        }
    }
}

/// A runtime fault that halted execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[line {line}] {message}")]
pub struct RuntimeError {
    /// Source line of the instruction that faulted
    pub line: u32,
    /// What went wrong
    pub message: String,
}

/// The terminal outcome of a failed interpretation, split by phase.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InterpretError {
    /// Compilation failed; the chunk never ran. Carries every diagnostic
    /// found before giving up.
    #[error("{}", render_diagnostics(.0))]
    Compile(Vec<CompileError>),
    /// An operation's precondition failed during execution.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

fn render_diagnostics(diagnostics: &[CompileError]) -> String {
    diagnostics
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
