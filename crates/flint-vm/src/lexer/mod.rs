//! Lexical analysis for Flint source code.
//!
//! The lexer is a pull-based token source: the compiler asks for one token
//! at a time with [`Scanner::next_token`] and no token buffer ever exists.
//! End of input and lexical errors are both ordinary tokens — an [`Eof`]
//! sentinel and an [`Error`] kind carrying its message — so the consumer
//! decides how to recover.
//!
//! ## Structure
//!
//! - `scanner.rs` - The `Scanner` that produces tokens
//! - `token.rs` - `Token`, `TokenKind`, and `Span` definitions
//!
//! [`Eof`]: TokenKind::Eof
//! [`Error`]: TokenKind::Error

mod scanner;
mod token;

pub use scanner::Scanner;
pub use token::{Span, Token, TokenKind};
