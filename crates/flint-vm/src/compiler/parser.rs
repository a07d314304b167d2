//! Token stream management and error reporting for the compiler.

use std::mem;

use crate::error::CompileError;
use crate::lexer::{Scanner, Token, TokenKind};

/// Tracks the compiler's position in the token stream.
///
/// Holds the current and previous tokens plus every diagnostic produced so
/// far. After the first error the parser enters panic mode and suppresses
/// further diagnostics until it resynchronizes, so one mistake does not
/// produce a cascade of reports.
pub struct Parser<'a> {
    scanner: Scanner<'a>,
    /// The token being considered
    pub current: Token,
    /// The most recently consumed token
    pub previous: Token,
    /// All diagnostics collected so far
    pub errors: Vec<CompileError>,
    panic_mode: bool,
}

impl<'a> Parser<'a> {
    /// Creates a parser over the given source and primes the first token.
    pub fn new(source: &'a str) -> Self {
        let mut parser = Self {
            scanner: Scanner::new(source),
            current: Token::placeholder(),
            previous: Token::placeholder(),
            errors: Vec::new(),
            panic_mode: false,
        };
        parser.advance();
        parser
    }

    /// Steps forward one token.
    ///
    /// Error tokens from the scanner are consumed here and reported as
    /// diagnostics, so the rest of the compiler only ever sees valid tokens.
    pub fn advance(&mut self) {
        self.previous = mem::replace(&mut self.current, Token::placeholder());

        loop {
            self.current = self.scanner.next_token();
            let TokenKind::Error(message) = &self.current.kind else {
                break;
            };
            let message = message.clone();
            self.error_at_current(&message);
        }
    }

    /// Consumes the current token if it has the expected kind, otherwise
    /// reports `message` at the current token.
    pub fn consume(&mut self, kind: &TokenKind, message: &str) {
        if self.check(kind) {
            self.advance();
        } else {
            self.error_at_current(message);
        }
    }

    /// Returns true if the current token has the given kind, ignoring any
    /// payload the variant carries.
    pub fn check(&self, kind: &TokenKind) -> bool {
        mem::discriminant(&self.current.kind) == mem::discriminant(kind)
    }

    /// Reports an error at the current token.
    pub fn error_at_current(&mut self, message: &str) {
        let token = self.current.clone();
        self.error_at(&token, message);
    }

    /// Reports an error at the previous token.
    pub fn error_at_previous(&mut self, message: &str) {
        let token = self.previous.clone();
        self.error_at(&token, message);
    }

    /// Returns the source text of a token.
    pub fn lexeme(&self, token: &Token) -> &'a str {
        self.scanner.lexeme(token.span)
    }

    fn error_at(&mut self, token: &Token, message: &str) {
        if self.panic_mode {
            return;
        }
        self.panic_mode = true;

        let error = match &token.kind {
            TokenKind::Eof => CompileError::at_end(token.line, message),
            // The offending text is already in the message for lexical errors
            TokenKind::Error(_) => CompileError::bare(token.line, message),
            _ => CompileError::at_token(token.line, self.scanner.lexeme(token.span), message),
        };
        self.errors.push(error);
    }
}
