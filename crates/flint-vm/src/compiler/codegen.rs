//! Code generation from source text to bytecode.
//!
//! Flint compiles in a single pass: a Pratt parser walks the token stream
//! and emits instructions directly into a [`Chunk`], with no intermediate
//! tree. Each precedence level admits the operators at that level or
//! tighter, so `parse_precedence` is both the parser and the emitter.

use tracing::debug;

use crate::chunk::{Chunk, OpCode, debug::disassemble_chunk};
use crate::compiler::parser::Parser;
use crate::error::CompileError;
use crate::lexer::TokenKind;
use crate::value::Value;

/// Operator precedence levels, lowest to tightest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    None,
    Equality,
    Comparison,
    Term,
    Factor,
    Unary,
    Primary,
}

impl Precedence {
    /// The next tighter level, used for left-associative infix operators.
    fn next(self) -> Precedence {
        match self {
            Precedence::None => Precedence::Equality,
            Precedence::Equality => Precedence::Comparison,
            Precedence::Comparison => Precedence::Term,
            Precedence::Term => Precedence::Factor,
            Precedence::Factor => Precedence::Unary,
            Precedence::Unary | Precedence::Primary => Precedence::Primary,
        }
    }

    /// The precedence at which `kind` binds as an infix operator, or `None`
    /// if it is not one.
    fn of_infix(kind: &TokenKind) -> Precedence {
        match kind {
            TokenKind::EqualEqual | TokenKind::BangEqual => Precedence::Equality,
            TokenKind::Greater
            | TokenKind::GreaterEqual
            | TokenKind::Less
            | TokenKind::LessEqual => Precedence::Comparison,
            TokenKind::Plus | TokenKind::Minus => Precedence::Term,
            TokenKind::Star | TokenKind::Slash => Precedence::Factor,
            _ => Precedence::None,
        }
    }
}

/// Compiles Flint source into a chunk of bytecode.
pub struct Compiler<'a> {
    parser: Parser<'a>,
    chunk: Chunk,
}

impl<'a> Compiler<'a> {
    /// Creates a compiler for the given source.
    pub fn new(source: &'a str) -> Self {
        Self {
            parser: Parser::new(source),
            chunk: Chunk::new(),
        }
    }

    /// Compiles a single expression followed by end of input.
    ///
    /// On success the chunk ends with [`OpCode::Return`], leaving the
    /// expression's value on top of the stack for the VM to hand back. On
    /// failure every diagnostic collected along the way is returned and the
    /// chunk is discarded.
    pub fn compile(mut self) -> Result<Chunk, Vec<CompileError>> {
        self.expression();
        self.parser
            .consume(&TokenKind::Eof, "Expect end of expression.");
        self.emit_op(OpCode::Return);

        if !self.parser.errors.is_empty() {
            return Err(self.parser.errors);
        }

        if tracing::enabled!(tracing::Level::DEBUG) {
            debug!("\n{}", disassemble_chunk(&self.chunk, "code"));
        }
        Ok(self.chunk)
    }

    fn expression(&mut self) {
        self.parse_precedence(Precedence::Equality);
    }

    /// Parses anything at `precedence` or tighter.
    fn parse_precedence(&mut self, precedence: Precedence) {
        self.parser.advance();
        if !self.prefix() {
            self.parser.error_at_previous("Expect expression.");
            return;
        }

        while precedence <= Precedence::of_infix(&self.parser.current.kind) {
            self.parser.advance();
            self.infix();
        }
    }

    /// Emits code for the prefix form of the previous token. Returns false
    /// if the token cannot start an expression.
    fn prefix(&mut self) -> bool {
        match self.parser.previous.kind.clone() {
            TokenKind::Number(value) => self.emit_constant(Value::number(value)),
            TokenKind::Nil => self.emit_op(OpCode::Nil),
            TokenKind::True => self.emit_op(OpCode::True),
            TokenKind::False => self.emit_op(OpCode::False),
            TokenKind::LeftParen => self.grouping(),
            TokenKind::Minus => self.unary(OpCode::Negate),
            TokenKind::Bang => self.unary(OpCode::Not),
            _ => return false,
        }
        true
    }

    /// Emits code for the infix form of the previous token, with the left
    /// operand already compiled.
    fn infix(&mut self) {
        let operator = self.parser.previous.kind.clone();

        // Compile the right operand one level tighter for left associativity.
        self.parse_precedence(Precedence::of_infix(&operator).next());

        match operator {
            TokenKind::Plus => self.emit_op(OpCode::Add),
            TokenKind::Minus => self.emit_op(OpCode::Subtract),
            TokenKind::Star => self.emit_op(OpCode::Multiply),
            TokenKind::Slash => self.emit_op(OpCode::Divide),
            TokenKind::EqualEqual => self.emit_op(OpCode::Equal),
            TokenKind::Greater => self.emit_op(OpCode::Greater),
            TokenKind::Less => self.emit_op(OpCode::Less),
            // The remaining comparisons are each the negation of another.
            TokenKind::BangEqual => self.emit_ops(OpCode::Equal, OpCode::Not),
            TokenKind::GreaterEqual => self.emit_ops(OpCode::Less, OpCode::Not),
            TokenKind::LessEqual => self.emit_ops(OpCode::Greater, OpCode::Not),
            _ => unreachable!("infix called on a non-operator token"),
        }
    }

    fn grouping(&mut self) {
        self.expression();
        self.parser
            .consume(&TokenKind::RightParen, "Expect ')' after expression.");
    }

    fn unary(&mut self, op: OpCode) {
        // The operand binds tighter than any binary operator.
        self.parse_precedence(Precedence::Unary);
        self.emit_op(op);
    }

    fn emit_op(&mut self, op: OpCode) {
        let line = self.parser.previous.line;
        self.chunk.write_op(op, line);
    }

    fn emit_ops(&mut self, first: OpCode, second: OpCode) {
        self.emit_op(first);
        self.emit_op(second);
    }

    fn emit_constant(&mut self, value: Value) {
        let index = self.chunk.add_constant(value);
        let Ok(index) = u8::try_from(index) else {
            self.parser
                .error_at_previous("Too many constants in one chunk.");
            return;
        };
        let line = self.parser.previous.line;
        self.chunk.write_op(OpCode::Constant, line);
        self.chunk.write(index, line);
    }
}
