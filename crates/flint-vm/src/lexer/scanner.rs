//! The scanner that produces tokens from source text.

use super::{Span, Token, TokenKind};

/// A scanner that tokenizes Flint source code.
pub struct Scanner<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    current_pos: usize,
    line: u32,
}

impl<'a> Scanner<'a> {
    /// Creates a new scanner for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            current_pos: 0,
            line: 1,
        }
    }

    /// Returns the next token from the source.
    ///
    /// Never fails: end of input yields [`TokenKind::Eof`] forever and a
    /// lexical error yields a [`TokenKind::Error`] token, after which
    /// scanning can continue.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        let start = self.current_pos;
        let line = self.line;

        let Some((_pos, ch)) = self.advance() else {
            return Token::new(TokenKind::Eof, Span::new(start, start), line);
        };

        let kind = match ch {
            // Single-character tokens
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            '-' => TokenKind::Minus,
            '+' => TokenKind::Plus,
            ';' => TokenKind::Semicolon,
            '*' => TokenKind::Star,
            // '/' that opens a comment was consumed by the skipper above
            '/' => TokenKind::Slash,

            // One- or two-character operators
            '!' => self.select('=', TokenKind::BangEqual, TokenKind::Bang),
            '=' => self.select('=', TokenKind::EqualEqual, TokenKind::Equal),
            '<' => self.select('=', TokenKind::LessEqual, TokenKind::Less),
            '>' => self.select('=', TokenKind::GreaterEqual, TokenKind::Greater),

            // Literals
            '"' => self.scan_string(),
            '0'..='9' => self.scan_number(start),

            // Identifiers and keywords
            _ if is_id_start(ch) => self.scan_identifier(start),

            _ => TokenKind::Error("Unexpected character.".to_string()),
        };

        Token::new(kind, Span::new(start, self.current_pos), line)
    }

    fn advance(&mut self) -> Option<(usize, char)> {
        let result = self.chars.next();
        if let Some((pos, ch)) = result {
            self.current_pos = pos + ch.len_utf8();
        }
        result
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, ch)| *ch)
    }

    fn peek_next(&self) -> Option<char> {
        let mut iter = self.chars.clone();
        iter.next();
        iter.next().map(|(_, ch)| ch)
    }

    /// Consumes `expected` and returns `matched` if it is next, otherwise
    /// returns `single`.
    fn select(&mut self, expected: char, matched: TokenKind, single: TokenKind) -> TokenKind {
        if self.peek() == Some(expected) {
            self.advance();
            matched
        } else {
            single
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(' ' | '\t' | '\r') => {
                    self.advance();
                }
                Some('\n') => {
                    self.line += 1;
                    self.advance();
                }
                Some('/') => match self.peek_next() {
                    Some('/') => {
                        // Single-line comment: skip until end of line
                        while let Some(ch) = self.peek() {
                            if ch == '\n' {
                                break;
                            }
                            self.advance();
                        }
                    }
                    Some('*') => {
                        // Block comment: skip until */ counting newlines
                        self.advance(); // consume '/'
                        self.advance(); // consume '*'
                        let mut prev = ' ';
                        while let Some(ch) = self.peek() {
                            self.advance();
                            if ch == '\n' {
                                self.line += 1;
                            }
                            if prev == '*' && ch == '/' {
                                break;
                            }
                            prev = ch;
                        }
                    }
                    _ => break, // A division operator, not a comment
                },
                _ => break,
            }
        }
    }

    fn scan_string(&mut self) -> TokenKind {
        let content_start = self.current_pos;

        loop {
            match self.peek() {
                None => return TokenKind::Error("Unterminated string.".to_string()),
                Some('"') => break,
                Some(ch) => {
                    // Strings may span lines
                    if ch == '\n' {
                        self.line += 1;
                    }
                    self.advance();
                }
            }
        }

        let content = self.source[content_start..self.current_pos].to_string();
        self.advance(); // closing quote
        TokenKind::String(content)
    }

    fn scan_number(&mut self, start: usize) -> TokenKind {
        while matches!(self.peek(), Some('0'..='9')) {
            self.advance();
        }

        // A fractional part needs a digit after the dot; a trailing dot
        // belongs to whatever follows the number.
        if self.peek() == Some('.') && matches!(self.peek_next(), Some('0'..='9')) {
            self.advance();
            while matches!(self.peek(), Some('0'..='9')) {
                self.advance();
            }
        }

        match self.source[start..self.current_pos].parse::<f64>() {
            Ok(n) => TokenKind::Number(n),
            Err(_) => TokenKind::Error("Invalid number literal.".to_string()),
        }
    }

    fn scan_identifier(&mut self, start: usize) -> TokenKind {
        while self.peek().is_some_and(is_id_continue) {
            self.advance();
        }

        let lexeme = &self.source[start..self.current_pos];
        TokenKind::keyword(lexeme).unwrap_or_else(|| TokenKind::Identifier(lexeme.to_string()))
    }

    /// Returns the slice of source text covered by a span.
    pub fn lexeme(&self, span: Span) -> &'a str {
        &self.source[span.start..span.end]
    }
}

/// Returns true if the character can start an identifier.
fn is_id_start(ch: char) -> bool {
    ch == '_' || unicode_xid::UnicodeXID::is_xid_start(ch)
}

/// Returns true if the character can continue an identifier.
fn is_id_continue(ch: char) -> bool {
    ch == '_' || unicode_xid::UnicodeXID::is_xid_continue(ch)
}
