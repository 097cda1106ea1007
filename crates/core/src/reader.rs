//! Cursor-based reader over a command line.
//!
//! All positions are byte offsets into the borrowed input. Every character the
//! reader treats specially (quotes, escapes, number and unquoted-token
//! characters, the space separator) is ASCII, so cursor arithmetic on those
//! characters always lands on a UTF-8 char boundary.

use crate::error::{CommandResult, SyntaxErrorKind};

const SYNTAX_ESCAPE: char = '\\';
const SYNTAX_DOUBLE_QUOTE: char = '"';
const SYNTAX_SINGLE_QUOTE: char = '\'';

/// A string with a mutable cursor.
///
/// Cloning a reader is cheap (a borrowed slice plus an offset) and is how the
/// dispatcher snapshots the position before trying each candidate node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextReader<'a> {
    string: &'a str,
    cursor: usize,
}

impl<'a> TextReader<'a> {
    /// Start reading `string` at offset 0.
    pub fn new(string: &'a str) -> Self {
        Self { string, cursor: 0 }
    }

    /// The full input.
    pub fn string(&self) -> &'a str {
        self.string
    }

    /// Current byte offset.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the cursor.
    ///
    /// Callers must pass an offset previously obtained from this reader (or
    /// another char boundary of the same input).
    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor;
    }

    /// Total input length in bytes.
    pub fn total_length(&self) -> usize {
        self.string.len()
    }

    /// Bytes left after the cursor.
    pub fn remaining_length(&self) -> usize {
        self.string.len() - self.cursor
    }

    /// Input consumed so far.
    pub fn read_so_far(&self) -> &'a str {
        &self.string[..self.cursor]
    }

    /// Input after the cursor.
    pub fn remaining(&self) -> &'a str {
        &self.string[self.cursor..]
    }

    /// Whether at least `length` more bytes are available.
    pub fn can_read_n(&self, length: usize) -> bool {
        self.cursor + length <= self.string.len()
    }

    /// Whether any input remains.
    pub fn can_read(&self) -> bool {
        self.can_read_n(1)
    }

    /// The character at the cursor.
    pub fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// The character `offset` bytes after the cursor.
    pub fn peek_at(&self, offset: usize) -> Option<char> {
        self.string.get(self.cursor + offset..)?.chars().next()
    }

    /// Consume and return the character at the cursor.
    pub fn read(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.cursor += c.len_utf8();
        Some(c)
    }

    /// Advance past the character at the cursor, if any.
    pub fn skip(&mut self) {
        if let Some(c) = self.peek() {
            self.cursor += c.len_utf8();
        }
    }

    /// Advance past any whitespace.
    pub fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.skip();
        }
    }

    /// Characters that may appear in an integer token.
    pub fn is_allowed_integer(c: char) -> bool {
        c.is_ascii_digit() || c == '-' || c == '+'
    }

    /// Characters that may appear in a floating-point token.
    pub fn is_allowed_number(c: char) -> bool {
        Self::is_allowed_integer(c) || c == '.' || c == 'e' || c == 'E'
    }

    /// Characters that may appear in an unquoted string.
    pub fn is_allowed_in_unquoted_string(c: char) -> bool {
        c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+')
    }

    /// Characters that open a quoted string.
    pub fn is_quoted_string_start(c: char) -> bool {
        c == SYNTAX_DOUBLE_QUOTE || c == SYNTAX_SINGLE_QUOTE
    }

    /// Consume characters while `allowed` holds and return them.
    fn take_while(&mut self, allowed: fn(char) -> bool) -> &'a str {
        let start = self.cursor;
        while self.peek().is_some_and(allowed) {
            self.skip();
        }
        &self.string[start..self.cursor]
    }

    /// Lex a numeric token and hand it to `parse`.
    ///
    /// On a missing token the error points at the current cursor; on a token
    /// that fails to parse the cursor is reset to the token start.
    fn read_number<T: std::str::FromStr>(
        &mut self,
        allowed: fn(char) -> bool,
        expected: SyntaxErrorKind,
        invalid: fn(String) -> SyntaxErrorKind,
    ) -> CommandResult<T> {
        let start = self.cursor;
        let number = self.take_while(allowed);
        if number.is_empty() {
            return Err(expected.create_with_context(self));
        }
        match number.parse::<T>() {
            Ok(value) => Ok(value),
            Err(_) => {
                self.cursor = start;
                Err(invalid(number.to_owned()).create_with_context(self))
            }
        }
    }

    /// Read a 16-bit integer.
    pub fn read_short(&mut self) -> CommandResult<i16> {
        self.read_number(
            Self::is_allowed_integer,
            SyntaxErrorKind::ExpectedShort,
            SyntaxErrorKind::InvalidShort,
        )
    }

    /// Read a 32-bit integer.
    pub fn read_int(&mut self) -> CommandResult<i32> {
        self.read_number(
            Self::is_allowed_integer,
            SyntaxErrorKind::ExpectedInteger,
            SyntaxErrorKind::InvalidInteger,
        )
    }

    /// Read a 64-bit integer.
    pub fn read_long(&mut self) -> CommandResult<i64> {
        self.read_number(
            Self::is_allowed_integer,
            SyntaxErrorKind::ExpectedLong,
            SyntaxErrorKind::InvalidLong,
        )
    }

    /// Read a 32-bit float.
    pub fn read_float(&mut self) -> CommandResult<f32> {
        self.read_number(
            Self::is_allowed_number,
            SyntaxErrorKind::ExpectedFloat,
            SyntaxErrorKind::InvalidFloat,
        )
    }

    /// Read a 64-bit float.
    pub fn read_double(&mut self) -> CommandResult<f64> {
        self.read_number(
            Self::is_allowed_number,
            SyntaxErrorKind::ExpectedDouble,
            SyntaxErrorKind::InvalidDouble,
        )
    }

    /// Read a token made of unquoted-string characters. May be empty.
    pub fn read_unquoted_string(&mut self) -> &'a str {
        self.take_while(Self::is_allowed_in_unquoted_string)
    }

    /// Read a `"` or `'` quoted string, resolving escapes.
    ///
    /// Returns an empty string when no input remains.
    pub fn read_quoted_string(&mut self) -> CommandResult<String> {
        let Some(next) = self.peek() else {
            return Ok(String::new());
        };
        if !Self::is_quoted_string_start(next) {
            return Err(SyntaxErrorKind::ExpectedStartOfQuote.create_with_context(self));
        }
        self.skip();
        self.read_string_until(next)
    }

    /// Read up to `terminator`, consuming it. The opening quote must already be consumed.
    pub fn read_string_until(&mut self, terminator: char) -> CommandResult<String> {
        let mut result = String::new();
        let mut escaped = false;
        while let Some(c) = self.read() {
            if escaped {
                if c == terminator || c == SYNTAX_ESCAPE {
                    result.push(c);
                    escaped = false;
                } else {
                    self.cursor -= c.len_utf8();
                    return Err(SyntaxErrorKind::InvalidEscape(c).create_with_context(self));
                }
            } else if c == SYNTAX_ESCAPE {
                escaped = true;
            } else if c == terminator {
                return Ok(result);
            } else {
                result.push(c);
            }
        }
        Err(SyntaxErrorKind::ExpectedEndOfQuote.create_with_context(self))
    }

    /// Read a quoted string if one starts at the cursor, otherwise an unquoted token.
    pub fn read_string(&mut self) -> CommandResult<String> {
        match self.peek() {
            None => Ok(String::new()),
            Some(next) if Self::is_quoted_string_start(next) => {
                self.skip();
                self.read_string_until(next)
            }
            Some(_) => Ok(self.read_unquoted_string().to_owned()),
        }
    }

    /// Read `true` or `false`.
    pub fn read_boolean(&mut self) -> CommandResult<bool> {
        let start = self.cursor;
        let value = self.read_string()?;
        match value.as_str() {
            "" => Err(SyntaxErrorKind::ExpectedBool.create_with_context(self)),
            "true" => Ok(true),
            "false" => Ok(false),
            _ => {
                self.cursor = start;
                Err(SyntaxErrorKind::InvalidBool(value).create_with_context(self))
            }
        }
    }

    /// Consume `c` or fail without moving.
    pub fn expect(&mut self, c: char) -> CommandResult<()> {
        if self.peek() != Some(c) {
            return Err(SyntaxErrorKind::ExpectedSymbol(c).create_with_context(self));
        }
        self.skip();
        Ok(())
    }
}
