//! Lexing of JSON tokens from a [`ReadContext`]. Whitespace is skipped before every token.
//!
//! Errors follow one rule: when the next token is valid JSON but the wrong kind of value
//! for the type being read, the result is `SchemaMismatch`. When the text itself is broken,
//! the result is `InvalidFormat`.

use crate::prelude::*;
use std::borrow::Cow;

pub const MAX_DEPTH: usize = 512;

/// Progress through one array or object, passed back to `next_element` / `next_key`.
pub struct Seq {
    first: bool,
}

impl<'a> ReadContext<'a> {
    #[inline]
    pub fn skip_ws(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.text.get(self.pos) {
            self.pos += 1;
        }
    }

    /// The first byte of the next token, without consuming it.
    #[inline]
    pub fn peek(&mut self) -> Option<u8> {
        self.skip_ws();
        self.text.get(self.pos).copied()
    }

    /// Consumes `byte` if it is the next token.
    #[inline]
    pub fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub fn expect(&mut self, byte: u8) -> DecodeResult<()> {
        if self.eat(byte) {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    pub(crate) fn unexpected(&self) -> DecodeError {
        match self.text.get(self.pos) {
            None => InvalidFormat::UnexpectedEnd.into(),
            Some(&found) => InvalidFormat::UnexpectedByte {
                at: self.pos,
                found: found as char,
            }
            .into(),
        }
    }

    /// The error for a next token of the wrong kind. Only a byte that can start a value
    /// makes it a mismatch; anything else is broken text.
    pub(crate) fn mismatch(&mut self) -> DecodeError {
        match self.peek() {
            Some(b'{' | b'[' | b'"' | b'-' | b'0'..=b'9' | b't' | b'f' | b'n') => DecodeError::SchemaMismatch,
            _ => self.unexpected(),
        }
    }

    /// Consumes a bare word such as `null` or `true` if it is the next token.
    pub fn eat_literal(&mut self, literal: &str) -> bool {
        self.skip_ws();
        let rest = &self.text[self.pos..];
        if rest.starts_with(literal.as_bytes()) && !rest.get(literal.len()).is_some_and(u8::is_ascii_alphanumeric) {
            self.pos += literal.len();
            true
        } else {
            false
        }
    }

    pub fn is_number_start(&mut self) -> bool {
        matches!(self.peek(), Some(b'-' | b'0'..=b'9'))
    }

    /// The text of the next number token. Validation is left to whoever parses it into a
    /// concrete type.
    pub fn number_token(&mut self) -> DecodeResult<&'a str> {
        if !self.is_number_start() {
            return Err(self.mismatch());
        }
        let text: &'a [u8] = self.text;
        let start = self.pos;
        while let Some(b'0'..=b'9' | b'-' | b'+' | b'.' | b'e' | b'E') = text.get(self.pos) {
            self.pos += 1;
        }
        // Only ASCII was consumed
        Ok(std::str::from_utf8(&text[start..self.pos]).unwrap_or_default())
    }

    /// Reads a string token, borrowing from the source unless it contains escapes.
    pub fn string(&mut self) -> DecodeResult<Cow<'a, str>> {
        if self.peek() != Some(b'"') {
            return Err(self.mismatch());
        }
        self.pos += 1;
        let text: &'a [u8] = self.text;
        let start = self.pos;
        loop {
            match text.get(self.pos) {
                None => return Err(InvalidFormat::UnexpectedEnd.into()),
                Some(b'"') => {
                    let s = as_str(&text[start..self.pos]);
                    self.pos += 1;
                    return Ok(Cow::Borrowed(s));
                }
                Some(b'\\') => break,
                Some(_) => self.pos += 1,
            }
        }

        let mut owned = String::from(as_str(&text[start..self.pos]));
        loop {
            match text.get(self.pos) {
                None => return Err(InvalidFormat::UnexpectedEnd.into()),
                Some(b'"') => {
                    self.pos += 1;
                    return Ok(Cow::Owned(owned));
                }
                Some(b'\\') => {
                    let at = self.pos;
                    self.pos += 1;
                    let escaped = text.get(self.pos).copied().ok_or(InvalidFormat::UnexpectedEnd)?;
                    self.pos += 1;
                    match escaped {
                        b'"' => owned.push('"'),
                        b'\\' => owned.push('\\'),
                        b'/' => owned.push('/'),
                        b'n' => owned.push('\n'),
                        b'r' => owned.push('\r'),
                        b't' => owned.push('\t'),
                        b'b' => owned.push('\u{8}'),
                        b'f' => owned.push('\u{c}'),
                        b'u' => owned.push(self.unicode_escape(at)?),
                        _ => return Err(InvalidFormat::BadEscape { at }.into()),
                    }
                }
                Some(_) => {
                    let run = self.pos;
                    while let Some(&byte) = text.get(self.pos) {
                        if byte == b'"' || byte == b'\\' {
                            break;
                        }
                        self.pos += 1;
                    }
                    owned.push_str(as_str(&text[run..self.pos]));
                }
            }
        }
    }

    fn hex4(&mut self, at: usize) -> DecodeResult<u32> {
        let digits = self.text.get(self.pos..self.pos + 4).ok_or(InvalidFormat::UnexpectedEnd)?;
        let digits = std::str::from_utf8(digits).map_err(|_| InvalidFormat::BadEscape { at })?;
        let value = u32::from_str_radix(digits, 16).map_err(|_| InvalidFormat::BadEscape { at })?;
        self.pos += 4;
        Ok(value)
    }

    // Called just past `\u`.
    fn unicode_escape(&mut self, at: usize) -> DecodeResult<char> {
        let high = self.hex4(at)?;
        let code = if (0xd800..0xdc00).contains(&high) {
            if self.text.get(self.pos..self.pos + 2) != Some(&b"\\u"[..]) {
                return Err(InvalidFormat::BadEscape { at }.into());
            }
            self.pos += 2;
            let low = self.hex4(at)?;
            if !(0xdc00..0xe000).contains(&low) {
                return Err(InvalidFormat::BadEscape { at }.into());
            }
            0x10000 + ((high - 0xd800) << 10) + (low - 0xdc00)
        } else {
            high
        };
        char::from_u32(code).ok_or_else(|| InvalidFormat::BadEscape { at }.into())
    }

    /// Consumes the `[` of an array, or fails with `SchemaMismatch` if the next value is
    /// not an array.
    pub fn begin_array(&mut self) -> DecodeResult<Seq> {
        if self.eat(b'[') {
            Ok(Seq { first: true })
        } else {
            Err(self.mismatch())
        }
    }

    /// Advances to the next element, returning false after consuming the closing `]`.
    pub fn next_element(&mut self, seq: &mut Seq) -> DecodeResult<bool> {
        if self.eat(b']') {
            return Ok(false);
        }
        if !std::mem::replace(&mut seq.first, false) {
            self.expect(b',')?;
        }
        Ok(true)
    }

    pub fn begin_object(&mut self) -> DecodeResult<Seq> {
        if self.eat(b'{') {
            Ok(Seq { first: true })
        } else {
            Err(self.mismatch())
        }
    }

    /// Advances to the next member and reads its key and colon, returning `None` after
    /// consuming the closing `}`.
    pub fn next_key(&mut self, seq: &mut Seq) -> DecodeResult<Option<Cow<'a, str>>> {
        if self.eat(b'}') {
            return Ok(None);
        }
        if !std::mem::replace(&mut seq.first, false) {
            self.expect(b',')?;
        }
        if self.peek() != Some(b'"') {
            return Err(self.unexpected());
        }
        let key = self.string()?;
        self.expect(b':')?;
        Ok(Some(key))
    }

    /// Tracks nesting before reading a container. Pair with [`leave`](Self::leave).
    #[doc(hidden)]
    pub fn enter(&mut self) -> DecodeResult<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(InvalidFormat::TooDeep(MAX_DEPTH).into());
        }
        Ok(())
    }

    #[doc(hidden)]
    pub fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Consumes one value of any shape.
    pub fn skip_value(&mut self) -> DecodeResult<()> {
        match self.peek() {
            Some(b'{') => {
                self.enter()?;
                let mut seq = self.begin_object()?;
                while self.next_key(&mut seq)?.is_some() {
                    self.skip_value()?;
                }
                self.leave();
            }
            Some(b'[') => {
                self.enter()?;
                let mut seq = self.begin_array()?;
                while self.next_element(&mut seq)? {
                    self.skip_value()?;
                }
                self.leave();
            }
            Some(b'"') => {
                self.string()?;
            }
            Some(b'-' | b'0'..=b'9') => {
                self.number_token()?;
            }
            _ => {
                if !(self.eat_literal("null") || self.eat_literal("true") || self.eat_literal("false")) {
                    return Err(self.unexpected());
                }
            }
        }
        Ok(())
    }

    /// Consumes one value and returns its source text.
    pub fn raw_value(&mut self) -> DecodeResult<&'a str> {
        self.skip_ws();
        let text: &'a [u8] = self.text;
        let start = self.pos;
        self.skip_value()?;
        Ok(as_str(&text[start..self.pos]))
    }

    /// Checks a struct's `__type` member against the name of the type being read.
    pub fn check_type_tag(&mut self, expected: &'static str) -> DecodeResult<()> {
        let found = self.string()?;
        if found != expected && !self.no_type_check {
            return Err(DecodeError::TypeTag {
                expected,
                found: found.into_owned(),
            });
        }
        Ok(())
    }

    /// Succeeds only if nothing but whitespace remains.
    pub fn finish(&mut self) -> DecodeResult<()> {
        self.skip_ws();
        if self.pos == self.text.len() {
            Ok(())
        } else {
            Err(InvalidFormat::TrailingCharacters { at: self.pos }.into())
        }
    }
}

// The source is a &str, and tokens are only ever split at ASCII bytes, so every slice
// taken here is valid UTF-8.
fn as_str(bytes: &[u8]) -> &str {
    std::str::from_utf8(bytes).unwrap_or_default()
}
