//! Allocation-free pull tokenizer over a borrowed JSON document.

use super::{ReaderError, TokenKind, TokenReader};

/// Deepest nesting the reader tracks; one bit of `stack` per level.
pub const MAX_DEPTH: u8 = 64;

/// Forward-only reader; re-create it to start over.
#[derive(Debug, Clone)]
pub struct JsonReader<'a> {
    buf: &'a [u8],
    pos: usize,
    kind: TokenKind,
    start: usize,
    end: usize,
    // Bit set = object, clear = array. Innermost container in bit 0.
    stack: u64,
    depth: u8,
}

impl<'a> JsonReader<'a> {
    pub const fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            kind: TokenKind::None,
            start: 0,
            end: 0,
            stack: 0,
            depth: 0,
        }
    }

    /// Number of containers currently open.
    pub fn depth(&self) -> u8 {
        self.depth
    }

    fn peek(&self) -> Option<u8> {
        self.buf.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.pos += 1;
        }
    }

    fn in_object(&self) -> bool {
        self.depth > 0 && self.stack & 1 == 1
    }

    fn set_token(&mut self, kind: TokenKind, start: usize, end: usize) {
        self.kind = kind;
        self.start = start;
        self.end = end;
    }

    fn open(&mut self, object: bool) -> Result<(), ReaderError> {
        if self.depth == MAX_DEPTH {
            return Err(ReaderError::TooDeep);
        }
        self.stack = (self.stack << 1) | u64::from(object);
        self.depth += 1;
        let kind = if object {
            TokenKind::BeginObject
        } else {
            TokenKind::BeginArray
        };
        self.set_token(kind, self.pos, self.pos + 1);
        self.pos += 1;
        Ok(())
    }

    fn close(&mut self) {
        let kind = if self.in_object() {
            TokenKind::EndObject
        } else {
            TokenKind::EndArray
        };
        self.stack >>= 1;
        self.depth -= 1;
        self.set_token(kind, self.pos, self.pos + 1);
        self.pos += 1;
    }

    fn read_value(&mut self) -> Result<(), ReaderError> {
        match self.peek() {
            Some(b'{') => self.open(true),
            Some(b'[') => self.open(false),
            Some(b'"') => self.read_string(TokenKind::String),
            Some(b'-' | b'0'..=b'9') => self.read_number(),
            Some(b't') => self.read_literal(b"true", TokenKind::True),
            Some(b'f') => self.read_literal(b"false", TokenKind::False),
            Some(b'n') => self.read_literal(b"null", TokenKind::Null),
            _ => Err(ReaderError::Unexpected(self.pos)),
        }
    }

    fn read_string(&mut self, kind: TokenKind) -> Result<(), ReaderError> {
        let open = self.pos;
        let mut idx = open + 1;
        loop {
            match self.buf.get(idx).copied() {
                None => return Err(ReaderError::Unexpected(idx)),
                Some(b'"') => break,
                Some(b'\\') => match self.buf.get(idx + 1).copied() {
                    Some(b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't') => idx += 2,
                    Some(b'u') => {
                        let hex = self
                            .buf
                            .get(idx + 2..idx + 6)
                            .ok_or(ReaderError::Unexpected(idx))?;
                        if !hex.iter().all(u8::is_ascii_hexdigit) {
                            return Err(ReaderError::Unexpected(idx));
                        }
                        idx += 6;
                    }
                    _ => return Err(ReaderError::Unexpected(idx)),
                },
                Some(c) if c < 0x20 => return Err(ReaderError::Unexpected(idx)),
                Some(_) => idx += 1,
            }
        }
        self.set_token(kind, open + 1, idx);
        self.pos = idx + 1;
        Ok(())
    }

    fn read_number(&mut self) -> Result<(), ReaderError> {
        let start = self.pos;
        let mut idx = start;
        if self.buf.get(idx) == Some(&b'-') {
            idx += 1;
        }
        match self.buf.get(idx) {
            Some(b'0') => idx += 1,
            Some(b'1'..=b'9') => idx = self.digits_from(idx),
            _ => return Err(ReaderError::Unexpected(idx)),
        }
        if self.buf.get(idx) == Some(&b'.') {
            let after = self.digits_from(idx + 1);
            if after == idx + 1 {
                return Err(ReaderError::Unexpected(after));
            }
            idx = after;
        }
        if let Some(b'e' | b'E') = self.buf.get(idx) {
            idx += 1;
            if let Some(b'+' | b'-') = self.buf.get(idx) {
                idx += 1;
            }
            let after = self.digits_from(idx);
            if after == idx {
                return Err(ReaderError::Unexpected(after));
            }
            idx = after;
        }
        self.set_token(TokenKind::Number, start, idx);
        self.pos = idx;
        Ok(())
    }

    fn digits_from(&self, mut idx: usize) -> usize {
        while let Some(b'0'..=b'9') = self.buf.get(idx) {
            idx += 1;
        }
        idx
    }

    fn read_literal(&mut self, literal: &[u8], kind: TokenKind) -> Result<(), ReaderError> {
        if !self.buf[self.pos..].starts_with(literal) {
            return Err(ReaderError::Unexpected(self.pos));
        }
        self.set_token(kind, self.pos, self.pos + literal.len());
        self.pos += literal.len();
        Ok(())
    }

    fn read_property_name(&mut self) -> Result<(), ReaderError> {
        if self.peek() != Some(b'"') {
            return Err(ReaderError::Unexpected(self.pos));
        }
        self.read_string(TokenKind::PropertyName)
    }

    // Token following a completed value: a separator or the end of the
    // enclosing container.
    fn read_after_value(&mut self) -> Result<(), ReaderError> {
        if self.depth == 0 {
            return if self.pos < self.buf.len() {
                Err(ReaderError::Unexpected(self.pos))
            } else {
                Err(ReaderError::Done)
            };
        }
        match self.peek() {
            Some(b',') => {
                self.pos += 1;
                self.skip_whitespace();
                if self.in_object() {
                    self.read_property_name()
                } else {
                    self.read_value()
                }
            }
            Some(b'}') if self.in_object() => {
                self.close();
                Ok(())
            }
            Some(b']') if !self.in_object() => {
                self.close();
                Ok(())
            }
            _ => Err(ReaderError::Unexpected(self.pos)),
        }
    }
}

impl<'a> TokenReader<'a> for JsonReader<'a> {
    fn next_token(&mut self) -> Result<(), ReaderError> {
        self.skip_whitespace();
        match self.kind {
            TokenKind::None => self.read_value(),
            TokenKind::BeginObject => match self.peek() {
                Some(b'}') => {
                    self.close();
                    Ok(())
                }
                _ => self.read_property_name(),
            },
            TokenKind::BeginArray => match self.peek() {
                Some(b']') => {
                    self.close();
                    Ok(())
                }
                _ => self.read_value(),
            },
            TokenKind::PropertyName => {
                if self.peek() != Some(b':') {
                    return Err(ReaderError::Unexpected(self.pos));
                }
                self.pos += 1;
                self.skip_whitespace();
                self.read_value()
            }
            _ => self.read_after_value(),
        }
    }

    fn token_kind(&self) -> TokenKind {
        self.kind
    }

    fn token_slice(&self) -> &'a [u8] {
        &self.buf[self.start..self.end]
    }

    fn token_is_text_equal(&self, text: &[u8]) -> bool {
        if !matches!(self.kind, TokenKind::String | TokenKind::PropertyName) {
            return false;
        }
        let raw = self.token_slice();
        if !raw.contains(&b'\\') {
            return raw == text;
        }
        unescaped_eq(raw, text)
    }

    fn skip_children(&mut self) -> Result<(), ReaderError> {
        if self.kind == TokenKind::PropertyName {
            self.next_token()?;
        }
        if !self.kind.is_container_start() {
            return Ok(());
        }
        let target = self.depth - 1;
        loop {
            self.next_token()?;
            if matches!(self.kind, TokenKind::EndObject | TokenKind::EndArray)
                && self.depth == target
            {
                return Ok(());
            }
        }
    }
}

// `raw` was validated by `read_string`, so escapes are well formed.
fn unescaped_eq(raw: &[u8], text: &[u8]) -> bool {
    let mut rest = text;
    let mut idx = 0;
    while idx < raw.len() {
        let mut utf8 = [0u8; 4];
        let piece: &[u8] = if raw[idx] == b'\\' {
            let esc = raw[idx + 1];
            idx += 2;
            match esc {
                b'b' => &[0x08],
                b'f' => &[0x0c],
                b'n' => &[b'\n'],
                b'r' => &[b'\r'],
                b't' => &[b'\t'],
                b'u' => {
                    let code = raw[idx..idx + 4]
                        .iter()
                        .fold(0u32, |acc, b| (acc << 4) | hex_value(*b));
                    idx += 4;
                    // Surrogate pairs never appear in the field names we look for.
                    match char::from_u32(code) {
                        Some(ch) => ch.encode_utf8(&mut utf8).as_bytes(),
                        None => return false,
                    }
                }
                other => {
                    utf8[0] = other;
                    &utf8[..1]
                }
            }
        } else {
            idx += 1;
            &raw[idx - 1..idx]
        };
        match rest.strip_prefix(piece) {
            Some(tail) => rest = tail,
            None => return false,
        }
    }
    rest.is_empty()
}

fn hex_value(b: u8) -> u32 {
    match b {
        b'0'..=b'9' => u32::from(b - b'0'),
        b'a'..=b'f' => u32::from(b - b'a' + 10),
        _ => u32::from(b - b'A' + 10),
    }
}
