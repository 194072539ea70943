//! Minimal JSON access: a pull tokenizer and a by-name field scanner.
//!
//! The scanner only depends on [`TokenReader`], so a platform that already
//! ships a JSON reader can plug it in instead of [`JsonReader`].

pub mod reader;
pub mod scan;

pub use reader::JsonReader;
pub use scan::find_fields;

/// Kind of the token the reader currently points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// No token read yet.
    None,
    BeginObject,
    EndObject,
    BeginArray,
    EndArray,
    PropertyName,
    String,
    Number,
    True,
    False,
    Null,
}

impl TokenKind {
    /// True for tokens that open a nested value.
    pub fn is_container_start(self) -> bool {
        matches!(self, TokenKind::BeginObject | TokenKind::BeginArray)
    }
}

/// Failure reported by a token reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderError {
    /// The document ended; there are no more tokens.
    Done,
    /// Malformed input at the given byte offset.
    Unexpected(usize),
    /// Nesting deeper than the reader can track.
    TooDeep,
}

/// Pull-based access to a JSON token stream.
///
/// Token text borrows from the document (`'a`), never from the reader.
pub trait TokenReader<'a> {
    /// Advances to the next token.
    fn next_token(&mut self) -> Result<(), ReaderError>;

    /// Kind of the current token.
    fn token_kind(&self) -> TokenKind;

    /// Raw text of the current token; string-like tokens exclude the quotes.
    fn token_slice(&self) -> &'a [u8];

    /// Compares the current string or property name with `text` after
    /// resolving escapes.
    fn token_is_text_equal(&self, text: &[u8]) -> bool;

    /// Moves past the children of the current token.
    ///
    /// On a property name this skips its value; on a container start it stops
    /// at the matching end token; on a scalar it does nothing.
    fn skip_children(&mut self) -> Result<(), ReaderError>;
}
