//! Codec error types.

use thiserror::Error;

use super::tags::MAX_ATOM_CHARS;

/// Error while reading a term.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Input ended before the term was complete.
    #[error("unexpected end of term data at offset {0}")]
    UnexpectedEnd(usize),

    /// Leading version byte is not 131.
    #[error("unsupported version marker {0}")]
    BadVersion(u8),

    /// A different kind of term was found than the one requested.
    #[error("expected {expected} at offset {offset}, found tag {found}")]
    UnexpectedTag {
        expected: &'static str,
        found: u8,
        offset: usize,
    },

    /// Tag byte outside the supported subset.
    #[error("unsupported term tag {tag} at offset {offset}")]
    UnsupportedTag { tag: u8, offset: usize },

    /// Atom longer than the term format allows.
    #[error("atom exceeds {MAX_ATOM_CHARS} characters")]
    AtomTooLong,

    /// UTF-8 atom with invalid encoding.
    #[error("atom at offset {0} is not valid UTF-8")]
    InvalidAtom(usize),
}

/// Error while writing a term.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// A length does not fit in its wire field.
    #[error("{what} of length {len} does not fit the term format")]
    TooLong { what: &'static str, len: usize },

    /// Atom longer than the term format allows.
    #[error("atom of {0} characters exceeds {MAX_ATOM_CHARS}")]
    AtomTooLong(usize),
}
