//! External Term Format tag bytes.
//!
//! Only the subset exchanged by the worker is decoded into values; the
//! remaining tags are listed so [`TermDecoder::skip`](super::TermDecoder::skip)
//! can step over them.

/// Leading byte of every encoded term.
pub const VERSION: u8 = 131;

pub const NEW_FLOAT_EXT: u8 = 70;
pub const BIT_BINARY_EXT: u8 = 77;
pub const SMALL_INTEGER_EXT: u8 = 97;
pub const INTEGER_EXT: u8 = 98;
pub const FLOAT_EXT: u8 = 99;
pub const ATOM_EXT: u8 = 100;
pub const SMALL_TUPLE_EXT: u8 = 104;
pub const LARGE_TUPLE_EXT: u8 = 105;
pub const NIL_EXT: u8 = 106;
pub const STRING_EXT: u8 = 107;
pub const LIST_EXT: u8 = 108;
pub const BINARY_EXT: u8 = 109;
pub const SMALL_BIG_EXT: u8 = 110;
pub const LARGE_BIG_EXT: u8 = 111;
pub const SMALL_ATOM_EXT: u8 = 115;
pub const MAP_EXT: u8 = 116;
pub const ATOM_UTF8_EXT: u8 = 118;
pub const SMALL_ATOM_UTF8_EXT: u8 = 119;

/// Old-style float payload length (formatted text).
pub const FLOAT_EXT_LEN: usize = 31;

/// Maximum number of characters in an atom.
pub const MAX_ATOM_CHARS: usize = 255;

/// Atom used as the "absent" sentinel.
pub const NIL_ATOM: &str = "nil";

/// Check if a tag byte starts an atom.
#[inline]
pub fn is_atom(tag: u8) -> bool {
    matches!(
        tag,
        ATOM_EXT | SMALL_ATOM_EXT | ATOM_UTF8_EXT | SMALL_ATOM_UTF8_EXT
    )
}
