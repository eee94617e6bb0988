//! Appending term encoder.
//!
//! Lists can be written incrementally: each element is preceded by a
//! one-element cons header ([`TermEncoder::list_cons`]) and the list is closed
//! by a single [`TermEncoder::empty_list`]. The encoder never needs to know how
//! many elements a list will have before writing the first one.
//!
//! # Example
//!
//! ```
//! use htmlport::codec::{TermDecoder, TermEncoder, WireValue};
//!
//! // [<<"a">>, <<"b">>] written one cell at a time
//! let mut encoder = TermEncoder::new();
//! encoder.version();
//! for item in [b"a", b"b"] {
//!     encoder.list_cons();
//!     encoder.binary(item).unwrap();
//! }
//! encoder.empty_list();
//!
//! let bytes = encoder.into_bytes();
//! let mut decoder = TermDecoder::new(&bytes);
//! decoder.version().unwrap();
//! assert_eq!(
//!     decoder.value().unwrap(),
//!     WireValue::List(vec![WireValue::binary("a"), WireValue::binary("b")])
//! );
//! ```

use bytes::{BufMut, Bytes, BytesMut};

use super::error::EncodeError;
use super::tags::*;
use super::value::WireValue;

type Result<T> = std::result::Result<T, EncodeError>;

/// Default initial buffer capacity (4KB).
pub const DEFAULT_ENCODER_CAPACITY: usize = 4 * 1024;

const NIL: StaticAtom = StaticAtom::new(NIL_ATOM);

/// Atom name that always fits the short atom form.
///
/// Build these as constants: the length check then runs at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StaticAtom(&'static str);

impl StaticAtom {
    pub const fn new(name: &'static str) -> Self {
        assert!(name.len() <= u8::MAX as usize, "atom name longer than 255 bytes");
        Self(name)
    }

    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

/// Term writer backed by a growable buffer.
#[derive(Debug)]
pub struct TermEncoder {
    buf: BytesMut,
}

impl TermEncoder {
    /// Create an encoder with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_ENCODER_CAPACITY)
    }

    /// Create an encoder with a custom initial capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    /// View the encoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Finish encoding (zero-copy freeze).
    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }

    /// Write the version marker.
    pub fn version(&mut self) {
        self.buf.put_u8(VERSION);
    }

    /// Write a tuple header.
    pub fn tuple_header(&mut self, arity: usize) -> Result<()> {
        if let Ok(small) = u8::try_from(arity) {
            self.buf.put_u8(SMALL_TUPLE_EXT);
            self.buf.put_u8(small);
        } else {
            let large = u32::try_from(arity).map_err(|_| EncodeError::TooLong {
                what: "tuple",
                len: arity,
            })?;
            self.buf.put_u8(LARGE_TUPLE_EXT);
            self.buf.put_u32(large);
        }
        Ok(())
    }

    /// Write a tuple header for a small arity.
    pub fn small_tuple_header(&mut self, arity: u8) {
        self.buf.put_u8(SMALL_TUPLE_EXT);
        self.buf.put_u8(arity);
    }

    /// Write a UTF-8 atom.
    pub fn atom(&mut self, name: &str) -> Result<()> {
        let chars = name.chars().count();
        if chars > MAX_ATOM_CHARS {
            return Err(EncodeError::AtomTooLong(chars));
        }

        if let Ok(len) = u8::try_from(name.len()) {
            self.buf.put_u8(SMALL_ATOM_UTF8_EXT);
            self.buf.put_u8(len);
        } else {
            // 255 chars of at most 4 bytes each always fits in u16
            self.buf.put_u8(ATOM_UTF8_EXT);
            self.buf.put_u16(name.len() as u16);
        }
        self.buf.put_slice(name.as_bytes());
        Ok(())
    }

    /// Write a binary.
    pub fn binary(&mut self, bytes: &[u8]) -> Result<()> {
        let len = u32::try_from(bytes.len()).map_err(|_| EncodeError::TooLong {
            what: "binary",
            len: bytes.len(),
        })?;
        self.buf.put_u8(BINARY_EXT);
        self.buf.put_u32(len);
        self.buf.put_slice(bytes);
        Ok(())
    }

    /// Write an integer in the smallest encoding.
    pub fn integer(&mut self, value: i32) {
        if let Ok(small) = u8::try_from(value) {
            self.buf.put_u8(SMALL_INTEGER_EXT);
            self.buf.put_u8(small);
        } else {
            self.buf.put_u8(INTEGER_EXT);
            self.buf.put_i32(value);
        }
    }

    /// Open one list cell. The next term written is its element.
    pub fn list_cons(&mut self) {
        self.buf.put_u8(LIST_EXT);
        self.buf.put_u32(1);
    }

    /// Write a list header for `count` elements; 0 writes the empty list.
    ///
    /// A non-empty list must be followed by `count` terms and a terminator.
    pub fn list_header(&mut self, count: usize) -> Result<()> {
        if count == 0 {
            self.empty_list();
            return Ok(());
        }
        let count = u32::try_from(count).map_err(|_| EncodeError::TooLong {
            what: "list",
            len: count,
        })?;
        self.buf.put_u8(LIST_EXT);
        self.buf.put_u32(count);
        Ok(())
    }

    /// Write the empty list, which is also the terminator of every list.
    pub fn empty_list(&mut self) {
        self.buf.put_u8(NIL_EXT);
    }

    /// Write an atom whose length was checked when it was built.
    pub fn static_atom(&mut self, atom: StaticAtom) {
        let name = atom.as_str();
        self.buf.put_u8(SMALL_ATOM_UTF8_EXT);
        self.buf.put_u8(name.len() as u8);
        self.buf.put_slice(name.as_bytes());
    }

    /// Write the "absent" sentinel atom.
    pub fn nil(&mut self) {
        self.static_atom(NIL);
    }

    /// Write an owned value (without a version marker).
    pub fn value(&mut self, value: &WireValue) -> Result<()> {
        enum Step<'v> {
            Value(&'v WireValue),
            Terminator,
        }

        let mut steps = vec![Step::Value(value)];
        while let Some(step) = steps.pop() {
            match step {
                Step::Terminator => self.empty_list(),
                Step::Value(WireValue::Integer(n)) => self.integer(*n),
                Step::Value(WireValue::Atom(name)) => self.atom(name)?,
                Step::Value(WireValue::Binary(bytes)) => self.binary(bytes)?,
                Step::Value(WireValue::Tuple(items)) => {
                    self.tuple_header(items.len())?;
                    steps.extend(items.iter().rev().map(Step::Value));
                }
                Step::Value(WireValue::List(items)) => {
                    self.list_header(items.len())?;
                    if !items.is_empty() {
                        steps.push(Step::Terminator);
                        steps.extend(items.iter().rev().map(Step::Value));
                    }
                }
            }
        }
        Ok(())
    }
}

impl Default for TermEncoder {
    fn default() -> Self {
        Self::new()
    }
}
