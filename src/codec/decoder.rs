//! Cursor-based term decoder.
//!
//! Reads terms sequentially from a borrowed buffer. Methods that read a
//! specific kind of term check the tag first and leave the cursor untouched
//! when the tag does not match, so callers can fall back to [`TermDecoder::skip`].
//!
//! # Example
//!
//! ```
//! use htmlport::codec::{TermDecoder, TermEncoder};
//!
//! let mut encoder = TermEncoder::new();
//! encoder.version();
//! encoder.tuple_header(2).unwrap();
//! encoder.atom("decode").unwrap();
//! encoder.binary(b"<p>").unwrap();
//! let bytes = encoder.into_bytes();
//!
//! let mut decoder = TermDecoder::new(&bytes);
//! decoder.version().unwrap();
//! assert_eq!(decoder.tuple_header().unwrap(), 2);
//! assert_eq!(decoder.atom().unwrap(), "decode");
//! assert_eq!(decoder.binary().unwrap(), b"<p>");
//! ```

use super::error::DecodeError;
use super::tags::*;
use super::value::WireValue;

type Result<T> = std::result::Result<T, DecodeError>;

/// Upper bound on up-front allocation for containers with a declared length.
const PREALLOC_LIMIT: usize = 1024;

/// Sequential reader over an encoded term.
#[derive(Debug, Clone)]
pub struct TermDecoder<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> TermDecoder<'a> {
    /// Create a decoder positioned at the start of `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current byte offset.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of unread bytes.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn peek_byte(&self) -> Result<u8> {
        self.buf
            .get(self.pos)
            .copied()
            .ok_or(DecodeError::UnexpectedEnd(self.pos))
    }

    fn byte(&mut self) -> Result<u8> {
        let byte = self.peek_byte()?;
        self.pos += 1;
        Ok(byte)
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.remaining() < len {
            return Err(DecodeError::UnexpectedEnd(self.buf.len()));
        }
        let slice = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn u16(&mut self) -> Result<u16> {
        let bytes = self.take(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    fn u32(&mut self) -> Result<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn unexpected(&self, expected: &'static str, found: u8) -> DecodeError {
        DecodeError::UnexpectedTag {
            expected,
            found,
            offset: self.pos,
        }
    }

    /// Read the version marker that starts every term.
    pub fn version(&mut self) -> Result<()> {
        match self.byte()? {
            VERSION => Ok(()),
            other => Err(DecodeError::BadVersion(other)),
        }
    }

    /// Peek at the next term's tag and declared size without consuming it.
    ///
    /// The size is the arity for tuples, the element count for lists and
    /// strings, the byte length for binaries and atoms, and 0 otherwise.
    pub fn peek_type(&self) -> Result<(u8, usize)> {
        let mut ahead = self.clone();
        let tag = ahead.byte()?;
        let size = match tag {
            SMALL_INTEGER_EXT | INTEGER_EXT | NIL_EXT | NEW_FLOAT_EXT | FLOAT_EXT => 0,
            SMALL_TUPLE_EXT | SMALL_ATOM_EXT | SMALL_ATOM_UTF8_EXT | SMALL_BIG_EXT => {
                ahead.byte()? as usize
            }
            ATOM_EXT | ATOM_UTF8_EXT | STRING_EXT => ahead.u16()? as usize,
            LARGE_TUPLE_EXT | LIST_EXT | BINARY_EXT | LARGE_BIG_EXT | MAP_EXT
            | BIT_BINARY_EXT => ahead.u32()? as usize,
            _ => {
                return Err(DecodeError::UnsupportedTag {
                    tag,
                    offset: self.pos,
                })
            }
        };
        Ok((tag, size))
    }

    /// Read a tuple header and return its arity.
    pub fn tuple_header(&mut self) -> Result<usize> {
        match self.peek_byte()? {
            SMALL_TUPLE_EXT => {
                self.pos += 1;
                Ok(self.byte()? as usize)
            }
            LARGE_TUPLE_EXT => {
                self.pos += 1;
                Ok(self.u32()? as usize)
            }
            other => Err(self.unexpected("tuple", other)),
        }
    }

    /// Read an atom.
    ///
    /// Latin-1 atoms are transcoded; UTF-8 atoms are validated.
    pub fn atom(&mut self) -> Result<String> {
        let tag = self.peek_byte()?;
        if !is_atom(tag) {
            return Err(self.unexpected("atom", tag));
        }
        let start = self.pos;
        self.pos += 1;

        let len = match tag {
            SMALL_ATOM_EXT | SMALL_ATOM_UTF8_EXT => self.byte()? as usize,
            _ => self.u16()? as usize,
        };
        let bytes = self.take(len)?;

        let text = match tag {
            ATOM_UTF8_EXT | SMALL_ATOM_UTF8_EXT => std::str::from_utf8(bytes)
                .map_err(|_| DecodeError::InvalidAtom(start))?
                .to_string(),
            _ => bytes.iter().map(|&b| char::from(b)).collect(),
        };

        if text.chars().count() > MAX_ATOM_CHARS {
            return Err(DecodeError::AtomTooLong);
        }
        Ok(text)
    }

    /// Read a binary, borrowing its bytes from the input.
    pub fn binary(&mut self) -> Result<&'a [u8]> {
        match self.peek_byte()? {
            BINARY_EXT => {
                self.pos += 1;
                let len = self.u32()? as usize;
                self.take(len)
            }
            other => Err(self.unexpected("binary", other)),
        }
    }

    /// Read a list header.
    ///
    /// Returns 0 for the empty list and the declared element count otherwise.
    /// A list written as a chain of cons cells reports 1 per call.
    pub fn list_header(&mut self) -> Result<usize> {
        match self.peek_byte()? {
            NIL_EXT => {
                self.pos += 1;
                Ok(0)
            }
            LIST_EXT => {
                self.pos += 1;
                Ok(self.u32()? as usize)
            }
            other => Err(self.unexpected("list", other)),
        }
    }

    /// Read a small or 32-bit integer.
    pub fn integer(&mut self) -> Result<i32> {
        match self.peek_byte()? {
            SMALL_INTEGER_EXT => {
                self.pos += 1;
                Ok(i32::from(self.byte()?))
            }
            INTEGER_EXT => {
                self.pos += 1;
                Ok(self.u32()? as i32)
            }
            other => Err(self.unexpected("integer", other)),
        }
    }

    /// Skip one complete term of any supported kind.
    ///
    /// Nested containers are walked with a pending-term counter, so the
    /// nesting depth of the input does not affect the native stack.
    pub fn skip(&mut self) -> Result<()> {
        let mut pending: usize = 1;
        while pending > 0 {
            pending -= 1;
            let offset = self.pos;
            let tag = self.byte()?;
            match tag {
                SMALL_INTEGER_EXT => {
                    self.take(1)?;
                }
                INTEGER_EXT => {
                    self.take(4)?;
                }
                NEW_FLOAT_EXT => {
                    self.take(8)?;
                }
                FLOAT_EXT => {
                    self.take(FLOAT_EXT_LEN)?;
                }
                ATOM_EXT | ATOM_UTF8_EXT | STRING_EXT => {
                    let len = self.u16()? as usize;
                    self.take(len)?;
                }
                SMALL_ATOM_EXT | SMALL_ATOM_UTF8_EXT => {
                    let len = self.byte()? as usize;
                    self.take(len)?;
                }
                BINARY_EXT => {
                    let len = self.u32()? as usize;
                    self.take(len)?;
                }
                BIT_BINARY_EXT => {
                    let len = self.u32()? as usize;
                    self.take(len.saturating_add(1))?;
                }
                SMALL_BIG_EXT => {
                    let len = self.byte()? as usize;
                    self.take(len + 1)?;
                }
                LARGE_BIG_EXT => {
                    let len = self.u32()? as usize;
                    self.take(len.saturating_add(1))?;
                }
                NIL_EXT => {}
                SMALL_TUPLE_EXT => pending = pending.saturating_add(self.byte()? as usize),
                LARGE_TUPLE_EXT => pending = pending.saturating_add(self.u32()? as usize),
                // elements plus the tail
                LIST_EXT => {
                    let count = self.u32()? as usize;
                    pending = pending.saturating_add(count).saturating_add(1);
                }
                MAP_EXT => {
                    let pairs = self.u32()? as usize;
                    pending = pending.saturating_add(pairs.saturating_mul(2));
                }
                _ => return Err(DecodeError::UnsupportedTag { tag, offset }),
            }
        }
        Ok(())
    }

    /// Decode one complete term into an owned [`WireValue`].
    ///
    /// Cons-chained lists are flattened. Improper lists are rejected.
    pub fn value(&mut self) -> Result<WireValue> {
        let mut stack = vec![Open::new(OpenKind::Root, 1)];

        while let Some(top) = stack.last_mut() {
            if top.remaining == 0 {
                if top.kind == OpenKind::List {
                    let tag = self.peek_byte()?;
                    match tag {
                        LIST_EXT => {
                            top.remaining = self.list_header()?;
                            continue;
                        }
                        NIL_EXT => self.pos += 1,
                        other => return Err(self.unexpected("list tail", other)),
                    }
                }

                let Some(done) = stack.pop() else { break };
                let value = match done.kind {
                    OpenKind::Tuple => WireValue::Tuple(done.items),
                    OpenKind::List => WireValue::List(done.items),
                    OpenKind::Root => {
                        return done
                            .items
                            .into_iter()
                            .next()
                            .ok_or(DecodeError::UnexpectedEnd(self.pos))
                    }
                };
                if let Some(parent) = stack.last_mut() {
                    parent.items.push(value);
                }
                continue;
            }

            top.remaining -= 1;
            match self.peek_byte()? {
                SMALL_TUPLE_EXT | LARGE_TUPLE_EXT => {
                    let arity = self.tuple_header()?;
                    stack.push(Open::new(OpenKind::Tuple, arity));
                }
                LIST_EXT => {
                    let count = self.list_header()?;
                    stack.push(Open::new(OpenKind::List, count));
                }
                _ => {
                    let leaf = self.leaf()?;
                    top.items.push(leaf);
                }
            }
        }

        Err(DecodeError::UnexpectedEnd(self.pos))
    }

    /// Decode a term that contains no nested containers.
    fn leaf(&mut self) -> Result<WireValue> {
        let tag = self.peek_byte()?;
        match tag {
            SMALL_INTEGER_EXT | INTEGER_EXT => Ok(WireValue::Integer(self.integer()?)),
            BINARY_EXT => Ok(WireValue::Binary(self.binary()?.to_vec())),
            NIL_EXT => {
                self.pos += 1;
                Ok(WireValue::List(Vec::new()))
            }
            STRING_EXT => {
                self.pos += 1;
                let len = self.u16()? as usize;
                let bytes = self.take(len)?;
                Ok(WireValue::List(
                    bytes.iter().map(|&b| WireValue::Integer(i32::from(b))).collect(),
                ))
            }
            tag if is_atom(tag) => Ok(WireValue::Atom(self.atom()?)),
            tag => Err(DecodeError::UnsupportedTag {
                tag,
                offset: self.pos,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenKind {
    Root,
    Tuple,
    List,
}

/// A container whose elements are still being decoded.
struct Open {
    kind: OpenKind,
    items: Vec<WireValue>,
    remaining: usize,
}

impl Open {
    fn new(kind: OpenKind, remaining: usize) -> Self {
        Self {
            kind,
            items: Vec::with_capacity(remaining.min(PREALLOC_LIMIT)),
            remaining,
        }
    }
}
