//! Request decoding.
//!
//! A request is one of
//!
//! ```text
//! {decode, Html, Options}
//! {decode_fragment, Html, Options, ContextTag}
//! ```
//!
//! Shape problems (wrong tuple, unknown call, wrong arity, mistyped or
//! unknown context tag) are recoverable and become `{error, Reason}` responses. Damage to
//! the term itself, such as a bad version marker or a truncated or mistyped
//! html field, is fatal: the rest of the stream can no longer be trusted.

mod options;

pub use options::{EncodingFlags, OPT_COMMENT_TUPLE3, OPT_HTML_ATOMS, OPT_NIL_SELF_CLOSING};

use bytes::Bytes;
use thiserror::Error;

use crate::codec::tags::{is_atom, BINARY_EXT, LIST_EXT, NIL_EXT};
use crate::codec::{DecodeError, TermDecoder};
use crate::dom::tags;
use crate::error::ErrorReason;

/// Leading atom of a whole-document request.
pub const CALL_DECODE: &str = "decode";
/// Leading atom of a fragment request.
pub const CALL_DECODE_FRAGMENT: &str = "decode_fragment";

/// What to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Document,
    /// Fragment parsed as if it were the content of `context`.
    Fragment { context: &'static str },
}

/// A decoded request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub mode: Mode,
    /// HTML input, sliced from the received message without copying.
    pub html: Bytes,
    pub flags: EncodingFlags,
}

/// Why a message could not be turned into a [`Request`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// Answer with `{error, Reason}` and keep serving.
    #[error("request rejected: {0}")]
    Rejected(ErrorReason),

    /// The message is corrupt. Stop the worker.
    #[error(transparent)]
    Corrupt(#[from] DecodeError),
}

impl From<ErrorReason> for RequestError {
    fn from(reason: ErrorReason) -> Self {
        RequestError::Rejected(reason)
    }
}

/// Decode one request message.
pub fn decode_request(message: &Bytes) -> Result<Request, RequestError> {
    let mut decoder = TermDecoder::new(message);
    decoder.version()?;

    let arity = decoder
        .tuple_header()
        .map_err(|_| ErrorReason::BadMatch)?;
    let call = decoder.atom().map_err(|_| ErrorReason::BadMatch)?;

    let fragment = match call.as_str() {
        CALL_DECODE => false,
        CALL_DECODE_FRAGMENT => true,
        _ => return Err(ErrorReason::UnknownCall.into()),
    };
    let expected = if fragment { 4 } else { 3 };
    if arity != expected {
        return Err(ErrorReason::BadMatch.into());
    }

    let html = message.slice_ref(decoder.binary()?);
    let flags = decode_options(&mut decoder)?;

    let mode = if fragment {
        // the context is the last field, so a mistyped one cannot desync the stream
        match decoder.peek_type() {
            Ok((BINARY_EXT, _)) => {}
            Ok(_) | Err(DecodeError::UnsupportedTag { .. }) => {
                return Err(ErrorReason::BadMatch.into());
            }
            Err(e) => return Err(e.into()),
        }
        let name = decoder.binary()?;
        let context = lookup_context(name).ok_or(ErrorReason::UnknownContextTag)?;
        Mode::Fragment { context }
    } else {
        Mode::Document
    };

    Ok(Request { mode, html, flags })
}

/// Resolve a context tag name against the known vocabulary, ignoring ASCII case.
pub fn lookup_context(name: &[u8]) -> Option<&'static str> {
    let name = std::str::from_utf8(name).ok()?;
    tags::known_tag(&name.to_ascii_lowercase())
}

/// Read the option list. Non-atom entries are stepped over.
fn decode_options(decoder: &mut TermDecoder<'_>) -> Result<EncodingFlags, DecodeError> {
    let mut names = Vec::new();
    let mut count = decoder.list_header()?;

    while count > 0 {
        for _ in 0..count {
            let (tag, _) = decoder.peek_type()?;
            if is_atom(tag) {
                names.push(decoder.atom()?);
            } else {
                decoder.skip()?;
            }
        }

        // tail: [] ends the list, another cell continues a cons chain
        let (tag, _) = decoder.peek_type()?;
        match tag {
            NIL_EXT | LIST_EXT => count = decoder.list_header()?,
            found => {
                return Err(DecodeError::UnexpectedTag {
                    expected: "list tail",
                    found,
                    offset: decoder.position(),
                })
            }
        }
    }

    Ok(EncodingFlags::resolve(names.iter().map(String::as_str)))
}
