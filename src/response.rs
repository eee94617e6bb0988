//! Response envelopes.
//!
//! Every request gets exactly one of
//!
//! ```text
//! {ok, Children}
//! {error, Reason}
//! ```
//!
//! A tree that cannot be encoded (a length overflowing its wire field) is
//! replaced by `{error, response_too_large}`, so a response buffer is always
//! one complete term.

use bytes::Bytes;

use crate::codec::{EncodeError, StaticAtom, TermEncoder, DEFAULT_ENCODER_CAPACITY};
use crate::dom::Document;
use crate::encoder::{TreeEncoder, DEFAULT_STACK_CAPACITY};
use crate::error::ErrorReason;
use crate::request::EncodingFlags;

pub const OK_ATOM: StaticAtom = StaticAtom::new("ok");
pub const ERROR_ATOM: StaticAtom = StaticAtom::new("error");

/// Builds response payloads with configurable buffer reservations.
#[derive(Debug, Clone, Copy)]
pub struct Responder {
    response_capacity: usize,
    stack_capacity: usize,
}

impl Responder {
    pub fn new(response_capacity: usize, stack_capacity: usize) -> Self {
        Self {
            response_capacity,
            stack_capacity,
        }
    }

    /// `{ok, Children}` for the root of `doc`.
    pub fn ok(&self, doc: &Document, flags: EncodingFlags) -> Result<Bytes, EncodeError> {
        let mut out = TermEncoder::with_capacity(self.response_capacity);
        out.version();
        out.small_tuple_header(2);
        out.static_atom(OK_ATOM);

        let stats = TreeEncoder::with_stack_capacity(self.stack_capacity).encode(doc, flags, &mut out)?;
        tracing::trace!(
            nodes = stats.nodes,
            lists = stats.lists_opened,
            max_depth = stats.max_depth,
            "Encoded tree"
        );
        Ok(out.into_bytes())
    }

    /// `{error, Reason}`.
    pub fn error(&self, reason: ErrorReason) -> Bytes {
        let mut out = TermEncoder::with_capacity(32);
        write_error(&mut out, reason);
        out.into_bytes()
    }

    /// Build the response for a finished request.
    ///
    /// Encoding failures never escape: the partial buffer is dropped and an
    /// error envelope is returned instead.
    pub fn assemble(&self, outcome: Result<&Document, ErrorReason>, flags: EncodingFlags) -> Bytes {
        match outcome {
            Ok(doc) => match self.ok(doc, flags) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!("Discarding response: {}", e);
                    self.error(ErrorReason::ResponseTooLarge)
                }
            },
            Err(reason) => self.error(reason),
        }
    }
}

impl Default for Responder {
    fn default() -> Self {
        Self::new(DEFAULT_ENCODER_CAPACITY, DEFAULT_STACK_CAPACITY)
    }
}

/// `{ok, Children}` with default buffer sizes.
pub fn ok_response(doc: &Document, flags: EncodingFlags) -> Result<Bytes, EncodeError> {
    Responder::default().ok(doc, flags)
}

/// `{error, Reason}`.
pub fn error_response(reason: ErrorReason) -> Bytes {
    Responder::default().error(reason)
}

/// See [`Responder::assemble`].
pub fn assemble(outcome: Result<&Document, ErrorReason>, flags: EncodingFlags) -> Bytes {
    Responder::default().assemble(outcome, flags)
}

fn write_error(out: &mut TermEncoder, reason: ErrorReason) {
    out.version();
    out.small_tuple_header(2);
    out.static_atom(ERROR_ATOM);
    out.static_atom(reason.wire_atom());
}
