//! Error types for htmlport.
//!
//! Errors come in two tiers:
//!
//! - [`WorkerError`] is fatal. The byte stream or the term format itself is
//!   broken, so the process stops instead of guessing at later bytes.
//! - [`ErrorReason`] is recoverable. It is sent back to the caller as
//!   `{error, Reason}` and the worker moves on to the next message.

use thiserror::Error;

use crate::codec::{DecodeError, StaticAtom};

/// Fatal worker error. The process exits after logging it.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// I/O error on the input or output stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stream ended in the middle of a length header.
    #[error("truncated message header: read {read} of {expected} bytes")]
    TruncatedHeader { read: usize, expected: usize },

    /// Stream ended in the middle of a message body.
    #[error("truncated message body: read {read} of {expected} bytes")]
    TruncatedBody { read: usize, expected: usize },

    /// Message length exceeds the configured limit or the 4-byte header range.
    #[error("message size {size} exceeds maximum {max}")]
    MessageTooLarge { size: u64, max: u64 },

    /// The message does not follow the term format.
    #[error("malformed message: {0}")]
    Protocol(#[from] DecodeError),
}

/// Result type alias using WorkerError.
pub type Result<T> = std::result::Result<T, WorkerError>;

/// Recoverable request failure, encoded as the second element of
/// an `{error, Reason}` response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorReason {
    /// Request has the wrong shape or arity.
    BadMatch,
    /// Leading atom is neither `decode` nor `decode_fragment`.
    UnknownCall,
    /// Fragment context names a tag outside the known vocabulary.
    UnknownContextTag,
    /// The parser rejected the input.
    ParseFailed,
    /// The encoded tree does not fit in one message.
    ResponseTooLarge,
}

impl ErrorReason {
    /// Atom sent on the wire.
    pub fn wire_atom(self) -> StaticAtom {
        const BAD_MATCH: StaticAtom = StaticAtom::new("badmatch");
        const UNKNOWN_CALL: StaticAtom = StaticAtom::new("unknown_call");
        const UNKNOWN_CONTEXT_TAG: StaticAtom = StaticAtom::new("unknown_context_tag");
        const PARSE_FAILED: StaticAtom = StaticAtom::new("parse_failed");
        const RESPONSE_TOO_LARGE: StaticAtom = StaticAtom::new("response_too_large");

        match self {
            ErrorReason::BadMatch => BAD_MATCH,
            ErrorReason::UnknownCall => UNKNOWN_CALL,
            ErrorReason::UnknownContextTag => UNKNOWN_CONTEXT_TAG,
            ErrorReason::ParseFailed => PARSE_FAILED,
            ErrorReason::ResponseTooLarge => RESPONSE_TOO_LARGE,
        }
    }

    /// Atom text sent on the wire.
    pub fn as_atom(self) -> &'static str {
        self.wire_atom().as_str()
    }
}

impl std::fmt::Display for ErrorReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_atom())
    }
}
