//! Protocol module - message framing.
//!
//! This module implements the outer framing shared by requests and responses:
//! - 4-byte big-endian length header encoding/decoding
//! - size limits

mod wire_format;

pub use wire_format::{
    build_message, decode_header, encode_header, ABSOLUTE_MAX_MESSAGE_SIZE,
    DEFAULT_MAX_MESSAGE_SIZE, HEADER_SIZE,
};
