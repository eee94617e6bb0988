//! Codec module - External Term Format encoding and decoding.
//!
//! This module provides the subset of the term format the worker exchanges
//! with its parent:
//!
//! - [`TermDecoder`] - sequential cursor over a received message
//! - [`TermEncoder`] - appending writer for responses
//! - [`WireValue`] - owned term values for building and inspecting whole terms
//!
//! # Design
//!
//! Both directions work on flat buffers without recursion. Responses are
//! streamed into the encoder while the tree is walked, so no intermediate
//! value tree is ever built on the hot path.

mod decoder;
mod encoder;
mod error;
pub mod tags;
mod value;

pub use decoder::TermDecoder;
pub use encoder::{StaticAtom, TermEncoder, DEFAULT_ENCODER_CAPACITY};
pub use error::{DecodeError, EncodeError};
pub use value::WireValue;
