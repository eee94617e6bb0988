//! Transport module - framed message I/O over async byte streams.
//!
//! The worker talks to its parent over stdin/stdout, but the reader and
//! writer are generic so tests can drive them with in-memory buffers.

mod framed;

pub use framed::{FrameReader, FrameWriter};
