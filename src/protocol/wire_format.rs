//! Wire format encoding and decoding.
//!
//! Every message in both directions is framed as:
//! ```text
//! ┌──────────┬─────────────────────┐
//! │ Length   │ Payload             │
//! │ 4 bytes  │ Length bytes        │
//! │ uint32 BE│ (External Term)     │
//! └──────────┴─────────────────────┘
//! ```

/// Header size in bytes (fixed, exactly 4).
pub const HEADER_SIZE: usize = 4;

/// Absolute maximum message size (what the header can express).
pub const ABSOLUTE_MAX_MESSAGE_SIZE: u32 = u32::MAX;

/// Default maximum message size. Lower limits are opt-in.
pub const DEFAULT_MAX_MESSAGE_SIZE: u32 = ABSOLUTE_MAX_MESSAGE_SIZE;

/// Encode a payload length to header bytes (Big Endian).
///
/// # Example
///
/// ```
/// use htmlport::protocol::encode_header;
///
/// assert_eq!(encode_header(0x0102_0304), [1, 2, 3, 4]);
/// ```
#[inline]
pub fn encode_header(length: u32) -> [u8; HEADER_SIZE] {
    length.to_be_bytes()
}

/// Decode a payload length from header bytes (Big Endian).
#[inline]
pub fn decode_header(header: [u8; HEADER_SIZE]) -> u32 {
    u32::from_be_bytes(header)
}

/// Build a complete message (header + payload) in one buffer.
///
/// Returns `None` if the payload cannot be described by a 4-byte header.
pub fn build_message(payload: &[u8]) -> Option<Vec<u8>> {
    let length = u32::try_from(payload.len()).ok()?;
    let mut message = Vec::with_capacity(HEADER_SIZE + payload.len());
    message.extend_from_slice(&encode_header(length));
    message.extend_from_slice(payload);
    Some(message)
}
