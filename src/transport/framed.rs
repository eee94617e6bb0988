//! Length-prefixed message reader and writer.
//!
//! The reader blocks until exactly one message is available. End of input
//! before the first header byte is a clean shutdown; any other short read
//! means the stream is desynchronized and is reported as a fatal error.
//!
//! # Example
//!
//! ```ignore
//! use htmlport::transport::{FrameReader, FrameWriter};
//!
//! let mut reader = FrameReader::new(tokio::io::stdin());
//! let mut writer = FrameWriter::new(tokio::io::stdout());
//!
//! while let Some(message) = reader.read_message().await? {
//!     writer.write_message(&message).await?;
//! }
//! ```

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{Result, WorkerError};
use crate::protocol::{decode_header, encode_header, DEFAULT_MAX_MESSAGE_SIZE, HEADER_SIZE};

/// Largest single read into a message body (64KB).
const READ_CHUNK_SIZE: usize = 64 * 1024;

/// Reads framed messages from a byte stream.
pub struct FrameReader<R> {
    inner: R,
    max_message_size: u32,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    /// Create a reader with the default message size limit.
    pub fn new(inner: R) -> Self {
        Self::with_max_message_size(inner, DEFAULT_MAX_MESSAGE_SIZE)
    }

    /// Create a reader with a custom message size limit.
    pub fn with_max_message_size(inner: R, max_message_size: u32) -> Self {
        Self {
            inner,
            max_message_size,
        }
    }

    /// Read one complete message.
    ///
    /// Returns `Ok(None)` if the stream ends cleanly between messages.
    ///
    /// # Errors
    ///
    /// - [`WorkerError::TruncatedHeader`] if the stream ends inside a header
    /// - [`WorkerError::TruncatedBody`] if it ends inside a body
    /// - [`WorkerError::MessageTooLarge`] if the header exceeds the limit
    pub async fn read_message(&mut self) -> Result<Option<Bytes>> {
        let mut header = [0u8; HEADER_SIZE];
        let read = read_full(&mut self.inner, &mut header).await?;
        if read == 0 {
            return Ok(None);
        }
        if read < HEADER_SIZE {
            return Err(WorkerError::TruncatedHeader {
                read,
                expected: HEADER_SIZE,
            });
        }

        let length = decode_header(header);
        if length > self.max_message_size {
            return Err(WorkerError::MessageTooLarge {
                size: u64::from(length),
                max: u64::from(self.max_message_size),
            });
        }

        // grow with the data actually received, not with the declared length
        let expected = length as usize;
        let mut body = BytesMut::with_capacity(expected.min(READ_CHUNK_SIZE));
        while body.len() < expected {
            let missing = expected - body.len();
            body.reserve(missing.min(READ_CHUNK_SIZE));
            let n = (&mut self.inner)
                .take(missing as u64)
                .read_buf(&mut body)
                .await?;
            if n == 0 {
                return Err(WorkerError::TruncatedBody {
                    read: body.len(),
                    expected,
                });
            }
        }

        Ok(Some(body.freeze()))
    }
}

/// Fill `buf` from the stream, stopping early only at end of input.
///
/// Returns the number of bytes actually read.
async fn read_full<R: AsyncRead + Unpin>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

/// Writes framed messages to a byte stream.
pub struct FrameWriter<W> {
    inner: W,
}

impl<W: AsyncWrite + Unpin> FrameWriter<W> {
    /// Create a new writer.
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Write one message and flush it.
    ///
    /// The length header is computed from the payload actually written.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::MessageTooLarge`] (before writing anything) if the
    /// payload cannot be described by a 4-byte header, or an I/O error.
    pub async fn write_message(&mut self, payload: &[u8]) -> Result<()> {
        let length = u32::try_from(payload.len()).map_err(|_| WorkerError::MessageTooLarge {
            size: payload.len() as u64,
            max: u64::from(u32::MAX),
        })?;

        self.inner.write_all(&encode_header(length)).await?;
        self.inner.write_all(payload).await?;
        self.inner.flush().await?;
        Ok(())
    }
}
