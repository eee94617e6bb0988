//! Worker builder and request loop.
//!
//! The [`WorkerBuilder`] configures buffer sizes and limits. The [`Worker`]
//! owns the parser and runs the loop:
//! 1. Read one framed message
//! 2. Decode the request
//! 3. Parse and encode the tree
//! 4. Write exactly one framed response
//!
//! Only one request is in flight at a time. Recoverable failures are answered
//! with `{error, Reason}`; anything that leaves the stream in an unknown state
//! stops the loop with a [`WorkerError`].
//!
//! # Example
//!
//! ```ignore
//! use htmlport::{Html5everParser, WorkerBuilder};
//!
//! let mut worker = WorkerBuilder::new()
//!     .max_message_size(64 * 1024 * 1024)
//!     .build(Html5everParser::new());
//!
//! worker.serve(tokio::io::stdin(), tokio::io::stdout()).await?;
//! ```

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::codec::DEFAULT_ENCODER_CAPACITY;
use crate::encoder::DEFAULT_STACK_CAPACITY;
use crate::error::{ErrorReason, Result, WorkerError};
use crate::parser::ParseAdapter;
use crate::protocol::DEFAULT_MAX_MESSAGE_SIZE;
use crate::request::{decode_request, RequestError};
use crate::response::Responder;
use crate::transport::{FrameReader, FrameWriter};

/// Builder for configuring and creating a [`Worker`].
#[derive(Debug, Clone)]
pub struct WorkerBuilder {
    max_message_size: u32,
    stack_capacity: usize,
    response_capacity: usize,
}

impl WorkerBuilder {
    /// Create a new worker builder.
    pub fn new() -> Self {
        Self {
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            stack_capacity: DEFAULT_STACK_CAPACITY,
            response_capacity: DEFAULT_ENCODER_CAPACITY,
        }
    }

    /// Set the largest accepted request.
    ///
    /// A longer request is fatal since its body cannot be skipped safely.
    /// Default: `u32::MAX`, the largest length a header can express
    pub fn max_message_size(mut self, limit: u32) -> Self {
        self.max_message_size = limit;
        self
    }

    /// Set how many open parents the tree encoder reserves room for.
    ///
    /// Deeper trees still encode; the stack grows as needed.
    /// Default: 64
    pub fn stack_capacity(mut self, capacity: usize) -> Self {
        self.stack_capacity = capacity;
        self
    }

    /// Set the initial response buffer size.
    ///
    /// Default: 4KB
    pub fn response_capacity(mut self, capacity: usize) -> Self {
        self.response_capacity = capacity;
        self
    }

    /// Build a worker that parses with `parser`.
    pub fn build<P: ParseAdapter>(self, parser: P) -> Worker<P> {
        Worker {
            parser,
            responder: Responder::new(self.response_capacity, self.stack_capacity),
            max_message_size: self.max_message_size,
            requests: 0,
            rejected: 0,
        }
    }
}

impl Default for WorkerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Request loop around one parser.
pub struct Worker<P> {
    parser: P,
    responder: Responder,
    max_message_size: u32,
    /// Requests handled so far.
    requests: u64,
    /// Requests answered with `{error, Reason}`.
    rejected: u64,
}

impl<P: ParseAdapter> Worker<P> {
    /// Handle one request message and return the response payload.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::Protocol`] if the message is corrupt. No
    /// response should be written in that case.
    pub fn handle(&mut self, message: &Bytes) -> Result<Bytes> {
        self.requests += 1;

        let request = match decode_request(message) {
            Ok(request) => request,
            Err(RequestError::Rejected(reason)) => return Ok(self.reject(reason)),
            Err(RequestError::Corrupt(e)) => return Err(WorkerError::Protocol(e)),
        };

        tracing::debug!(
            request = self.requests,
            mode = ?request.mode,
            flags = ?request.flags,
            html_len = request.html.len(),
            "Handling request"
        );

        let doc = match self.parser.parse(&request.html, &request.mode) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!("Parse failed for request {}: {}", self.requests, e);
                return Ok(self.reject(ErrorReason::ParseFailed));
            }
        };

        let response = self.responder.assemble(Ok(&doc), request.flags);
        if u32::try_from(response.len()).is_err() {
            return Ok(self.reject(ErrorReason::ResponseTooLarge));
        }

        tracing::debug!(
            request = self.requests,
            nodes = doc.len(),
            response_len = response.len(),
            "Request done"
        );
        Ok(response)
    }

    /// Serve requests until the input ends or a fatal error occurs.
    ///
    /// Each message, its document, and its response are dropped before the
    /// next message is read.
    pub async fn serve<R, W>(&mut self, reader: R, writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut reader = FrameReader::with_max_message_size(reader, self.max_message_size);
        let mut writer = FrameWriter::new(writer);

        while let Some(message) = reader.read_message().await? {
            let response = self.handle(&message)?;
            drop(message);
            writer.write_message(&response).await?;
        }

        tracing::info!(
            requests = self.requests,
            rejected = self.rejected,
            "Input closed, stopping"
        );
        Ok(())
    }

    /// Number of requests handled so far.
    pub fn requests(&self) -> u64 {
        self.requests
    }

    /// Number of requests answered with an error envelope.
    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    /// Get the configured message size limit.
    pub fn max_message_size(&self) -> u32 {
        self.max_message_size
    }

    fn reject(&mut self, reason: ErrorReason) -> Bytes {
        self.rejected += 1;
        tracing::warn!("Rejecting request {}: {}", self.requests, reason);
        self.responder.error(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{TermDecoder, TermEncoder, WireValue};
    use crate::dom::Document;
    use crate::parser::ParseError;
    use crate::protocol::build_message;
    use crate::request::Mode;

    struct FailingParser;

    impl ParseAdapter for FailingParser {
        fn parse(&mut self, _html: &[u8], _mode: &Mode) -> std::result::Result<Document, ParseError> {
            Err(ParseError::Engine("boom".to_string()))
        }
    }

    /// Counts calls and returns an empty document.
    #[derive(Default)]
    struct CountingParser {
        calls: usize,
    }

    impl ParseAdapter for CountingParser {
        fn parse(&mut self, _html: &[u8], _mode: &Mode) -> std::result::Result<Document, ParseError> {
            self.calls += 1;
            Ok(Document::new())
        }
    }

    fn request(value: WireValue) -> Bytes {
        let mut encoder = TermEncoder::new();
        encoder.version();
        encoder.value(&value).unwrap();
        encoder.into_bytes()
    }

    fn decode_call(html: &str) -> Bytes {
        request(WireValue::Tuple(vec![
            WireValue::atom("decode"),
            WireValue::binary(html),
            WireValue::empty_list(),
        ]))
    }

    fn decode_response(bytes: &[u8]) -> WireValue {
        let mut decoder = TermDecoder::new(bytes);
        decoder.version().unwrap();
        decoder.value().unwrap()
    }

    fn error(reason: &str) -> WireValue {
        WireValue::Tuple(vec![WireValue::atom("error"), WireValue::atom(reason)])
    }

    #[test]
    fn test_builder_defaults() {
        let worker = WorkerBuilder::new().build(CountingParser::default());
        assert_eq!(worker.max_message_size(), DEFAULT_MAX_MESSAGE_SIZE);
        assert_eq!(worker.requests(), 0);
    }

    #[test]
    fn test_builder_method_chaining() {
        let worker = WorkerBuilder::default()
            .max_message_size(1024)
            .stack_capacity(8)
            .response_capacity(128)
            .build(CountingParser::default());
        assert_eq!(worker.max_message_size(), 1024);
    }

    #[test]
    fn test_parse_failure_is_reported() {
        let mut worker = WorkerBuilder::new().build(FailingParser);
        let response = worker.handle(&decode_call("<p>")).unwrap();
        assert_eq!(decode_response(&response), error("parse_failed"));
        assert_eq!(worker.rejected(), 1);
    }

    #[test]
    fn test_unknown_context_skips_parser() {
        let mut worker = WorkerBuilder::new().build(CountingParser::default());
        let message = request(WireValue::Tuple(vec![
            WireValue::atom("decode_fragment"),
            WireValue::binary("<li>x</li>"),
            WireValue::empty_list(),
            WireValue::binary("nosuchtag"),
        ]));

        let response = worker.handle(&message).unwrap();
        assert_eq!(decode_response(&response), error("unknown_context_tag"));
        assert_eq!(worker.parser.calls, 0);
    }

    #[test]
    fn test_corrupt_message_is_fatal() {
        let mut worker = WorkerBuilder::new().build(CountingParser::default());
        let result = worker.handle(&Bytes::from_static(&[130, 104, 0]));
        assert!(matches!(result, Err(WorkerError::Protocol(_))));
        assert_eq!(worker.parser.calls, 0);
    }

    #[tokio::test]
    async fn test_serve_answers_each_message_in_order() {
        let mut input = Vec::new();
        input.extend(build_message(&decode_call("a")).unwrap());
        input.extend(build_message(&request(WireValue::atom("nope"))).unwrap());
        input.extend(build_message(&decode_call("b")).unwrap());

        let mut output = Vec::new();
        let mut worker = WorkerBuilder::new().build(CountingParser::default());
        worker.serve(&input[..], &mut output).await.unwrap();

        let mut reader = FrameReader::new(&output[..]);
        let mut responses = Vec::new();
        while let Some(message) = reader.read_message().await.unwrap() {
            responses.push(decode_response(&message));
        }

        let ok = WireValue::Tuple(vec![WireValue::atom("ok"), WireValue::empty_list()]);
        assert_eq!(responses, vec![ok.clone(), error("badmatch"), ok]);
        assert_eq!(worker.requests(), 3);
        assert_eq!(worker.rejected(), 1);
        assert_eq!(worker.parser.calls, 2);
    }

    #[tokio::test]
    async fn test_mistyped_context_keeps_serving() {
        let mistyped = request(WireValue::Tuple(vec![
            WireValue::atom("decode_fragment"),
            WireValue::binary("<li>a</li>"),
            WireValue::empty_list(),
            WireValue::atom("ul"),
        ]));
        let mut input = build_message(&mistyped).unwrap();
        input.extend(build_message(&decode_call("b")).unwrap());

        let mut output = Vec::new();
        let mut worker = WorkerBuilder::new().build(CountingParser::default());
        worker.serve(&input[..], &mut output).await.unwrap();

        let mut reader = FrameReader::new(&output[..]);
        let mut responses = Vec::new();
        while let Some(message) = reader.read_message().await.unwrap() {
            responses.push(decode_response(&message));
        }

        let ok = WireValue::Tuple(vec![WireValue::atom("ok"), WireValue::empty_list()]);
        assert_eq!(responses, vec![error("badmatch"), ok]);
        assert_eq!(worker.parser.calls, 1);
    }

    #[tokio::test]
    async fn test_serve_stops_without_response_on_fatal_error() {
        let mut input = Vec::new();
        input.extend(build_message(&decode_call("a")).unwrap());
        input.extend(build_message(&[130, 104, 0]).unwrap());
        input.extend(build_message(&decode_call("never read")).unwrap());

        let mut output = Vec::new();
        let mut worker = WorkerBuilder::new().build(CountingParser::default());
        let result = worker.serve(&input[..], &mut output).await;
        assert!(matches!(result, Err(WorkerError::Protocol(_))));

        let mut reader = FrameReader::new(&output[..]);
        assert!(reader.read_message().await.unwrap().is_some());
        assert!(reader.read_message().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_serve_rejects_oversized_message() {
        let input = build_message(&decode_call("<p>too big</p>")).unwrap();
        let mut output = Vec::new();
        let mut worker = WorkerBuilder::new()
            .max_message_size(8)
            .build(CountingParser::default());

        let result = worker.serve(&input[..], &mut output).await;
        assert!(matches!(result, Err(WorkerError::MessageTooLarge { .. })));
        assert!(output.is_empty());
    }

    #[tokio::test]
    async fn test_serve_empty_input() {
        let mut output = Vec::new();
        let mut worker = WorkerBuilder::new().build(CountingParser::default());
        worker.serve(&b""[..], &mut output).await.unwrap();
        assert!(output.is_empty());
        assert_eq!(worker.requests(), 0);
    }
}
