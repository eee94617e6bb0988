//! # htmlport
//!
//! HTML parsing worker for a BEAM-style parent process.
//!
//! The worker reads length-prefixed requests from stdin, parses the HTML they
//! carry, and answers on stdout with the parsed tree as an External Term
//! Format term.
//!
//! ## Protocol
//!
//! ```text
//! message  := [u32 BE length][term]
//! request  := {decode, Html, Options}
//!           | {decode_fragment, Html, Options, ContextTag}
//! response := {ok, Children} | {error, Reason}
//! ```
//!
//! Options are the atoms `html_atoms`, `nil_self_closing` and
//! `comment_tuple3`; see [`EncodingFlags`].
//!
//! ## Example
//!
//! ```ignore
//! use htmlport::{Html5everParser, WorkerBuilder};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let mut worker = WorkerBuilder::new().build(Html5everParser::new());
//!     worker
//!         .serve(tokio::io::stdin(), tokio::io::stdout())
//!         .await
//!         .unwrap();
//! }
//! ```

pub mod codec;
pub mod config;
pub mod dom;
pub mod encoder;
pub mod error;
pub mod parser;
pub mod protocol;
pub mod request;
pub mod response;
pub mod transport;

mod worker;

pub use config::WorkerConfig;
pub use dom::Document;
pub use encoder::{encode_children, encode_children_with_stats, EncodeStats};
pub use error::{ErrorReason, WorkerError};
pub use parser::{Html5everParser, ParseAdapter, ParseError};
pub use request::{decode_request, EncodingFlags, Mode, Request, RequestError};
pub use response::{assemble, error_response, ok_response};
pub use worker::{Worker, WorkerBuilder};
