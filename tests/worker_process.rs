//! Exit status tests for the `htmlport-worker` binary.
//!
//! Each test spawns the real executable, feeds it stdin, and checks how the
//! process ends.

use std::io::{ErrorKind, Write};
use std::process::{Command, Output, Stdio};

use htmlport::codec::{TermDecoder, TermEncoder, WireValue};
use htmlport::protocol::{build_message, decode_header, HEADER_SIZE};

fn run_worker(input: &[u8]) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_htmlport-worker"))
        .env("HTMLPORT_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    let mut stdin = child.stdin.take().unwrap();
    if let Err(e) = stdin.write_all(input) {
        // the worker may already have exited on a fatal header
        assert_eq!(e.kind(), ErrorKind::BrokenPipe);
    }
    drop(stdin);

    child.wait_with_output().unwrap()
}

#[test]
fn test_immediate_eof_exits_cleanly() {
    let output = run_worker(b"");
    assert_eq!(output.status.code(), Some(0));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_bad_version_byte_exits_with_failure() {
    let input = build_message(&[130, 104, 0]).unwrap();
    let output = run_worker(&input);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_truncated_header_exits_with_failure() {
    let output = run_worker(&[0, 0]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_truncated_body_exits_with_failure() {
    let output = run_worker(&[0, 0, 0, 9, 131, 104]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_answers_then_exits_on_eof() {
    let mut encoder = TermEncoder::new();
    encoder.version();
    encoder
        .value(&WireValue::Tuple(vec![
            WireValue::atom("decode"),
            WireValue::binary("<p>hi</p>"),
            WireValue::empty_list(),
        ]))
        .unwrap();
    let input = build_message(encoder.as_bytes()).unwrap();

    let output = run_worker(&input);
    assert_eq!(output.status.code(), Some(0));

    let stdout = output.stdout;
    assert!(stdout.len() > HEADER_SIZE);
    let header: [u8; HEADER_SIZE] = stdout[..HEADER_SIZE].try_into().unwrap();
    let length = decode_header(header) as usize;
    assert_eq!(stdout.len(), HEADER_SIZE + length);

    let mut decoder = TermDecoder::new(&stdout[HEADER_SIZE..]);
    decoder.version().unwrap();
    let response = decoder.value().unwrap();
    assert_eq!(response.as_tuple().unwrap()[0].as_atom(), Some("ok"));
}
