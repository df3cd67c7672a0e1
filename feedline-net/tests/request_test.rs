use std::io::{self, Read};

use assert_matches::assert_matches;
use feedline_net::*;

/// Hands out at most `chunk` bytes per read, optionally interrupting every other call.
struct ChunkedSource {
    data: Vec<u8>,
    position: usize,
    chunk: usize,
    interrupt: bool,
    calls: usize,
}

impl ChunkedSource {
    fn new(data: &[u8], chunk: usize) -> Self {
        Self {
            data: data.to_vec(),
            position: 0,
            chunk,
            interrupt: false,
            calls: 0,
        }
    }

    fn interrupting(mut self) -> Self {
        self.interrupt = true;
        self
    }
}

impl Read for ChunkedSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.calls += 1;
        if self.interrupt && self.calls % 2 == 1 {
            return Err(io::Error::from(io::ErrorKind::Interrupted));
        }
        let remaining = self.data.len() - self.position;
        let n = remaining.min(self.chunk).min(buf.len());
        buf[..n].copy_from_slice(&self.data[self.position..self.position + n]);
        self.position += n;
        Ok(n)
    }
}

struct FailingSource;

impl Read for FailingSource {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::ConnectionReset, "peer reset"))
    }
}

const FULL_REQUEST: &[u8] = b"POST /submit?x=1 HTTP/1.1\r\n\
Host: localhost:42069\r\n\
User-Agent: curl/8.5.0\r\n\
Accept: text/html\r\n\
ACCEPT: application/json\r\n\
Content-Type: text/plain\r\n\
\r\n\
hello body";

#[test]
fn chunk_size_does_not_change_result() {
    let expected = parse_request(ChunkedSource::new(FULL_REQUEST, FULL_REQUEST.len())).unwrap();

    for chunk in [1, 2, 3, 5, 8, 13, 64] {
        let request = parse_request(ChunkedSource::new(FULL_REQUEST, chunk)).unwrap();
        assert_eq!(request.line, expected.line, "chunk size {chunk}");
        assert_eq!(request.headers, expected.headers, "chunk size {chunk}");
    }

    assert_eq!(expected.line.method, "POST");
    assert_eq!(expected.line.target, "/submit?x=1");
    assert_eq!(expected.headers.get("host"), Some("localhost:42069"));
    assert_eq!(
        expected.headers.get("accept"),
        Some("text/html, application/json")
    );
    assert_eq!(expected.body, b"hello body".to_vec());
}

#[test]
fn one_byte_reads_leave_no_body() {
    // With one byte per read the parser stops right after the terminator.
    let request = parse_request(ChunkedSource::new(FULL_REQUEST, 1)).unwrap();
    assert!(request.body.is_empty());
}

#[test]
fn interrupted_reads_are_retried() {
    let source = ChunkedSource::new(b"GET / HTTP/1.1\r\nHost: a\r\n\r\n", 4).interrupting();
    let request = parse_request(source).unwrap();

    assert_eq!(request.line.target, "/");
    assert_eq!(request.headers.get("host"), Some("a"));
}

#[test]
fn header_variants_share_one_entry() {
    let input = b"GET / HTTP/1.1\r\nHost: a\r\nHOST: b\r\nhost: c\r\n\r\n";
    let request = parse_request(&input[..]).unwrap();

    assert_eq!(request.headers.len(), 1);
    assert_eq!(request.headers.get("Host"), Some("a, b, c"));
}

#[test]
fn truncated_request_is_incomplete() {
    let err = parse_request(ChunkedSource::new(b"GET /path HTTP/1.1\r\nHost: exam", 7)).unwrap_err();
    assert_matches!(err, ParseError::IncompleteRequest { .. });
    assert!(!err.is_malformed());
}

#[test]
fn truncated_request_line_is_incomplete() {
    let err = parse_request(&b"GET /path HTTP/1."[..]).unwrap_err();
    assert_matches!(
        err,
        ParseError::IncompleteRequest {
            state: ParseState::Initialized
        }
    );
}

#[test]
fn io_failure_propagates() {
    let err = parse_request(FailingSource).unwrap_err();
    assert_matches!(err, ParseError::Io(inner) if inner.kind() == io::ErrorKind::ConnectionReset);
}

#[test]
fn rejects_http10() {
    let err = parse_request(&b"GET / HTTP/1.0\r\n\r\n"[..]).unwrap_err();
    assert_matches!(
        err,
        ParseError::MalformedRequestLine(RequestLineError::UnsupportedVersion(_))
    );
    assert!(err.is_malformed());
}

#[test]
fn rejects_non_token_header_name() {
    let input = "GET / HTTP/1.1\r\nH©st: x\r\n\r\n";
    let err = parse_request(ChunkedSource::new(input.as_bytes(), 3)).unwrap_err();
    assert_matches!(
        err,
        ParseError::MalformedHeaderLine(HeaderLineError::InvalidName(_))
    );
}

#[test]
fn grammar_error_wins_over_later_bytes() {
    let input = b"GET / HTTP/1.1\r\nNoColon\r\nHost: a\r\n\r\n";
    let err = parse_request(&input[..]).unwrap_err();
    assert_matches!(
        err,
        ParseError::MalformedHeaderLine(HeaderLineError::MissingSeparator)
    );
}

#[test]
fn header_limit_applies_across_lines() {
    let limits = Limits {
        max_header_bytes: 40,
        initial_buffer_bytes: 4,
    };
    let input = b"GET / HTTP/1.1\r\nA: 1\r\nB: 2\r\nC: 3\r\nD: 4\r\nE: 5\r\n\r\n";
    let err = parse_request_with_limits(ChunkedSource::new(input, 4), limits).unwrap_err();
    assert_matches!(err, ParseError::HeaderTooLarge { limit: 40 });
}

#[test]
fn header_limit_ignores_chunking() {
    let limits = Limits {
        max_header_bytes: 32,
        initial_buffer_bytes: 1024,
    };
    let input = b"GET / HTTP/1.1\r\nA: 1\r\nB: 2\r\nC: 3\r\nD: 4\r\nE: 5\r\n\r\n";

    for chunk in [input.len(), 13, 1] {
        let err = parse_request_with_limits(ChunkedSource::new(input, chunk), limits).unwrap_err();
        assert_matches!(err, ParseError::HeaderTooLarge { limit: 32 }, "chunk size {chunk}");
    }
}
