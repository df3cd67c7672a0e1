use std::io::Read;

use super::error::ParseError;
use super::header_line::{HeaderLine, parse_header_line};
use super::line::LineResult;
use super::reader::{BufferedReader, Fill};
use super::request_line::parse_request_line;
use super::types::{Limits, ParseState, Request, RequestLine};
use crate::headers::Headers;

/// A complete syntactic unit recognised at the front of the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unit {
    RequestLine(RequestLine),
    Header { name: String, value: String },
    EndOfHeaders,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: ParseState,
    pub consumed: usize,
    /// `None` when the window does not yet hold a complete line.
    pub unit: Option<Unit>,
}

/// Pure transition function of the request state machine.
///
/// Looks at most one line into `window` and never mutates anything; the caller applies the
/// returned unit and consumes `consumed` bytes.
pub fn advance(state: ParseState, window: &[u8]) -> Result<Transition, ParseError> {
    match state {
        ParseState::Initialized => match parse_request_line(window)? {
            LineResult::NeedMore => Ok(Transition::stay(state)),
            LineResult::Complete { value, consumed } => Ok(Transition {
                next: ParseState::ParsingHeaders,
                consumed,
                unit: Some(Unit::RequestLine(value)),
            }),
        },
        ParseState::ParsingHeaders => match parse_header_line(window)? {
            LineResult::NeedMore => Ok(Transition::stay(state)),
            LineResult::Complete {
                value: HeaderLine::End,
                consumed,
            } => Ok(Transition {
                next: ParseState::Done,
                consumed,
                unit: Some(Unit::EndOfHeaders),
            }),
            LineResult::Complete {
                value: HeaderLine::Field { name, value },
                consumed,
            } => Ok(Transition {
                next: ParseState::ParsingHeaders,
                consumed,
                unit: Some(Unit::Header { name, value }),
            }),
        },
        ParseState::Done => Err(ParseError::InvalidState),
    }
}

impl Transition {
    fn stay(state: ParseState) -> Self {
        Self {
            next: state,
            consumed: 0,
            unit: None,
        }
    }
}

/// Accumulates the units of one request as the state machine moves forward.
#[derive(Debug)]
pub struct RequestAssembler {
    state: ParseState,
    line: Option<RequestLine>,
    headers: Headers,
    limits: Limits,
    header_bytes: usize,
}

impl RequestAssembler {
    pub fn new(limits: Limits) -> Self {
        Self {
            state: ParseState::Initialized,
            line: None,
            headers: Headers::new(),
            limits,
            header_bytes: 0,
        }
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == ParseState::Done
    }

    /// Consumes every complete unit already in the reader's window.
    ///
    /// Stops at the first incomplete line or at the end of the header section, whichever
    /// comes first. Bytes after the header terminator are left in the window.
    pub fn drain<R>(&mut self, reader: &mut BufferedReader<R>) -> Result<(), ParseError> {
        loop {
            let transition = advance(self.state, reader.window())?;
            let Some(unit) = transition.unit else {
                return Ok(());
            };
            reader.consume(transition.consumed);
            self.header_bytes += transition.consumed;
            self.check_pending(0)?;
            self.apply(unit);
            self.state = transition.next;
            if self.is_done() {
                return Ok(());
            }
        }
    }

    /// Checks that the consumed lines plus `pending` partial bytes stay within
    /// `max_header_bytes`.
    pub fn check_pending(&self, pending: usize) -> Result<(), ParseError> {
        let limit = self.limits.max_header_bytes;
        if self.header_bytes + pending > limit {
            return Err(ParseError::HeaderTooLarge { limit });
        }
        Ok(())
    }

    /// Hands out the finished request. `body` is whatever followed the header terminator.
    pub fn finish(self, body: Vec<u8>) -> Result<Request, ParseError> {
        match (self.state, self.line) {
            (ParseState::Done, Some(line)) => Ok(Request {
                line,
                headers: self.headers,
                body,
            }),
            (state, _) => Err(ParseError::IncompleteRequest { state }),
        }
    }

    fn apply(&mut self, unit: Unit) {
        match unit {
            Unit::RequestLine(line) => self.line = Some(line),
            Unit::Header { name, value } => self.headers.insert_field(&name, &value),
            Unit::EndOfHeaders => {}
        }
    }
}

/// Parses one request from a blocking byte source with default [`Limits`].
pub fn parse_request<R: Read>(source: R) -> Result<Request, ParseError> {
    parse_request_with_limits(source, Limits::default())
}

pub fn parse_request_with_limits<R: Read>(
    source: R,
    limits: Limits,
) -> Result<Request, ParseError> {
    let mut reader = BufferedReader::with_capacity(source, limits.initial_buffer_bytes);
    let mut assembler = RequestAssembler::new(limits);

    loop {
        assembler.drain(&mut reader)?;
        if assembler.is_done() {
            return assembler.finish(reader.into_window());
        }
        assembler.check_pending(reader.window().len())?;

        match reader.fill()? {
            Fill::Read(_) => continue,
            Fill::Exhausted => {
                return Err(ParseError::IncompleteRequest {
                    state: assembler.state(),
                });
            }
        }
    }
}

/// Async counterpart of [`parse_request_with_limits`]. Cancelling `cancel` aborts the pending
/// read with [`ParseError::Cancelled`].
#[cfg(feature = "tokio")]
pub async fn parse_request_async<R>(
    source: R,
    limits: Limits,
    cancel: &tokio_util::sync::CancellationToken,
) -> Result<Request, ParseError>
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut reader = BufferedReader::with_capacity(source, limits.initial_buffer_bytes);
    let mut assembler = RequestAssembler::new(limits);

    loop {
        assembler.drain(&mut reader)?;
        if assembler.is_done() {
            return assembler.finish(reader.into_window());
        }
        assembler.check_pending(reader.window().len())?;

        match reader.fill_async(cancel).await? {
            Fill::Read(_) => continue,
            Fill::Exhausted => {
                return Err(ParseError::IncompleteRequest {
                    state: assembler.state(),
                });
            }
        }
    }
}
