mod headers;
mod http1;

pub use headers::{HeaderIter, Headers};

#[cfg(feature = "tokio")]
pub use http1::parse_request_async;
pub use http1::{
    BufferedReader, Fill, HeaderLine, HeaderLineError, LineResult, Limits, ParseError,
    ParseState, Request, RequestAssembler, RequestLine, RequestLineError, Transition, Unit,
    advance, parse_header_line, parse_request, parse_request_line, parse_request_with_limits,
};
