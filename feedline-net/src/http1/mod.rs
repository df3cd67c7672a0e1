mod error;
mod header_line;
mod line;
mod reader;
mod request;
mod request_line;
mod types;

pub use error::{HeaderLineError, ParseError, RequestLineError};
pub use header_line::{HeaderLine, parse_header_line};
pub use line::LineResult;
pub use reader::{BufferedReader, Fill};
#[cfg(feature = "tokio")]
pub use request::parse_request_async;
pub use request::{
    RequestAssembler, Transition, Unit, advance, parse_request, parse_request_with_limits,
};
pub use request_line::parse_request_line;
pub use types::{Limits, ParseState, Request, RequestLine};
