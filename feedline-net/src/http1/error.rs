use thiserror::Error;

use super::types::ParseState;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("connection closed while reading {state}")]
    IncompleteRequest { state: ParseState },
    #[error("malformed request line: {0}")]
    MalformedRequestLine(#[from] RequestLineError),
    #[error("malformed header line: {0}")]
    MalformedHeaderLine(#[from] HeaderLineError),
    #[error("header section exceeds {limit} bytes")]
    HeaderTooLarge { limit: usize },
    #[error("read cancelled")]
    Cancelled,
    #[error("request already parsed")]
    InvalidState,
}

impl ParseError {
    /// True for grammar violations, as opposed to transport or lifecycle failures.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            ParseError::MalformedRequestLine(_)
                | ParseError::MalformedHeaderLine(_)
                | ParseError::HeaderTooLarge { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestLineError {
    #[error("expected 3 parts, got {0}")]
    PartCount(usize),
    #[error("method {0:?} is not upper-case")]
    LowercaseMethod(String),
    #[error("version {0:?} is not of the form NAME/VERSION")]
    VersionFormat(String),
    #[error("unsupported protocol {0:?}")]
    UnsupportedProtocol(String),
    #[error("unsupported protocol version {0:?}")]
    UnsupportedVersion(String),
    #[error("request line is not valid utf-8")]
    InvalidEncoding,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderLineError {
    #[error("missing ':' separator")]
    MissingSeparator,
    #[error("empty header name")]
    EmptyName,
    #[error("whitespace between header name and ':'")]
    InvalidSpacing,
    #[error("invalid header name {0:?}")]
    InvalidName(String),
    #[error("header line is not valid utf-8")]
    InvalidEncoding,
}
