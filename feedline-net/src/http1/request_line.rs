use super::error::RequestLineError;
use super::line::{CRLF, LineResult, find_crlf};
use super::types::RequestLine;

const PROTOCOL_NAME: &str = "HTTP";
const PROTOCOL_VERSION: &str = "1.1";

/// Parses the request line at the start of `window`.
///
/// Returns [`LineResult::NeedMore`] while no CRLF is present; a partial line is never consumed.
pub fn parse_request_line(window: &[u8]) -> Result<LineResult<RequestLine>, RequestLineError> {
    let Some(line_end) = find_crlf(window) else {
        return Ok(LineResult::NeedMore);
    };

    let text =
        std::str::from_utf8(&window[..line_end]).map_err(|_| RequestLineError::InvalidEncoding)?;
    let value = split_request_line(text)?;

    Ok(LineResult::Complete {
        value,
        consumed: line_end + CRLF.len(),
    })
}

fn split_request_line(line: &str) -> Result<RequestLine, RequestLineError> {
    let parts: Vec<&str> = line.split(' ').collect();
    let &[method, target, version_raw] = &parts[..] else {
        return Err(RequestLineError::PartCount(parts.len()));
    };

    if method != method.to_uppercase() {
        return Err(RequestLineError::LowercaseMethod(method.to_string()));
    }

    let version = parse_version(version_raw)?;

    Ok(RequestLine {
        method: method.to_string(),
        target: target.to_string(),
        version: version.to_string(),
    })
}

fn parse_version(version_raw: &str) -> Result<&str, RequestLineError> {
    let parts: Vec<&str> = version_raw.split('/').collect();
    let &[name, version] = &parts[..] else {
        return Err(RequestLineError::VersionFormat(version_raw.to_string()));
    };

    if name != PROTOCOL_NAME {
        return Err(RequestLineError::UnsupportedProtocol(name.to_string()));
    }
    if version != PROTOCOL_VERSION {
        return Err(RequestLineError::UnsupportedVersion(version.to_string()));
    }

    Ok(version)
}
