use std::sync::LazyLock;

use regex::Regex;

use super::error::HeaderLineError;
use super::line::{CRLF, LineResult, find_crlf};
use crate::headers::Headers;

static FIELD_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9!#$%&'*+.^_`|~-]+$").expect("field-name pattern compiles")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderLine {
    Field { name: String, value: String },
    /// The empty line closing the header section.
    End,
}

/// Parses one header line at the start of `window`.
///
/// A CRLF at offset 0 yields [`HeaderLine::End`] with the two terminator bytes consumed.
/// The name is returned as written; [`Headers`] lower-cases it on insertion.
pub fn parse_header_line(window: &[u8]) -> Result<LineResult<HeaderLine>, HeaderLineError> {
    let Some(line_end) = find_crlf(window) else {
        return Ok(LineResult::NeedMore);
    };

    if line_end == 0 {
        return Ok(LineResult::Complete {
            value: HeaderLine::End,
            consumed: CRLF.len(),
        });
    }

    let text =
        std::str::from_utf8(&window[..line_end]).map_err(|_| HeaderLineError::InvalidEncoding)?;
    let (name, value) = split_field(text)?;

    Ok(LineResult::Complete {
        value: HeaderLine::Field {
            name: name.to_string(),
            value: value.to_string(),
        },
        consumed: line_end + CRLF.len(),
    })
}

fn split_field(line: &str) -> Result<(&str, &str), HeaderLineError> {
    let (name, value) = line
        .split_once(':')
        .ok_or(HeaderLineError::MissingSeparator)?;

    if name.is_empty() {
        return Err(HeaderLineError::EmptyName);
    }
    if name != name.trim() {
        return Err(HeaderLineError::InvalidSpacing);
    }
    if !FIELD_NAME.is_match(name) {
        return Err(HeaderLineError::InvalidName(name.to_string()));
    }

    Ok((name, value.trim()))
}

impl Headers {
    /// Stores a parsed field, joining it onto an earlier value of the same name.
    pub(crate) fn insert_field(&mut self, name: &str, value: &str) {
        if self.has(name) {
            self.add(name, value);
        } else {
            self.set(name, value);
        }
    }
}
