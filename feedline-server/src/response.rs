use std::io::{self, Write};

use feedline_net::Headers;

const CRLF: &[u8] = b"\r\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok,
    BadRequest,
    NotFound,
    InternalServerError,
}

impl StatusCode {
    pub fn code(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::InternalServerError => 500,
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }

    pub fn status_line(&self) -> String {
        format!("HTTP/1.1 {} {}", self.code(), self.reason())
    }
}

pub fn write_status_line(writer: &mut impl Write, status: StatusCode) -> io::Result<()> {
    writer.write_all(status.status_line().as_bytes())?;
    writer.write_all(CRLF)
}

/// Headers every response starts from: a fixed length, no keep-alive, plain text.
pub fn default_headers(content_len: usize) -> Headers {
    let mut headers = Headers::new();
    headers.set("Content-Length", &content_len.to_string());
    headers.set("Connection", "close");
    headers.set("Content-Type", "text/plain");
    headers
}

/// Writes `name: value` lines sorted by name, then the blank line closing the section.
pub fn write_headers(writer: &mut impl Write, headers: &Headers) -> io::Result<()> {
    let mut block = Vec::new();
    extend_headers(&mut block, headers);
    writer.write_all(&block)
}

fn extend_headers(out: &mut Vec<u8>, headers: &Headers) {
    let mut fields: Vec<(&str, &str)> = headers.iter().collect();
    fields.sort_unstable_by_key(|(name, _)| *name);
    for (name, value) in fields {
        out.extend_from_slice(name.as_bytes());
        out.extend_from_slice(b": ");
        out.extend_from_slice(value.as_bytes());
        out.extend_from_slice(CRLF);
    }
    out.extend_from_slice(CRLF);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: StatusCode,
    pub headers: Headers,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        let body = body.into();
        Self {
            status,
            headers: default_headers(body.len()),
            body,
        }
    }

    pub fn text(status: StatusCode, body: &str) -> Self {
        Self::new(status, body.as_bytes())
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.set(name, value);
        self
    }

    pub fn write_to(&self, writer: &mut impl Write) -> io::Result<()> {
        writer.write_all(&self.to_bytes())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(128 + self.body.len());
        bytes.extend_from_slice(self.status.status_line().as_bytes());
        bytes.extend_from_slice(CRLF);
        extend_headers(&mut bytes, &self.headers);
        bytes.extend_from_slice(&self.body);
        bytes
    }
}
