use std::io::{BufRead, Read, Write};

use crate::protocol::request::{Method, Request};
use crate::protocol::{MAX_BODY_LEN, MAX_LINE_LEN, SUCCESS_STATUS};
use crate::utils::error::ProtocolError;

impl Request {
    /// Writes the request line, a `Content-Length` header when a body is
    /// present, the blank separator line and the body.
    pub fn write_to<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        write!(w, "{} {} HTTP/1.0\r\n", self.method(), self.uri())?;
        if let Some(body) = self.body() {
            write!(w, "Content-Length: {}\r\n", body.len())?;
        }
        w.write_all(b"\r\n")?;
        if let Some(body) = self.body() {
            w.write_all(body)?;
        }
        w.flush()
    }
}

/// Reads one response.
///
/// Returns `Ok(Some(body))` for a success status carrying a non-empty body.
/// A success without a body, or any other status, yields `Ok(None)`: the
/// caller treats both as "no message available".
pub fn read_response<R: BufRead>(r: &mut R) -> Result<Option<Vec<u8>>, ProtocolError> {
    let status = read_line(r)?;
    if !status.contains(SUCCESS_STATUS) {
        return Ok(None);
    }

    let mut length = 0;
    loop {
        let line = read_line(r)?;
        if line.trim().is_empty() {
            break;
        }
        if let Some(n) = parse_content_length(&line)? {
            length = check_body_len(n)?;
        }
    }

    if length == 0 {
        return Ok(None);
    }
    let mut body = Vec::with_capacity(length);
    (&mut *r).take(length as u64).read_to_end(&mut body)?;
    if body.len() < length {
        return Err(ProtocolError::Truncated {
            expected: length,
            got: body.len(),
        });
    }
    Ok(Some(body))
}

/// Reads a single line of at most `MAX_LINE_LEN` bytes, failing with
/// `Closed` on end of stream.
pub(crate) fn read_line<R: BufRead>(r: &mut R) -> Result<String, ProtocolError> {
    let mut line = String::new();
    if (&mut *r).take(MAX_LINE_LEN as u64).read_line(&mut line)? == 0 {
        return Err(ProtocolError::Closed);
    }
    check_line(&line)?;
    Ok(line)
}

/// Rejects a line that hit `MAX_LINE_LEN` without a terminating newline.
pub(crate) fn check_line(line: &str) -> Result<(), ProtocolError> {
    if line.len() >= MAX_LINE_LEN && !line.ends_with('\n') {
        return Err(ProtocolError::LineTooLong(MAX_LINE_LEN));
    }
    Ok(())
}

/// Accepts a declared body length up to `MAX_BODY_LEN`.
pub fn check_body_len(length: usize) -> Result<usize, ProtocolError> {
    if length > MAX_BODY_LEN {
        return Err(ProtocolError::BodyTooLarge {
            length,
            max: MAX_BODY_LEN,
        });
    }
    Ok(length)
}

/// Splits `METHOD URI [VERSION]` into its method and URI.
pub fn parse_request_line(line: &str) -> Result<(Method, String), ProtocolError> {
    let mut parts = line.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(method), Some(uri)) if uri.starts_with('/') => Ok((method.parse()?, uri.to_string())),
        _ => Err(ProtocolError::RequestLine(line.trim_end().to_string())),
    }
}

/// Returns the value of a `Content-Length` header line (name matched
/// case-insensitively), `None` for any other header.
pub fn parse_content_length(line: &str) -> Result<Option<usize>, ProtocolError> {
    let Some((name, value)) = line.split_once(':') else {
        return Ok(None);
    };
    if !name.trim().eq_ignore_ascii_case("content-length") {
        return Ok(None);
    }
    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|_| ProtocolError::ContentLength(value.trim().to_string()))
}
