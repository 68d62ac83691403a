//! HTTP response building and form parsing.
//!
//! Responses are assembled as raw HTTP/1.1 bytes and written straight
//! to the connection; every response closes its connection.

use crate::config::{GameError, Result};
use percent_encoding::percent_decode_str;
use std::collections::HashMap;
use std::fmt::Write;

const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// A fully materialized response, ready to serialize.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<&'static str>,
    pub set_cookie: Option<String>,
    pub location: Option<String>,
    pub body: String,
}

impl HttpResponse {
    /// An HTML page response.
    #[must_use]
    pub const fn html(status: u16, body: String) -> Self {
        Self {
            status,
            content_type: Some(HTML_CONTENT_TYPE),
            set_cookie: None,
            location: None,
            body,
        }
    }

    /// A bodyless redirect to `location`.
    #[must_use]
    pub fn redirect(location: &str) -> Self {
        Self {
            status: 302,
            content_type: None,
            set_cookie: None,
            location: Some(location.to_string()),
            body: String::new(),
        }
    }

    /// Attaches a `Set-Cookie` header.
    #[must_use]
    pub fn with_cookie(mut self, cookie: String) -> Self {
        self.set_cookie = Some(cookie);
        self
    }

    /// Serializes the response into wire bytes, `Connection: close`
    /// included.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut head = String::new();
        let _ = write!(
            head,
            "HTTP/1.1 {} {}\r\n",
            self.status,
            reason_phrase(self.status)
        );
        if let Some(ct) = self.content_type {
            let _ = write!(head, "Content-Type: {ct}\r\n");
        }
        let _ = write!(head, "Content-Length: {}\r\n", self.body.len());
        head.push_str("Cache-Control: no-store, no-cache, must-revalidate, max-age=0\r\n");
        head.push_str("Pragma: no-cache\r\n");
        head.push_str("Expires: 0\r\n");
        head.push_str("X-Content-Type-Options: nosniff\r\n");
        head.push_str("Referrer-Policy: no-referrer\r\n");
        if let Some(cookie) = &self.set_cookie {
            let _ = write!(head, "Set-Cookie: {cookie}\r\n");
        }
        if let Some(location) = &self.location {
            let _ = write!(head, "Location: {location}\r\n");
        }
        head.push_str("Connection: close\r\n\r\n");

        let mut bytes = head.into_bytes();
        bytes.extend_from_slice(self.body.as_bytes());
        bytes
    }
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        302 => "Found",
        400 => "Bad Request",
        405 => "Method Not Allowed",
        413 => "Payload Too Large",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// Parses a URL-encoded form body into a field map.
///
/// `+` decodes as space, percent escapes decode per RFC 3986. Pairs
/// without `=` are skipped.
///
/// # Errors
///
/// Returns `BadRequest` when the decoded body is not valid UTF-8.
pub fn parse_form(body: &[u8]) -> Result<HashMap<String, String>> {
    let body_str = std::str::from_utf8(body)
        .map_err(|_| GameError::BadRequest("无法解析表单数据".to_string()))?;

    let mut fields = HashMap::new();
    for pair in body_str.split('&') {
        let Some((k, v)) = pair.split_once('=') else {
            continue;
        };
        let dk = percent_decode_str(&k.replace('+', " "))
            .decode_utf8()
            .map_err(|_| GameError::BadRequest("无法解析表单数据".to_string()))?
            .into_owned();
        let dv = percent_decode_str(&v.replace('+', " "))
            .decode_utf8()
            .map_err(|_| GameError::BadRequest("无法解析表单数据".to_string()))?
            .into_owned();
        fields.insert(dk, dv);
    }

    Ok(fields)
}
