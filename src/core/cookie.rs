//! Cookie transport.
//!
//! The whole game state is a single plain-value cookie held by the
//! client; the server keeps nothing. The value is deliberately unsigned
//! and attacker-modifiable.

/// Name of the cookie carrying the secret number.
pub const TARGET_COOKIE_NAME: &str = "target";

/// Formats a `Set-Cookie` header value.
///
/// The cookie is scoped to the whole site and flagged `HttpOnly` so
/// page scripts cannot read it.
#[must_use]
pub fn format_set_cookie(name: &str, value: &str, max_age: u64) -> String {
    format!("{name}={value}; HttpOnly; Path=/; Max-Age={max_age}")
}

/// Extracts a cookie value from a request `Cookie` header.
///
/// Returns the first pair whose name matches, `None` when the header
/// does not carry the cookie.
#[must_use]
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        if k.trim() == name { Some(v.trim()) } else { None }
    })
}
