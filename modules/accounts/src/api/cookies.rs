//! Remember-token cookie plumbing: one HttpOnly cookie, set on sign-in,
//! cleared on sign-out.

use axum::http::{header, HeaderMap};

pub const REMEMBER_COOKIE: &str = "remember_token";

/// Extract a cookie value from the request headers.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    for header_value in headers.get_all(header::COOKIE) {
        let raw = header_value.to_str().ok()?;
        for pair in raw.split(';') {
            let mut parts = pair.trim().splitn(2, '=');
            if parts.next() == Some(name) {
                return parts.next().map(|v| v.to_string());
            }
        }
    }
    None
}

/// Build the Set-Cookie value that stores the remember token.
pub fn remember_cookie(token: &str, max_age_secs: i64) -> String {
    format!("{REMEMBER_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}")
}

/// Build the Set-Cookie value that deletes the remember token.
pub fn clear_remember_cookie() -> String {
    format!("{REMEMBER_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}
