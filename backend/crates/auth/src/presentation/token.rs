//! Session Token Extraction
//!
//! Two sources, in order:
//! 1. the dedicated session header (`x-session-id: <token>`)
//! 2. `Authorization: <scheme> <token>` with the configured scheme word
//!
//! A blank or non-ASCII header counts as absent and falls through.

use axum::http::{HeaderMap, HeaderName, header::AUTHORIZATION};

pub fn extract_session_token(
    headers: &HeaderMap,
    session_header: &HeaderName,
    scheme: &str,
) -> Option<String> {
    from_session_header(headers, session_header).or_else(|| from_authorization(headers, scheme))
}

fn from_session_header(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    let value = headers.get(name)?.to_str().ok()?.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Scheme word compared ignoring ASCII case.
fn from_authorization(headers: &HeaderMap, scheme: &str) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let (word, token) = value.split_once(' ')?;
    if !word.eq_ignore_ascii_case(scheme) {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}
