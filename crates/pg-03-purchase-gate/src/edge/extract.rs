//! Request extraction.
//!
//! Signature headers take precedence over a session token. If any of the
//! four signature headers is present, all four are required.

use super::headers;
use bytes::Bytes;
use http::header::AUTHORIZATION;
use http::HeaderMap;
use pg_01_wallet_auth::{AuthError, AuthRequest};
use pg_02_purchase_validation::{PurchaseError, PurchaseRequest};

const SIGNATURE_HEADERS: [&str; 4] = [
    headers::WALLET_ADDRESS,
    headers::SIGNATURE,
    headers::MESSAGE,
    headers::TIMESTAMP,
];

/// How the caller authenticates this request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    Signature(AuthRequest),
    Session(String),
}

pub fn credentials(map: &HeaderMap) -> Result<Credentials, AuthError> {
    if SIGNATURE_HEADERS.iter().any(|name| map.contains_key(*name)) {
        return signature_request(map).map(Credentials::Signature);
    }

    if let Some(token) = bearer_token(map)? {
        return Ok(Credentials::Session(token));
    }

    if map.contains_key(headers::SESSION_TOKEN) {
        let token = required(map, headers::SESSION_TOKEN)?.trim();
        if token.is_empty() {
            return Err(AuthError::MissingHeaders(headers::SESSION_TOKEN));
        }
        return Ok(Credentials::Session(token.to_string()));
    }

    Err(AuthError::MissingHeaders(headers::WALLET_ADDRESS))
}

fn signature_request(map: &HeaderMap) -> Result<AuthRequest, AuthError> {
    let wallet_address = required(map, headers::WALLET_ADDRESS)?.trim().to_string();
    let signature = required(map, headers::SIGNATURE)?.trim().to_string();
    // The message is signed byte for byte; no trimming.
    let message = required(map, headers::MESSAGE)?.to_string();
    let timestamp = required(map, headers::TIMESTAMP)?
        .trim()
        .parse::<u64>()
        .map_err(|_| AuthError::MissingHeaders(headers::TIMESTAMP))?;

    Ok(AuthRequest {
        wallet_address,
        signature,
        message,
        timestamp,
    })
}

fn bearer_token(map: &HeaderMap) -> Result<Option<String>, AuthError> {
    if !map.contains_key(AUTHORIZATION) {
        return Ok(None);
    }
    let value = required(map, "authorization")?;
    let Some((scheme, token)) = value.split_once(' ') else {
        return Err(AuthError::MissingHeaders("authorization"));
    };
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(AuthError::MissingHeaders("authorization"));
    }
    Ok(Some(token.to_string()))
}

fn required<'a>(map: &'a HeaderMap, name: &'static str) -> Result<&'a str, AuthError> {
    map
        .get(name)
        .and_then(|v| std::str::from_utf8(v.as_bytes()).ok())
        .ok_or(AuthError::MissingHeaders(name))
}

/// Purchase fields from the body. `None` for an empty body (login only).
pub fn purchase_request(body: &Bytes) -> Result<Option<PurchaseRequest>, PurchaseError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(|e| PurchaseError::MalformedBody(e.to_string()))
}
