//! # Response Composer
//!
//! Maps a request outcome to status, headers and JSON body. Deterministic:
//! the same outcome always renders the same response.

use super::{headers, JSON_CONTENT_TYPE};
use crate::domain::error::{ErrorBody, GateError};
use crate::domain::request_id::{RequestId, REQUEST_ID_HEADER};
use bytes::Bytes;
use http::header::{HeaderName, HeaderValue, CONTENT_TYPE, WWW_AUTHENTICATE};
use http::{Response, StatusCode};
use pg_01_wallet_auth::SessionGrant;
use pg_02_purchase_validation::PurchaseResult;
use rust_decimal::Decimal;
use serde::Serialize;
use shared_types::{UnixMillis, WalletAddress};
use tracing::error;

/// Challenge scheme advertised on 401 responses.
pub const AUTH_SCHEME: &str = "Signature";

const FALLBACK_BODY: &[u8] =
    br#"{"error":"internal_error","message":"Internal error"}"#;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginBody<'a> {
    authenticated: bool,
    wallet: WalletAddress,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_token: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expires_at: Option<UnixMillis>,
}

#[derive(Serialize)]
struct TokenSummary<'a> {
    symbol: &'a str,
    name: &'a str,
    decimals: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PurchaseBody<'a> {
    validated: bool,
    wallet: WalletAddress,
    transaction_id: String,
    token: TokenSummary<'a>,
    token_amount: Decimal,
    base_units: String,
    #[serde(rename = "priceUSD")]
    price_usd: Decimal,
    #[serde(rename = "amountUSD")]
    amount_usd: Decimal,
    payment_method: &'a str,
    #[serde(rename = "dailySpendUSD")]
    daily_spend_usd: Decimal,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseComposer;

impl ResponseComposer {
    pub fn new() -> Self {
        Self
    }

    /// Authentication only, no purchase body. `grant` is present when a new
    /// session was issued (signature path).
    pub fn login(
        &self,
        wallet: WalletAddress,
        grant: Option<&SessionGrant>,
        request_id: RequestId,
    ) -> Response<Bytes> {
        let body = LoginBody {
            authenticated: true,
            wallet,
            session_token: grant.map(|g| g.token.as_str()),
            expires_at: grant.map(|g| g.expires_at),
        };
        let mut response = json_response(StatusCode::OK, &body, request_id);
        set_header(&mut response, headers::VERIFIED_WALLET, &wallet.to_hex());
        if let Some(grant) = grant {
            set_header(&mut response, headers::SESSION_TOKEN, grant.token.as_str());
        }
        response
    }

    /// Accepted purchase: augmented pass-through metadata.
    pub fn purchase(
        &self,
        result: &PurchaseResult,
        grant: Option<&SessionGrant>,
        request_id: RequestId,
    ) -> Response<Bytes> {
        let transaction_id = result.transaction_id.to_string();
        let body = PurchaseBody {
            validated: true,
            wallet: result.wallet,
            transaction_id: transaction_id.clone(),
            token: TokenSummary {
                symbol: result.token.symbol,
                name: result.token.name,
                decimals: result.token.decimals,
            },
            token_amount: result.quantity.token_amount,
            base_units: result.quantity.base_units.to_string(),
            price_usd: result.price_usd,
            amount_usd: result.amount_usd,
            payment_method: result.payment_method.as_str(),
            daily_spend_usd: result.daily_spend_usd,
        };

        let mut response = json_response(StatusCode::OK, &body, request_id);
        set_header(&mut response, headers::VERIFIED_WALLET, &result.wallet.to_hex());
        if let Some(grant) = grant {
            set_header(&mut response, headers::SESSION_TOKEN, grant.token.as_str());
        }
        set_header(&mut response, headers::TRANSACTION_ID, &transaction_id);
        set_header(
            &mut response,
            headers::TOKEN_AMOUNT,
            &result.quantity.token_amount.to_string(),
        );
        set_header(&mut response, headers::TOKEN_PRICE, &result.price_usd.to_string());
        set_header(&mut response, headers::VALIDATION_PASSED, "true");
        response
    }

    /// Structured error: `{error, message, details?}`.
    pub fn error(&self, err: &GateError, request_id: RequestId) -> Response<Bytes> {
        let status = err.status();
        let mut response = json_response(status, &ErrorBody::from(err), request_id);
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static(AUTH_SCHEME));
        }
        response
    }
}

fn json_response<T: Serialize>(
    status: StatusCode,
    body: &T,
    request_id: RequestId,
) -> Response<Bytes> {
    let (status, bytes) = match serde_json::to_vec(body) {
        Ok(bytes) => (status, Bytes::from(bytes)),
        Err(e) => {
            error!(error = %e, "Response serialization failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Bytes::from_static(FALLBACK_BODY),
            )
        }
    };

    let mut response = Response::new(bytes);
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
    set_header(&mut response, REQUEST_ID_HEADER, &request_id.to_string());
    response
}

fn set_header(response: &mut Response<Bytes>, name: &'static str, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(value) => {
            response
                .headers_mut()
                .insert(HeaderName::from_static(name), value);
        }
        Err(_) => error!(header = name, "Dropping unencodable response header"),
    }
}
