//! Request edge - reading credentials and purchase fields from the inbound
//! request, and rendering outcomes.

pub mod composer;
pub mod extract;

/// Fixed content type of every response.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Inbound and outbound header names.
pub mod headers {
    pub const WALLET_ADDRESS: &str = "x-wallet-address";
    pub const SIGNATURE: &str = "x-signature";
    pub const MESSAGE: &str = "x-message";
    pub const TIMESTAMP: &str = "x-timestamp";
    pub const SESSION_TOKEN: &str = "x-session-token";

    pub const VERIFIED_WALLET: &str = "x-verified-wallet";
    pub const TRANSACTION_ID: &str = "x-transaction-id";
    pub const TOKEN_AMOUNT: &str = "x-token-amount";
    pub const TOKEN_PRICE: &str = "x-token-price";
    pub const VALIDATION_PASSED: &str = "x-validation-passed";
}
