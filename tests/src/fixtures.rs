//! Shared fixtures: wallets that sign like a browser extension, and gates
//! wired over in-memory stores with a controllable clock.

use bytes::Bytes;
use http::Request;
use k256::ecdsa::SigningKey;
use pg_01_wallet_auth::{address_from_pubkey, sign_personal_message, EthSignature};
use pg_03_purchase_gate::{headers, in_memory_gate, GateConfig, InMemoryGate, MemoryAuditSink};
use shared_types::{MockTimeSource, UnixMillis, WalletAddress};
use std::sync::Arc;

/// 2023-11-14T22:13:20Z
pub const NOW: UnixMillis = 1_700_000_000_000;

/// A test wallet.
pub struct Wallet {
    key: SigningKey,
}

impl Wallet {
    pub fn random() -> Self {
        Self {
            key: SigningKey::random(&mut rand::thread_rng()),
        }
    }

    pub fn address(&self) -> WalletAddress {
        address_from_pubkey(self.key.verifying_key())
    }

    pub fn key(&self) -> &SigningKey {
        &self.key
    }

    pub fn sign(&self, message: &str) -> EthSignature {
        sign_personal_message(message, &self.key).expect("signing with a valid key")
    }

    /// Login challenge the way a dApp front end builds it.
    pub fn challenge(&self, timestamp: UnixMillis) -> String {
        // Single line: header values cannot carry newlines
        format!(
            "Purchase-Gate login | wallet {} | issued at {timestamp}",
            self.address()
        )
    }

    /// Fully signed request with `body`.
    pub fn request(&self, timestamp: UnixMillis, body: &str) -> Request<Bytes> {
        let message = self.challenge(timestamp);
        let signature = self.sign(&message);
        signed_request(&self.address().to_hex(), &signature.to_hex(), &message, timestamp, body)
    }
}

pub fn signed_request(
    wallet: &str,
    signature: &str,
    message: &str,
    timestamp: UnixMillis,
    body: &str,
) -> Request<Bytes> {
    Request::builder()
        .method("POST")
        .uri("/purchase")
        .header(headers::WALLET_ADDRESS, wallet)
        .header(headers::SIGNATURE, signature)
        .header(headers::MESSAGE, message)
        .header(headers::TIMESTAMP, timestamp.to_string())
        .body(Bytes::from(body.to_string()))
        .expect("valid request")
}

pub fn session_request(token: &str, body: &str) -> Request<Bytes> {
    Request::builder()
        .method("POST")
        .uri("/purchase")
        .header(http::header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Bytes::from(body.to_string()))
        .expect("valid request")
}

pub fn purchase_body(token: &str, amount_usd: &str, payment_method: &str) -> String {
    serde_json::json!({
        "tokenType": token,
        "amountUSD": amount_usd,
        "paymentMethod": payment_method,
    })
    .to_string()
}

/// A gate with its clock and audit trail exposed.
pub struct TestGate {
    pub gate: Arc<InMemoryGate>,
    pub clock: Arc<MockTimeSource>,
    pub audit: Arc<MemoryAuditSink>,
}

impl TestGate {
    pub fn new() -> Self {
        Self::with_config(GateConfig::default())
    }

    pub fn with_config(config: GateConfig) -> Self {
        let clock = Arc::new(MockTimeSource::new(NOW));
        let audit = Arc::new(MemoryAuditSink::new());
        let gate = Arc::new(in_memory_gate(&config, clock.clone(), audit.clone()));
        Self { gate, clock, audit }
    }
}

impl Default for TestGate {
    fn default() -> Self {
        Self::new()
    }
}

pub fn body_json(response: &http::Response<Bytes>) -> serde_json::Value {
    serde_json::from_slice(response.body()).expect("JSON body")
}
