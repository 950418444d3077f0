//! # Purchase Gate
//!
//! One inbound request in, one response and one audit event out.
//!
//! ## Flow
//!
//! 1. Credentials: signature headers, or a session token
//! 2. Auth stage via [`WalletAuthApi`]; a signature is verified and spent
//! 3. Empty body: login response, session opened
//! 4. Purchase stage via [`PurchaseValidationApi`] for the verified wallet;
//!    the session is opened only if the purchase is accepted
//! 5. [`ResponseComposer`] renders; the [`AuditSink`] gets exactly one event
//!
//! A panic anywhere in 1-4 is caught and rendered as a 500 with a
//! `gate.internal_error` event. If the caller drops the future first, the
//! same event is recorded on drop.

use crate::domain::audit::{AuditEvent, AuditEventKind, Stage};
use crate::domain::error::GateError;
use crate::domain::request_id::{RequestId, REQUEST_ID_HEADER};
use crate::edge::composer::ResponseComposer;
use crate::edge::extract::{credentials, purchase_request, Credentials};
use crate::ports::outbound::AuditSink;
use bytes::Bytes;
use futures::FutureExt;
use http::{Request, Response};
use parking_lot::Mutex;
use pg_01_wallet_auth::{SessionGrant, WalletAuthApi};
use pg_02_purchase_validation::{PurchaseResult, PurchaseValidationApi};
use serde_json::json;
use shared_types::{TimeSource, WalletAddress};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error, info_span, warn, Instrument};

/// What a request came to.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Authenticated, no purchase requested
    Login {
        wallet: WalletAddress,
        grant: Option<SessionGrant>,
    },
    Purchase {
        result: PurchaseResult,
        grant: Option<SessionGrant>,
    },
    Failed {
        stage: Stage,
        wallet: Option<WalletAddress>,
        error: GateError,
    },
}

impl Outcome {
    fn auth_failed(error: impl Into<GateError>) -> Self {
        Outcome::Failed {
            stage: Stage::Auth,
            wallet: None,
            error: error.into(),
        }
    }
}

/// How far a request got, for the event written on cancellation.
#[derive(Debug, Clone, Copy)]
struct Progress {
    stage: Stage,
    wallet: Option<WalletAddress>,
}

/// Owns the request's audit event: recorded by [`complete`](Self::complete),
/// or by `Drop` when the request never reaches it.
struct AuditGuard {
    audit: Arc<dyn AuditSink>,
    time: Arc<dyn TimeSource>,
    request_id: RequestId,
    progress: Mutex<Progress>,
    recorded: bool,
}

impl AuditGuard {
    fn new(audit: Arc<dyn AuditSink>, time: Arc<dyn TimeSource>, request_id: RequestId) -> Self {
        Self {
            audit,
            time,
            request_id,
            progress: Mutex::new(Progress {
                stage: Stage::Auth,
                wallet: None,
            }),
            recorded: false,
        }
    }

    fn authenticated(&self, wallet: WalletAddress) {
        *self.progress.lock() = Progress {
            stage: Stage::Purchase,
            wallet: Some(wallet),
        };
    }

    fn complete(mut self, event: &AuditEvent) {
        self.recorded = true;
        self.audit.record(event);
    }
}

impl Drop for AuditGuard {
    fn drop(&mut self) {
        if self.recorded {
            return;
        }
        let Progress { stage, wallet } = *self.progress.lock();
        let error = GateError::Internal("request cancelled before a response".into());
        warn!(request_id = %self.request_id, ?stage, "Purchase gate request cancelled");
        self.audit.record(&AuditEvent::failure(
            stage,
            &error,
            self.request_id,
            wallet,
            self.time.now(),
        ));
    }
}

pub struct PurchaseGate<A: WalletAuthApi, P: PurchaseValidationApi> {
    auth: A,
    purchases: P,
    audit: Arc<dyn AuditSink>,
    time: Arc<dyn TimeSource>,
    composer: ResponseComposer,
}

impl<A: WalletAuthApi, P: PurchaseValidationApi> PurchaseGate<A, P> {
    pub fn new(auth: A, purchases: P, audit: Arc<dyn AuditSink>, time: Arc<dyn TimeSource>) -> Self {
        Self {
            auth,
            purchases,
            audit,
            time,
            composer: ResponseComposer::new(),
        }
    }

    pub fn auth(&self) -> &A {
        &self.auth
    }

    pub fn purchases(&self) -> &P {
        &self.purchases
    }

    /// Handle one request. Never fails; every outcome is a response.
    pub async fn handle(&self, request: Request<Bytes>) -> Response<Bytes> {
        let request_id = request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(RequestId::parse)
            .unwrap_or_default();
        let guard = AuditGuard::new(self.audit.clone(), self.time.clone(), request_id);

        let span = info_span!("purchase_gate", request_id = %request_id);
        let outcome = AssertUnwindSafe(self.process(&request, &guard).instrument(span))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| {
                let reason = panic_message(panic.as_ref());
                error!(request_id = %request_id, reason = %reason, "Purchase gate panicked");
                Outcome::Failed {
                    stage: Stage::Auth,
                    wallet: None,
                    error: GateError::Internal(reason),
                }
            });

        let (response, event) = self.render(outcome, request_id);
        guard.complete(&event);
        response
    }

    async fn process(&self, request: &Request<Bytes>, guard: &AuditGuard) -> Outcome {
        let creds = match credentials(request.headers()) {
            Ok(creds) => creds,
            Err(e) => return Outcome::auth_failed(e),
        };

        // Signature logins hold their session until the request succeeds.
        let (wallet, signed_in) = match creds {
            Credentials::Signature(auth_request) => match self.auth.verify(&auth_request).await {
                Ok(wallet) => (wallet, true),
                Err(e) => return Outcome::auth_failed(e),
            },
            Credentials::Session(token) => match self.auth.resume_session(&token).await {
                Ok(wallet) => (wallet, false),
                Err(e) => return Outcome::auth_failed(e),
            },
        };
        guard.authenticated(wallet);
        debug!(wallet = %wallet, "Wallet authenticated");

        let purchase = match purchase_request(request.body()) {
            Ok(Some(purchase)) => purchase,
            Ok(None) if signed_in => {
                return match self.auth.open_session(wallet).await {
                    Ok(grant) => Outcome::Login {
                        wallet,
                        grant: Some(grant),
                    },
                    Err(e) => Outcome::auth_failed(e),
                }
            }
            Ok(None) => return Outcome::Login { wallet, grant: None },
            Err(e) => {
                return Outcome::Failed {
                    stage: Stage::Purchase,
                    wallet: Some(wallet),
                    error: e.into(),
                }
            }
        };

        let result = match self.purchases.validate_purchase(wallet, &purchase).await {
            Ok(result) => result,
            Err(e) => {
                return Outcome::Failed {
                    stage: Stage::Purchase,
                    wallet: Some(wallet),
                    error: e.into(),
                }
            }
        };

        // Spend is already committed; a missing session must not hide that.
        let grant = if signed_in {
            self.auth.open_session(wallet).await.ok()
        } else {
            None
        };
        Outcome::Purchase { result, grant }
    }

    /// Response and audit event for an outcome.
    pub fn render(&self, outcome: Outcome, request_id: RequestId) -> (Response<Bytes>, AuditEvent) {
        let now = self.time.now();
        match outcome {
            Outcome::Login { wallet, grant } => {
                let detail = json!({
                    "method": if grant.is_some() { "signature" } else { "session" },
                    "sessionExpiresAt": grant.as_ref().map(|g| g.expires_at),
                });
                (
                    self.composer.login(wallet, grant.as_ref(), request_id),
                    AuditEvent::success(AuditEventKind::AuthLogin, request_id, wallet, detail, now),
                )
            }
            Outcome::Purchase { result, grant } => {
                let detail = json!({
                    "transactionId": result.transaction_id.to_string(),
                    "token": result.token.symbol,
                    "amountUSD": result.amount_usd,
                    "priceUSD": result.price_usd,
                    "tokenAmount": result.quantity.token_amount,
                    "paymentMethod": result.payment_method.as_str(),
                });
                (
                    self.composer.purchase(&result, grant.as_ref(), request_id),
                    AuditEvent::success(
                        AuditEventKind::PurchaseValidated,
                        request_id,
                        result.wallet,
                        detail,
                        now,
                    ),
                )
            }
            Outcome::Failed {
                stage,
                wallet,
                error,
            } => (
                self.composer.error(&error, request_id),
                AuditEvent::failure(stage, &error, request_id, wallet, now),
            ),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
