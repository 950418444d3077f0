//! # Purchase Gate (PG-03)
//!
//! Request-time gate in front of token purchases. The hosting runtime hands
//! over one `http::Request<Bytes>` and applies the returned response.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): Configuration, error taxonomy, audit events
//! - **Ports Layer** (`ports/`): `AuditSink`
//! - **Adapters Layer** (`adapters/`): `tracing` and in-memory audit sinks
//! - **HTTP Edge** (`edge/`): Header/body extraction and the response composer
//! - **Service Layer** (`service.rs`): Auth stage, purchase stage, one audit event
//!
//! ## Status codes
//!
//! | Outcome | Status |
//! |---|---|
//! | Login / accepted purchase | 200 |
//! | Authentication failure | 401 |
//! | Purchase rule violation | 400 |
//! | Oracle or store failure | 503 |
//! | Internal fault | 500 |

pub mod adapters;
pub mod domain;
pub mod edge;
pub mod ports;
pub mod service;
pub mod telemetry;
pub mod wiring;

// Re-export public API
pub use adapters::{MemoryAuditSink, TracingAuditSink, AUDIT_TARGET};
pub use domain::audit::{AuditEvent, AuditEventKind, AuditOutcome, Stage};
pub use domain::config::{AuthConfig, ConfigError, GateConfig, LoggingConfig, PurchaseConfig};
pub use domain::error::{ErrorBody, GateError};
pub use domain::request_id::{RequestId, REQUEST_ID_HEADER};
pub use edge::composer::{ResponseComposer, AUTH_SCHEME};
pub use edge::extract::Credentials;
pub use edge::{headers, JSON_CONTENT_TYPE};
pub use ports::outbound::AuditSink;
pub use service::{Outcome, PurchaseGate};
pub use telemetry::{init_logging, TelemetryError};
pub use wiring::{build_gate, default_gate, in_memory_gate, InMemoryGate};
