//! # Adapters Module
//!
//! In-process implementations of the outbound ports.

pub mod memory_nonce;
pub mod memory_session;

pub use memory_nonce::InMemoryNonceStore;
pub use memory_session::InMemorySessionStore;
