//! # Ports Layer
//!
//! Trait definitions for the hexagonal architecture.
//! - **Inbound (Driving)**: API that the gate calls
//! - **Outbound (Driven)**: Stores this subsystem depends on

pub mod inbound;
pub mod outbound;
