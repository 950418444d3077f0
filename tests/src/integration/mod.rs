//! # Integration Tests
//!
//! Whole-gate flows: signed request in, response and audit event out.

pub mod flows;
