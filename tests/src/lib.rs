//! # Purchase-Gate Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── benchmarks/       # Criterion benchmarks per subsystem
//! ├── exploits/         # Attack simulations (replay, malleability, limit races)
//! ├── fixtures.rs       # Signed requests and wired gates
//! └── integration/      # Request-to-response flows across all crates
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p pg-tests
//!
//! # By category
//! cargo test -p pg-tests integration::
//! cargo test -p pg-tests exploits::
//!
//! # Benchmarks
//! cargo bench -p pg-tests
//! ```

pub mod benchmarks;
pub mod exploits;
pub mod fixtures;
pub mod integration;
