//! # Purchase-Gate Benchmarks
//!
//! Criterion benchmark bodies, registered by `benches/gate_benchmarks.rs`.

pub mod pg_01_signature;
pub mod pg_03_gate;
