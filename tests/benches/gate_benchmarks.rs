//! # Purchase-Gate Benchmarks
//!
//! | Subsystem | Path |
//! |-----------|------|
//! | pg-01 Wallet Auth | Personal-message hash, ECDSA recovery |
//! | pg-03 Purchase Gate | Whole request, signed purchase |

use criterion::{criterion_group, criterion_main};
use pg_tests::benchmarks::{pg_01_signature, pg_03_gate};

criterion_group!(
    benches,
    pg_01_signature::personal_message_hashing,
    pg_01_signature::verify_and_recover,
    pg_03_gate::signed_purchase,
);

criterion_main!(benches);
