//! # PG-01 Signature Recovery Benchmarks
//!
//! Every signed request pays for one personal-message hash and one
//! secp256k1 public-key recovery before anything else happens.

use criterion::{black_box, BenchmarkId, Criterion, Throughput};
use k256::ecdsa::SigningKey;
use pg_01_wallet_auth::{
    address_from_pubkey, personal_message_hash, sign_personal_message, SignatureVerifier,
};
use std::time::Duration;

fn signed(message: &str) -> (SigningKey, String) {
    let key = SigningKey::random(&mut rand::thread_rng());
    let signature = sign_personal_message(message, &key)
        .expect("signing with a valid key")
        .to_hex();
    (key, signature)
}

pub fn personal_message_hashing(c: &mut Criterion) {
    let mut group = c.benchmark_group("pg-01/personal_message_hash");

    for size in [32usize, 256, 4096] {
        let message = "a".repeat(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &message, |b, m| {
            b.iter(|| black_box(personal_message_hash(m.as_bytes())))
        });
    }

    group.finish();
}

pub fn verify_and_recover(c: &mut Criterion) {
    let mut group = c.benchmark_group("pg-01/verify");
    group.measurement_time(Duration::from_secs(10));

    let message = "Purchase-Gate login | issued at 1700000000000";
    let (key, signature) = signed(message);
    let claimed = address_from_pubkey(key.verifying_key());
    let verifier = SignatureVerifier::new();

    group.bench_function("verify_valid", |b| {
        b.iter(|| black_box(verifier.verify(message, &signature, &claimed)))
    });

    let stranger = address_from_pubkey(SigningKey::random(&mut rand::thread_rng()).verifying_key());
    group.bench_function("verify_mismatch", |b| {
        b.iter(|| black_box(verifier.verify(message, &signature, &stranger)))
    });

    group.bench_function("reject_malformed", |b| {
        b.iter(|| black_box(verifier.verify(message, "0xdeadbeef", &claimed)))
    });

    group.finish();
}
