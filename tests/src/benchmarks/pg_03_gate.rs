//! # PG-03 Gate Throughput Benchmarks
//!
//! Full request handling over in-memory stores: extraction, recovery,
//! nonce consumption, rule checks, pricing and composition.

use crate::fixtures::{purchase_body, TestGate, Wallet, NOW};
use criterion::{black_box, Criterion};
use std::time::Duration;

pub fn signed_purchase(c: &mut Criterion) {
    let mut group = c.benchmark_group("pg-03/handle");
    group.measurement_time(Duration::from_secs(10));

    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
    let body = purchase_body("GUARD", "0.01", "metamask");

    group.bench_function("signed_purchase", |b| {
        let t = TestGate::new();
        b.iter_batched(
            // Fresh wallet per iteration: every signature is single use
            || Wallet::random().request(NOW, &body),
            |request| runtime.block_on(async { black_box(t.gate.handle(request).await) }),
            criterion::BatchSize::SmallInput,
        )
    });

    group.bench_function("rejected_missing_headers", |b| {
        let t = TestGate::new();
        b.iter(|| {
            let request = http::Request::new(bytes::Bytes::new());
            runtime.block_on(async { black_box(t.gate.handle(request).await) })
        })
    });

    group.finish();
}
