//! # Signature Replay
//!
//! An attacker who captures a signed request (proxy logs, browser
//! extension, shoulder surfing) resends it verbatim.
//!
//! - Inside the window: the nonce store has already consumed the signature
//! - After the window: the timestamp is stale
//! - Concurrently: exactly one copy wins

#[cfg(test)]
mod tests {
    use crate::fixtures::{body_json, purchase_body, TestGate, Wallet, NOW};
    use futures::future::join_all;
    use http::StatusCode;

    #[tokio::test]
    async fn test_verbatim_replay_inside_window() {
        let t = TestGate::new();
        let wallet = Wallet::random();
        let body = purchase_body("GUARD", "50", "metamask");

        let first = t.gate.handle(wallet.request(NOW, &body)).await;
        assert_eq!(first.status(), StatusCode::OK);

        t.clock.advance(1_000);
        let replay = t.gate.handle(wallet.request(NOW, &body)).await;
        assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(&replay)["error"], "replayed_signature");

        // No second spend recorded
        let next = t
            .gate
            .handle(wallet.request(NOW + 2, &purchase_body("GUARD", "950", "metamask")))
            .await;
        assert_eq!(next.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_replay_after_window_is_stale() {
        let t = TestGate::new();
        let wallet = Wallet::random();

        assert_eq!(t.gate.handle(wallet.request(NOW, "")).await.status(), StatusCode::OK);

        t.clock.advance(300_001);
        let replay = t.gate.handle(wallet.request(NOW, "")).await;
        assert_eq!(body_json(&replay)["error"], "expired_timestamp");
    }

    #[tokio::test]
    async fn test_replay_with_different_body_still_rejected() {
        // The signature covers the login message only; swapping the body
        // must not turn a consumed signature into a fresh one.
        let t = TestGate::new();
        let wallet = Wallet::random();

        t.gate.handle(wallet.request(NOW, "")).await;
        let replay = t
            .gate
            .handle(wallet.request(NOW, &purchase_body("SHIELD", "1000", "trust")))
            .await;
        assert_eq!(body_json(&replay)["error"], "replayed_signature");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_replay_single_winner() {
        let t = TestGate::new();
        let wallet = Wallet::random();

        let responses = join_all((0..32).map(|_| {
            let gate = t.gate.clone();
            let request = wallet.request(NOW, "");
            tokio::spawn(async move { gate.handle(request).await })
        }))
        .await;

        let ok = responses
            .into_iter()
            .map(|r| r.unwrap())
            .filter(|r| r.status() == StatusCode::OK)
            .count();
        assert_eq!(ok, 1);
        assert_eq!(t.audit.len(), 32);
    }
}
