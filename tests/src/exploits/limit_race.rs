//! # Daily Limit Race
//!
//! Many concurrent purchases from one wallet, each individually under the
//! cap, try to pass the limit check before any of them records spend.

#[cfg(test)]
mod tests {
    use crate::fixtures::{body_json, purchase_body, session_request, TestGate, Wallet, NOW};
    use futures::future::join_all;
    use http::StatusCode;
    use rust_decimal::Decimal;

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_parallel_purchases_cannot_exceed_cap() {
        let t = TestGate::new();
        let wallet = Wallet::random();

        let login = t.gate.handle(wallet.request(NOW, "")).await;
        let token = body_json(&login)["sessionToken"].as_str().unwrap().to_string();

        // 40 x 75 USD = 3000 USD against a 1000 USD cap
        let responses = join_all((0..40).map(|i| {
            let gate = t.gate.clone();
            let token = token.clone();
            let symbol = if i % 2 == 0 { "GUARD" } else { "SHIELD" };
            tokio::spawn(async move {
                gate.handle(session_request(&token, &purchase_body(symbol, "75", "metamask")))
                    .await
            })
        }))
        .await;

        let mut accepted = Decimal::ZERO;
        for response in responses {
            let response = response.unwrap();
            match response.status() {
                StatusCode::OK => accepted += Decimal::from(75),
                StatusCode::BAD_REQUEST => {
                    assert_eq!(body_json(&response)["error"], "daily_limit_exceeded")
                }
                other => panic!("unexpected status {other}"),
            }
        }

        // floor(1000 / 75) = 13 purchases
        assert_eq!(accepted, Decimal::from(975));
    }

    #[tokio::test]
    async fn test_limit_is_per_wallet() {
        let t = TestGate::new();
        let a = Wallet::random();
        let b = Wallet::random();

        let spend_all = purchase_body("SHIELD", "1000", "walletconnect");
        assert_eq!(t.gate.handle(a.request(NOW, &spend_all)).await.status(), StatusCode::OK);
        assert_eq!(t.gate.handle(b.request(NOW, &spend_all)).await.status(), StatusCode::OK);

        let more = t
            .gate
            .handle(a.request(NOW + 1, &purchase_body("GUARD", "0.01", "walletconnect")))
            .await;
        let body = body_json(&more);
        assert_eq!(body["error"], "daily_limit_exceeded");
        assert_eq!(body["details"]["currentUSD"], "1000");
    }

    #[tokio::test]
    async fn test_limit_resets_at_utc_midnight() {
        let t = TestGate::new();
        let wallet = Wallet::random();
        let spend_all = purchase_body("GUARD", "1000", "trust");

        assert_eq!(
            t.gate.handle(wallet.request(NOW, &spend_all)).await.status(),
            StatusCode::OK
        );

        // NOW is 22:13:20 UTC; two hours later is the next UTC day
        t.clock.advance(2 * 60 * 60 * 1000);
        let later = NOW + 2 * 60 * 60 * 1000;
        assert_eq!(
            t.gate.handle(wallet.request(later, &spend_all)).await.status(),
            StatusCode::OK
        );
    }
}
