//! # Integration Test Flows
//!
//! pg-01 (wallet auth) → pg-02 (purchase validation) → pg-03 (composer and
//! audit), wired over in-memory stores.
//!
//! ## Flows Tested:
//!
//! 1. **Sign in, then buy with the session**: login issues a session the purchase path accepts
//! 2. **Sign and buy in one request**: the reference GUARD scenario
//! 3. **Rule order is user-visible**: first failing check decides the error
//! 4. **Freshness boundary**: 300000 ms accepted, 300001 ms rejected
//! 5. **Audit completeness**: exactly one event per request, whatever the outcome
//! 6. **Store hygiene**: expired sessions do not pile up behind new logins

#[cfg(test)]
mod tests {
    use crate::fixtures::{
        body_json, purchase_body, session_request, signed_request, TestGate, Wallet, NOW,
    };
    use http::StatusCode;
    use pg_03_purchase_gate::{headers, AuditEventKind, AuditOutcome, GateConfig};
    use rust_decimal::Decimal;

    // =============================================================================
    // FLOW 1 + 2: LOGIN AND PURCHASE
    // =============================================================================

    #[tokio::test]
    async fn test_guard_reference_scenario() {
        let t = TestGate::new();
        let wallet = Wallet::random();

        let response = t
            .gate
            .handle(wallet.request(NOW, &purchase_body("GUARD", "10", "MetaMask")))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "application/json");
        assert_eq!(
            response.headers()[headers::VERIFIED_WALLET],
            wallet.address().to_hex().as_str()
        );

        let body = body_json(&response);
        assert_eq!(body["tokenAmount"], "100");
        assert_eq!(body["priceUSD"], "0.10");
        assert_eq!(body["amountUSD"], "10");
        assert_eq!(body["baseUnits"], "100000000000000000000");
        assert_eq!(body["paymentMethod"], "metamask");
        assert_eq!(
            response.headers()[headers::TRANSACTION_ID],
            body["transactionId"].as_str().unwrap()
        );
    }

    #[tokio::test]
    async fn test_login_then_buy_with_session() {
        let t = TestGate::new();
        let wallet = Wallet::random();

        let login = t.gate.handle(wallet.request(NOW, "")).await;
        assert_eq!(login.status(), StatusCode::OK);
        let login_body = body_json(&login);
        let token = login_body["sessionToken"].as_str().unwrap().to_string();
        assert_eq!(login_body["expiresAt"], NOW + 3_600_000);

        t.clock.advance(60_000);
        let buy = t
            .gate
            .handle(session_request(&token, &purchase_body("SHIELD", "5", "coinbase")))
            .await;
        assert_eq!(buy.status(), StatusCode::OK);
        assert_eq!(body_json(&buy)["tokenAmount"], "10");
        assert_eq!(body_json(&buy)["wallet"], wallet.address().to_hex());

        // Past the one-hour TTL
        t.clock.advance(3_600_000);
        let late = t
            .gate
            .handle(session_request(&token, &purchase_body("SHIELD", "5", "coinbase")))
            .await;
        assert_eq!(late.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(&late)["error"], "session_expired");
    }

    #[tokio::test]
    async fn test_body_cannot_override_verified_wallet() {
        let t = TestGate::new();
        let wallet = Wallet::random();
        let body = serde_json::json!({
            "tokenType": "GUARD",
            "amountUSD": 1,
            "paymentMethod": "trust",
            "walletAddress": "0x000000000000000000000000000000000000dead",
        })
        .to_string();

        let response = t.gate.handle(wallet.request(NOW, &body)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(&response)["wallet"], wallet.address().to_hex());
    }

    // =============================================================================
    // FLOW 3: RULE ORDER
    // =============================================================================

    #[tokio::test]
    async fn test_rule_errors_in_order() {
        let t = TestGate::new();
        let cases = [
            (purchase_body("DOGE", "-1", "paypal"), "invalid_token_type"),
            (purchase_body("GUARD", "-1", "paypal"), "invalid_amount"),
            (purchase_body("GUARD", "0.001", "paypal"), "below_minimum"),
            (purchase_body("GUARD", "10000.01", "paypal"), "above_maximum"),
            (purchase_body("GUARD", "1", "paypal"), "unsupported_payment_method"),
        ];

        for (i, (body, expected)) in cases.iter().enumerate() {
            let wallet = Wallet::random();
            let response = t.gate.handle(wallet.request(NOW + i as u64, body)).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{expected}");
            assert_eq!(body_json(&response)["error"], *expected);
        }
    }

    #[tokio::test]
    async fn test_shield_below_minimum_reports_minimum() {
        let t = TestGate::new();
        let response = t
            .gate
            .handle(Wallet::random().request(NOW, &purchase_body("SHIELD", "0.01", "metamask")))
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(&response);
        assert_eq!(body["error"], "below_minimum");
        assert_eq!(body["details"]["minimumUSD"], "0.025");
        assert!(body["message"].as_str().unwrap().contains("Shield Token"));
    }

    // =============================================================================
    // FLOW 4: FRESHNESS BOUNDARY
    // =============================================================================

    #[tokio::test]
    async fn test_freshness_boundary() {
        let t = TestGate::new();

        let on_edge = t.gate.handle(Wallet::random().request(NOW - 300_000, "")).await;
        assert_eq!(on_edge.status(), StatusCode::OK);

        let past_edge = t.gate.handle(Wallet::random().request(NOW - 300_001, "")).await;
        assert_eq!(past_edge.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(&past_edge)["error"], "expired_timestamp");

        let future = t.gate.handle(Wallet::random().request(NOW + 300_001, "")).await;
        assert_eq!(body_json(&future)["error"], "expired_timestamp");
    }

    #[tokio::test]
    async fn test_configured_window() {
        let mut config = GateConfig::default();
        config.auth.replay_window_ms = 10_000;
        let t = TestGate::with_config(config);

        let response = t.gate.handle(Wallet::random().request(NOW - 10_001, "")).await;
        assert_eq!(body_json(&response)["error"], "expired_timestamp");
        assert_eq!(body_json(&response)["details"]["windowMs"], 10_000);
    }

    // =============================================================================
    // FLOW 5: AUDIT COMPLETENESS
    // =============================================================================

    #[tokio::test]
    async fn test_one_audit_event_per_request() {
        let t = TestGate::new();
        let wallet = Wallet::random();
        let stranger = Wallet::random();

        // login, purchase, rejected purchase, bad signature, missing headers
        let mismatched = {
            let message = wallet.challenge(NOW + 3);
            let signature = stranger.sign(&message);
            signed_request(&wallet.address().to_hex(), &signature.to_hex(), &message, NOW + 3, "")
        };
        let requests = vec![
            wallet.request(NOW, ""),
            wallet.request(NOW + 1, &purchase_body("GUARD", "20", "trust")),
            wallet.request(NOW + 2, &purchase_body("GUARD", "20", "venmo")),
            mismatched,
            http::Request::new(bytes::Bytes::new()),
        ];

        for request in requests {
            t.gate.handle(request).await;
        }

        let events = t.audit.events();
        let kinds: Vec<_> = events.iter().map(|e| e.event).collect();
        assert_eq!(
            kinds,
            vec![
                AuditEventKind::AuthLogin,
                AuditEventKind::PurchaseValidated,
                AuditEventKind::PurchaseRejected,
                AuditEventKind::AuthFailed,
                AuditEventKind::AuthFailed,
            ]
        );
        assert_eq!(events[3].detail["error"], "signature_mismatch");
        assert!(events.iter().all(|e| e.timestamp_ms == NOW));
        assert_eq!(
            events.iter().filter(|e| e.outcome == AuditOutcome::Success).count(),
            2
        );
    }

    #[tokio::test]
    async fn test_daily_spend_reported() {
        let t = TestGate::new();
        let wallet = Wallet::random();

        t.gate
            .handle(wallet.request(NOW, &purchase_body("GUARD", "250", "metamask")))
            .await;
        let response = t
            .gate
            .handle(wallet.request(NOW + 1, &purchase_body("SHIELD", "100.50", "metamask")))
            .await;

        let spent: Decimal = body_json(&response)["dailySpendUSD"]
            .as_str()
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(spent, Decimal::new(35050, 2));
    }

    // =============================================================================
    // FLOW 6: STORE HYGIENE
    // =============================================================================

    #[tokio::test]
    async fn test_expired_sessions_swept_by_later_logins() {
        let t = TestGate::new();
        for _ in 0..50 {
            let response = t
                .gate
                .handle(Wallet::random().request(NOW, &purchase_body("GUARD", "1", "trust")))
                .await;
            assert_eq!(response.status(), StatusCode::OK);
        }
        assert_eq!(t.gate.auth().sessions().len(), 50);

        // Ten hours on, none of the old tokens is ever presented again
        t.clock.advance(10 * 3_600_000);
        for _ in 0..5 {
            let login = t.gate.handle(Wallet::random().request(NOW + 10 * 3_600_000, "")).await;
            assert_eq!(login.status(), StatusCode::OK);
        }
        assert_eq!(t.gate.auth().sessions().len(), 5);
    }
}
