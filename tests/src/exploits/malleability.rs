//! # Signature Malleability and Forgery
//!
//! - `(r, n - s)` is a second valid ECDSA signature for the same message;
//!   accepting it would let a captured login be replayed under a new nonce key
//! - Swapping `v` recovers a different key
//! - Corrupted or truncated signatures must never authenticate

#[cfg(test)]
mod tests {
    use crate::fixtures::{body_json, signed_request, TestGate, Wallet, NOW};
    use http::StatusCode;

    /// secp256k1 group order.
    const N: [u8; 32] = [
        0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
        0xFE, 0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36,
        0x41, 0x41,
    ];

    fn negate(s: &[u8; 32]) -> [u8; 32] {
        let mut out = [0u8; 32];
        let mut borrow = 0i16;
        for i in (0..32).rev() {
            let mut d = N[i] as i16 - s[i] as i16 - borrow;
            borrow = if d < 0 {
                d += 256;
                1
            } else {
                0
            };
            out[i] = d as u8;
        }
        out
    }

    #[tokio::test]
    async fn test_high_s_twin_rejected() {
        let t = TestGate::new();
        let wallet = Wallet::random();
        let message = wallet.challenge(NOW);
        let mut signature = wallet.sign(&message);

        assert_eq!(
            t.gate
                .handle(signed_request(&wallet.address().to_hex(), &signature.to_hex(), &message, NOW, ""))
                .await
                .status(),
            StatusCode::OK
        );

        signature.s = negate(&signature.s);
        signature.v = if signature.v == 27 { 28 } else { 27 };
        let twin = t
            .gate
            .handle(signed_request(&wallet.address().to_hex(), &signature.to_hex(), &message, NOW, ""))
            .await;
        assert_eq!(twin.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(&twin)["error"], "malformed_signature");
    }

    #[tokio::test]
    async fn test_flipped_v_does_not_authenticate() {
        let t = TestGate::new();
        let wallet = Wallet::random();
        let message = wallet.challenge(NOW);
        let mut signature = wallet.sign(&message);
        signature.v = if signature.v == 27 { 28 } else { 27 };

        let response = t
            .gate
            .handle(signed_request(&wallet.address().to_hex(), &signature.to_hex(), &message, NOW, ""))
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let kind = body_json(&response)["error"].as_str().unwrap().to_string();
        assert!(
            ["signature_mismatch", "malformed_signature", "recovery_failure"].contains(&kind.as_str()),
            "{kind}"
        );
    }

    #[tokio::test]
    async fn test_signature_for_other_wallet() {
        let t = TestGate::new();
        let victim = Wallet::random();
        let attacker = Wallet::random();
        let message = victim.challenge(NOW);
        let signature = attacker.sign(&message);

        let response = t
            .gate
            .handle(signed_request(&victim.address().to_hex(), &signature.to_hex(), &message, NOW, ""))
            .await;
        let body = body_json(&response);
        assert_eq!(body["error"], "signature_mismatch");
        assert_eq!(body["details"]["claimed"], victim.address().to_hex());
    }

    #[tokio::test]
    async fn test_edited_message_does_not_authenticate() {
        let t = TestGate::new();
        let wallet = Wallet::random();
        let message = wallet.challenge(NOW);
        let signature = wallet.sign(&message);
        let edited = message.replace("login", "LOGIN");

        let response = t
            .gate
            .handle(signed_request(&wallet.address().to_hex(), &signature.to_hex(), &edited, NOW, ""))
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_garbage_signatures() {
        let t = TestGate::new();
        let wallet = Wallet::random();
        let message = wallet.challenge(NOW);
        let zero = format!("0x{}1b", "00".repeat(64));

        for signature in ["0x", "0x1234", "not hex at all", zero.as_str()] {
            let response = t
                .gate
                .handle(signed_request(&wallet.address().to_hex(), signature, &message, NOW, ""))
                .await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{signature}");
            assert_eq!(body_json(&response)["error"], "malformed_signature", "{signature}");
        }
        assert_eq!(t.audit.len(), 4);
    }
}
