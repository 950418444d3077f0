//! # Personal-Message Signature Verification (secp256k1)
//!
//! Pure domain logic: digest, recover, compare. No I/O, no state.
//!
//! ## Security Notes
//!
//! - **Malleability Prevention (EIP-2)**: S must be STRICTLY LESS THAN SECP256K1_HALF_ORDER
//! - **Scalar Range Validation**: R and S must be in [1, n-1]
//! - **R Point Validation**: R must be a valid x-coordinate on the secp256k1 curve
//! - **Constant-Time Operations**: Uses `subtle` crate for side-channel resistance
//!
//! Because low-S is enforced, a signature has exactly one accepted encoding,
//! which is what makes the consumed-signature replay store sound.

use super::entities::EthSignature;
use super::errors::SignatureError;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::FromEncodedPoint;
use k256::{AffinePoint, EncodedPoint};
use sha3::{Digest, Keccak256};
use shared_types::{Hash, WalletAddress};
use subtle::{Choice, ConstantTimeEq};

/// Fixed prefix of the Ethereum personal-message digest.
pub const PERSONAL_MESSAGE_PREFIX: &str = "\x19Ethereum Signed Message:\n";

/// secp256k1 curve order n
/// n = 0xFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141
const SECP256K1_ORDER: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
];

/// Half of the secp256k1 curve order (for malleability check).
const SECP256K1_HALF_ORDER: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D, 0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B, 0x20, 0xA0,
];

// =============================================================================
// SIGNATURE VERIFIER
// =============================================================================

/// Stateless verifier for wallet-signed challenge messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureVerifier;

impl SignatureVerifier {
    pub fn new() -> Self {
        Self
    }

    /// Verify that `signature_hex` over `message` was produced by `claimed`.
    ///
    /// Returns the verified (canonical lower-case) address on success.
    pub fn verify(
        &self,
        message: &str,
        signature_hex: &str,
        claimed: &WalletAddress,
    ) -> Result<WalletAddress, SignatureError> {
        let signature = EthSignature::from_hex(signature_hex)?;
        verify_personal_signature(message.as_bytes(), &signature, claimed)
    }

    /// Recover the signer of a personal message without comparing.
    pub fn recover(
        &self,
        message: &str,
        signature: &EthSignature,
    ) -> Result<WalletAddress, SignatureError> {
        recover_address(&personal_message_hash(message.as_bytes()), signature)
    }
}

// =============================================================================
// CORE FUNCTIONS
// =============================================================================

/// Keccak-256 of `"\x19Ethereum Signed Message:\n" ‖ len(message) ‖ message`.
///
/// The length is the decimal byte length, not the character count.
pub fn personal_message_hash(message: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(PERSONAL_MESSAGE_PREFIX.as_bytes());
    hasher.update(message.len().to_string().as_bytes());
    hasher.update(message);
    hasher.finalize().into()
}

/// Verify a personal-message signature against the claimed signer.
pub fn verify_personal_signature(
    message: &[u8],
    signature: &EthSignature,
    claimed: &WalletAddress,
) -> Result<WalletAddress, SignatureError> {
    let hash = personal_message_hash(message);
    let recovered = recover_address(&hash, signature)?;

    let matches: bool = recovered.as_bytes().ct_eq(claimed.as_bytes()).into();
    if !matches {
        return Err(SignatureError::SignatureMismatch {
            claimed: *claimed,
            recovered,
        });
    }

    Ok(recovered)
}

/// Recover the signer's address from a prehashed message.
///
/// Validations performed before recovery:
/// 1. R is in valid range [1, n-1]
/// 2. R is a valid x-coordinate on the secp256k1 curve
/// 3. S is in valid range [1, n-1]
/// 4. S is in lower half per EIP-2
/// 5. Recovery ID (v) is 0, 1, 27, or 28
pub fn recover_address(
    message_hash: &Hash,
    signature: &EthSignature,
) -> Result<WalletAddress, SignatureError> {
    use zeroize::Zeroize;

    if !is_valid_scalar(&signature.r) {
        return Err(SignatureError::MalformedSignature("r out of range"));
    }
    // An off-curve R is malformed input, not a recovery failure: it is
    // caught before recovery runs, and it keeps single-bit corruptions
    // inside {MalformedSignature, SignatureMismatch}.
    if !is_valid_r_coordinate(&signature.r) {
        return Err(SignatureError::MalformedSignature("r is not a curve point"));
    }
    if !is_valid_scalar(&signature.s) {
        return Err(SignatureError::MalformedSignature("s out of range"));
    }
    if !is_low_s(&signature.s) {
        return Err(SignatureError::MalformedSignature("high s value"));
    }

    let recovery_id = parse_recovery_id(signature.v)?;

    let mut sig_bytes = [0u8; 64];
    sig_bytes[..32].copy_from_slice(&signature.r);
    sig_bytes[32..].copy_from_slice(&signature.s);
    let parsed = Signature::from_slice(&sig_bytes);
    sig_bytes.zeroize();
    let sig = parsed.map_err(|_| SignatureError::MalformedSignature("invalid scalars"))?;

    let recovered_key = VerifyingKey::recover_from_prehash(message_hash, &sig, recovery_id)
        .map_err(|_| SignatureError::RecoveryFailure)?;

    Ok(address_from_pubkey(&recovered_key))
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Keccak256 hash function.
pub fn keccak256(data: &[u8]) -> Hash {
    Keccak256::digest(data).into()
}

/// Derive the wallet address: last 20 bytes of keccak256(uncompressed pubkey without 0x04).
pub fn address_from_pubkey(public_key: &VerifyingKey) -> WalletAddress {
    let pubkey_bytes = public_key.to_encoded_point(false);
    let hash = keccak256(&pubkey_bytes.as_bytes()[1..]);

    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    WalletAddress::from_bytes(address)
}

/// Sign a personal message the way a wallet's `personal_sign` does.
///
/// Produces a low-S signature with `v` in {27, 28}.
pub fn sign_personal_message(
    message: &str,
    private_key: &SigningKey,
) -> Result<EthSignature, SignatureError> {
    let hash = personal_message_hash(message.as_bytes());
    let (sig, recid) = private_key
        .sign_prehash_recoverable(&hash)
        .map_err(|_| SignatureError::MalformedSignature("signing failed"))?;

    let sig_bytes = sig.to_bytes();
    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&sig_bytes[..32]);
    s.copy_from_slice(&sig_bytes[32..]);

    // Normalize S to low value (EIP-2); flipping S flips the recovery parity
    let (s, parity) = if is_low_s(&s) {
        (s, recid.to_byte() & 1)
    } else {
        (invert_s(&s), (recid.to_byte() & 1) ^ 1)
    };

    Ok(EthSignature {
        r,
        s,
        v: parity + 27,
    })
}

/// Check if S value is in lower half of curve order (EIP-2 malleability protection).
///
/// Constant-time: no early return on the first differing byte.
fn is_low_s(s: &[u8; 32]) -> bool {
    let mut less = Choice::from(0u8);
    let mut greater = Choice::from(0u8);

    for (s_byte, h_byte) in s.iter().zip(SECP256K1_HALF_ORDER.iter()) {
        let not_decided = !(less | greater);
        let byte_less = Choice::from((s_byte < h_byte) as u8);
        let byte_greater = Choice::from((s_byte > h_byte) as u8);

        less |= not_decided & byte_less;
        greater |= not_decided & byte_greater;
    }

    less.into()
}

/// Check if a scalar value is in valid range [1, n-1] for ECDSA.
fn is_valid_scalar(scalar: &[u8; 32]) -> bool {
    let mut is_zero = Choice::from(1u8);
    for byte in scalar {
        is_zero &= byte.ct_eq(&0u8);
    }

    let mut less = Choice::from(0u8);
    let mut greater = Choice::from(0u8);

    for (s_byte, n_byte) in scalar.iter().zip(SECP256K1_ORDER.iter()) {
        let not_decided = !(less | greater);
        let byte_less = Choice::from((s_byte < n_byte) as u8);
        let byte_greater = Choice::from((s_byte > n_byte) as u8);

        less |= not_decided & byte_less;
        greater |= not_decided & byte_greater;
    }

    (!is_zero & less).into()
}

/// Validate that R is a valid x-coordinate on the secp256k1 curve.
///
/// Only about half of all field elements have a matching y; either parity
/// decompresses when one does, so checking the even one is enough.
fn is_valid_r_coordinate(r: &[u8; 32]) -> bool {
    let mut compressed = [0u8; 33];
    compressed[0] = 0x02;
    compressed[1..].copy_from_slice(r);

    let encoded = match EncodedPoint::from_bytes(compressed) {
        Ok(e) => e,
        Err(_) => return false,
    };

    AffinePoint::from_encoded_point(&encoded).is_some().into()
}

/// Parse recovery ID from v value (0, 1, 27, 28).
fn parse_recovery_id(v: u8) -> Result<RecoveryId, SignatureError> {
    let id = match v {
        0 | 27 => 0,
        1 | 28 => 1,
        _ => return Err(SignatureError::MalformedSignature("invalid recovery id")),
    };

    RecoveryId::try_from(id).map_err(|_| SignatureError::MalformedSignature("invalid recovery id"))
}

/// s' = n - s
pub fn invert_s(s: &[u8; 32]) -> [u8; 32] {
    let mut result = [0u8; 32];
    let mut borrow: i32 = 0;

    for i in (0..32).rev() {
        let diff = (SECP256K1_ORDER[i] as i32) - (s[i] as i32) - borrow;
        if diff < 0 {
            result[i] = (diff + 256) as u8;
            borrow = 1;
        } else {
            result[i] = diff as u8;
            borrow = 0;
        }
    }

    result
}

// =============================================================================
// UNIT TESTS
// =============================================================================
