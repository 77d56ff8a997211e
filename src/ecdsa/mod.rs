//! ECDSA over the Stark curve.
//!
//! Signing, public keys and RFC 6979 come from `starknet-crypto`; this module
//! adds range checks, the nonce policy and retrying of degenerate signatures.
//! Verification runs on [`AffinePoint`] so that a combination landing on the
//! identity is a rejection instead of an abort.

mod nonce;

pub use nonce::NonceStrategy;

use crate::error::{ErrorCode, SignerResult};
use crate::field::{ec_order, two_pow_251, FieldElement};
use crate::hash::AffinePoint;
use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use starknet_crypto::SignError;

/// Signing attempts before giving up on degenerate `(r, s)` pairs.
pub const MAX_SIGNING_ATTEMPTS: u64 = 16;

/// An `(r, s)` signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// x coordinate of `k·G`
    pub r: FieldElement,
    /// `(hash + r·key) / k mod N`
    pub s: FieldElement,
}

impl Signature {
    /// Parse both components from hex.
    pub fn from_hex_pair(r: &str, s: &str) -> SignerResult<Self> {
        Ok(Self {
            r: FieldElement::from_hex(r)?,
            s: FieldElement::from_hex(s)?,
        })
    }

    /// Both components as minimal 0x-hex.
    pub fn to_hex_pair(&self) -> [String; 2] {
        [self.r.to_hex(), self.s.to_hex()]
    }

    /// JSON array form used in request headers: `["0x…","0x…"]`.
    pub fn header_value(&self) -> String {
        let [r, s] = self.to_hex_pair();
        format!("[\"{}\",\"{}\"]", r, s)
    }
}

/// Public key (x coordinate of `key·G`) for a private key in `[1, N)`.
pub fn public_key(private_key: &FieldElement) -> SignerResult<FieldElement> {
    check_private_key(private_key)?;
    Ok(FieldElement::from(starknet_crypto::get_public_key(
        private_key.inner(),
    )))
}

/// Sign a message hash below 2^251.
///
/// Degenerate signatures are retried with a perturbed nonce; callers only
/// see [`ErrorCode::E500_SignatureDegenerate`] after
/// [`MAX_SIGNING_ATTEMPTS`] consecutive failures.
pub fn sign(
    message_hash: &FieldElement,
    private_key: &FieldElement,
    nonce: &NonceStrategy,
) -> SignerResult<Signature> {
    check_private_key(private_key)?;
    check_message_hash(message_hash)?;

    let mut strategy = nonce.clone();
    for attempt in 0..MAX_SIGNING_ATTEMPTS {
        let k = strategy.generate(message_hash, private_key);
        check_nonce(&k)?;
        match starknet_crypto::sign(private_key.inner(), message_hash.inner(), k.inner()) {
            Ok(signature) => {
                return Ok(Signature {
                    r: signature.r.into(),
                    s: signature.s.into(),
                })
            }
            Err(SignError::InvalidK) => {
                tracing::warn!(attempt, "degenerate signature, retrying with a new nonce");
                strategy = strategy.perturbed();
            }
            Err(err) => {
                return Err(ErrorCode::E403_MessageHashOutOfRange(format!(
                    "{}: {:?}",
                    message_hash.to_hex(),
                    err
                )))
            }
        }
    }
    Err(ErrorCode::E500_SignatureDegenerate(MAX_SIGNING_ATTEMPTS))
}

/// Check a signature. Malformed inputs verify as `false`.
///
/// Accepts when the x coordinate of `u1·G + u2·Q` or `u1·G - u2·Q` equals
/// `r`, where `w = s⁻¹ mod N`, `u1 = hash·w` and `u2 = r·w`.
pub fn verify(message_hash: &FieldElement, signature: &Signature, public_key: &FieldElement) -> bool {
    match verify_checked(message_hash, signature, public_key) {
        Ok(valid) => valid,
        Err(reason) => {
            tracing::debug!(reason, "signature rejected before verification");
            false
        }
    }
}

fn verify_checked(
    message_hash: &FieldElement,
    signature: &Signature,
    public_key: &FieldElement,
) -> Result<bool, &'static str> {
    let bound = two_pow_251();
    let order = ec_order();
    let r = signature.r.to_biguint();
    let s = signature.s.to_biguint();
    if &message_hash.to_biguint() >= bound {
        return Err("message hash out of range");
    }
    if r.is_zero() || &r >= bound {
        return Err("r out of range");
    }
    if s.is_zero() || &s >= bound {
        return Err("s out of range");
    }
    let q = AffinePoint::from_x(*public_key).ok_or("public key is not on the curve")?;

    // N is prime, so s^(N-2) is the inverse of s.
    let w = s.modpow(&(order - BigUint::from(2u8)), order);
    if w.is_zero() || &w >= bound {
        return Err("inverse of s out of range");
    }
    let u1 = (message_hash.to_biguint() * &w) % order;
    let u2 = (&r * &w) % order;

    let u1_g = AffinePoint::generator().multiply(&u1);
    let u2_q = q.multiply(&u2);
    Ok([u1_g.add(&u2_q), u1_g.add(&u2_q.negate())]
        .iter()
        .any(|point| !point.infinity && point.x == signature.r))
}

fn check_private_key(private_key: &FieldElement) -> SignerResult<()> {
    if private_key.is_zero() || &private_key.to_biguint() >= ec_order() {
        return Err(ErrorCode::E402_InvalidPrivateKey);
    }
    Ok(())
}

fn check_nonce(k: &FieldElement) -> SignerResult<()> {
    if k.is_zero() || &k.to_biguint() >= ec_order() {
        return Err(ErrorCode::E405_InvalidNonce(k.to_hex()));
    }
    Ok(())
}

fn check_message_hash(message_hash: &FieldElement) -> SignerResult<()> {
    // 2^251 is the first value with bit 3 of the top byte set.
    if message_hash.to_bytes_be()[0] >= 0x08 {
        return Err(ErrorCode::E403_MessageHashOutOfRange(message_hash.to_hex()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fe(hex: &str) -> FieldElement {
        FieldElement::from_hex(hex).unwrap()
    }

    const KEY: &str = "0x2dccce1da22003777062ee0870e9881b460a8b7eca276870f57c601f182136c";
    const HASH: &str = "0x214c361ad7bf045ddda2b4bf49757bc85ddc6bc2a207eccb275a15dcf354e58";

    #[test]
    fn test_public_key() {
        assert_eq!(
            public_key(&fe(KEY)).unwrap().to_hex(),
            "0x499f65ae2f71d5298d2d88823b2e5e19596a71aac1984710479e406a002439"
        );
        assert_eq!(public_key(&FieldElement::ZERO), Err(ErrorCode::E402_InvalidPrivateKey));
        let order = FieldElement::reduce(ec_order());
        assert_eq!(public_key(&order), Err(ErrorCode::E402_InvalidPrivateKey));
    }

    #[test]
    fn test_fixed_nonce_vector() {
        let nonce = NonceStrategy::Fixed { k: FieldElement::from_u64(32) };
        let signature = sign(&fe(HASH), &fe(KEY), &nonce).unwrap();
        assert_eq!(
            signature.r.to_hex(),
            "0x45f571e26cc38d3e6fdce1b659350f93e272cac9834b78eb8681f7ef89239aa"
        );
        assert_eq!(
            signature.s.to_hex(),
            "0x1778b60356888358101074db930aa083b87c93a36c6d931fb6ebbfb492ab3ae"
        );
    }

    #[test]
    fn test_fixed_nonce_out_of_range() {
        let order = FieldElement::reduce(ec_order());
        for k in [FieldElement::ZERO, order, order + FieldElement::ONE] {
            assert_eq!(
                sign(&fe(HASH), &fe(KEY), &NonceStrategy::Fixed { k }),
                Err(ErrorCode::E405_InvalidNonce(k.to_hex()))
            );
        }
    }

    #[test]
    fn test_sign_verify_roundtrip() {
        let key = fe(KEY);
        let hash = fe(HASH);
        let pubkey = public_key(&key).unwrap();
        let signature = sign(&hash, &key, &NonceStrategy::default()).unwrap();
        assert!(verify(&hash, &signature, &pubkey));
        assert_eq!(signature, sign(&hash, &key, &NonceStrategy::default()).unwrap());

        let other = hash + FieldElement::ONE;
        assert!(!verify(&other, &signature, &pubkey));
        let tampered = Signature {
            r: signature.r,
            s: signature.s + FieldElement::ONE,
        };
        assert!(!verify(&hash, &tampered, &pubkey));
    }

    #[test]
    fn test_malformed_signature_is_false() {
        let key = fe(KEY);
        let pubkey = public_key(&key).unwrap();
        let zero = Signature {
            r: FieldElement::ZERO,
            s: FieldElement::ZERO,
        };
        assert!(!verify(&fe(HASH), &zero, &pubkey));
    }

    #[test]
    fn test_identity_combination_is_false() {
        // u1 = u2 = 1, so u1·G - u2·Q is the identity when Q = ±G.
        let generator = AffinePoint::generator().x;
        let ones = Signature {
            r: FieldElement::ONE,
            s: FieldElement::ONE,
        };
        assert!(!verify(&FieldElement::ONE, &ones, &generator));
    }

    #[test]
    fn test_hash_out_of_range() {
        let big = fe("0x800000000000000000000000000000000000000000000000000000000000000");
        assert!(matches!(
            sign(&big, &fe(KEY), &NonceStrategy::default()),
            Err(ErrorCode::E403_MessageHashOutOfRange(_))
        ));
    }

    #[test]
    fn test_header_value() {
        let signature = Signature::from_hex_pair("0x1", "0xab").unwrap();
        assert_eq!(signature.header_value(), r#"["0x1","0xab"]"#);
        let json = serde_json::to_string(&signature).unwrap();
        assert_eq!(json, r#"{"r":"0x1","s":"0xab"}"#);
    }
}
