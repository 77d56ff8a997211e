//! Deterministic Stark key derivation from an L1 signature.
//!
//! A 256-bit seed is stretched into a key below the curve order by hashing
//! `seed ++ index` with SHA-256 and rejecting candidates in the final partial
//! window of `[0, 2^256)`, so the reduction modulo the order carries no bias.
//!
//! Integers are serialized as their minimal big-endian bytes (at least one
//! byte, so zero is `0x00`).

use crate::error::{ErrorCode, SignerResult};
use crate::field::{ec_order, two_pow_256, FieldElement};
use num_bigint::BigUint;
use num_traits::One;
use sha2::{Digest, Sha256};

/// Hex digits of the `r` component taken as the grinding seed.
pub const L1_SEED_HEX_LEN: usize = 64;

/// Map `seed` uniformly into `[0, limit)`.
///
/// `limit` must lie in `[2, 2^256]`.
pub fn grind_key(seed: &BigUint, limit: &BigUint) -> SignerResult<BigUint> {
    if limit <= &BigUint::one() || limit > two_pow_256() {
        return Err(ErrorCode::E400_InvalidModulus(limit.to_string()));
    }
    let bound = two_pow_256();
    let threshold = bound - (bound % limit);
    let seed_bytes = minimal_bytes(seed);

    for index in 0u64.. {
        let mut hasher = Sha256::new();
        hasher.update(&seed_bytes);
        hasher.update(minimal_bytes(&BigUint::from(index)));
        let candidate = BigUint::from_bytes_be(&hasher.finalize());
        if candidate < threshold {
            if index > 0 {
                tracing::debug!(retries = index, "grinding rejected biased candidates");
            }
            return Ok(candidate % limit);
        }
    }
    Err(ErrorCode::E900_InternalError(
        "grinding index space exhausted".to_string(),
    ))
}

/// Extract the grinding seed (the first 32 bytes) from a hex L1 signature.
pub fn seed_from_l1_signature(signature: &str) -> SignerResult<BigUint> {
    let digits = signature.strip_prefix("0x").unwrap_or(signature);
    if digits.len() < L1_SEED_HEX_LEN {
        return Err(ErrorCode::E401_InvalidL1Signature(format!(
            "expected at least {} hex digits, got {}",
            L1_SEED_HEX_LEN,
            digits.len()
        )));
    }
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ErrorCode::E100_InvalidHex(signature.to_string()));
    }
    let seed = hex::decode(&digits[..L1_SEED_HEX_LEN])
        .map_err(|_| ErrorCode::E100_InvalidHex(signature.to_string()))?;
    Ok(BigUint::from_bytes_be(&seed))
}

/// Derive a Stark private key from an L1 signature.
pub fn derive_key(l1_signature: &str) -> SignerResult<FieldElement> {
    let seed = seed_from_l1_signature(l1_signature)?;
    let key = grind_key(&seed, ec_order())?;
    tracing::debug!("derived stark key from l1 signature");
    Ok(FieldElement::reduce(&key))
}

/// Derive a Stark private key and render it as 0x-hex.
pub fn derive_key_hex(l1_signature: &str) -> SignerResult<String> {
    derive_key(l1_signature).map(|key| key.to_hex())
}

fn minimal_bytes(value: &BigUint) -> Vec<u8> {
    value.to_bytes_be()
}
