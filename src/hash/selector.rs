//! Starknet keccak: Keccak-256 truncated to 250 bits.

use crate::field::FieldElement;
use sha3::{Digest, Keccak256};

/// Keccak-256 of `data` with the top six bits cleared.
pub fn starknet_keccak(data: &[u8]) -> FieldElement {
    let mut word: [u8; 32] = Keccak256::digest(data).into();
    word[0] &= 0x03;
    FieldElement::from_bytes_be(&word)
}

/// Entry-point selector for a function name.
pub fn selector_from_name(name: &str) -> FieldElement {
    match name {
        "__default__" | "__l1_default__" => FieldElement::ZERO,
        _ => starknet_keccak(name.as_bytes()),
    }
}
