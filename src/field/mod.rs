//! Stark field (`P = 2^251 + 17·2^192 + 1`) element type and constants.
//!
//! [`FieldElement`] is the unit every other module works in: hash inputs and
//! outputs, encoded message values, keys and signature components.
//!
//! Textual inputs are decoded with [`FieldElement::parse_value`]:
//!
//! - `0x`-prefixed strings are hexadecimal
//! - non-empty all-digit strings are decimal
//! - anything else is a short string of at most [`SHORT_STRING_MAX_LEN`]
//!   ASCII bytes packed big-endian
//!
//! Integer inputs at or above `P` are reduced; inputs of 2^256 or more are rejected.

mod felt;

pub use felt::FieldElement;

use num_bigint::BigUint;
use num_traits::One;
use std::sync::OnceLock;

/// Field prime as 0x-prefixed hex.
pub const FIELD_PRIME_HEX: &str =
    "0x800000000000011000000000000000000000000000000000000000000000001";

/// Stark curve group order `N` as 0x-prefixed hex.
pub const EC_ORDER_HEX: &str = "0x800000000000010ffffffffffffffffb781126dcae7b2321e66a241adc64d2f";

/// Stark curve group order `N`, big-endian bytes.
pub const EC_ORDER_BYTES: [u8; 32] = [
    0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x10, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xb7, 0x81, 0x12, 0x6d, 0xca, 0xe7, 0xb2, 0x32, 0x1e, 0x66, 0xa2, 0x41, 0xad, 0xc6, 0x4d, 0x2f,
];

/// Longest string that packs into one field element.
pub const SHORT_STRING_MAX_LEN: usize = 31;

/// The field prime `P`.
pub fn field_prime() -> &'static BigUint {
    static PRIME: OnceLock<BigUint> = OnceLock::new();
    PRIME.get_or_init(|| {
        (BigUint::one() << 251u32) + (BigUint::from(17u8) << 192u32) + BigUint::one()
    })
}

/// `⌊P / 2⌋`, the boundary used by [`FieldElement::to_signed`].
pub fn half_prime() -> &'static BigUint {
    static HALF: OnceLock<BigUint> = OnceLock::new();
    HALF.get_or_init(|| field_prime() >> 1u32)
}

/// The curve order `N`.
pub fn ec_order() -> &'static BigUint {
    static ORDER: OnceLock<BigUint> = OnceLock::new();
    ORDER.get_or_init(|| BigUint::from_bytes_be(&EC_ORDER_BYTES))
}

/// `2^251`, the exclusive bound on message hashes and signature components.
pub fn two_pow_251() -> &'static BigUint {
    static BOUND: OnceLock<BigUint> = OnceLock::new();
    BOUND.get_or_init(|| BigUint::one() << 251u32)
}

/// `2^256`, the exclusive bound on raw integer inputs.
pub fn two_pow_256() -> &'static BigUint {
    static BOUND: OnceLock<BigUint> = OnceLock::new();
    BOUND.get_or_init(|| BigUint::one() << 256u32)
}
