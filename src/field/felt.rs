//! Stark field element.
//!
//! Wraps `starknet_crypto::Felt`. Every constructor reduces into `[0, P)`, so
//! a `FieldElement` is always canonical.

use super::{field_prime, half_prime, two_pow_256, SHORT_STRING_MAX_LEN};
use crate::error::{ErrorCode, SignerResult};
use num_bigint::{BigInt, BigUint};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use starknet_crypto::Felt;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// An element of the Stark field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldElement(Felt);

impl FieldElement {
    /// The additive identity (zero).
    pub const ZERO: FieldElement = FieldElement(Felt::ZERO);

    /// The multiplicative identity (one).
    pub const ONE: FieldElement = FieldElement(Felt::ONE);

    /// Create a field element from a u64 value.
    pub fn from_u64(val: u64) -> FieldElement {
        FieldElement(Felt::from(val))
    }

    /// Create a field element from a signed value; negatives wrap to `P - |val|`.
    pub fn from_i64(val: i64) -> FieldElement {
        let magnitude = FieldElement::from_u64(val.unsigned_abs());
        if val < 0 {
            -magnitude
        } else {
            magnitude
        }
    }

    /// Reduce an arbitrary non-negative integer modulo `P`.
    pub fn reduce(value: &BigUint) -> FieldElement {
        let reduced = value % field_prime();
        FieldElement(Felt::from_bytes_be(&to_word(&reduced)))
    }

    /// Interpret 32 big-endian bytes as an integer and reduce it modulo `P`.
    pub fn from_bytes_be(bytes: &[u8; 32]) -> FieldElement {
        Self::reduce(&BigUint::from_bytes_be(bytes))
    }

    /// Canonical 32-byte big-endian representation.
    pub fn to_bytes_be(&self) -> [u8; 32] {
        self.0.to_bytes_be()
    }

    /// Parse a hex string, with or without a `0x` prefix.
    ///
    /// Values at or above `P` are reduced; values of 2^256 or more are rejected.
    pub fn from_hex(value: &str) -> SignerResult<FieldElement> {
        let digits = value
            .strip_prefix("0x")
            .or_else(|| value.strip_prefix("0X"))
            .unwrap_or(value);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ErrorCode::E100_InvalidHex(value.to_string()));
        }
        let parsed = BigUint::parse_bytes(digits.as_bytes(), 16)
            .ok_or_else(|| ErrorCode::E100_InvalidHex(value.to_string()))?;
        Self::from_bounded(parsed, value)
    }

    /// Parse a non-empty string of ASCII decimal digits.
    pub fn from_decimal(value: &str) -> SignerResult<FieldElement> {
        if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ErrorCode::E102_InvalidDecimal(value.to_string()));
        }
        let parsed = BigUint::parse_bytes(value.as_bytes(), 10)
            .ok_or_else(|| ErrorCode::E102_InvalidDecimal(value.to_string()))?;
        Self::from_bounded(parsed, value)
    }

    /// Parse `0x…` as hex and anything else as decimal.
    pub fn from_hex_or_decimal(value: &str) -> SignerResult<FieldElement> {
        if value.starts_with("0x") {
            Self::from_hex(value)
        } else {
            Self::from_decimal(value)
        }
    }

    /// Pack an ASCII string of at most 31 bytes big-endian into one element.
    ///
    /// The empty string encodes to zero.
    pub fn from_short_string(value: &str) -> SignerResult<FieldElement> {
        if !value.is_ascii() {
            return Err(ErrorCode::E201_NonAsciiShortString(value.to_string()));
        }
        if value.len() > SHORT_STRING_MAX_LEN {
            return Err(ErrorCode::E200_ShortStringTooLong(value.len() as u64));
        }
        Ok(Self::reduce(&BigUint::from_bytes_be(value.as_bytes())))
    }

    /// Decode a user-supplied value: hex, decimal numeral, or short string.
    pub fn parse_value(value: &str) -> SignerResult<FieldElement> {
        if value.starts_with("0x") {
            Self::from_hex(value)
        } else if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
            Self::from_decimal(value)
        } else {
            Self::from_short_string(value)
        }
    }

    /// Unpack a short string, if every non-zero byte is printable ASCII.
    pub fn decode_short_string(&self) -> Option<String> {
        let bytes = self.to_bytes_be();
        let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
        let packed = &bytes[start..];
        if packed.len() > SHORT_STRING_MAX_LEN || !packed.iter().all(|b| (0x20..0x7f).contains(b)) {
            return None;
        }
        Some(packed.iter().map(|b| char::from(*b)).collect())
    }

    /// The value as an arbitrary-precision integer in `[0, P)`.
    pub fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_be(&self.to_bytes_be())
    }

    /// Interpret the element as a signed integer: `x` below `⌊P/2⌋`, else `x - P`.
    ///
    /// Only used for decoding on-chain quantities, never for hashing.
    pub fn to_signed(&self) -> BigInt {
        let value = self.to_biguint();
        if &value < half_prime() {
            BigInt::from(value)
        } else {
            BigInt::from(value) - BigInt::from(field_prime().clone())
        }
    }

    /// Minimal lowercase hex with a `0x` prefix (`0x0` for zero).
    pub fn to_hex(&self) -> String {
        format!("{:#x}", self.to_biguint())
    }

    /// 64-digit zero-padded lowercase hex with a `0x` prefix.
    pub fn to_fixed_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes_be()))
    }

    /// Decimal representation.
    pub fn to_decimal(&self) -> String {
        self.to_biguint().to_string()
    }

    /// Whether this is the zero element.
    pub fn is_zero(&self) -> bool {
        self.0 == Felt::ZERO
    }

    /// Square the field element.
    pub fn square(&self) -> FieldElement {
        FieldElement(self.0 * self.0)
    }

    /// Double the field element.
    pub fn double(&self) -> FieldElement {
        FieldElement(self.0 + self.0)
    }

    /// Multiplicative inverse, or `None` for zero.
    pub fn inverse(&self) -> Option<FieldElement> {
        self.0.inverse().map(FieldElement)
    }

    /// A square root, if one exists.
    pub fn sqrt(&self) -> Option<FieldElement> {
        self.0.sqrt().map(FieldElement)
    }

    /// Get the underlying felt.
    pub fn inner(&self) -> &Felt {
        &self.0
    }

    fn from_bounded(value: BigUint, original: &str) -> SignerResult<FieldElement> {
        if &value >= two_pow_256() {
            return Err(ErrorCode::E103_ValueTooLarge(original.to_string()));
        }
        Ok(Self::reduce(&value))
    }
}

/// Left-pad a value below 2^256 into a 32-byte big-endian word.
fn to_word(value: &BigUint) -> [u8; 32] {
    let raw = value.to_bytes_be();
    let mut out = [0u8; 32];
    let start = 32usize.saturating_sub(raw.len());
    let skip = raw.len().saturating_sub(32);
    out[start..].copy_from_slice(&raw[skip..]);
    out
}

impl Default for FieldElement {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<u64> for FieldElement {
    fn from(val: u64) -> Self {
        FieldElement::from_u64(val)
    }
}

impl From<Felt> for FieldElement {
    fn from(val: Felt) -> Self {
        FieldElement(val)
    }
}

impl From<FieldElement> for Felt {
    fn from(val: FieldElement) -> Self {
        val.0
    }
}

impl Add for FieldElement {
    type Output = FieldElement;
    fn add(self, rhs: FieldElement) -> FieldElement {
        FieldElement(self.0 + rhs.0)
    }
}

impl Sub for FieldElement {
    type Output = FieldElement;
    fn sub(self, rhs: FieldElement) -> FieldElement {
        FieldElement(self.0 - rhs.0)
    }
}

impl Mul for FieldElement {
    type Output = FieldElement;
    fn mul(self, rhs: FieldElement) -> FieldElement {
        FieldElement(self.0 * rhs.0)
    }
}

impl Neg for FieldElement {
    type Output = FieldElement;
    fn neg(self) -> FieldElement {
        FieldElement(-self.0)
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

impl fmt::LowerHex for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.to_biguint(), f)
    }
}

impl Serialize for FieldElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for FieldElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        FieldElement::from_hex_or_decimal(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FIELD_PRIME_HEX;

    fn p_minus(k: u64) -> FieldElement {
        FieldElement::ZERO - FieldElement::from_u64(k)
    }

    #[test]
    fn test_zero_one() {
        assert_eq!(FieldElement::ZERO.to_hex(), "0x0");
        assert_eq!(FieldElement::ONE.to_hex(), "0x1");
        assert_eq!(
            FieldElement::ONE.to_fixed_hex(),
            "0x0000000000000000000000000000000000000000000000000000000000000001"
        );
    }

    #[test]
    fn test_reduce_wraps_prime() {
        let prime = FieldElement::from_hex(FIELD_PRIME_HEX).unwrap();
        assert_eq!(prime, FieldElement::ZERO);
        let prime_plus_five = field_prime() + BigUint::from(5u8);
        assert_eq!(
            FieldElement::reduce(&prime_plus_five),
            FieldElement::from_u64(5)
        );
    }

    #[test]
    fn test_from_i64_wraps() {
        assert_eq!(FieldElement::from_i64(-1), p_minus(1));
        assert_eq!(FieldElement::from_i64(7), FieldElement::from_u64(7));
    }

    #[test]
    fn test_to_signed() {
        assert_eq!(p_minus(1).to_signed(), BigInt::from(-1));
        assert_eq!(FieldElement::from_u64(42).to_signed(), BigInt::from(42));
        let half = FieldElement::reduce(half_prime());
        assert!(half.to_signed() < BigInt::from(0));
        let below = half - FieldElement::ONE;
        assert!(below.to_signed() > BigInt::from(0));
    }

    #[test]
    fn test_short_string() {
        let packed = FieldElement::from_short_string("StarkNet Message").unwrap();
        assert_eq!(packed.to_decimal(), "110930206544689809660069706067448260453");
        assert_eq!(packed.decode_short_string().as_deref(), Some("StarkNet Message"));
        assert_eq!(FieldElement::from_short_string("").unwrap(), FieldElement::ZERO);
    }

    #[test]
    fn test_short_string_limits() {
        let max = "a".repeat(31);
        assert!(FieldElement::from_short_string(&max).is_ok());
        assert_eq!(
            FieldElement::from_short_string(&"a".repeat(32)),
            Err(ErrorCode::E200_ShortStringTooLong(32))
        );
        assert!(matches!(
            FieldElement::from_short_string("héllo"),
            Err(ErrorCode::E201_NonAsciiShortString(_))
        ));
    }

    #[test]
    fn test_parse_value_dispatch() {
        assert_eq!(
            FieldElement::parse_value("0x10").unwrap(),
            FieldElement::from_u64(16)
        );
        assert_eq!(
            FieldElement::parse_value("10").unwrap(),
            FieldElement::from_u64(10)
        );
        assert_eq!(
            FieldElement::parse_value("A").unwrap(),
            FieldElement::from_u64(0x41)
        );
        assert_eq!(FieldElement::parse_value("").unwrap(), FieldElement::ZERO);
        assert!(matches!(
            FieldElement::parse_value("0xZZ"),
            Err(ErrorCode::E100_InvalidHex(_))
        ));
    }

    #[test]
    fn test_oversized_hex_rejected() {
        let too_big = format!("0x1{}", "0".repeat(64));
        assert!(matches!(
            FieldElement::from_hex(&too_big),
            Err(ErrorCode::E103_ValueTooLarge(_))
        ));
    }

    #[test]
    fn test_arithmetic() {
        let a = FieldElement::from_u64(100);
        let b = FieldElement::from_u64(200);
        assert_eq!(a + b, FieldElement::from_u64(300));
        assert_eq!(FieldElement::from_u64(7) * FieldElement::from_u64(11), FieldElement::from_u64(77));
        let inv = FieldElement::from_u64(3).inverse().unwrap();
        assert_eq!(inv * FieldElement::from_u64(3), FieldElement::ONE);
        assert!(FieldElement::ZERO.inverse().is_none());
        let root = FieldElement::from_u64(49).sqrt().unwrap();
        assert_eq!(root.square(), FieldElement::from_u64(49));
    }

    #[test]
    fn test_serde_hex() {
        let value = FieldElement::from_u64(255);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, "\"0xff\"");
        let back: FieldElement = serde_json::from_str("\"255\"").unwrap();
        assert_eq!(back, value);
    }
}
