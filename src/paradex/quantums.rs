//! Fixed-point scaling between decimal strings and integer quantums.

use crate::error::{ErrorCode, SignerResult};
use crate::field::FieldElement;
use num_bigint::{BigInt, Sign};

/// Decimals used for order sizes, prices and balances.
pub const QUANTUM_DECIMALS: u32 = 8;

/// Scale a non-negative decimal string: `to_quantums("3309.33", 8) == "330933000000"`.
///
/// Fails when the value is negative, malformed, or more precise than `decimals`.
pub fn to_quantums(value: &str, decimals: u32) -> SignerResult<String> {
    let invalid = || ErrorCode::E404_InvalidQuantity(value.to_string());
    let (whole, fraction) = value.split_once('.').unwrap_or((value, ""));
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction) {
        return Err(invalid());
    }
    let fraction = fraction.trim_end_matches('0');
    if fraction.len() > decimals as usize {
        return Err(invalid());
    }
    let mut digits = String::with_capacity(whole.len() + decimals as usize);
    digits.push_str(whole);
    digits.push_str(fraction);
    digits.extend(std::iter::repeat('0').take(decimals as usize - fraction.len()));
    let trimmed = digits.trim_start_matches('0');
    Ok(if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    })
}

/// Render a signed quantum amount as a decimal string without trailing zeros.
pub fn from_quantums(value: &BigInt, decimals: u32) -> String {
    let (sign, magnitude) = (value.sign(), value.magnitude().to_string());
    let width = decimals as usize;
    let padded = format!("{:0>w$}", magnitude, w = width + 1);
    let (whole, fraction) = padded.split_at(padded.len() - width);
    let fraction = fraction.trim_end_matches('0');
    let prefix = if sign == Sign::Minus { "-" } else { "" };
    if fraction.is_empty() {
        format!("{}{}", prefix, whole)
    } else {
        format!("{}{}.{}", prefix, whole, fraction)
    }
}

/// Decode an on-chain balance stored as a field element (negative values wrap).
pub fn decode_signed_quantums(value: &FieldElement, decimals: u32) -> String {
    from_quantums(&value.to_signed(), decimals)
}
