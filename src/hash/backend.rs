//! Pluggable Pedersen compression.
//!
//! The backend is chosen once, from configuration, and then shared by every
//! hashing call of a signer.

use super::curve::AffinePoint;
use super::{FIELD_BITS, PEDERSEN_LOW_BITS, PEDERSEN_POINTS_HEX};
use crate::error::{ErrorCode, SignerResult};
use crate::field::FieldElement;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Two-to-one compression into the Stark field.
pub trait HashBackend: Send + Sync {
    /// Compress two field elements into one.
    fn compress(&self, left: &FieldElement, right: &FieldElement) -> FieldElement;

    /// Short name used in logs and diagnostics.
    fn name(&self) -> &'static str;
}

/// Pedersen through the precomputed lookup tables of `starknet-crypto`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TablePedersen;

impl HashBackend for TablePedersen {
    fn compress(&self, left: &FieldElement, right: &FieldElement) -> FieldElement {
        FieldElement::from(starknet_crypto::pedersen_hash(left.inner(), right.inner()))
    }

    fn name(&self) -> &'static str {
        "table"
    }
}

/// Pedersen evaluated directly from the constant points.
///
/// Slower than [`TablePedersen`], with no dependency on precomputed tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferencePedersen;

/// Lazy-initialized doubling tables: `table[j] = P·2^j`.
struct ParsedConstants {
    shift: AffinePoint,
    a_low: Vec<AffinePoint>,
    a_high: Vec<AffinePoint>,
    b_low: Vec<AffinePoint>,
    b_high: Vec<AffinePoint>,
}

impl ParsedConstants {
    fn new() -> Self {
        let points: Vec<AffinePoint> = PEDERSEN_POINTS_HEX
            .iter()
            .map(|coords| AffinePoint::from_hex(coords).unwrap_or(AffinePoint::IDENTITY))
            .collect();
        let point = |i: usize| points.get(i).copied().unwrap_or(AffinePoint::IDENTITY);
        let high_bits = FIELD_BITS - PEDERSEN_LOW_BITS;

        Self {
            shift: point(0),
            a_low: doublings(point(1), PEDERSEN_LOW_BITS),
            a_high: doublings(point(2), high_bits),
            b_low: doublings(point(3), PEDERSEN_LOW_BITS),
            b_high: doublings(point(4), high_bits),
        }
    }
}

fn doublings(base: AffinePoint, count: usize) -> Vec<AffinePoint> {
    let mut table = Vec::with_capacity(count);
    let mut current = base;
    for _ in 0..count {
        table.push(current);
        current = current.double();
    }
    table
}

/// Get parsed constants (lazily initialized).
fn get_constants() -> &'static ParsedConstants {
    static CONSTANTS: OnceLock<ParsedConstants> = OnceLock::new();
    CONSTANTS.get_or_init(ParsedConstants::new)
}

/// Add `value_low·low[0] + value_high·high[0]` into `acc`, bit by bit.
fn accumulate(
    mut acc: AffinePoint,
    value: &FieldElement,
    low: &[AffinePoint],
    high: &[AffinePoint],
) -> AffinePoint {
    let bytes = value.to_bytes_be();
    for bit in 0..FIELD_BITS {
        let byte = bytes[31 - bit / 8];
        if (byte >> (bit % 8)) & 1 == 0 {
            continue;
        }
        let term = if bit < PEDERSEN_LOW_BITS {
            low.get(bit)
        } else {
            high.get(bit - PEDERSEN_LOW_BITS)
        };
        if let Some(term) = term {
            acc = acc.add(term);
        }
    }
    acc
}

impl HashBackend for ReferencePedersen {
    fn compress(&self, left: &FieldElement, right: &FieldElement) -> FieldElement {
        let constants = get_constants();
        let acc = accumulate(constants.shift, left, &constants.a_low, &constants.a_high);
        let acc = accumulate(acc, right, &constants.b_low, &constants.b_high);
        acc.x
    }

    fn name(&self) -> &'static str {
        "reference"
    }
}

/// Which [`HashBackend`] a signer uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashBackendKind {
    /// [`TablePedersen`]
    #[default]
    Table,
    /// [`ReferencePedersen`]
    Reference,
}

impl HashBackendKind {
    /// Instantiate the backend.
    pub fn build(&self) -> Box<dyn HashBackend> {
        match self {
            HashBackendKind::Table => Box::new(TablePedersen),
            HashBackendKind::Reference => Box::new(ReferencePedersen),
        }
    }

    /// Configuration name of the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            HashBackendKind::Table => "table",
            HashBackendKind::Reference => "reference",
        }
    }
}

impl FromStr for HashBackendKind {
    type Err = ErrorCode;

    fn from_str(s: &str) -> SignerResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(HashBackendKind::Table),
            "reference" => Ok(HashBackendKind::Reference),
            other => Err(ErrorCode::E600_InvalidConfig(
                "hash_backend".to_string(),
                format!("unknown backend '{}'", other),
            )),
        }
    }
}

impl fmt::Display for HashBackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
