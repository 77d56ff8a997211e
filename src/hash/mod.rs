//! Pedersen hash chain and Keccak-derived selectors.
//!
//! The two-to-one compression function is the Starknet Pedersen hash:
//!
//! ```text
//! H(a, b) = [P0 + a_low·P1 + a_high·P2 + b_low·P3 + b_high·P4].x
//! ```
//!
//! where `_low` is the low 248 bits and `_high` the remaining top bits of
//! each input. Sequences are hashed with [`chain_hash`], which folds the
//! elements from an accumulator of zero and finally absorbs the length.
//!
//! Compression is pluggable through [`HashBackend`]: [`TablePedersen`]
//! delegates to the precomputed tables of `starknet-crypto`, while
//! [`ReferencePedersen`] evaluates the formula above with plain affine
//! arithmetic. Both produce identical outputs.

mod backend;
mod chain;
mod curve;
mod selector;

pub use backend::{HashBackend, HashBackendKind, ReferencePedersen, TablePedersen};
pub use chain::{chain_hash, ChainState};
pub use curve::AffinePoint;
pub use selector::{selector_from_name, starknet_keccak};

/// Curve coefficient `α` of `y² = x³ + α·x + β`.
pub const CURVE_ALPHA: u64 = 1;

/// Curve coefficient `β`.
pub const CURVE_BETA_HEX: &str =
    "0x6f21413efbe40de150e596d72f7a8c5609ad26c15c915c1f4cdfcb99cee9e89";

/// Generator point `G` as `(x, y)` hex.
pub const GENERATOR_HEX: [&str; 2] = [
    "0x1ef15c18599971b7beced415a40f0c7deacfd9b0d1819e03d723d8bc943cfca",
    "0x5668060aa49730b7be4801df46ec62de53ecd11abe43a32873000c36e8dc1f",
];

/// Pedersen constant points `P0..P4` as `(x, y)` hex.
pub const PEDERSEN_POINTS_HEX: [[&str; 2]; 5] = [
    [
        "0x49ee3eba8c1600700ee1b87eb599f16716b0b1022947733551fde4050ca6804",
        "0x3ca0cfe4b3bc6ddf346d49d06ea0ed34e621062c0e056c1d0405d266e10268a",
    ],
    [
        "0x234287dcbaffe7f969c748655fca9e58fa8120b6d56eb0c1080d17957ebe47b",
        "0x3b056f100f96fb21e889527d41f4e39940135dd7a6c94cc6ed0268ee89e5615",
    ],
    [
        "0x4fa56f376c83db33f9dab2656558f3399099ec1de5e3018b7a6932dba8aa378",
        "0x3fa0984c931c9e38113e0c0e47e4401562761f92a7a23b45168f4e80ff5b54d",
    ],
    [
        "0x4ba4cc166be8dec764910f75b45f74b40c690c74709e90f3aa372f0bd2d6997",
        "0x40301cf5c1751f4b971e46c4ede85fcac5c59a5ce5ae7c48151f27b24b219c",
    ],
    [
        "0x54302dcb0e6cc1c6e44cca8f61a63bb2ca65048d53fb325d36ff12c49a58202",
        "0x1b77b3e37d13504b348046268d8ae25ce98ad783c25561a879dcc77e99c2426",
    ],
];

/// Number of low bits taken from each input by the Pedersen hash.
pub const PEDERSEN_LOW_BITS: usize = 248;

/// Number of bits in a canonical field element.
pub const FIELD_BITS: usize = 252;
