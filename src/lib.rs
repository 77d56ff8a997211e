//! Paradex Signer - Starknet typed-data hashing and Stark-curve signing.
//!
//! This crate computes the message hashes Paradex expects for onboarding,
//! authentication and orders, derives Stark keys from L1 signatures and
//! produces deterministic ECDSA signatures over them.
//!
//! # Architecture
//!
//! - [`field`] - Stark field elements and value decoding (hex, decimal, short strings)
//! - [`hash`] - Pedersen compression, chain hashing and Starknet Keccak selectors
//! - [`typed_data`] - Type graph resolution and structured message hashing
//! - [`derivation`] - Key grinding from L1 signatures
//! - [`ecdsa`] - Stark ECDSA with deterministic nonces
//! - [`paradex`] - Exchange message presets, quantums and account addresses
//! - [`config`] / [`signer`] - Configuration and the [`Signer`] facade
//! - [`conformance`] - Known-answer corpus runner and backend differential testing
//! - [`error`] - Numbered error codes
//!
//! # Example
//!
//! ```
//! use paradex_signer::{FieldElement, Signer};
//! use paradex_signer::paradex::onboarding_message;
//!
//! let signer = Signer::default();
//! let message = onboarding_message("PRIVATE_SN_POTC_SEPOLIA").unwrap();
//! let account = FieldElement::from_hex("0x1234").unwrap();
//! let hash = signer.message_hash(&message, &account).unwrap();
//! assert!(!hash.is_zero());
//! ```

// Signing code must avoid unwrap/expect/panic in library code.
// Tests are checked separately with `cargo test`.
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(missing_docs)]

pub mod config;
pub mod conformance;
pub mod derivation;
pub mod ecdsa;
pub mod error;
pub mod field;
pub mod hash;
pub mod paradex;
pub mod signer;
pub mod typed_data;

// Re-export commonly used types
pub use config::SignerConfig;
pub use conformance::{DiffResult, DiffTestHarness};
pub use ecdsa::{NonceStrategy, Signature};
pub use error::{ErrorCode, ErrorKind, SignerResult};
pub use field::FieldElement;
pub use hash::{HashBackend, HashBackendKind};
pub use signer::Signer;
pub use typed_data::{Limits, TypedMessage};
