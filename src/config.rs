//! Signer configuration.
//!
//! A [`SignerConfig`] is loaded once (JSON file or environment) and fixes the
//! hash backend, the nonce strategy and the typed-message limits for the
//! lifetime of a [`crate::Signer`].
//!
//! ```json
//! {
//!   "hash_backend": "table",
//!   "nonce": { "strategy": "rfc6979" },
//!   "limits": { "max_array_length": 10000 }
//! }
//! ```

use crate::ecdsa::NonceStrategy;
use crate::error::{ErrorCode, SignerResult};
use crate::field::{ec_order, FieldElement};
use crate::hash::HashBackendKind;
use crate::typed_data::Limits;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Selects the hash backend (`table` or `reference`).
pub const ENV_HASH_BACKEND: &str = "SIGNER_HASH_BACKEND";
/// Selects the nonce strategy (`rfc6979` or `fixed`).
pub const ENV_NONCE: &str = "SIGNER_NONCE";
/// Optional extra seed for RFC 6979 (hex or decimal).
pub const ENV_NONCE_SEED: &str = "SIGNER_NONCE_SEED";
/// The nonce for the `fixed` strategy (hex or decimal).
pub const ENV_FIXED_K: &str = "SIGNER_FIXED_K";

/// Everything a signer is configured with.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SignerConfig {
    /// Pedersen implementation
    pub hash_backend: HashBackendKind,
    /// Nonce selection for signing
    pub nonce: NonceStrategy,
    /// Bounds on typed messages
    pub limits: Limits,
}

impl SignerConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> SignerResult<Self> {
        let config: SignerConfig = serde_json::from_str(json)
            .map_err(|e| ErrorCode::E600_InvalidConfig("config".to_string(), e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_file(path: &Path) -> SignerResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ErrorCode::E601_ConfigIo(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&raw)
    }

    /// Build from the process environment.
    pub fn from_env() -> SignerResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment, in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> SignerResult<Self> {
        let mut config = SignerConfig::default();

        if let Some(backend) = lookup(ENV_HASH_BACKEND) {
            config.hash_backend = backend.parse()?;
        }

        let strategy = lookup(ENV_NONCE).unwrap_or_else(|| "rfc6979".to_string());
        config.nonce = match strategy.trim().to_ascii_lowercase().as_str() {
            "rfc6979" => NonceStrategy::Rfc6979 {
                seed: lookup(ENV_NONCE_SEED)
                    .map(|seed| parse_env_felt(ENV_NONCE_SEED, &seed))
                    .transpose()?,
            },
            "fixed" => {
                let k = lookup(ENV_FIXED_K).ok_or_else(|| {
                    ErrorCode::E600_InvalidConfig(
                        ENV_FIXED_K.to_string(),
                        "required by the fixed nonce strategy".to_string(),
                    )
                })?;
                NonceStrategy::Fixed {
                    k: parse_env_felt(ENV_FIXED_K, &k)?,
                }
            }
            other => {
                return Err(ErrorCode::E600_InvalidConfig(
                    ENV_NONCE.to_string(),
                    format!("unknown strategy '{}'", other),
                ))
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that could never sign or hash.
    pub fn validate(&self) -> SignerResult<()> {
        if let NonceStrategy::Fixed { k } = &self.nonce {
            if k.is_zero() || &k.to_biguint() >= ec_order() {
                return Err(ErrorCode::E600_InvalidConfig(
                    "nonce.k".to_string(),
                    "must lie in [1, N)".to_string(),
                ));
            }
        }
        if self.limits.max_nesting_depth == 0 {
            return Err(ErrorCode::E600_InvalidConfig(
                "limits.max_nesting_depth".to_string(),
                "must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_env_felt(key: &str, value: &str) -> SignerResult<FieldElement> {
    FieldElement::from_hex_or_decimal(value.trim())
        .map_err(|e| ErrorCode::E600_InvalidConfig(key.to_string(), e.to_string()))
}
