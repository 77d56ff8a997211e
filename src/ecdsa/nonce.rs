//! Nonce selection for Stark ECDSA.

use crate::field::FieldElement;
use serde::{Deserialize, Serialize};
use starknet_crypto::rfc6979_generate_k;

/// How the per-signature nonce `k` is chosen.
///
/// Picked once, at configuration time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum NonceStrategy {
    /// RFC 6979 derivation from the message hash, the key and an optional seed.
    Rfc6979 {
        /// Extra entropy mixed into the derivation
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seed: Option<FieldElement>,
    },
    /// A caller-chosen constant nonce. Legacy tooling only.
    Fixed {
        /// The nonce
        k: FieldElement,
    },
}

impl NonceStrategy {
    /// RFC 6979 without an extra seed.
    pub fn rfc6979() -> Self {
        NonceStrategy::Rfc6979 { seed: None }
    }

    /// Produce the nonce for one signing attempt.
    pub fn generate(&self, message_hash: &FieldElement, private_key: &FieldElement) -> FieldElement {
        match self {
            NonceStrategy::Rfc6979 { seed } => FieldElement::from(rfc6979_generate_k(
                message_hash.inner(),
                private_key.inner(),
                seed.as_ref().map(FieldElement::inner),
            )),
            NonceStrategy::Fixed { k } => {
                tracing::warn!("signing with a fixed nonce; reusing it across messages exposes the key");
                *k
            }
        }
    }

    /// The strategy for the next attempt after a degenerate signature.
    pub fn perturbed(&self) -> Self {
        match self {
            NonceStrategy::Rfc6979 { seed } => NonceStrategy::Rfc6979 {
                seed: Some(seed.map_or(FieldElement::ONE, |s| s + FieldElement::ONE)),
            },
            NonceStrategy::Fixed { k } => NonceStrategy::Fixed {
                k: *k + FieldElement::ONE,
            },
        }
    }

    /// Whether this is the legacy fixed-nonce strategy.
    pub fn is_fixed(&self) -> bool {
        matches!(self, NonceStrategy::Fixed { .. })
    }
}

impl Default for NonceStrategy {
    fn default() -> Self {
        Self::rfc6979()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perturb_seed() {
        let first = NonceStrategy::rfc6979().perturbed();
        assert_eq!(first, NonceStrategy::Rfc6979 { seed: Some(FieldElement::ONE) });
        assert_eq!(
            first.perturbed(),
            NonceStrategy::Rfc6979 { seed: Some(FieldElement::from_u64(2)) }
        );
        let fixed = NonceStrategy::Fixed { k: FieldElement::from_u64(32) };
        assert_eq!(fixed.perturbed(), NonceStrategy::Fixed { k: FieldElement::from_u64(33) });
    }

    #[test]
    fn test_serde_shape() {
        let fixed: NonceStrategy =
            serde_json::from_str(r#"{"strategy": "fixed", "k": "0x20"}"#).unwrap();
        assert_eq!(fixed, NonceStrategy::Fixed { k: FieldElement::from_u64(32) });
        let default: NonceStrategy = serde_json::from_str(r#"{"strategy": "rfc6979"}"#).unwrap();
        assert_eq!(default, NonceStrategy::rfc6979());
    }

    #[test]
    fn test_rfc6979_deterministic() {
        let strategy = NonceStrategy::default();
        let hash = FieldElement::from_u64(1234);
        let key = FieldElement::from_u64(5678);
        let k1 = strategy.generate(&hash, &key);
        assert_eq!(k1, strategy.generate(&hash, &key));
        assert_ne!(k1, strategy.perturbed().generate(&hash, &key));
        assert_ne!(k1, strategy.generate(&FieldElement::from_u64(1235), &key));
    }
}
