//! Configured entry point for hashing, signing, verification and derivation.

use crate::config::SignerConfig;
use crate::derivation;
use crate::ecdsa::{self, NonceStrategy, Signature};
use crate::error::SignerResult;
use crate::field::FieldElement;
use crate::hash::HashBackend;
use crate::typed_data::{Limits, TypedDataHasher, TypedMessage};

/// A signer bound to one configuration.
///
/// Holds no key material; private keys are passed per call.
pub struct Signer {
    backend: Box<dyn HashBackend>,
    nonce: NonceStrategy,
    limits: Limits,
}

impl Signer {
    /// Build a signer from a validated configuration.
    pub fn new(config: &SignerConfig) -> SignerResult<Self> {
        config.validate()?;
        if config.nonce.is_fixed() {
            tracing::warn!("signer configured with the legacy fixed nonce strategy");
        }
        tracing::debug!(backend = %config.hash_backend, "signer configured");
        Ok(Self {
            backend: config.hash_backend.build(),
            nonce: config.nonce.clone(),
            limits: config.limits,
        })
    }

    /// Build a signer from the environment.
    pub fn from_env() -> SignerResult<Self> {
        Self::new(&SignerConfig::from_env()?)
    }

    /// The hash backend in use.
    pub fn backend(&self) -> &dyn HashBackend {
        self.backend.as_ref()
    }

    /// The typed-message limits in use.
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Parse a JSON typed message under this signer's limits.
    pub fn parse_message(&self, json: &str) -> SignerResult<TypedMessage> {
        TypedMessage::from_json_str_with_limits(json, &self.limits)
    }

    /// Message hash of `typed` for `account_address`.
    pub fn message_hash(
        &self,
        typed: &TypedMessage,
        account_address: &FieldElement,
    ) -> SignerResult<FieldElement> {
        TypedDataHasher::new(self.backend(), typed.types())
            .with_limits(self.limits)
            .message_hash(typed, account_address)
    }

    /// Message hash with hex input and output.
    pub fn message_hash_hex(&self, typed: &TypedMessage, account_address: &str) -> SignerResult<String> {
        let account = FieldElement::from_hex(account_address)?;
        self.message_hash(typed, &account).map(|hash| hash.to_hex())
    }

    /// Sign a message hash.
    pub fn sign(&self, message_hash: &FieldElement, private_key: &FieldElement) -> SignerResult<Signature> {
        ecdsa::sign(message_hash, private_key, &self.nonce)
    }

    /// Hash and sign a typed message; returns the hash alongside the signature.
    pub fn sign_typed_message(
        &self,
        typed: &TypedMessage,
        account_address: &FieldElement,
        private_key: &FieldElement,
    ) -> SignerResult<(FieldElement, Signature)> {
        let hash = self.message_hash(typed, account_address)?;
        let signature = self.sign(&hash, private_key)?;
        Ok((hash, signature))
    }

    /// Verify a signature; never errors.
    pub fn verify(&self, message_hash: &FieldElement, signature: &Signature, public_key: &FieldElement) -> bool {
        ecdsa::verify(message_hash, signature, public_key)
    }

    /// Public key for a private key.
    pub fn public_key(&self, private_key: &FieldElement) -> SignerResult<FieldElement> {
        ecdsa::public_key(private_key)
    }

    /// Derive a Stark private key from an L1 signature.
    pub fn derive_key(&self, l1_signature: &str) -> SignerResult<FieldElement> {
        derivation::derive_key(l1_signature)
    }

    /// Derive a Stark private key as 0x-hex.
    pub fn derive_key_hex(&self, l1_signature: &str) -> SignerResult<String> {
        derivation::derive_key_hex(l1_signature)
    }
}

impl Default for Signer {
    fn default() -> Self {
        let config = SignerConfig::default();
        Self {
            backend: config.hash_backend.build(),
            nonce: config.nonce,
            limits: config.limits,
        }
    }
}
