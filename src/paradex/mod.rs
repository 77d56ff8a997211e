//! Paradex message presets, account addresses and quantity scaling.
//!
//! - [`messages`] - Onboarding, auth and order typed messages
//! - [`account`] - Counterfactual account address from a public key
//! - [`quantums`] - Decimal/quantum conversion and on-chain balance decoding

pub mod account;
pub mod messages;
pub mod quantums;

pub use account::{compute_account_address, ADDRESS_BOUND_OFFSET, CONTRACT_ADDRESS_PREFIX};
pub use messages::{
    auth_message, domain, onboarding_message, order_message, OrderPayload, OrderSide, OrderType,
};
pub use quantums::{decode_signed_quantums, from_quantums, to_quantums, QUANTUM_DECIMALS};

use crate::error::{ErrorCode, SignerResult};
use crate::field::FieldElement;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Starknet chain id of the Sepolia testnet deployment.
pub const TESTNET_CHAIN_ID: &str = "PRIVATE_SN_POTC_SEPOLIA";

/// Subset of the exchange's published system configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Starknet chain id (a short string such as `PRIVATE_SN_POTC_SEPOLIA`)
    pub starknet_chain_id: String,
    /// L1 chain id
    #[serde(default)]
    pub l1_chain_id: Option<String>,
    /// Class hash of the account implementation
    pub paraclear_account_hash: FieldElement,
    /// Class hash of the account proxy
    pub paraclear_account_proxy_hash: FieldElement,
    /// Decimals used for on-chain quantities
    #[serde(default)]
    pub paraclear_decimals: Option<u32>,
}

impl SystemConfig {
    /// Parse the JSON document.
    pub fn from_json_str(json: &str) -> SignerResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| ErrorCode::E600_InvalidConfig("system_config".to_string(), e.to_string()))
    }

    /// Read and parse a JSON file.
    pub fn from_file(path: &Path) -> SignerResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ErrorCode::E601_ConfigIo(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&raw)
    }

    /// Decimals for on-chain quantities, defaulting to [`QUANTUM_DECIMALS`].
    pub fn decimals(&self) -> u32 {
        self.paraclear_decimals.unwrap_or(QUANTUM_DECIMALS)
    }
}
