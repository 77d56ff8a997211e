//! Counterfactual address of a Paradex account.
//!
//! Accounts are deployed as a proxy whose constructor initializes the
//! implementation class with the owner's public key. The address follows the
//! Starknet contract-address formula, with the public key as salt and a zero
//! deployer.

use super::SystemConfig;
use crate::error::SignerResult;
use crate::field::FieldElement;
use crate::hash::{chain_hash, selector_from_name, HashBackend};
use num_bigint::BigUint;
use num_traits::One;

/// Short string prefixed to every contract-address preimage.
pub const CONTRACT_ADDRESS_PREFIX: &str = "STARKNET_CONTRACT_ADDRESS";

/// Addresses are reduced modulo `2^251 - ADDRESS_BOUND_OFFSET`.
pub const ADDRESS_BOUND_OFFSET: u32 = 256;

/// Address of the account owned by `public_key`.
pub fn compute_account_address(
    backend: &dyn HashBackend,
    config: &SystemConfig,
    public_key: &FieldElement,
) -> SignerResult<FieldElement> {
    let calldata = [
        config.paraclear_account_hash,
        selector_from_name("initialize"),
        FieldElement::from_u64(2),
        *public_key,
        FieldElement::ZERO,
    ];
    let preimage = [
        FieldElement::from_short_string(CONTRACT_ADDRESS_PREFIX)?,
        FieldElement::ZERO,
        *public_key,
        config.paraclear_account_proxy_hash,
        chain_hash(backend, &calldata),
    ];
    let raw = chain_hash(backend, &preimage);
    let bound = (BigUint::one() << 251u32) - BigUint::from(ADDRESS_BOUND_OFFSET);
    Ok(FieldElement::reduce(&(raw.to_biguint() % bound)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::{ReferencePedersen, TablePedersen};

    fn config() -> SystemConfig {
        SystemConfig {
            starknet_chain_id: "PRIVATE_SN_POTC_GOERLI".to_string(),
            l1_chain_id: None,
            paraclear_account_hash: FieldElement::from_hex(
                "0x033434ad846cdd5f23eb73ff09fe6fddd568284a0fb7d1be20ee482f044dabe2",
            )
            .unwrap(),
            paraclear_account_proxy_hash: FieldElement::from_hex(
                "0x3530cc4759d78042f1b543bf797f5f3d647cde0388c33734cf91b7f7b9314a9",
            )
            .unwrap(),
            paraclear_decimals: None,
        }
    }

    #[test]
    fn test_known_address() {
        let public_key =
            FieldElement::from_hex("0x499f65ae2f71d5298d2d88823b2e5e19596a71aac1984710479e406a002439")
                .unwrap();
        let expected = "0x1d5e1cd2dfd8620c9752a185f5cefb807ec7f8384862b32acaede229ae3eaf2";
        assert_eq!(
            compute_account_address(&TablePedersen, &config(), &public_key)
                .unwrap()
                .to_hex(),
            expected
        );
        assert_eq!(
            compute_account_address(&ReferencePedersen, &config(), &public_key)
                .unwrap()
                .to_hex(),
            expected
        );
    }
}
