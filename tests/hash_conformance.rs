//! Pedersen and chain-hash conformance tests.
//!
//! Both hash backends must produce identical outputs; the reference backend
//! recomputes every point multiplication from the curve constants.

use paradex_signer::conformance::{DiffResult, DiffTestHarness};
use paradex_signer::hash::{
    chain_hash, selector_from_name, starknet_keccak, AffinePoint, ChainState, HashBackend,
    HashBackendKind, ReferencePedersen, TablePedersen, GENERATOR_HEX, PEDERSEN_POINTS_HEX,
};
use paradex_signer::FieldElement;

fn fe(hex: &str) -> FieldElement {
    FieldElement::from_hex(hex).unwrap()
}

fn backends() -> [Box<dyn HashBackend>; 2] {
    [Box::new(TablePedersen), Box::new(ReferencePedersen)]
}

// =============================================================================
// Curve constants
// =============================================================================

#[test]
fn constant_points_lie_on_curve() {
    let generator = AffinePoint::from_hex(&GENERATOR_HEX).unwrap();
    assert!(generator.is_on_curve());
    for point in &PEDERSEN_POINTS_HEX {
        assert!(AffinePoint::from_hex(point).unwrap().is_on_curve());
    }
}

// =============================================================================
// Pedersen compression
// =============================================================================

#[test]
fn pedersen_of_zeros_is_shift_point() {
    for backend in backends() {
        assert_eq!(
            backend.compress(&FieldElement::ZERO, &FieldElement::ZERO).to_hex(),
            PEDERSEN_POINTS_HEX[0][0],
            "{}",
            backend.name()
        );
    }
}

#[test]
fn pedersen_known_pair() {
    let a = fe("0x03d937c035c878245caf64531a5756109c53068da139362728feb561405371cb");
    let b = fe("0x0208a0a10250e382e1e4bbe2880906c2791bf6275695e02fbbc6aeff9cd8b31a");
    for backend in backends() {
        assert_eq!(
            backend.compress(&a, &b).to_hex(),
            "0x30e480bed5fe53fa909cc0f8c4d99b8f9f2c016be4c41e13a4848797979c662",
            "{}",
            backend.name()
        );
    }
}

#[test]
fn pedersen_is_not_symmetric() {
    let one = FieldElement::ONE;
    let two = FieldElement::from_u64(2);
    for backend in backends() {
        assert_ne!(backend.compress(&one, &two), backend.compress(&two, &one));
    }
}

#[test]
fn pedersen_backends_agree_on_limb_boundaries() {
    let harness = DiffTestHarness::new();
    let low_max = fe("0xffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff");
    let high_one = fe("0x100000000000000000000000000000000000000000000000000000000000000");
    let max = -FieldElement::ONE;
    for (a, b) in [
        (low_max, high_one),
        (high_one, low_max),
        (max, FieldElement::ZERO),
        (FieldElement::ZERO, max),
        (max, max),
    ] {
        let result = harness.compare_compress(&a, &b);
        assert!(matches!(result, DiffResult::Match { .. }), "{:?}", result);
    }
}

// =============================================================================
// Chain hash
// =============================================================================

#[test]
fn chain_hash_appends_length() {
    let elements = [FieldElement::from_u64(1), FieldElement::from_u64(2), FieldElement::from_u64(3)];
    for backend in backends() {
        let hash = chain_hash(backend.as_ref(), &elements);
        assert_eq!(
            hash.to_hex(),
            "0xf9d95fbf356fbeda26538c92f7040abe51bf142350f73c9ee5ba7c660bae71"
        );

        let folded = elements
            .iter()
            .fold(FieldElement::ZERO, |acc, e| backend.compress(&acc, e));
        assert_ne!(hash, folded);
        assert_eq!(hash, backend.compress(&folded, &FieldElement::from_u64(3)));
    }
}

#[test]
fn chain_hash_of_nothing() {
    let backend = TablePedersen;
    assert_eq!(
        chain_hash(&backend, &[]),
        backend.compress(&FieldElement::ZERO, &FieldElement::ZERO)
    );
}

#[test]
fn chain_state_matches_chain_hash() {
    let backend = TablePedersen;
    let elements: Vec<FieldElement> = (0..10u64).map(FieldElement::from_u64).collect();

    let mut state = ChainState::new(&backend);
    state.absorb(&elements[..4]);
    for e in &elements[4..] {
        state.absorb_one(e);
    }
    assert_eq!(state.len(), 10);
    assert_eq!(state.finalize(), chain_hash(&backend, &elements));
}

// =============================================================================
// Keccak selectors
// =============================================================================

#[test]
fn selectors_are_masked_to_250_bits() {
    let transfer = selector_from_name("transfer");
    assert_eq!(
        transfer.to_hex(),
        "0x83afd3f4caedc6eebf44246fe54e38c95e3179a5ec9ea81740eca5b482d12e"
    );
    assert!(transfer.to_bytes_be()[0] <= 0x03);
    assert_eq!(starknet_keccak(b"transfer"), transfer);
}

#[test]
fn default_entry_points_select_zero() {
    assert_eq!(selector_from_name("__default__"), FieldElement::ZERO);
    assert_eq!(selector_from_name("__l1_default__"), FieldElement::ZERO);
}

#[test]
fn backend_kind_round_trips_through_names() {
    for kind in [HashBackendKind::Table, HashBackendKind::Reference] {
        let parsed: HashBackendKind = kind.as_str().parse().unwrap();
        assert_eq!(parsed, kind);
        assert_eq!(kind.build().name(), kind.as_str());
    }
    assert!("fast".parse::<HashBackendKind>().is_err());
}
