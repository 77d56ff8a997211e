//! Length-suffixed Pedersen chain over a sequence of field elements.

use super::HashBackend;
use crate::field::FieldElement;

/// Accumulator for incremental chain hashing.
///
/// `finalize` absorbs the element count, so `[a]` and `[a, 0]` never collide.
pub struct ChainState<'a> {
    backend: &'a dyn HashBackend,
    acc: FieldElement,
    len: u64,
}

impl<'a> ChainState<'a> {
    /// Start a chain with accumulator zero.
    pub fn new(backend: &'a dyn HashBackend) -> Self {
        Self {
            backend,
            acc: FieldElement::ZERO,
            len: 0,
        }
    }

    /// Absorb a single field element.
    pub fn absorb_one(&mut self, x: &FieldElement) {
        self.acc = self.backend.compress(&self.acc, x);
        self.len += 1;
    }

    /// Absorb multiple field elements.
    pub fn absorb(&mut self, elements: &[FieldElement]) {
        for x in elements {
            self.absorb_one(x);
        }
    }

    /// Number of elements absorbed so far.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether nothing has been absorbed yet.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Absorb the length and return the digest.
    pub fn finalize(self) -> FieldElement {
        self.backend
            .compress(&self.acc, &FieldElement::from_u64(self.len))
    }
}

/// Hash a sequence: `compress(fold(compress, 0, elements), len)`.
pub fn chain_hash(backend: &dyn HashBackend, elements: &[FieldElement]) -> FieldElement {
    let mut state = ChainState::new(backend);
    state.absorb(elements);
    state.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::TablePedersen;

    fn nums(values: &[u64]) -> Vec<FieldElement> {
        values.iter().map(|v| FieldElement::from_u64(*v)).collect()
    }

    #[test]
    fn test_empty_chain() {
        let backend = TablePedersen;
        assert_eq!(
            chain_hash(&backend, &[]),
            backend.compress(&FieldElement::ZERO, &FieldElement::ZERO)
        );
    }

    #[test]
    fn test_known_chain() {
        let backend = TablePedersen;
        assert_eq!(
            chain_hash(&backend, &nums(&[1, 2, 3])).to_hex(),
            "0xf9d95fbf356fbeda26538c92f7040abe51bf142350f73c9ee5ba7c660bae71"
        );
        assert_eq!(
            chain_hash(&backend, &nums(&[0x1234])).to_hex(),
            "0x22aea3d0aceb89bbdd9adfab56fba999e0dad8569361701014ea52cae912dea"
        );
    }

    #[test]
    fn test_length_is_absorbed() {
        let backend = TablePedersen;
        let with_len = chain_hash(&backend, &nums(&[1, 2, 3]));
        let bare = nums(&[1, 2, 3])
            .iter()
            .fold(FieldElement::ZERO, |acc, x| backend.compress(&acc, x));
        assert_eq!(
            bare.to_hex(),
            "0x2dca1ad81a6107a9ef68c69f791bcdbda1df257aab76bd43ded73d96ed6227d"
        );
        assert_ne!(with_len, bare);
        assert_ne!(
            chain_hash(&backend, &nums(&[7])),
            chain_hash(&backend, &nums(&[7, 0]))
        );
    }

    #[test]
    fn test_incremental_matches_oneshot() {
        let backend = TablePedersen;
        let mut state = ChainState::new(&backend);
        assert!(state.is_empty());
        state.absorb_one(&FieldElement::ONE);
        state.absorb(&nums(&[2, 3]));
        assert_eq!(state.len(), 3);
        assert_eq!(state.finalize(), chain_hash(&backend, &nums(&[1, 2, 3])));
    }
}
