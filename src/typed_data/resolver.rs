//! Type signatures and type hashes.
//!
//! The signature of a type is its own encoding followed by the encodings of
//! every struct it transitively references, sorted by name:
//!
//! ```text
//! Mail(from:Person,to:Person,cc:Person*)Person(name:felt,wallet:felt)
//! ```
//!
//! The root never appears among its own dependencies, even when the graph
//! cycles back to it.

use super::types::TypeSet;
use crate::error::SignerResult;
use crate::field::FieldElement;
use crate::hash::starknet_keccak;
use std::collections::BTreeSet;

/// Struct types transitively referenced by `root`, sorted, excluding `root`.
pub fn dependencies(types: &TypeSet, root: &str) -> SignerResult<Vec<String>> {
    let mut seen = BTreeSet::new();
    seen.insert(root.to_string());
    let mut pending = vec![root.to_string()];

    while let Some(name) = pending.pop() {
        for field in types.get(&name)?.fields() {
            if let Some(target) = field.type_ref.struct_name() {
                if seen.insert(target.to_string()) {
                    pending.push(target.to_string());
                }
            }
        }
    }

    seen.remove(root);
    Ok(seen.into_iter().collect())
}

/// `Name(field:type,...)` for a single declaration.
pub fn encode_type(types: &TypeSet, name: &str) -> SignerResult<String> {
    let fields = types
        .get(name)?
        .fields()
        .iter()
        .map(|f| format!("{}:{}", f.name, f.type_ref))
        .collect::<Vec<_>>();
    Ok(format!("{}({})", name, fields.join(",")))
}

/// Root encoding followed by its sorted dependencies.
pub fn type_signature(types: &TypeSet, root: &str) -> SignerResult<String> {
    let mut signature = encode_type(types, root)?;
    for dep in dependencies(types, root)? {
        signature.push_str(&encode_type(types, &dep)?);
    }
    Ok(signature)
}

/// Starknet keccak of the type signature.
pub fn type_hash(types: &TypeSet, root: &str) -> SignerResult<FieldElement> {
    let signature = type_signature(types, root)?;
    tracing::trace!(root, %signature, "resolved type signature");
    Ok(starknet_keccak(signature.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::typed_data::types::TypeDeclaration;
    use std::collections::BTreeMap;

    fn typeset(entries: &[(&str, &[(&str, &str)])]) -> TypeSet {
        let map: BTreeMap<String, TypeDeclaration> = entries
            .iter()
            .map(|(name, fields)| (name.to_string(), TypeDeclaration::from_pairs(fields).unwrap()))
            .collect();
        TypeSet::new(map).unwrap()
    }

    #[test]
    fn test_empty_type() {
        let types = typeset(&[("Empty", &[])]);
        assert_eq!(type_signature(&types, "Empty").unwrap(), "Empty()");
        assert_eq!(
            type_hash(&types, "Empty").unwrap().to_hex(),
            "0x1b2a12a1fcfb6e2e0de8666c64b3244166edb7b25b200204a8d0cca9b65cf37"
        );
    }

    #[test]
    fn test_single_type_hash() {
        let types = typeset(&[("Constant", &[("action", "felt")])]);
        assert_eq!(
            type_hash(&types, "Constant").unwrap().to_hex(),
            "0xe84bbcb68e0f7c73a9058ba82b6da9c1ffdc502efcf034e78b0c003c22ecc9"
        );
    }

    #[test]
    fn test_dependencies_sorted_and_root_excluded() {
        let types = typeset(&[
            ("Root", &[("z", "Zeta"), ("a", "Alpha*")]),
            ("Zeta", &[("b", "Beta")]),
            ("Alpha", &[("v", "felt")]),
            ("Beta", &[("r", "Root*"), ("w", "felt")]),
        ]);
        assert_eq!(
            dependencies(&types, "Root").unwrap(),
            vec!["Alpha", "Beta", "Zeta"]
        );
        assert_eq!(
            type_signature(&types, "Root").unwrap(),
            "Root(z:Zeta,a:Alpha*)Alpha(v:felt)Beta(r:Root*,w:felt)Zeta(b:Beta)"
        );
    }

    #[test]
    fn test_self_reference() {
        let types = typeset(&[("Node", &[("children", "Node*"), ("v", "felt")])]);
        assert_eq!(
            type_signature(&types, "Node").unwrap(),
            "Node(children:Node*,v:felt)"
        );
    }

    #[test]
    fn test_unknown_root() {
        let types = typeset(&[("A", &[])]);
        assert_eq!(
            type_signature(&types, "B"),
            Err(ErrorCode::E300_UnknownType("B".into()))
        );
    }
}
