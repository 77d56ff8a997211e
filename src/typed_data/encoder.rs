//! Structured hashing of typed messages.

use super::limits::Limits;
use super::resolver;
use super::types::{TypeRef, TypeSet, TypedMessage, Value};
use crate::error::{ErrorCode, SignerResult};
use crate::field::FieldElement;
use crate::hash::{chain_hash, ChainState, HashBackend};
use std::collections::BTreeMap;

/// Short string absorbed first by every message hash.
pub const MESSAGE_PREFIX: &str = "StarkNet Message";

/// Hashes struct data against a fixed set of declarations.
pub struct TypedDataHasher<'a> {
    backend: &'a dyn HashBackend,
    types: &'a TypeSet,
    limits: Limits,
}

impl<'a> TypedDataHasher<'a> {
    /// Create a hasher with the default limits.
    pub fn new(backend: &'a dyn HashBackend, types: &'a TypeSet) -> Self {
        Self {
            backend,
            types,
            limits: Limits::default(),
        }
    }

    /// Replace the limits.
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Type hash of a declared type.
    pub fn type_hash(&self, type_name: &str) -> SignerResult<FieldElement> {
        resolver::type_hash(self.types, type_name)
    }

    /// `chain_hash([typeHash(T), encodeField(f1), ...])` in declaration order.
    ///
    /// Fields present in `data` but not declared are ignored.
    pub fn struct_hash(
        &self,
        type_name: &str,
        data: &BTreeMap<String, Value>,
    ) -> SignerResult<FieldElement> {
        self.struct_hash_at(type_name, data, 0)
    }

    /// Encode one field value as a single field element.
    ///
    /// - array type with array data: chain hash of the element encodings
    /// - struct type with struct data: the nested struct hash
    /// - anything else: the scalar decoding of the value
    pub fn encode_field(
        &self,
        field: &str,
        type_ref: &TypeRef,
        value: &Value,
    ) -> SignerResult<FieldElement> {
        self.encode_field_at(field, type_ref, value, 0)
    }

    /// Hash a complete message on behalf of `account_address`.
    pub fn message_hash(
        &self,
        typed: &TypedMessage,
        account_address: &FieldElement,
    ) -> SignerResult<FieldElement> {
        let prefix = FieldElement::from_short_string(MESSAGE_PREFIX)?;
        let domain_hash = self.struct_hash(typed.domain_type(), typed.domain())?;
        let message_hash = self.struct_hash(typed.primary_type(), typed.message())?;
        let hash = chain_hash(
            self.backend,
            &[prefix, domain_hash, *account_address, message_hash],
        );
        tracing::debug!(
            primary_type = typed.primary_type(),
            backend = self.backend.name(),
            hash = %hash.to_hex(),
            "computed message hash"
        );
        Ok(hash)
    }

    fn struct_hash_at(
        &self,
        type_name: &str,
        data: &BTreeMap<String, Value>,
        depth: u64,
    ) -> SignerResult<FieldElement> {
        if depth > self.limits.max_nesting_depth {
            return Err(ErrorCode::E302_NestingDepthExceeded(
                self.limits.max_nesting_depth,
            ));
        }
        let declaration = self.types.get(type_name)?;
        let mut chain = ChainState::new(self.backend);
        chain.absorb_one(&self.type_hash(type_name)?);
        for field in declaration.fields() {
            let value = data.get(&field.name).ok_or_else(|| {
                ErrorCode::E202_MissingField(type_name.to_string(), field.name.clone())
            })?;
            chain.absorb_one(&self.encode_field_at(&field.name, &field.type_ref, value, depth)?);
        }
        Ok(chain.finalize())
    }

    fn encode_field_at(
        &self,
        field: &str,
        type_ref: &TypeRef,
        value: &Value,
        depth: u64,
    ) -> SignerResult<FieldElement> {
        match (type_ref, value) {
            (TypeRef::Pointer(inner), Value::Array(items)) => {
                if items.len() as u64 > self.limits.max_array_length {
                    return Err(ErrorCode::E303_ArrayTooLong(self.limits.max_array_length));
                }
                let mut chain = ChainState::new(self.backend);
                for item in items {
                    chain.absorb_one(&self.encode_field_at(field, inner, item, depth + 1)?);
                }
                Ok(chain.finalize())
            }
            (TypeRef::Named(name), Value::Struct(data)) => {
                self.struct_hash_at(name, data, depth + 1)
            }
            (_, Value::Scalar(x)) => Ok(*x),
            (_, Value::Text(s)) => FieldElement::parse_value(s),
            (_, Value::Struct(_)) => Err(ErrorCode::E203_UnexpectedValue(
                field.to_string(),
                format!("struct data for type {}", type_ref),
            )),
            (_, Value::Array(_)) => Err(ErrorCode::E203_UnexpectedValue(
                field.to_string(),
                format!("array data for type {}", type_ref),
            )),
        }
    }
}

/// Hash a typed message under the default limits.
pub fn message_hash(
    backend: &dyn HashBackend,
    typed: &TypedMessage,
    account_address: &FieldElement,
) -> SignerResult<FieldElement> {
    TypedDataHasher::new(backend, typed.types()).message_hash(typed, account_address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::TablePedersen;
    use crate::typed_data::types::TypeDeclaration;

    fn typeset(entries: &[(&str, &[(&str, &str)])]) -> TypeSet {
        let map: BTreeMap<String, TypeDeclaration> = entries
            .iter()
            .map(|(name, fields)| (name.to_string(), TypeDeclaration::from_pairs(fields).unwrap()))
            .collect();
        TypeSet::new(map).unwrap()
    }

    fn data<const N: usize>(pairs: [(&str, Value); N]) -> BTreeMap<String, Value> {
        match Value::object(pairs) {
            Value::Struct(map) => map,
            _ => BTreeMap::new(),
        }
    }

    #[test]
    fn test_struct_hash_is_chain_of_fields() {
        let backend = TablePedersen;
        let types = typeset(&[("Constant", &[("action", "felt")])]);
        let hasher = TypedDataHasher::new(&backend, &types);
        let hashed = hasher
            .struct_hash("Constant", &data([("action", Value::text("Onboarding"))]))
            .unwrap();
        let expected = chain_hash(
            &backend,
            &[
                hasher.type_hash("Constant").unwrap(),
                FieldElement::from_short_string("Onboarding").unwrap(),
            ],
        );
        assert_eq!(hashed, expected);
    }

    #[test]
    fn test_empty_array_is_empty_chain() {
        let backend = TablePedersen;
        let types = typeset(&[("Bag", &[("items", "felt*")])]);
        let hasher = TypedDataHasher::new(&backend, &types);
        let encoded = hasher
            .encode_field("items", &TypeRef::parse("felt*").unwrap(), &Value::Array(vec![]))
            .unwrap();
        assert_eq!(encoded, chain_hash(&backend, &[]));
    }

    #[test]
    fn test_missing_field() {
        let backend = TablePedersen;
        let types = typeset(&[("Pair", &[("a", "felt"), ("b", "felt")])]);
        let hasher = TypedDataHasher::new(&backend, &types);
        let result = hasher.struct_hash("Pair", &data([("a", Value::text("1"))]));
        assert_eq!(
            result,
            Err(ErrorCode::E202_MissingField("Pair".into(), "b".into()))
        );
    }

    #[test]
    fn test_struct_value_for_scalar_type() {
        let backend = TablePedersen;
        let types = typeset(&[("A", &[("x", "felt")])]);
        let hasher = TypedDataHasher::new(&backend, &types);
        let nested = Value::object([("y", Value::text("1"))]);
        assert!(matches!(
            hasher.struct_hash("A", &data([("x", nested)])),
            Err(ErrorCode::E203_UnexpectedValue(_, _))
        ));
    }

    #[test]
    fn test_nesting_limit() {
        let backend = TablePedersen;
        let types = typeset(&[("Node", &[("next", "Node*")])]);
        let mut value = Value::Array(vec![]);
        for _ in 0..4 {
            value = Value::Array(vec![Value::object([("next", value)])]);
        }
        let limits = Limits {
            max_nesting_depth: 3,
            ..Limits::default()
        };
        let hasher = TypedDataHasher::new(&backend, &types).with_limits(limits);
        assert_eq!(
            hasher.struct_hash("Node", &data([("next", value.clone())])),
            Err(ErrorCode::E302_NestingDepthExceeded(3))
        );
        let hasher = TypedDataHasher::new(&backend, &types);
        assert!(hasher.struct_hash("Node", &data([("next", value)])).is_ok());
    }

    #[test]
    fn test_array_limit() {
        let backend = TablePedersen;
        let types = typeset(&[("Bag", &[("items", "felt*")])]);
        let limits = Limits {
            max_array_length: 2,
            ..Limits::default()
        };
        let hasher = TypedDataHasher::new(&backend, &types).with_limits(limits);
        let items = Value::Array(vec![Value::text("1"), Value::text("2"), Value::text("3")]);
        assert_eq!(
            hasher.struct_hash("Bag", &data([("items", items)])),
            Err(ErrorCode::E303_ArrayTooLong(2))
        );
    }
}
