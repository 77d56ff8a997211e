//! Type declarations and values of a typed message.
//!
//! Declarations are validated once, on construction of a [`TypeSet`], so the
//! resolver and the hasher can rely on every named reference resolving.

use super::limits::Limits;
use crate::error::{ErrorCode, SignerResult};
use crate::field::FieldElement;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Domain type used when a message does not name one.
pub const DEFAULT_DOMAIN_TYPE: &str = "StarkNetDomain";

/// Characters that may not appear in a type or field name.
const RESERVED_CHARS: &[char] = &['(', ')', ',', ':', '*'];

/// Built-in scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// `felt`
    Felt,
    /// `string` (a short string, encoded like any scalar)
    String,
}

impl Primitive {
    /// Declared name of the primitive.
    pub fn as_str(&self) -> &'static str {
        match self {
            Primitive::Felt => "felt",
            Primitive::String => "string",
        }
    }

    /// Look up a primitive by name.
    pub fn from_name(name: &str) -> Option<Primitive> {
        match name {
            "felt" => Some(Primitive::Felt),
            "string" => Some(Primitive::String),
            _ => None,
        }
    }
}

/// The type of a field: a primitive, a declared struct, or an array of either.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// `felt` or `string`
    Primitive(Primitive),
    /// A declared struct type
    Named(String),
    /// `T*`
    Pointer(Box<TypeRef>),
}

impl TypeRef {
    /// Parse a type reference such as `felt`, `Person` or `Person*`.
    pub fn parse(raw: &str) -> SignerResult<TypeRef> {
        if let Some(inner) = raw.strip_suffix('*') {
            if inner.ends_with('*') {
                return Err(ErrorCode::E205_MalformedTypeRef(raw.to_string()));
            }
            return Ok(TypeRef::Pointer(Box::new(Self::parse_base(inner, raw)?)));
        }
        Self::parse_base(raw, raw)
    }

    fn parse_base(name: &str, raw: &str) -> SignerResult<TypeRef> {
        if let Some(primitive) = Primitive::from_name(name) {
            return Ok(TypeRef::Primitive(primitive));
        }
        if !is_valid_name(name) {
            return Err(ErrorCode::E205_MalformedTypeRef(raw.to_string()));
        }
        Ok(TypeRef::Named(name.to_string()))
    }

    /// The referenced struct name, with any pointer marker stripped.
    pub fn struct_name(&self) -> Option<&str> {
        match self {
            TypeRef::Named(name) => Some(name),
            TypeRef::Pointer(inner) => inner.struct_name(),
            TypeRef::Primitive(_) => None,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Primitive(p) => f.write_str(p.as_str()),
            TypeRef::Named(name) => f.write_str(name),
            TypeRef::Pointer(inner) => write!(f, "{}*", inner),
        }
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| c.is_whitespace() || RESERVED_CHARS.contains(&c))
}

/// One `name:type` entry of a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDeclaration {
    /// Field name
    pub name: String,
    /// Field type
    pub type_ref: TypeRef,
}

impl FieldDeclaration {
    /// Parse a field from its name and type string.
    pub fn new(name: &str, type_name: &str) -> SignerResult<Self> {
        if !is_valid_name(name) {
            return Err(ErrorCode::E205_MalformedTypeRef(name.to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            type_ref: TypeRef::parse(type_name)?,
        })
    }
}

/// An ordered list of fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypeDeclaration {
    fields: Vec<FieldDeclaration>,
}

impl TypeDeclaration {
    /// Build a declaration from `(name, type)` pairs.
    pub fn from_pairs(pairs: &[(&str, &str)]) -> SignerResult<Self> {
        let fields = pairs
            .iter()
            .map(|(name, ty)| FieldDeclaration::new(name, ty))
            .collect::<SignerResult<Vec<_>>>()?;
        Ok(Self { fields })
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldDeclaration] {
        &self.fields
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the declaration has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A validated set of struct declarations.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypeSet {
    types: BTreeMap<String, TypeDeclaration>,
}

impl TypeSet {
    /// Validate declarations under the default limits.
    pub fn new(types: BTreeMap<String, TypeDeclaration>) -> SignerResult<Self> {
        Self::with_limits(types, &Limits::default())
    }

    /// Validate declarations.
    ///
    /// Rejects malformed or reserved names, duplicate fields, oversized
    /// declarations, and references to undeclared types.
    pub fn with_limits(
        types: BTreeMap<String, TypeDeclaration>,
        limits: &Limits,
    ) -> SignerResult<Self> {
        if types.len() as u64 > limits.max_types {
            return Err(ErrorCode::E304_TooManyTypes(limits.max_types));
        }
        for (name, declaration) in &types {
            if Primitive::from_name(name).is_some() {
                return Err(ErrorCode::E306_ReservedTypeName(name.clone()));
            }
            if !is_valid_name(name) {
                return Err(ErrorCode::E205_MalformedTypeRef(name.clone()));
            }
            if declaration.len() as u64 > limits.max_fields_per_type {
                return Err(ErrorCode::E305_TooManyFields(
                    name.clone(),
                    limits.max_fields_per_type,
                ));
            }
            let mut seen = std::collections::BTreeSet::new();
            for field in declaration.fields() {
                if !seen.insert(field.name.as_str()) {
                    return Err(ErrorCode::E301_DuplicateField(
                        name.clone(),
                        field.name.clone(),
                    ));
                }
                if let Some(target) = field.type_ref.struct_name() {
                    if !types.contains_key(target) {
                        return Err(ErrorCode::E300_UnknownType(target.to_string()));
                    }
                }
            }
        }
        Ok(Self { types })
    }

    /// Parse the JSON form `{"Name": [{"name": "f", "type": "felt"}, ...]}`.
    pub fn from_json(value: &serde_json::Value, limits: &Limits) -> SignerResult<Self> {
        let raw: BTreeMap<String, Vec<RawField>> = serde_json::from_value(value.clone())
            .map_err(|e| ErrorCode::E206_InvalidJson(e.to_string()))?;
        Self::from_raw(&raw, limits)
    }

    fn from_raw(raw: &BTreeMap<String, Vec<RawField>>, limits: &Limits) -> SignerResult<Self> {
        let mut declarations = BTreeMap::new();
        for (name, fields) in raw {
            let fields = fields
                .iter()
                .map(|f| FieldDeclaration::new(&f.name, &f.type_name))
                .collect::<SignerResult<Vec<_>>>()?;
            declarations.insert(name.clone(), TypeDeclaration { fields });
        }
        Self::with_limits(declarations, limits)
    }

    /// Look up a declaration.
    pub fn get(&self, name: &str) -> SignerResult<&TypeDeclaration> {
        self.types
            .get(name)
            .ok_or_else(|| ErrorCode::E300_UnknownType(name.to_string()))
    }

    /// Whether a type is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Declared type names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Number of declared types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether nothing is declared.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// A value carried by a typed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// An integer already in the field
    Scalar(FieldElement),
    /// Hex, decimal numeral, or short string; decoded at encoding time
    Text(String),
    /// Nested struct data
    Struct(BTreeMap<String, Value>),
    /// Array data for `T*` fields
    Array(Vec<Value>),
}

impl Value {
    /// Shorthand for [`Value::Text`].
    pub fn text(value: impl Into<String>) -> Value {
        Value::Text(value.into())
    }

    /// Build a struct value from `(field, value)` pairs.
    pub fn object<const N: usize>(pairs: [(&str, Value); N]) -> Value {
        Value::Struct(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    /// Convert a JSON value.
    ///
    /// Integers become scalars (negatives wrap), booleans become 0/1, strings
    /// are kept as text. Floats and `null` have no field encoding.
    pub fn from_json(value: &serde_json::Value) -> SignerResult<Value> {
        match value {
            serde_json::Value::Null => Err(ErrorCode::E204_UnsupportedJsonValue(
                "null".to_string(),
            )),
            serde_json::Value::Bool(b) => Ok(Value::Scalar(FieldElement::from_u64(u64::from(*b)))),
            serde_json::Value::Number(n) => {
                if let Some(v) = n.as_u64() {
                    Ok(Value::Scalar(FieldElement::from_u64(v)))
                } else if let Some(v) = n.as_i64() {
                    Ok(Value::Scalar(FieldElement::from_i64(v)))
                } else {
                    Err(ErrorCode::E204_UnsupportedJsonValue(format!(
                        "non-integer number {}",
                        n
                    )))
                }
            }
            serde_json::Value::String(s) => Ok(Value::Text(s.clone())),
            serde_json::Value::Array(items) => Ok(Value::Array(
                items
                    .iter()
                    .map(Value::from_json)
                    .collect::<SignerResult<Vec<_>>>()?,
            )),
            serde_json::Value::Object(map) => Ok(Value::Struct(struct_from_json(map)?)),
        }
    }

    /// Convert back to JSON; scalars are rendered as hex strings.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Scalar(x) => serde_json::Value::String(x.to_hex()),
            Value::Text(s) => serde_json::Value::String(s.clone()),
            Value::Struct(fields) => struct_to_json(fields),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
        }
    }
}

impl From<FieldElement> for Value {
    fn from(value: FieldElement) -> Self {
        Value::Scalar(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

fn struct_from_json(
    map: &serde_json::Map<String, serde_json::Value>,
) -> SignerResult<BTreeMap<String, Value>> {
    map.iter()
        .map(|(k, v)| Ok((k.clone(), Value::from_json(v)?)))
        .collect()
}

fn struct_to_json(fields: &BTreeMap<String, Value>) -> serde_json::Value {
    serde_json::Value::Object(
        fields
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect(),
    )
}

/// Wire shape of a typed message.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTypedMessage {
    types: BTreeMap<String, Vec<RawField>>,
    primary_type: String,
    domain: serde_json::Map<String, serde_json::Value>,
    message: serde_json::Map<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    domain_type: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawField {
    name: String,
    #[serde(rename = "type")]
    type_name: String,
}

/// A complete typed message: declarations, domain data and message data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedMessage {
    types: TypeSet,
    primary_type: String,
    domain_type: String,
    domain: BTreeMap<String, Value>,
    message: BTreeMap<String, Value>,
}

impl TypedMessage {
    /// Assemble a message using the default domain type.
    ///
    /// Both the primary type and the domain type must be declared.
    pub fn new(
        types: TypeSet,
        primary_type: &str,
        domain: BTreeMap<String, Value>,
        message: BTreeMap<String, Value>,
    ) -> SignerResult<Self> {
        Self::with_domain_type(types, primary_type, DEFAULT_DOMAIN_TYPE, domain, message)
    }

    /// Assemble a message with an explicit domain type.
    pub fn with_domain_type(
        types: TypeSet,
        primary_type: &str,
        domain_type: &str,
        domain: BTreeMap<String, Value>,
        message: BTreeMap<String, Value>,
    ) -> SignerResult<Self> {
        types.get(primary_type)?;
        types.get(domain_type)?;
        Ok(Self {
            types,
            primary_type: primary_type.to_string(),
            domain_type: domain_type.to_string(),
            domain,
            message,
        })
    }

    /// Parse the JSON form `{types, primaryType, domain, message}`.
    pub fn from_json_str(json: &str) -> SignerResult<Self> {
        Self::from_json_str_with_limits(json, &Limits::default())
    }

    /// Parse the JSON form under explicit limits.
    pub fn from_json_str_with_limits(json: &str, limits: &Limits) -> SignerResult<Self> {
        let raw: RawTypedMessage =
            serde_json::from_str(json).map_err(|e| ErrorCode::E206_InvalidJson(e.to_string()))?;
        Self::from_raw(raw, limits)
    }

    /// Convert an already-parsed JSON value.
    pub fn from_json(value: serde_json::Value, limits: &Limits) -> SignerResult<Self> {
        let raw: RawTypedMessage =
            serde_json::from_value(value).map_err(|e| ErrorCode::E206_InvalidJson(e.to_string()))?;
        Self::from_raw(raw, limits)
    }

    fn from_raw(raw: RawTypedMessage, limits: &Limits) -> SignerResult<Self> {
        let types = TypeSet::from_raw(&raw.types, limits)?;
        let domain_type = raw.domain_type.as_deref().unwrap_or(DEFAULT_DOMAIN_TYPE);
        Self::with_domain_type(
            types,
            &raw.primary_type,
            domain_type,
            struct_from_json(&raw.domain)?,
            struct_from_json(&raw.message)?,
        )
    }

    /// Render the message back into its JSON form.
    pub fn to_json(&self) -> serde_json::Value {
        let types = self
            .types
            .types
            .iter()
            .map(|(name, decl)| {
                let fields = decl
                    .fields()
                    .iter()
                    .map(|f| {
                        serde_json::json!({ "name": f.name, "type": f.type_ref.to_string() })
                    })
                    .collect::<Vec<_>>();
                (name.clone(), serde_json::Value::Array(fields))
            })
            .collect::<serde_json::Map<_, _>>();
        let mut out = serde_json::json!({
            "types": types,
            "primaryType": self.primary_type,
            "domain": struct_to_json(&self.domain),
            "message": struct_to_json(&self.message),
        });
        if self.domain_type != DEFAULT_DOMAIN_TYPE {
            out["domainType"] = serde_json::Value::String(self.domain_type.clone());
        }
        out
    }

    /// Declared types.
    pub fn types(&self) -> &TypeSet {
        &self.types
    }

    /// Name of the message's root type.
    pub fn primary_type(&self) -> &str {
        &self.primary_type
    }

    /// Name of the domain's type.
    pub fn domain_type(&self) -> &str {
        &self.domain_type
    }

    /// Domain data.
    pub fn domain(&self) -> &BTreeMap<String, Value> {
        &self.domain
    }

    /// Message data.
    pub fn message(&self) -> &BTreeMap<String, Value> {
        &self.message
    }
}
