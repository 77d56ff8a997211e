//! Typed-message hashing (Starknet off-chain message format).
//!
//! # Architecture
//!
//! - [`types`] - Declarations, values and the [`TypedMessage`] container
//! - [`resolver`] - Dependency walk, type signatures and type hashes
//! - [`encoder`] - Field encoding, struct hashes and the final message hash
//! - [`limits`] - Resource bounds on untrusted messages
//!
//! The message hash binds a domain, a signer account and a message:
//!
//! ```text
//! chain_hash([shortstr("StarkNet Message"),
//!             structHash(domainType, domain),
//!             account,
//!             structHash(primaryType, message)])
//! ```

pub mod encoder;
pub mod limits;
pub mod resolver;
pub mod types;

pub use encoder::{message_hash, TypedDataHasher, MESSAGE_PREFIX};
pub use limits::Limits;
pub use resolver::{dependencies, encode_type, type_hash, type_signature};
pub use types::{
    FieldDeclaration, Primitive, TypeDeclaration, TypeRef, TypeSet, TypedMessage, Value,
    DEFAULT_DOMAIN_TYPE,
};
