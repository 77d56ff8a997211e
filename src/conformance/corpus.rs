//! Corpus-based conformance testing.
//!
//! A corpus is a JSON document of known-answer vectors:
//!
//! ```json
//! {
//!   "manifest": { "format_version": "1", ... },
//!   "vectors": [
//!     { "id": "pedersen-zero", "op": "pedersen",
//!       "input": { "a": "0x0", "b": "0x0" },
//!       "expected": { "ok": { "result": "0x49ee..." } } },
//!     { "id": "grind-limit-one", "op": "grind_key",
//!       "input": { "seed": "0x1", "limit": "0x1" },
//!       "expected": { "err": { "code": 400 } } }
//!   ]
//! }
//! ```
//!
//! `ok.result` is compared as a JSON value; `err.code` against
//! [`crate::ErrorCode::code`].

use crate::derivation::{derive_key, grind_key};
use crate::ecdsa::{self, NonceStrategy, Signature};
use crate::error::{ErrorCode, SignerResult};
use crate::field::{field_prime, FieldElement, EC_ORDER_HEX};
use crate::hash::{chain_hash, HashBackend, HashBackendKind};
use crate::paradex::{compute_account_address, SystemConfig};
use crate::typed_data::{type_hash, type_signature, Limits, TypeSet, TypedMessage, TypedDataHasher};
use num_bigint::BigUint;
use serde::Deserialize;
use serde_json::{json, Value as Json};
use std::fs;
use std::path::Path;

/// Corpus manifest with metadata.
#[derive(Debug, Deserialize)]
pub struct CorpusManifest {
    /// Format version of the corpus file.
    pub format_version: String,
    /// Field prime in decimal.
    pub field_prime: String,
    /// Curve order in hex.
    pub curve_order: String,
    /// Corpus version.
    pub version: String,
}

/// A corpus containing test vectors.
#[derive(Debug, Deserialize)]
pub struct Corpus {
    /// Corpus metadata.
    pub manifest: CorpusManifest,
    /// List of test vectors.
    pub vectors: Vec<TestVector>,
}

/// A single test vector.
#[derive(Debug, Deserialize)]
pub struct TestVector {
    /// Unique identifier for the test.
    pub id: String,
    /// Operation to test (e.g., "pedersen", "message_hash").
    pub op: String,
    /// Input parameters for the operation.
    pub input: Json,
    /// Expected result (success or error).
    pub expected: Json,
}

/// Result of running a single test vector.
#[derive(Debug)]
pub enum TestResult {
    /// Test passed.
    Pass,
    /// Test failed with mismatch.
    Fail {
        /// Expected result from the corpus.
        expected: String,
        /// Actual result from the library.
        actual: String,
    },
    /// Test was skipped (operation not implemented).
    Skip {
        /// Reason for skipping.
        reason: String,
    },
    /// Test errored during execution.
    Error {
        /// Error message.
        message: String,
    },
}

impl TestResult {
    /// Returns true if this is a passing result.
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// Returns true if this is a failing result.
    pub fn is_fail(&self) -> bool {
        matches!(self, Self::Fail { .. })
    }
}

/// Results from running the corpus.
#[derive(Debug, Default)]
pub struct CorpusResults {
    /// Number of tests that passed.
    pub passed: usize,
    /// Number of tests that failed.
    pub failed: usize,
    /// Number of tests that were skipped.
    pub skipped: usize,
    /// Number of tests that errored.
    pub errors: usize,
    /// Detailed results for each test.
    pub details: Vec<(String, TestResult)>,
}

impl CorpusResults {
    /// Create a new empty results container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a test result.
    pub fn record(&mut self, id: &str, result: TestResult) {
        match &result {
            TestResult::Pass => self.passed += 1,
            TestResult::Fail { .. } => self.failed += 1,
            TestResult::Skip { .. } => self.skipped += 1,
            TestResult::Error { .. } => self.errors += 1,
        }
        self.details.push((id.to_string(), result));
    }

    /// Get total number of tests run.
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped + self.errors
    }

    /// Returns true if all tests passed (no failures or errors).
    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.errors == 0
    }

    /// Get a summary string of the results.
    pub fn summary(&self) -> String {
        format!(
            "{} passed, {} failed, {} skipped, {} errors (total: {})",
            self.passed,
            self.failed,
            self.skipped,
            self.errors,
            self.total()
        )
    }

    /// Get failures only.
    pub fn failures(&self) -> Vec<&(String, TestResult)> {
        self.details
            .iter()
            .filter(|(_, r)| matches!(r, TestResult::Fail { .. }))
            .collect()
    }

    /// Get errors only.
    pub fn error_details(&self) -> Vec<&(String, TestResult)> {
        self.details
            .iter()
            .filter(|(_, r)| matches!(r, TestResult::Error { .. }))
            .collect()
    }
}

/// Corpus runner that executes test vectors.
pub struct CorpusRunner {
    corpus: Corpus,
    backend: Box<dyn HashBackend>,
}

impl CorpusRunner {
    /// Load corpus from a file path.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read corpus file: {}", e))?;
        Self::from_json_str(&content)
    }

    /// Parse a corpus from a JSON string.
    pub fn from_json_str(content: &str) -> Result<Self, String> {
        let corpus: Corpus = serde_json::from_str(content)
            .map_err(|e| format!("Failed to parse corpus JSON: {}", e))?;
        if corpus.manifest.field_prime != field_prime().to_string()
            || corpus.manifest.curve_order != EC_ORDER_HEX
        {
            return Err("Corpus manifest targets different curve parameters".to_string());
        }
        Ok(Self {
            corpus,
            backend: HashBackendKind::default().build(),
        })
    }

    /// Run hashing vectors with a different backend.
    pub fn with_backend(mut self, kind: HashBackendKind) -> Self {
        self.backend = kind.build();
        self
    }

    /// Get the corpus manifest.
    pub fn manifest(&self) -> &CorpusManifest {
        &self.corpus.manifest
    }

    /// Get the number of test vectors.
    pub fn vector_count(&self) -> usize {
        self.corpus.vectors.len()
    }

    /// Run all test vectors and return results.
    pub fn run_all(&self) -> CorpusResults {
        let mut results = CorpusResults::new();

        for vector in &self.corpus.vectors {
            let result = self.run_vector(vector);
            tracing::debug!(id = %vector.id, op = %vector.op, pass = result.is_pass(), "ran vector");
            results.record(&vector.id, result);
        }

        results
    }

    /// Run a single test vector.
    fn run_vector(&self, vector: &TestVector) -> TestResult {
        let input = &vector.input;
        let outcome = match vector.op.as_str() {
            "pedersen" => self.run_pedersen(input),
            "chain_hash" => self.run_chain_hash(input),
            "parse_value" => run_parse_value(input),
            "type_signature" => run_type_signature(input),
            "type_hash" => run_type_hash(input),
            "struct_hash" => self.run_struct_hash(input),
            "message_hash" => self.run_message_hash(input),
            "grind_key" => run_grind_key(input),
            "derive_key" => run_derive_key(input),
            "public_key" => run_public_key(input),
            "sign_fixed" => run_sign_fixed(input),
            "verify" => run_verify(input),
            "account_address" => self.run_account_address(input),
            _ => {
                return TestResult::Skip {
                    reason: format!("Unknown operation: {}", vector.op),
                }
            }
        };
        match outcome {
            Ok(result) => check(&vector.expected, result),
            Err(VectorError::Malformed(message)) => TestResult::Error { message },
            Err(VectorError::Library(err)) => check(&vector.expected, Err(err)),
        }
    }

    fn run_pedersen(&self, input: &Json) -> Outcome {
        let a = felt(input, "a")?;
        let b = felt(input, "b")?;
        Ok(Ok(json!(self.backend.compress(&a, &b).to_hex())))
    }

    fn run_chain_hash(&self, input: &Json) -> Outcome {
        let elements = input
            .get("elements")
            .and_then(Json::as_array)
            .ok_or_else(|| malformed("elements"))?
            .iter()
            .map(|e| {
                e.as_str()
                    .ok_or_else(|| malformed("elements[]"))
                    .and_then(|s| FieldElement::from_hex(s).map_err(VectorError::Library))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Ok(json!(chain_hash(self.backend.as_ref(), &elements).to_hex())))
    }

    fn run_struct_hash(&self, input: &Json) -> Outcome {
        let types = TypeSet::from_json(field(input, "types")?, &Limits::default())?;
        let name = string(input, "type")?;
        let data = crate::typed_data::Value::from_json(field(input, "data")?)?;
        let crate::typed_data::Value::Struct(data) = data else {
            return Err(malformed("data"));
        };
        let hash = TypedDataHasher::new(self.backend.as_ref(), &types).struct_hash(name, &data);
        Ok(hash.map(|h| json!(h.to_hex())))
    }

    fn run_message_hash(&self, input: &Json) -> Outcome {
        let typed = TypedMessage::from_json(field(input, "typed_data")?.clone(), &Limits::default())?;
        let account = felt(input, "account")?;
        let hash = crate::typed_data::message_hash(self.backend.as_ref(), &typed, &account);
        Ok(hash.map(|h| json!(h.to_hex())))
    }

    fn run_account_address(&self, input: &Json) -> Outcome {
        let config: SystemConfig = serde_json::from_value(field(input, "config")?.clone())
            .map_err(|e| VectorError::Malformed(format!("config: {}", e)))?;
        let public_key = felt(input, "public_key")?;
        let address = compute_account_address(self.backend.as_ref(), &config, &public_key);
        Ok(address.map(|a| json!(a.to_hex())))
    }
}

/// Why a vector could not produce a comparable outcome.
enum VectorError {
    /// The vector itself is malformed.
    Malformed(String),
    /// The library rejected an input while it was being prepared.
    Library(ErrorCode),
}

impl From<ErrorCode> for VectorError {
    fn from(err: ErrorCode) -> Self {
        VectorError::Library(err)
    }
}

type Outcome = Result<SignerResult<Json>, VectorError>;

fn malformed(key: &str) -> VectorError {
    VectorError::Malformed(format!("Missing or invalid '{}' in input", key))
}

fn field<'a>(input: &'a Json, key: &str) -> Result<&'a Json, VectorError> {
    input.get(key).ok_or_else(|| malformed(key))
}

fn string<'a>(input: &'a Json, key: &str) -> Result<&'a str, VectorError> {
    field(input, key)?.as_str().ok_or_else(|| malformed(key))
}

fn felt(input: &Json, key: &str) -> Result<FieldElement, VectorError> {
    Ok(FieldElement::from_hex(string(input, key)?)?)
}

fn biguint(input: &Json, key: &str) -> Result<BigUint, VectorError> {
    let raw = string(input, key)?;
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    BigUint::parse_bytes(digits.as_bytes(), 16)
        .ok_or(VectorError::Library(ErrorCode::E100_InvalidHex(raw.to_string())))
}

fn run_parse_value(input: &Json) -> Outcome {
    let value = string(input, "value")?;
    Ok(FieldElement::parse_value(value).map(|v| json!(v.to_hex())))
}

fn run_type_signature(input: &Json) -> Outcome {
    let types = TypeSet::from_json(field(input, "types")?, &Limits::default())?;
    Ok(type_signature(&types, string(input, "root")?).map(Json::String))
}

fn run_type_hash(input: &Json) -> Outcome {
    let types = TypeSet::from_json(field(input, "types")?, &Limits::default())?;
    Ok(type_hash(&types, string(input, "root")?).map(|h| json!(h.to_hex())))
}

fn run_grind_key(input: &Json) -> Outcome {
    let seed = biguint(input, "seed")?;
    let limit = biguint(input, "limit")?;
    Ok(grind_key(&seed, &limit).map(|k| json!(format!("{:#x}", k))))
}

fn run_derive_key(input: &Json) -> Outcome {
    Ok(derive_key(string(input, "signature")?).map(|k| json!(k.to_hex())))
}

fn run_public_key(input: &Json) -> Outcome {
    Ok(ecdsa::public_key(&felt(input, "private_key")?).map(|k| json!(k.to_hex())))
}

fn run_sign_fixed(input: &Json) -> Outcome {
    let hash = felt(input, "hash")?;
    let key = felt(input, "private_key")?;
    let nonce = NonceStrategy::Fixed { k: felt(input, "k")? };
    Ok(ecdsa::sign(&hash, &key, &nonce).map(|sig| json!(sig.to_hex_pair())))
}

fn run_verify(input: &Json) -> Outcome {
    let hash = felt(input, "hash")?;
    let signature = Signature::from_hex_pair(string(input, "r")?, string(input, "s")?)?;
    let public_key = felt(input, "public_key")?;
    Ok(Ok(json!(ecdsa::verify(&hash, &signature, &public_key))))
}

/// Compare an outcome against `{"ok": {"result": ...}}` or `{"err": {"code": N}}`.
fn check(expected: &Json, actual: SignerResult<Json>) -> TestResult {
    if let Some(ok) = expected.get("ok") {
        let expected_result = ok.get("result").cloned().unwrap_or(Json::Null);
        match actual {
            Ok(value) if value == expected_result => TestResult::Pass,
            Ok(value) => TestResult::Fail {
                expected: expected_result.to_string(),
                actual: value.to_string(),
            },
            Err(e) => TestResult::Fail {
                expected: format!("ok: {}", expected_result),
                actual: format!("err: {}", e),
            },
        }
    } else if let Some(err) = expected.get("err") {
        let expected_code = err.get("code").and_then(Json::as_u64).unwrap_or(0);
        match actual {
            Err(e) if u64::from(e.code()) == expected_code => TestResult::Pass,
            Err(e) => TestResult::Fail {
                expected: format!("E{}", expected_code),
                actual: format!("E{}", e.code()),
            },
            Ok(value) => TestResult::Fail {
                expected: format!("E{}", expected_code),
                actual: format!("ok: {}", value),
            },
        }
    } else {
        TestResult::Error {
            message: "Invalid expected format".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(vectors: &str) -> CorpusRunner {
        let doc = format!(
            r#"{{"manifest": {{"format_version": "1", "field_prime": "{}", "curve_order": "{}", "version": "test"}},
                "vectors": {}}}"#,
            field_prime(),
            EC_ORDER_HEX,
            vectors
        );
        CorpusRunner::from_json_str(&doc).unwrap()
    }

    #[test]
    fn test_pass_fail_skip_error() {
        let runner = corpus(
            r#"[
                {"id": "ok", "op": "parse_value", "input": {"value": "0x10"}, "expected": {"ok": {"result": "0x10"}}},
                {"id": "wrong", "op": "parse_value", "input": {"value": "0x10"}, "expected": {"ok": {"result": "0x11"}}},
                {"id": "err", "op": "parse_value", "input": {"value": "0xzz"}, "expected": {"err": {"code": 100}}},
                {"id": "skip", "op": "pairing", "input": {}, "expected": {"ok": {"result": "0x0"}}},
                {"id": "broken", "op": "pedersen", "input": {"a": "0x1"}, "expected": {"ok": {"result": "0x0"}}}
            ]"#,
        );
        let results = runner.run_all();
        assert_eq!(results.passed, 2);
        assert_eq!(results.failed, 1);
        assert_eq!(results.skipped, 1);
        assert_eq!(results.errors, 1);
        assert!(!results.all_passed());
        assert_eq!(results.failures().len(), 1);
        assert_eq!(results.error_details().len(), 1);
    }

    #[test]
    fn test_manifest_mismatch_rejected() {
        let doc = r#"{"manifest": {"format_version": "1", "field_prime": "7", "curve_order": "0x5", "version": "x"}, "vectors": []}"#;
        assert!(CorpusRunner::from_json_str(doc).is_err());
    }
}
