//! Golden-vector and cross-backend conformance.
//!
//! - [`corpus`] runs a JSON corpus of known-answer vectors through the library
//!   and compares outputs (or error codes) exactly.
//! - [`DiffTestHarness`] hashes the same inputs with both Pedersen backends and
//!   reports any divergence.

pub mod corpus;
mod harness;

pub use corpus::{Corpus, CorpusManifest, CorpusResults, CorpusRunner, TestResult, TestVector};
pub use harness::{BatchResult, DiffResult, DiffTestHarness, FailureDetail};
