//! Differential testing of the two Pedersen backends.

use crate::error::{ErrorCode, SignerResult};
use crate::field::FieldElement;
use crate::hash::{HashBackend, ReferencePedersen, TablePedersen};
use crate::typed_data::{message_hash, TypedMessage};

/// Result of a differential test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffResult {
    /// Both backends produced the same output.
    Match {
        /// The matching output, as hex.
        value: String,
    },
    /// The backends disagree.
    Mismatch {
        /// Output of the table backend.
        table: String,
        /// Output of the reference backend.
        reference: String,
    },
}

impl DiffResult {
    /// Check if the result is a match.
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Match { .. })
    }

    /// Check if the result is a mismatch.
    pub fn is_mismatch(&self) -> bool {
        matches!(self, Self::Mismatch { .. })
    }

    fn compare(table: FieldElement, reference: FieldElement) -> Self {
        if table == reference {
            DiffResult::Match {
                value: table.to_hex(),
            }
        } else {
            DiffResult::Mismatch {
                table: table.to_hex(),
                reference: reference.to_hex(),
            }
        }
    }
}

/// Runs identical inputs through [`TablePedersen`] and [`ReferencePedersen`].
#[derive(Debug, Default)]
pub struct DiffTestHarness {
    table: TablePedersen,
    reference: ReferencePedersen,
}

impl DiffTestHarness {
    /// Create a new test harness.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare a single compression.
    pub fn compare_compress(&self, left: &FieldElement, right: &FieldElement) -> DiffResult {
        DiffResult::compare(
            self.table.compress(left, right),
            self.reference.compress(left, right),
        )
    }

    /// Compare the hash of a complete typed message.
    ///
    /// Encoding errors are backend independent and are returned as-is.
    pub fn compare_message(
        &self,
        typed: &TypedMessage,
        account_address: &FieldElement,
    ) -> SignerResult<DiffResult> {
        let table = message_hash(&self.table, typed, account_address)?;
        let reference = message_hash(&self.reference, typed, account_address)?;
        Ok(DiffResult::compare(table, reference))
    }

    /// Run a batch of message comparisons.
    pub fn run_batch<'a>(
        &self,
        tests: impl Iterator<Item = (&'a str, &'a TypedMessage, &'a FieldElement)>,
    ) -> BatchResult {
        let mut results = BatchResult::new();

        for (name, typed, account) in tests {
            match self.compare_message(typed, account) {
                Ok(DiffResult::Match { .. }) => results.passed += 1,
                Ok(DiffResult::Mismatch { table, reference }) => {
                    tracing::error!(name, %table, %reference, "hash backends disagree");
                    results.failed += 1;
                    results.failures.push(FailureDetail {
                        name: name.to_string(),
                        table,
                        reference,
                    });
                }
                Err(err) => {
                    results.errors += 1;
                    results.error_details.push((name.to_string(), err));
                }
            }
        }

        results
    }
}

/// Results from running a batch of differential tests.
#[derive(Debug, Default)]
pub struct BatchResult {
    /// Number of tests that matched.
    pub passed: usize,
    /// Number of tests whose backends disagreed.
    pub failed: usize,
    /// Number of tests that could not be hashed.
    pub errors: usize,
    /// Details of failures.
    pub failures: Vec<FailureDetail>,
    /// Details of errors.
    pub error_details: Vec<(String, ErrorCode)>,
}

/// Details about a backend disagreement.
#[derive(Debug, Clone)]
pub struct FailureDetail {
    /// Test name.
    pub name: String,
    /// Output of the table backend.
    pub table: String,
    /// Output of the reference backend.
    pub reference: String,
}

impl BatchResult {
    /// Create a new empty batch result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of tests run.
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.errors
    }

    /// Returns true if no backend disagreed.
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Summary line.
    pub fn summary(&self) -> String {
        format!(
            "{} matched, {} mismatched, {} errors (total: {})",
            self.passed,
            self.failed,
            self.errors,
            self.total()
        )
    }
}
