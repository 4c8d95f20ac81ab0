//! Core domain models for constraint violations and validation results
//!
//! Architecture: Rich Domain Models - Violations are values with behavior, not just data
//! - A Violation names the constraint, the failing element and where it sits in the tree
//! - ValidationResult is a tagged outcome; Invalid can only be built from a non-empty list
//! - ValidationReport acts as an aggregate root for batch validation runs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single failed constraint instance for one element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Canonical constraint identifier, e.g. `AASd-090`
    pub constraint_id: String,
    /// idShort of the element that failed the constraint
    pub subject_identifier: String,
    /// Dot-joined idShort path from the validated root to the failing element
    pub path: String,
    /// The constraint's rule text, verbatim
    pub detail_message: String,
    /// The value the constraint rejected, when there is one
    pub offending_value: Option<String>,
}

impl Violation {
    /// Create a new violation located at the element itself
    pub fn new(
        constraint_id: impl Into<String>,
        subject_identifier: impl Into<String>,
        detail_message: impl Into<String>,
    ) -> Self {
        let subject_identifier = subject_identifier.into();
        Self {
            constraint_id: constraint_id.into(),
            path: subject_identifier.clone(),
            subject_identifier,
            detail_message: detail_message.into(),
            offending_value: None,
        }
    }

    /// Set the location path of the failing element
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Record the rejected value
    pub fn with_offending_value(mut self, value: impl Into<String>) -> Self {
        self.offending_value = Some(value.into());
        self
    }

    /// Format violation for display.
    ///
    /// The rule text always comes last so callers can match on the message suffix.
    pub fn format_display(&self) -> String {
        format!("[{}] {}: {}", self.constraint_id, self.path, self.detail_message)
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_display())
    }
}

/// Ordered, non-empty sequence of violations
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViolationList {
    violations: Vec<Violation>,
}

impl ViolationList {
    /// Wrap a list of violations, returning `None` when it is empty
    pub fn new(violations: Vec<Violation>) -> Option<Self> {
        if violations.is_empty() {
            None
        } else {
            Some(Self { violations })
        }
    }

    /// The first violation in evaluation order
    pub fn first(&self) -> &Violation {
        // Non-empty by construction.
        &self.violations[0]
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Always false; present for API symmetry with slices
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.violations.iter()
    }

    pub fn as_slice(&self) -> &[Violation] {
        &self.violations
    }

    /// Ids of the violated constraints, in evaluation order
    pub fn constraint_ids(&self) -> impl Iterator<Item = &str> {
        self.violations.iter().map(|v| v.constraint_id.as_str())
    }

    pub fn into_vec(self) -> Vec<Violation> {
        self.violations
    }
}

impl<'a> IntoIterator for &'a ViolationList {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.iter()
    }
}

/// Outcome of validating one element (and its children)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(ViolationList),
}

impl ValidationResult {
    /// Build a result from collected violations
    pub fn from_violations(violations: Vec<Violation>) -> Self {
        match ViolationList::new(violations) {
            Some(list) => Self::Invalid(list),
            None => Self::Valid,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Violations in evaluation order; empty when valid
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Valid => &[],
            Self::Invalid(list) => list.as_slice(),
        }
    }

    /// Convert into the raising form
    pub fn into_result(self) -> Result<(), ValidationFailure> {
        match self {
            Self::Valid => Ok(()),
            Self::Invalid(violations) => Err(ValidationFailure { violations }),
        }
    }
}

/// One or more constraints were violated.
///
/// The surfaced message is the first violation's rule text behind a location
/// prefix; the full list stays available through [`ValidationFailure::violations`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", .violations.first())]
pub struct ValidationFailure {
    violations: ViolationList,
}

impl ValidationFailure {
    pub fn new(violations: ViolationList) -> Self {
        Self { violations }
    }

    pub fn violations(&self) -> &ViolationList {
        &self.violations
    }

    /// Rule text of the first violation
    pub fn detail_message(&self) -> &str {
        &self.violations.first().detail_message
    }

    pub fn into_violations(self) -> ViolationList {
        self.violations
    }
}

/// Summary statistics for a batch validation report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationSummary {
    /// Number of root elements validated
    pub total_elements: usize,
    /// Number of root elements with at least one violation
    pub invalid_elements: usize,
    /// Violation counts keyed by constraint id
    pub violations_by_constraint: BTreeMap<String, usize>,
    /// Total execution time in milliseconds
    pub execution_time_ms: u64,
    /// Timestamp when validation was performed
    pub validated_at: DateTime<Utc>,
}

impl ValidationSummary {
    /// Total number of violations across all constraints
    pub fn total_violations(&self) -> usize {
        self.violations_by_constraint.values().sum()
    }
}

/// Complete batch report containing all violations and metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    /// All violations, in input order then evaluation order
    pub violations: Vec<Violation>,
    /// Summary statistics
    pub summary: ValidationSummary,
}

impl ValidationReport {
    /// Create a new empty validation report
    pub fn new() -> Self {
        Self {
            violations: Vec::new(),
            summary: ValidationSummary {
                validated_at: Utc::now(),
                ..Default::default()
            },
        }
    }

    /// Record the outcome of validating one root element
    pub fn add_result(&mut self, result: ValidationResult) {
        self.summary.total_elements += 1;
        if let ValidationResult::Invalid(list) = result {
            self.summary.invalid_elements += 1;
            for violation in list.into_vec() {
                self.add_violation(violation);
            }
        }
    }

    /// Add a violation to the report
    pub fn add_violation(&mut self, violation: Violation) {
        *self
            .summary
            .violations_by_constraint
            .entry(violation.constraint_id.clone())
            .or_default() += 1;
        self.violations.push(violation);
    }

    /// Whether the report contains any violations
    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    /// Get violations of a specific constraint
    pub fn violations_of<'a>(&'a self, constraint_id: &'a str) -> impl Iterator<Item = &'a Violation> {
        self.violations
            .iter()
            .filter(move |v| v.constraint_id == constraint_id)
    }

    /// Set the execution time
    pub fn set_execution_time(&mut self, duration_ms: u64) {
        self.summary.execution_time_ms = duration_ms;
    }

    /// Merge another report into this one
    pub fn merge(&mut self, other: ValidationReport) {
        for violation in other.violations {
            self.add_violation(violation);
        }
        self.summary.total_elements += other.summary.total_elements;
        self.summary.invalid_elements += other.summary.invalid_elements;
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Error types that can occur while configuring or running validation
#[derive(Debug, thiserror::Error)]
pub enum ValidatorError {
    /// Constraint catalogue or configuration file is malformed
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// File could not be read or accessed
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// A model element is missing a required field
    #[error("Model error: {message}")]
    Model { message: String },

    /// One or more constraints were violated
    #[error(transparent)]
    Validation(#[from] ValidationFailure),
}

impl ValidatorError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a model construction error
    pub fn model(message: impl Into<String>) -> Self {
        Self::Model {
            message: message.into(),
        }
    }
}

/// Result type for validator operations
pub type ValidatorResult<T> = Result<T, ValidatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn category_violation(id_short: &str) -> Violation {
        Violation::new("AASd-090", id_short, "category rule text")
    }

    #[test]
    fn test_violation_creation() {
        let violation = category_violation("idShort1").with_offending_value("WRONG");

        assert_eq!(violation.constraint_id, "AASd-090");
        assert_eq!(violation.subject_identifier, "idShort1");
        assert_eq!(violation.path, "idShort1");
        assert_eq!(violation.offending_value.as_deref(), Some("WRONG"));
    }

    #[test]
    fn test_display_ends_with_rule_text() {
        let violation = category_violation("child").with_path("parent.child");
        let display = violation.to_string();

        assert_eq!(display, "[AASd-090] parent.child: category rule text");
        assert!(display.ends_with("category rule text"));
    }

    #[test]
    fn test_violation_list_rejects_empty() {
        assert!(ViolationList::new(Vec::new()).is_none());
        assert_eq!(
            ValidationResult::from_violations(Vec::new()),
            ValidationResult::Valid
        );
    }

    #[test]
    fn test_failure_surfaces_first_violation() {
        let result = ValidationResult::from_violations(vec![
            Violation::new("AASd-002", "1bad", "idShort rule text"),
            category_violation("1bad"),
        ]);
        assert!(!result.is_valid());
        assert_eq!(result.violations().len(), 2);

        let failure = result.into_result().unwrap_err();
        assert_eq!(failure.detail_message(), "idShort rule text");
        assert!(failure.to_string().ends_with("idShort rule text"));
        assert_eq!(
            failure.violations().constraint_ids().collect::<Vec<_>>(),
            vec!["AASd-002", "AASd-090"]
        );

        let error: ValidatorError = failure.into();
        assert!(error.to_string().ends_with("idShort rule text"));
    }

    #[test]
    fn test_validation_report() {
        let mut report = ValidationReport::new();
        report.add_result(ValidationResult::Valid);
        report.add_result(ValidationResult::from_violations(vec![
            category_violation("a"),
            Violation::new("AASd-100", "a", "empty string rule text"),
        ]));
        report.add_result(ValidationResult::from_violations(vec![category_violation("b")]));

        assert!(report.has_violations());
        assert_eq!(report.summary.total_elements, 3);
        assert_eq!(report.summary.invalid_elements, 2);
        assert_eq!(report.summary.total_violations(), 3);
        assert_eq!(report.summary.violations_by_constraint["AASd-090"], 2);
        assert_eq!(report.violations_of("AASd-100").count(), 1);
    }

    #[test]
    fn test_report_merge() {
        let mut first = ValidationReport::new();
        first.add_result(ValidationResult::from_violations(vec![category_violation("a")]));

        let mut second = ValidationReport::new();
        second.add_result(ValidationResult::Valid);
        second.add_result(ValidationResult::from_violations(vec![category_violation("b")]));

        first.merge(second);
        assert_eq!(first.summary.total_elements, 3);
        assert_eq!(first.summary.invalid_elements, 2);
        assert_eq!(first.violations[1].subject_identifier, "b");
    }
}
