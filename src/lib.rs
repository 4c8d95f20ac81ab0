//! AAS Validator - Semantic constraint validation for Asset Administration Shell elements
//!
//! Architecture: Clean Architecture - Library interface serves as the application layer
//! - Model records are plain data; constraints read them through the ModelFacts view
//! - The constraint registry is built once and shared read-only by every engine
//! - Results are tagged values, with a raising wrapper for callers that prefer `?`

pub mod config;
pub mod constraints;
pub mod domain;
pub mod engine;
pub mod model;
pub mod report;

// Re-export main types for convenient access
pub use domain::violations::{
    ValidationFailure, ValidationReport, ValidationResult, ValidationSummary, ValidatorError,
    ValidatorResult, Violation, ViolationList,
};

pub use config::{ConfigBuilder, ValidatorConfig};

pub use constraints::{
    standard_registry, CheckOutcome, ConstraintDescriptor, ConstraintRegistry,
};

pub use engine::{BatchOptions, ValidationEngine};

pub use model::{
    Blob, DataTypeDefXsd, ElementKind, File, LangString, ModelFacts, MultiLanguageProperty,
    Property, Range, RawValue, ReferenceElement, SubmodelElement, SubmodelElementCollection,
};

pub use report::{format_violations, OutputFormat, ReportFormatter, ReportOptions};

use std::path::Path;
use std::sync::Arc;

/// Main validator bundling an engine with the configured report rendering
#[derive(Debug, Clone)]
pub struct AasValidator {
    engine: ValidationEngine,
    report_formatter: ReportFormatter,
    output_format: OutputFormat,
}

impl AasValidator {
    /// Create a validator over the built-in catalogue with the given configuration
    pub fn new_with_config(config: &ValidatorConfig) -> ValidatorResult<Self> {
        Self::with_registry(standard_registry(), config)
    }

    /// Create a validator over a custom registry
    pub fn with_registry(
        registry: Arc<ConstraintRegistry>,
        config: &ValidatorConfig,
    ) -> ValidatorResult<Self> {
        config.validate()?;
        let engine = ValidationEngine::with_config(registry, config)?;
        let report_formatter = ReportFormatter::new(config.report.report_options());

        Ok(Self {
            engine,
            report_formatter,
            output_format: config.report.format,
        })
    }

    /// Create a validator with default configuration
    pub fn new() -> ValidatorResult<Self> {
        Self::new_with_config(&ValidatorConfig::default())
    }

    /// Create a validator loading configuration from file
    pub fn from_config_file<P: AsRef<Path>>(path: P) -> ValidatorResult<Self> {
        let config = ValidatorConfig::load_from_file(path)?;
        Self::new_with_config(&config)
    }

    pub fn engine(&self) -> &ValidationEngine {
        &self.engine
    }

    /// Validate a single element tree
    pub fn validate(&self, element: &dyn ModelFacts) -> ValidationResult {
        self.engine.validate(element)
    }

    /// Validate a single element tree, failing on any violation
    pub fn check(&self, element: &dyn ModelFacts) -> Result<(), ValidationFailure> {
        self.engine.check(element)
    }

    /// Validate a batch of root elements
    pub fn validate_batch(&self, elements: &[SubmodelElement]) -> ValidationReport {
        self.engine.validate_all(elements, &BatchOptions::default())
    }

    /// Format a report in the configured output format
    pub fn format_report(&self, report: &ValidationReport) -> ValidatorResult<String> {
        self.report_formatter.format_report(report, self.output_format)
    }
}

/// Validate an element against the built-in catalogue
pub fn validate(element: &dyn ModelFacts) -> ValidationResult {
    ValidationEngine::standard().validate(element)
}

/// Validate an element against the built-in catalogue, failing on any violation
pub fn check(element: &dyn ModelFacts) -> Result<(), ValidationFailure> {
    ValidationEngine::standard().check(element)
}
