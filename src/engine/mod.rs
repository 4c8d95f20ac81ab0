//! Validation engine for submodel elements
//!
//! CDD Principle: Domain Services - The engine orchestrates constraint evaluation
//! - Resolves the applicable constraints per element kind from the registry
//! - Runs every applicable constraint and never stops at the first failure
//! - Walks collections depth-first so one call covers a whole element tree

use crate::config::ValidatorConfig;
use crate::constraints::{standard_registry, CheckOutcome, ConstraintRegistry};
use crate::domain::violations::{
    ValidationFailure, ValidationReport, ValidationResult, ValidatorError, ValidatorResult,
    Violation,
};
use crate::model::{ModelFacts, SubmodelElement};
use rayon::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

/// Stateless validator over an immutable constraint registry
#[derive(Debug, Clone)]
pub struct ValidationEngine {
    registry: Arc<ConstraintRegistry>,
    disabled: HashSet<String>,
}

/// Options for batch validation
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Whether to validate elements on the rayon thread pool
    pub parallel: bool,
    /// Maximum number of elements to validate
    pub max_elements: Option<usize>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            max_elements: None,
        }
    }
}

impl ValidationEngine {
    /// Create an engine that runs the default-enabled constraints of `registry`
    pub fn new(registry: Arc<ConstraintRegistry>) -> Self {
        let disabled = registry
            .ids()
            .filter(|id| registry.get(id).is_some_and(|d| !d.is_enabled_by_default()))
            .map(str::to_string)
            .collect();
        Self { registry, disabled }
    }

    /// Create an engine that runs every constraint in `registry`, opt-in ones included
    pub fn with_all_constraints(registry: Arc<ConstraintRegistry>) -> Self {
        Self {
            registry,
            disabled: HashSet::new(),
        }
    }

    /// Engine over the built-in catalogue
    pub fn standard() -> Self {
        Self::new(standard_registry())
    }

    /// Create an engine honouring the constraint settings of `config`.
    ///
    /// Starts from the registry defaults, switches on `enabled`, then switches off `disabled`.
    pub fn with_config(
        registry: Arc<ConstraintRegistry>,
        config: &ValidatorConfig,
    ) -> ValidatorResult<Self> {
        let mut engine = Self::new(registry);

        for id in &config.constraints.enabled {
            if !engine.registry.contains(id) {
                return Err(ValidatorError::config(format!(
                    "Cannot enable unknown constraint '{id}'"
                )));
            }
            tracing::debug!("Constraint '{}' enabled by configuration", id);
            engine.disabled.remove(id);
        }

        for id in &config.constraints.disabled {
            if !engine.registry.contains(id) {
                return Err(ValidatorError::config(format!(
                    "Cannot disable unknown constraint '{id}'"
                )));
            }
            tracing::debug!("Constraint '{}' disabled by configuration", id);
            engine.disabled.insert(id.clone());
        }

        Ok(engine)
    }

    pub fn registry(&self) -> &ConstraintRegistry {
        &self.registry
    }

    /// Whether `id` is registered and will run
    pub fn is_enabled(&self, id: &str) -> bool {
        self.registry.contains(id) && !self.disabled.contains(id)
    }

    /// Validate an element and everything it contains
    pub fn validate(&self, element: &dyn ModelFacts) -> ValidationResult {
        let mut violations = Vec::new();
        let mut path = Vec::new();
        self.collect(element, &mut path, &mut violations);
        ValidationResult::from_violations(violations)
    }

    /// Validate, failing with every violation found
    pub fn check(&self, element: &dyn ModelFacts) -> Result<(), ValidationFailure> {
        self.validate(element).into_result()
    }

    /// Validate root elements and aggregate the outcome.
    ///
    /// Report order follows input order whether or not validation runs in parallel.
    pub fn validate_all(
        &self,
        elements: &[SubmodelElement],
        options: &BatchOptions,
    ) -> ValidationReport {
        let start_time = Instant::now();

        let elements = match options.max_elements {
            Some(max) if max < elements.len() => &elements[..max],
            _ => elements,
        };

        let results: Vec<ValidationResult> = if options.parallel && elements.len() > 1 {
            elements
                .par_iter()
                .map(|element| self.validate(element))
                .collect()
        } else {
            elements.iter().map(|element| self.validate(element)).collect()
        };

        let mut report = ValidationReport::new();
        for result in results {
            report.add_result(result);
        }
        report.set_execution_time(start_time.elapsed().as_millis() as u64);

        tracing::debug!(
            "Validated {} elements: {} violations",
            report.summary.total_elements,
            report.violations.len()
        );
        report
    }

    fn collect<'a>(
        &self,
        element: &'a dyn ModelFacts,
        path: &mut Vec<&'a str>,
        violations: &mut Vec<Violation>,
    ) {
        let kind = element.kind();
        let identifier = element.identifier();
        path.push(identifier);
        let location = path.join(".");

        tracing::debug!("Validating {} '{}'", kind, location);

        for descriptor in self.registry.applicable(kind) {
            if self.disabled.contains(descriptor.id()) {
                continue;
            }

            if let CheckOutcome::Fail { offending_value } = descriptor.check(element) {
                let mut violation =
                    Violation::new(descriptor.id(), identifier, descriptor.message_template())
                        .with_path(location.clone());
                if let Some(value) = offending_value {
                    violation = violation.with_offending_value(value);
                }
                violations.push(violation);
            }
        }

        for child in element.children() {
            self.collect(child, path, violations);
        }
        path.pop();
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::standard()
    }
}
