//! Constraint registry for semantic metamodel rules
//!
//! Architectural Principle: Service Layer - The registry is the catalogue the engine consults
//! - Each ConstraintDescriptor pairs a canonical id with an applicability guard and a predicate
//! - Registration order is evaluation order, so reports are reproducible byte-for-byte
//! - The registry is immutable once built and shared read-only across threads

pub mod catalogue;

use crate::domain::violations::{ValidatorError, ValidatorResult};
use crate::model::{ElementKind, ModelFacts};
use lazy_static::lazy_static;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Result of evaluating one predicate against one element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Pass,
    Fail {
        /// The value that broke the rule, if one can be named
        offending_value: Option<String>,
    },
}

impl CheckOutcome {
    /// Failure that names the rejected value
    pub fn fail_with(value: impl Into<String>) -> Self {
        Self::Fail {
            offending_value: Some(value.into()),
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

/// Which element kinds a constraint applies to
pub type AppliesTo = fn(ElementKind) -> bool;

/// Predicate logic of a constraint
pub type Check = fn(&dyn ModelFacts) -> CheckOutcome;

/// Static description of one named constraint
#[derive(Clone)]
pub struct ConstraintDescriptor {
    id: String,
    message_template: String,
    applies_to: AppliesTo,
    check: Check,
    enabled_by_default: bool,
}

impl ConstraintDescriptor {
    /// Create a descriptor. Ids and messages are checked on registration.
    pub fn new(
        id: impl Into<String>,
        message_template: impl Into<String>,
        applies_to: AppliesTo,
        check: Check,
    ) -> Self {
        Self {
            id: id.into(),
            message_template: message_template.into(),
            applies_to,
            check,
            enabled_by_default: true,
        }
    }

    /// Mark the constraint as off unless a caller enables it explicitly
    pub fn opt_in(mut self) -> Self {
        self.enabled_by_default = false;
        self
    }

    /// Canonical constraint id, e.g. `AASd-090`
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Rule text reported verbatim on failure
    pub fn message_template(&self) -> &str {
        &self.message_template
    }

    pub fn applies_to(&self, kind: ElementKind) -> bool {
        (self.applies_to)(kind)
    }

    pub fn check(&self, facts: &dyn ModelFacts) -> CheckOutcome {
        (self.check)(facts)
    }

    /// Whether engines run this constraint without being asked to
    pub fn is_enabled_by_default(&self) -> bool {
        self.enabled_by_default
    }
}

impl fmt::Debug for ConstraintDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstraintDescriptor")
            .field("id", &self.id)
            .field("message_template", &self.message_template)
            .field("enabled_by_default", &self.enabled_by_default)
            .finish_non_exhaustive()
    }
}

/// Ordered catalogue of constraint descriptors
#[derive(Debug, Default)]
pub struct ConstraintRegistry {
    descriptors: Vec<ConstraintDescriptor>,
    ids: HashSet<String>,
}

lazy_static! {
    static ref STANDARD_REGISTRY: Arc<ConstraintRegistry> = Arc::new(
        ConstraintRegistry::standard()
            .expect("built-in constraint catalogue must not contain duplicate or empty ids")
    );
}

/// Process-wide registry holding the built-in catalogue
pub fn standard_registry() -> Arc<ConstraintRegistry> {
    Arc::clone(&STANDARD_REGISTRY)
}

impl ConstraintRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry populated with the built-in catalogue
    pub fn standard() -> ValidatorResult<Self> {
        let mut registry = Self::new();
        for descriptor in catalogue::descriptors() {
            registry.register(descriptor)?;
        }
        Ok(registry)
    }

    /// Add a descriptor at the end of the evaluation order
    pub fn register(&mut self, descriptor: ConstraintDescriptor) -> ValidatorResult<()> {
        if descriptor.id.trim().is_empty() {
            return Err(ValidatorError::config("Constraint descriptor is missing an id"));
        }
        if descriptor.message_template.trim().is_empty() {
            return Err(ValidatorError::config(format!(
                "Constraint '{}' is missing a message",
                descriptor.id
            )));
        }
        if !self.ids.insert(descriptor.id.clone()) {
            return Err(ValidatorError::config(format!(
                "Duplicate constraint id '{}'",
                descriptor.id
            )));
        }

        tracing::debug!(
            "Registered constraint '{}' at position {}",
            descriptor.id,
            self.descriptors.len()
        );
        self.descriptors.push(descriptor);
        Ok(())
    }

    /// Descriptors applicable to `kind`, in registration order
    pub fn applicable(&self, kind: ElementKind) -> impl Iterator<Item = &ConstraintDescriptor> {
        self.descriptors.iter().filter(move |d| d.applies_to(kind))
    }

    pub fn get(&self, id: &str) -> Option<&ConstraintDescriptor> {
        self.descriptors.iter().find(|d| d.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Constraint ids in registration order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.descriptors.iter().map(|d| d.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn always_fail(_: &dyn ModelFacts) -> CheckOutcome {
        CheckOutcome::Fail { offending_value: None }
    }

    fn only_ranges(kind: ElementKind) -> bool {
        kind == ElementKind::Range
    }

    #[test]
    fn test_standard_catalogue_order() {
        let registry = ConstraintRegistry::standard().unwrap();

        assert_eq!(
            registry.ids().collect::<Vec<_>>(),
            vec!["AASd-002", "AASd-090", "AASd-100", "AASd-130"]
        );
        assert!(registry.contains("AASd-090"));
        assert!(!registry.contains("AASd-999"));
    }

    #[test]
    fn test_applicable_respects_guards() {
        let registry = standard_registry();

        let property: Vec<_> = registry.applicable(ElementKind::Property).map(|d| d.id()).collect();
        assert_eq!(property, vec!["AASd-002", "AASd-090", "AASd-100", "AASd-130"]);

        for exempt in [ElementKind::File, ElementKind::Blob, ElementKind::SubmodelElementCollection] {
            assert!(
                registry.applicable(exempt).all(|d| d.id() != "AASd-090"),
                "AASd-090 must not apply to {exempt}"
            );
        }
    }

    #[test]
    fn test_duplicate_id_is_configuration_error() {
        let mut registry = ConstraintRegistry::standard().unwrap();
        let err = registry
            .register(ConstraintDescriptor::new(
                "AASd-090",
                "another rule",
                only_ranges,
                always_fail,
            ))
            .unwrap_err();

        assert!(matches!(err, ValidatorError::Configuration { .. }));
        assert!(err.to_string().contains("Duplicate constraint id 'AASd-090'"));
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_missing_fields_rejected() {
        let mut registry = ConstraintRegistry::new();

        assert!(registry
            .register(ConstraintDescriptor::new("", "rule", only_ranges, always_fail))
            .is_err());
        assert!(registry
            .register(ConstraintDescriptor::new("X-1", " ", only_ranges, always_fail))
            .is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_custom_registration_appends() {
        let mut registry = ConstraintRegistry::standard().unwrap();
        registry
            .register(ConstraintDescriptor::new("X-1", "ranges always fail", only_ranges, always_fail))
            .unwrap();

        assert_eq!(registry.ids().last(), Some("X-1"));
        assert_eq!(registry.applicable(ElementKind::Range).last().map(|d| d.id()), Some("X-1"));
        assert_eq!(registry.applicable(ElementKind::Property).count(), 4);
        assert_eq!(registry.get("X-1").map(|d| d.message_template()), Some("ranges always fail"));
    }

    #[test]
    fn test_only_category_rule_on_by_default() {
        let registry = standard_registry();
        let defaults: Vec<_> = registry
            .ids()
            .filter(|id| registry.get(id).is_some_and(|d| d.is_enabled_by_default()))
            .collect();

        assert_eq!(defaults, vec!["AASd-090"]);
        assert!(ConstraintDescriptor::new("X-1", "rule", only_ranges, always_fail).is_enabled_by_default());
    }

    #[test]
    fn test_global_registry_is_shared() {
        let a = standard_registry();
        let b = standard_registry();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
