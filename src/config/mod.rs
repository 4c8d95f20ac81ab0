//! Configuration loading and management for the AAS validator
//!
//! Architecture: Anti-Corruption Layer - Configuration translates external YAML formats
//! - Raw YAML structures are converted to clean settings objects
//! - Defaults run the default-enabled constraints with plain-text reports
//! - Constraint ids are checked against the registry when an engine is built

use crate::domain::violations::{ValidatorError, ValidatorResult};
use crate::report::{OutputFormat, ReportOptions};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

lazy_static! {
    static ref CONSTRAINT_ID_PATTERN: Regex =
        Regex::new(r"^[A-Z][A-Za-z]*-[0-9]{3}$").expect("constraint id pattern is a valid regex");
}

/// Main configuration structure for the validator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Configuration format version
    pub version: String,
    /// Which constraints run
    #[serde(default)]
    pub constraints: ConstraintSettings,
    /// How reports are rendered
    #[serde(default)]
    pub report: ReportSettings,
}

/// Constraint selection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConstraintSettings {
    /// Opt-in constraint ids to run, e.g. `AASd-002`
    #[serde(default)]
    pub enabled: Vec<String>,
    /// Constraint ids to skip, e.g. `AASd-130`
    #[serde(default)]
    pub disabled: Vec<String>,
}

/// Report rendering settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSettings {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default)]
    pub use_colors: bool,
    #[serde(default = "default_true")]
    pub show_values: bool,
    pub max_violations: Option<usize>,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            use_colors: false,
            show_values: true,
            max_violations: None,
        }
    }
}

impl ReportSettings {
    /// Formatter options derived from these settings
    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            use_colors: self.use_colors,
            show_values: self.show_values,
            max_violations: self.max_violations,
        }
    }
}

impl ValidatorConfig {
    /// Load configuration from a YAML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> ValidatorResult<Self> {
        let contents = fs::read_to_string(&path)?;

        let config: Self = serde_yaml::from_str(&contents).map_err(|e| {
            ValidatorError::config(format!(
                "Failed to parse config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from string content
    pub fn load_from_str(content: &str) -> ValidatorResult<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| ValidatorError::config(format!("Failed to parse config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Default configuration: only default-enabled constraints, text reports
    pub fn with_defaults() -> Self {
        Self {
            version: "1.0".to_string(),
            constraints: ConstraintSettings::default(),
            report: ReportSettings::default(),
        }
    }

    /// Validate the configuration for consistency and correctness
    pub fn validate(&self) -> ValidatorResult<()> {
        if !["1.0"].contains(&self.version.as_str()) {
            return Err(ValidatorError::config(format!(
                "Unsupported configuration version: {}. Supported versions: 1.0",
                self.version
            )));
        }

        validate_id_list("enabled", &self.constraints.enabled)?;
        validate_id_list("disabled", &self.constraints.disabled)?;

        if let Some(id) = self
            .constraints
            .enabled
            .iter()
            .find(|id| self.constraints.disabled.contains(id))
        {
            return Err(ValidatorError::config(format!(
                "Constraint '{id}' is both enabled and disabled"
            )));
        }

        if self.report.max_violations == Some(0) {
            return Err(ValidatorError::config("report.max_violations must be at least 1"));
        }

        Ok(())
    }

    /// Serialize back to YAML
    pub fn to_yaml(&self) -> ValidatorResult<String> {
        serde_yaml::to_string(self)
            .map_err(|e| ValidatorError::config(format!("Failed to serialize config: {e}")))
    }
}

fn validate_id_list(list: &str, ids: &[String]) -> ValidatorResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !CONSTRAINT_ID_PATTERN.is_match(id) {
            return Err(ValidatorError::config(format!(
                "Malformed constraint id '{id}' in {list} list"
            )));
        }
        if !seen.insert(id.as_str()) {
            return Err(ValidatorError::config(format!(
                "Constraint '{id}' listed twice in {list} list"
            )));
        }
    }
    Ok(())
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn default_true() -> bool {
    true
}

/// Configuration builder for programmatic construction
pub struct ConfigBuilder {
    config: ValidatorConfig,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: ValidatorConfig::default(),
        }
    }

    /// Run an opt-in constraint
    pub fn enable(mut self, constraint_id: impl Into<String>) -> Self {
        self.config.constraints.enabled.push(constraint_id.into());
        self
    }

    /// Skip a constraint
    pub fn disable(mut self, constraint_id: impl Into<String>) -> Self {
        self.config.constraints.disabled.push(constraint_id.into());
        self
    }

    /// Set the report format
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.config.report.format = format;
        self
    }

    pub fn use_colors(mut self, use_colors: bool) -> Self {
        self.config.report.use_colors = use_colors;
        self
    }

    pub fn max_violations(mut self, max: usize) -> Self {
        self.config.report.max_violations = Some(max);
        self
    }

    /// Build the final configuration
    pub fn build(self) -> ValidatorResult<ValidatorConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = ValidatorConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.constraints.enabled.is_empty());
        assert!(config.constraints.disabled.is_empty());
        assert_eq!(config.report.format, OutputFormat::Text);
        assert!(config.report.show_values);
    }

    #[test]
    fn test_load_from_str() {
        let config = ValidatorConfig::load_from_str(
            r#"
version: "1.0"
constraints:
  enabled: ["AASd-002", "AASd-100"]
  disabled: ["AASd-130"]
report:
  format: json
  max_violations: 10
"#,
        )
        .unwrap();

        assert_eq!(config.constraints.enabled, vec!["AASd-002", "AASd-100"]);
        assert_eq!(config.constraints.disabled, vec!["AASd-130"]);
        assert_eq!(config.report.format, OutputFormat::Json);
        assert_eq!(config.report.max_violations, Some(10));
        assert!(!config.report.use_colors);
        assert!(config.report.show_values);
    }

    #[test]
    fn test_minimal_document() {
        let config = ValidatorConfig::load_from_str("version: \"1.0\"\n").unwrap();
        assert!(config.constraints.disabled.is_empty());
        assert_eq!(config.report.format, OutputFormat::Text);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "version: \"1.0\"\nreport:\n  format: junit\n  use_colors: true").unwrap();

        let config = ValidatorConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.report.format, OutputFormat::Junit);
        assert!(config.report.use_colors);
    }

    #[test]
    fn test_missing_file() {
        let err = ValidatorConfig::load_from_file("/nonexistent/aas-validator.yaml").unwrap_err();
        match err {
            ValidatorError::Io { source } => {
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound)
            }
            other => panic!("expected an I/O error, got {other:?}"),
        }
    }

    #[test]
    fn test_unparsable_file_is_configuration_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "version: [unclosed").unwrap();

        let err = ValidatorConfig::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, ValidatorError::Configuration { .. }));
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_rejects_bad_documents() {
        assert!(ValidatorConfig::load_from_str("version: \"2.0\"").is_err());
        assert!(ValidatorConfig::load_from_str(
            "version: \"1.0\"\nconstraints:\n  disabled: [\"AASd-090\", \"AASd-090\"]"
        )
        .is_err());
        assert!(ValidatorConfig::load_from_str(
            "version: \"1.0\"\nconstraints:\n  disabled: [\"category\"]"
        )
        .is_err());
        assert!(ValidatorConfig::load_from_str("version: \"1.0\"\nreport:\n  format: pdf").is_err());
        assert!(ValidatorConfig::load_from_str(
            "version: \"1.0\"\nconstraints:\n  enabled: [\"AASd-002\", \"AASd-002\"]"
        )
        .is_err());
        assert!(ValidatorConfig::load_from_str(
            "version: \"1.0\"\nconstraints:\n  enabled: [\"AASd-100\"]\n  disabled: [\"AASd-100\"]"
        )
        .is_err());
    }

    #[test]
    fn test_builder() {
        let config = ConfigBuilder::new()
            .enable("AASd-002")
            .disable("AASd-100")
            .format(OutputFormat::Json)
            .max_violations(5)
            .build()
            .unwrap();

        assert_eq!(config.constraints.enabled, vec!["AASd-002"]);
        assert_eq!(config.constraints.disabled, vec!["AASd-100"]);
        assert_eq!(config.report.report_options().max_violations, Some(5));
        assert!(ConfigBuilder::new().max_violations(0).build().is_err());
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = ConfigBuilder::new().disable("AASd-002").build().unwrap();
        let yaml = config.to_yaml().unwrap();
        let reloaded = ValidatorConfig::load_from_str(&yaml).unwrap();
        assert_eq!(reloaded.constraints.disabled, config.constraints.disabled);
    }
}
