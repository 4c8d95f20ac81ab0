//! Report generation with multiple output formats
//!
//! CDD Principle: Anti-Corruption Layer - Formatters translate domain objects to external formats
//! - `format_violations` is the stable, greppable one-line-per-violation rendering
//! - ReportFormatter renders whole batch reports as text, JSON or JUnit XML
//! - Output depends only on its input, so identical reports render identically

use crate::domain::violations::{ValidationReport, ValidatorError, ValidatorResult, Violation};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::io::Write;

/// Render violations one per line as `subject: rule text`, in input order
pub fn format_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.subject_identifier, v.detail_message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Supported output formats for validation reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text, optionally coloured
    #[default]
    Text,
    /// JSON for programmatic consumption
    Json,
    /// JUnit XML for CI integration
    Junit,
}

impl OutputFormat {
    /// Parse format from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            "junit" => Some(Self::Junit),
            _ => None,
        }
    }

    /// Get all available format names
    pub fn all_formats() -> &'static [&'static str] {
        &["text", "json", "junit"]
    }
}

/// Options for customizing report output
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Whether to use ANSI colours (text format)
    pub use_colors: bool,
    /// Whether to show the rejected value under each violation
    pub show_values: bool,
    /// Maximum number of violations to include
    pub max_violations: Option<usize>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            use_colors: false,
            show_values: true,
            max_violations: None,
        }
    }
}

/// Main report formatter that dispatches to specific formatters
#[derive(Debug, Clone, Default)]
pub struct ReportFormatter {
    options: ReportOptions,
}

impl ReportFormatter {
    /// Create a new report formatter with options
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    /// Format a validation report in the specified format
    pub fn format_report(
        &self,
        report: &ValidationReport,
        format: OutputFormat,
    ) -> ValidatorResult<String> {
        let violations = self.limit_violations(&report.violations);

        match format {
            OutputFormat::Text => Ok(self.format_text(report, violations)),
            OutputFormat::Json => self.format_json(report, violations),
            OutputFormat::Junit => Ok(self.format_junit(report, violations)),
        }
    }

    /// Write a formatted report to a writer
    pub fn write_report<W: Write>(
        &self,
        report: &ValidationReport,
        format: OutputFormat,
        mut writer: W,
    ) -> ValidatorResult<()> {
        let formatted = self.format_report(report, format)?;
        writer.write_all(formatted.as_bytes())?;
        Ok(())
    }

    fn limit_violations<'a>(&self, violations: &'a [Violation]) -> &'a [Violation] {
        match self.options.max_violations {
            Some(max) if max < violations.len() => {
                tracing::warn!(
                    "Report truncated to {} of {} violations",
                    max,
                    violations.len()
                );
                &violations[..max]
            }
            _ => violations,
        }
    }

    /// "Showing N of M violations" when the report was cut short
    fn truncation_notice(report: &ValidationReport, shown: &[Violation]) -> Option<String> {
        let total = report.violations.len();
        (shown.len() < total).then(|| format!("Showing {} of {} violations", shown.len(), total))
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if self.options.use_colors {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    /// Format report in human-readable text
    fn format_text(&self, report: &ValidationReport, violations: &[Violation]) -> String {
        let mut output = String::new();

        if violations.is_empty() {
            output.push_str(&self.paint("No constraint violations found", "32"));
            output.push('\n');
        } else {
            output.push_str(&self.paint("Constraint Violations Found", "31"));
            output.push_str("\n\n");

            for violation in violations {
                output.push_str(&format!(
                    "  {} [{}] {}\n",
                    self.paint(&violation.path, "2"),
                    self.paint(&violation.constraint_id, "31"),
                    violation.detail_message
                ));

                if self.options.show_values {
                    if let Some(value) = &violation.offending_value {
                        output.push_str(&format!("    │ {}\n", self.paint(value, "2")));
                    }
                }
            }

            if let Some(notice) = Self::truncation_notice(report, violations) {
                output.push_str(&format!("\n  {}\n", self.paint(&notice, "33")));
            }
            output.push('\n');
        }

        output.push_str(&self.format_summary(report));
        output
    }

    /// Format report in JSON
    fn format_json(
        &self,
        report: &ValidationReport,
        violations: &[Violation],
    ) -> ValidatorResult<String> {
        let json_violations: Vec<JsonValue> = violations
            .iter()
            .map(|v| {
                let mut entry = serde_json::json!({
                    "constraint_id": v.constraint_id,
                    "subject_identifier": v.subject_identifier,
                    "path": v.path,
                    "detail_message": v.detail_message,
                });
                if self.options.show_values {
                    entry["offending_value"] = serde_json::json!(v.offending_value);
                }
                entry
            })
            .collect();

        let json_report = serde_json::json!({
            "violations": json_violations,
            "summary": {
                "total_violations": report.violations.len(),
                "shown_violations": violations.len(),
                "total_elements": report.summary.total_elements,
                "invalid_elements": report.summary.invalid_elements,
                "violations_by_constraint": report.summary.violations_by_constraint,
                "execution_time_ms": report.summary.execution_time_ms,
                "validated_at": report.summary.validated_at.to_rfc3339()
            }
        });

        serde_json::to_string_pretty(&json_report)
            .map_err(|e| ValidatorError::config(format!("JSON serialization failed: {e}")))
    }

    /// Format report as JUnit XML, one test case per violated constraint
    fn format_junit(&self, report: &ValidationReport, violations: &[Violation]) -> String {
        let mut by_constraint: BTreeMap<&str, Vec<&Violation>> = BTreeMap::new();
        for violation in violations {
            by_constraint
                .entry(violation.constraint_id.as_str())
                .or_default()
                .push(violation);
        }

        let execution_time = (report.summary.execution_time_ms as f64) / 1000.0;
        let mut xml = String::new();
        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str(&format!(
            "<testsuite name=\"aas-validator\" tests=\"{}\" failures=\"{}\" errors=\"0\" time=\"{:.3}\">\n",
            violations.len(),
            violations.len(),
            execution_time
        ));
        if let Some(notice) = Self::truncation_notice(report, violations) {
            xml.push_str(&format!("  <!-- {notice} -->\n"));
        }

        for (constraint_id, constraint_violations) in by_constraint {
            for violation in constraint_violations {
                xml.push_str(&format!(
                    "  <testcase classname=\"{}\" name=\"{}\">\n",
                    escape_xml(constraint_id),
                    escape_xml(&violation.path)
                ));
                xml.push_str(&format!(
                    "    <failure message=\"{}\">\n",
                    escape_xml(&violation.detail_message)
                ));
                xml.push_str(&format!("      Element: {}\n", escape_xml(&violation.path)));
                if let Some(value) = &violation.offending_value {
                    xml.push_str(&format!("      Value: {}\n", escape_xml(value)));
                }
                xml.push_str("    </failure>\n");
                xml.push_str("  </testcase>\n");
            }
        }

        xml.push_str("</testsuite>\n");
        xml
    }

    /// Format the summary section
    fn format_summary(&self, report: &ValidationReport) -> String {
        let total = report.summary.total_violations();
        let counts = if total == 0 {
            self.paint("0 violations", "32")
        } else {
            let by_constraint: Vec<String> = report
                .summary
                .violations_by_constraint
                .iter()
                .map(|(id, count)| format!("{id}: {count}"))
                .collect();
            format!(
                "{} ({})",
                self.paint(
                    &format!("{} violation{}", total, if total == 1 { "" } else { "s" }),
                    "31"
                ),
                by_constraint.join(", ")
            )
        };

        format!(
            "Summary: {} in {} elements, {} invalid\n",
            counts, report.summary.total_elements, report.summary.invalid_elements
        )
    }
}

/// Escape XML special characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::violations::ValidationResult;

    const CATEGORY_RULE: &str = "For data elements Referable/category shall be one of the following values: CONSTANT, PARAMETER or VARIABLE. Exception: File and Blob data elements.";

    fn create_test_report() -> ValidationReport {
        let mut report = ValidationReport::new();
        report.add_result(ValidationResult::Valid);
        report.add_result(ValidationResult::from_violations(vec![
            Violation::new("AASd-090", "idShort1", CATEGORY_RULE).with_offending_value("WRONG"),
        ]));
        report.add_result(ValidationResult::from_violations(vec![Violation::new(
            "AASd-002",
            "1bad",
            "idShort rule",
        )
        .with_path("outer.1bad")
        .with_offending_value("<1bad>")]));
        report.set_execution_time(1200);
        report
    }

    #[test]
    fn test_format_violations() {
        let report = create_test_report();
        assert_eq!(
            format_violations(&report.violations),
            format!("idShort1: {CATEGORY_RULE}\n1bad: idShort rule")
        );
        assert_eq!(format_violations(&[]), "");
    }

    #[test]
    fn test_format_violations_is_deterministic() {
        let report = create_test_report();
        assert_eq!(
            format_violations(&report.violations),
            format_violations(&report.violations.clone())
        );
    }

    #[test]
    fn test_text_format() {
        let formatter = ReportFormatter::default();
        let output = formatter
            .format_report(&create_test_report(), OutputFormat::Text)
            .unwrap();

        assert!(output.contains("Constraint Violations Found"));
        assert!(output.contains(&format!("  idShort1 [AASd-090] {CATEGORY_RULE}\n")));
        assert!(output.contains("    │ WRONG\n"));
        assert!(output.contains("outer.1bad [AASd-002]"));
        assert!(output.contains("Summary: 2 violations (AASd-002: 1, AASd-090: 1) in 3 elements, 2 invalid"));
        assert!(!output.contains("\x1b["));
    }

    #[test]
    fn test_text_format_colors_and_values() {
        let formatter = ReportFormatter::new(ReportOptions {
            use_colors: true,
            show_values: false,
            ..Default::default()
        });
        let output = formatter
            .format_report(&create_test_report(), OutputFormat::Text)
            .unwrap();

        assert!(output.contains("\x1b[31mAASd-090\x1b[0m"));
        assert!(!output.contains("WRONG"));
    }

    #[test]
    fn test_json_format() {
        let formatter = ReportFormatter::default();
        let output = formatter
            .format_report(&create_test_report(), OutputFormat::Json)
            .unwrap();

        let json: JsonValue = serde_json::from_str(&output).unwrap();
        assert_eq!(json["violations"].as_array().unwrap().len(), 2);
        assert_eq!(json["violations"][0]["constraint_id"], "AASd-090");
        assert_eq!(json["violations"][0]["offending_value"], "WRONG");
        assert_eq!(json["violations"][1]["path"], "outer.1bad");
        assert_eq!(json["summary"]["total_elements"], 3);
        assert_eq!(json["summary"]["violations_by_constraint"]["AASd-090"], 1);
    }

    #[test]
    fn test_junit_format() {
        let formatter = ReportFormatter::default();
        let output = formatter
            .format_report(&create_test_report(), OutputFormat::Junit)
            .unwrap();

        assert!(output.contains("<?xml version=\"1.0\""));
        assert!(output.contains("<testsuite name=\"aas-validator\" tests=\"2\" failures=\"2\""));
        assert!(output.contains("<testcase classname=\"AASd-090\" name=\"idShort1\">"));
        assert!(output.contains("Value: &lt;1bad&gt;"));
        // Grouped by constraint id, so AASd-002 comes first.
        assert!(output.find("AASd-002").unwrap() < output.find("AASd-090").unwrap());
    }

    #[test]
    fn test_empty_report() {
        let formatter = ReportFormatter::default();
        let output = formatter
            .format_report(&ValidationReport::new(), OutputFormat::Text)
            .unwrap();

        assert!(output.contains("No constraint violations found"));
        assert!(output.contains("Summary: 0 violations in 0 elements, 0 invalid"));
    }

    #[test]
    fn test_max_violations() {
        let formatter = ReportFormatter::new(ReportOptions {
            max_violations: Some(1),
            ..Default::default()
        });
        let report = create_test_report();

        let json: JsonValue =
            serde_json::from_str(&formatter.format_report(&report, OutputFormat::Json).unwrap())
                .unwrap();
        assert_eq!(json["violations"].as_array().unwrap().len(), 1);
        assert_eq!(json["violations"][0]["constraint_id"], "AASd-090");
        assert_eq!(json["summary"]["shown_violations"], 1);
        assert_eq!(json["summary"]["total_violations"], 2);

        let text = formatter.format_report(&report, OutputFormat::Text).unwrap();
        assert!(text.contains("  Showing 1 of 2 violations\n"));
        assert!(!text.contains("outer.1bad"));
        assert!(text.contains("Summary: 2 violations"));

        let xml = formatter.format_report(&report, OutputFormat::Junit).unwrap();
        assert!(xml.contains("<!-- Showing 1 of 2 violations -->"));
        assert!(xml.contains("tests=\"1\""));
    }

    #[test]
    fn test_no_truncation_notice_within_limit() {
        let formatter = ReportFormatter::new(ReportOptions {
            max_violations: Some(2),
            ..Default::default()
        });
        let report = create_test_report();

        for format in [OutputFormat::Text, OutputFormat::Json, OutputFormat::Junit] {
            let output = formatter.format_report(&report, format).unwrap();
            assert!(!output.contains("Showing"), "{format:?}");
        }
    }

    #[test]
    fn test_write_report() {
        let mut buffer = Vec::new();
        ReportFormatter::default()
            .write_report(&create_test_report(), OutputFormat::Text, &mut buffer)
            .unwrap();
        assert!(String::from_utf8(buffer).unwrap().starts_with("Constraint Violations Found"));
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!(OutputFormat::parse("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("sarif"), None);
        assert_eq!(OutputFormat::all_formats().len(), 3);
    }
}
