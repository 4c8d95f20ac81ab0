//! Domain layer for the AAS validator
//!
//! CDD Principle: Domain Model - Pure values describing validation outcomes
//! - Contains violations, tagged validation results, reports and the error taxonomy
//! - Independent of the constraint catalogue, configuration files or report formats
//! - Expresses the ubiquitous language of constraints and violations

pub mod violations;

// Re-export main domain types for convenience
pub use violations::*;
