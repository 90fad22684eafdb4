//! Report validation.
//!
//! Checks structural invariants of a finished [`UutReport`]: identity fields
//! that downstream systems key on, named groups and steps, and steps that
//! actually carry tests. Findings are diagnostics; a report with findings is
//! still a complete report.
//!
//! # Examples
//!
//! ```
//! use klippel_report_core::*;
//!
//! let mut report = UutReport::new(UutIdentity {
//!     operator: "oper".into(),
//!     serial_number: "xyz116".into(),
//!     ..Default::default()
//! });
//! report.status = Some(UutStatus::Failed);
//! assert!(validate_report(&report).is_empty());
//!
//! // A group derived from a file name starting with '-' has no name
//! report.root.add_sequence_call("");
//! assert_eq!(
//!     validate_report(&report),
//!     vec![ValidationError::EmptyGroupName(String::new())]
//! );
//! ```

use thiserror::Error;

use crate::{SequenceCall, UutReport};

/// Report validation findings.
///
/// Paths are `/`-joined sequence names below the root.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Operator (user name) is empty or whitespace-only.
    #[error("report operator cannot be empty")]
    EmptyOperator,
    /// Serial number is empty or whitespace-only.
    #[error("report serial number cannot be empty")]
    EmptySerialNumber,
    /// Overall status was never set.
    #[error("report status is not set")]
    MissingStatus,
    /// A sequence call has an empty name.
    #[error("empty group name below: {0:?}")]
    EmptyGroupName(String),
    /// A step has an empty name.
    #[error("empty step name in group: {0}")]
    EmptyStepName(String),
    /// A step carries no tests.
    #[error("step has no tests: {0}")]
    StepWithoutTests(String),
}

/// Validates a report and returns every finding.
pub fn validate_report(report: &UutReport) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if report.identity.operator.trim().is_empty() {
        errors.push(ValidationError::EmptyOperator);
    }
    if report.identity.serial_number.trim().is_empty() {
        errors.push(ValidationError::EmptySerialNumber);
    }
    if report.status.is_none() {
        errors.push(ValidationError::MissingStatus);
    }

    let mut path = Vec::new();
    validate_sequence(&report.root, &mut path, &mut errors);

    errors
}

fn validate_sequence(
    sequence: &SequenceCall,
    path: &mut Vec<String>,
    errors: &mut Vec<ValidationError>,
) {
    let here = path.join("/");

    for step in &sequence.steps {
        if step.name.trim().is_empty() {
            errors.push(ValidationError::EmptyStepName(here.clone()));
        } else if step.tests.is_empty() {
            errors.push(ValidationError::StepWithoutTests(format!(
                "{here}/{}",
                step.name
            )));
        }
    }

    for child in &sequence.sequences {
        if child.name.trim().is_empty() {
            errors.push(ValidationError::EmptyGroupName(here.clone()));
        }
        path.push(child.name.clone());
        validate_sequence(child, path, errors);
        path.pop();
    }
}

#[cfg(test)]
mod tests {
    use crate::{NumericLimitStep, NumericTest, UutIdentity, UutStatus};

    use super::*;

    fn valid_report() -> UutReport {
        let mut report = UutReport::new(UutIdentity {
            operator: "oper".to_string(),
            serial_number: "xyz116".to_string(),
            sequence_name: "SequenceName1".to_string(),
            ..Default::default()
        });
        let mut step = NumericLimitStep::new("SPL");
        step.add_test(NumericTest::log(Some(85.2), ""));
        report.root.add_sequence_call("Seq1").add_step(step);
        report.status = Some(UutStatus::Passed);
        report
    }

    #[test]
    fn test_validate_accepts_valid_report() {
        assert!(validate_report(&valid_report()).is_empty());
    }

    #[test]
    fn test_validate_reports_identity_problems() {
        let mut report = valid_report();
        report.identity.operator = "  ".to_string();
        report.identity.serial_number.clear();
        report.status = None;

        assert_eq!(
            validate_report(&report),
            vec![
                ValidationError::EmptyOperator,
                ValidationError::EmptySerialNumber,
                ValidationError::MissingStatus,
            ]
        );
    }

    #[test]
    fn test_validate_reports_step_problems_with_path() {
        let mut report = valid_report();
        let seq = report.root.add_sequence_call("Seq2");
        seq.add_step(NumericLimitStep::new("empty"));
        seq.add_step(NumericLimitStep::new(""));

        assert_eq!(
            validate_report(&report),
            vec![
                ValidationError::StepWithoutTests("Seq2/empty".to_string()),
                ValidationError::EmptyStepName("Seq2".to_string()),
            ]
        );
    }
}
