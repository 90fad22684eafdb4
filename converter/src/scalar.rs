//! Scalar (`name`-format) data files.
//!
//! Each data row is `name<TAB>value<TAB>max<TAB>min` and becomes one
//! single-test step named after the first field.

use klippel_report_core::{NumericLimitStep, NumericTest};

use crate::error::{ConvertError, Result};
use crate::row::{field_at, first_token, parse_fields};

/// Builds the step for one scalar row.
///
/// - `max` absent: a log-only test carrying the value.
/// - `max` and `min` present: an inclusive `min <= value <= max` test.
/// - anything else is [`UnsupportedRowShape`](ConvertError::UnsupportedRowShape).
///
/// # Examples
///
/// ```
/// use klippel_report_converter::scalar_step;
/// use klippel_report_core::{CompOperator, TestStatus};
///
/// let step = scalar_step("THD\t1.1\t2.0\t0.5", "THD-001", 2).unwrap();
/// assert_eq!(step.name, "THD");
/// assert_eq!(step.tests[0].comp_operator, CompOperator::Gele);
/// assert_eq!(step.status, TestStatus::Passed);
///
/// assert!(scalar_step("X\t1.0\t2.0\tNaN", "X-001", 2).is_err());
/// ```
pub fn scalar_step(line: &str, file: &str, line_number: usize) -> Result<NumericLimitStep> {
    let fields = parse_fields(line);
    let value = field_at(&fields, 1);
    let max = field_at(&fields, 2);
    let min = field_at(&fields, 3);

    let test = match (max, min) {
        (None, _) => NumericTest::log(value, ""),
        (Some(max), Some(min)) => NumericTest::between(value, min, max, ""),
        (Some(_), None) => {
            return Err(ConvertError::UnsupportedRowShape {
                file: file.to_string(),
                line: line_number,
                fields: fields.len(),
                reason: "scalar row has a max limit without a min limit",
            });
        }
    };

    let mut step = NumericLimitStep::new(first_token(line));
    step.add_test(test);
    Ok(step)
}

/// Builds one step per data row of a scalar file.
///
/// `lines` are the rows after the header row. Blank rows are skipped.
pub fn scalar_steps<'a>(
    lines: impl IntoIterator<Item = &'a str>,
    file: &str,
) -> Result<Vec<NumericLimitStep>> {
    let mut steps = Vec::new();
    // Header is line 1
    for (offset, line) in lines.into_iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        steps.push(scalar_step(line, file, offset + 2)?);
    }
    Ok(steps)
}

#[cfg(test)]
mod tests {
    use klippel_report_core::{CompOperator, TestStatus};

    use super::*;

    #[test]
    fn test_absent_max_yields_log_test() {
        let step = scalar_step("SPL\t85.2\tNaN\tNaN", "SPL-001", 2).unwrap();
        assert_eq!(step.name, "SPL");
        let test = &step.tests[0];
        assert_eq!(test.comp_operator, CompOperator::Log);
        assert_eq!(test.value, Some(85.2));
        assert_eq!(test.low_limit, None);
        assert_eq!(test.high_limit, None);
        assert!(test.name.is_none());
    }

    #[test]
    fn test_absent_max_ignores_min() {
        let step = scalar_step("SPL\t85.2\t\t80", "SPL-001", 2).unwrap();
        assert_eq!(step.tests[0].comp_operator, CompOperator::Log);
    }

    #[test]
    fn test_bounded_row_is_inclusive() {
        let step = scalar_step("THD\t1.1\t2.0\t0.5", "THD-001", 2).unwrap();
        let test = &step.tests[0];
        assert_eq!(test.low_limit, Some(0.5));
        assert_eq!(test.high_limit, Some(2.0));
        assert_eq!(test.status, TestStatus::Passed);

        let edge = scalar_step("THD\t2.0\t2.0\t0.5", "THD-001", 2).unwrap();
        assert_eq!(edge.status, TestStatus::Passed);

        let over = scalar_step("THD\t2.5\t2.0\t0.5", "THD-001", 2).unwrap();
        assert_eq!(over.status, TestStatus::Failed);
    }

    #[test]
    fn test_max_without_min_is_fatal() {
        let err = scalar_step("X\t1.0\t2.0\tNaN", "X-001", 3).unwrap_err();
        match err {
            ConvertError::UnsupportedRowShape {
                file, line, fields, ..
            } => {
                assert_eq!(file, "X-001");
                assert_eq!(line, 3);
                assert_eq!(fields, 4);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_numeric_value_fails_bounded_test() {
        let step = scalar_step("Rdc\t---\t7.0\t5.0", "Rdc-001", 2).unwrap();
        assert_eq!(step.tests[0].value, None);
        assert_eq!(step.status, TestStatus::Failed);
    }

    #[test]
    fn test_scalar_steps_one_step_per_row_and_fatal_on_bad_row() {
        let steps = scalar_steps(["Fs\t52.0\t60\t40", "", "Qts\t0.4\tNaN\tNaN"], "TS-001").unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[1].name, "Qts");

        let err = scalar_steps(["Fs\t52.0\t60\t40", "Qts\t0.4\t1.0"], "TS-001").unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedRowShape { line: 3, .. }));
    }
}
