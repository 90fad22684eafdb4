//! Core report types for converted Klippel test logs.
//!
//! This crate defines the report tree a converted instrument log becomes:
//!
//! - [`UutReport`]: top-level report with UUT identity, misc info, start
//!   time, overall status and the root [`SequenceCall`].
//! - [`SequenceCall`]: a named group of steps, nested under the root.
//! - [`NumericLimitStep`]: a step with one or more [`NumericTest`]s and an
//!   optional [`Chart`].
//!
//! Validation ([`validate_report`]) reports structural problems such as empty
//! serial numbers, unnamed groups and steps without tests.
//!
//! # Example
//!
//! ```
//! use klippel_report_core::*;
//!
//! let mut report = UutReport::new(UutIdentity {
//!     operator: "oper".into(),
//!     part_number: "PartNumber1".into(),
//!     serial_number: "xyz116".into(),
//!     sequence_name: "SequenceName1".into(),
//!     ..Default::default()
//! });
//!
//! let mut step = NumericLimitStep::new("THD");
//! step.add_test(NumericTest::between(Some(1.1), 0.5, 2.0, ""));
//! report.root.add_sequence_call("Distortion").add_step(step);
//! report.status = Some(UutStatus::from_verdict_code("1"));
//!
//! assert_eq!(report.root.step_count(), 1);
//! assert!(validate_report(&report).is_empty());
//! ```

mod types;
mod validate;

pub use types::*;
pub use validate::{ValidationError, validate_report};
