//! Report tree type definitions.
//!
//! This module defines the data model a converted instrument log is turned
//! into: a UUT (unit under test) report owning a root sequence call, nested
//! sequence calls, numeric-limit steps with one or more tests, and optional
//! charts. The types serialize with [`serde`] so the finished tree can be
//! handed to whatever submission backend consumes it.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Overall status of a UUT report.
///
/// # Examples
///
/// ```
/// use klippel_report_core::UutStatus;
///
/// assert_eq!(UutStatus::from_verdict_code("1"), UutStatus::Passed);
/// assert_eq!(UutStatus::from_verdict_code("2"), UutStatus::Failed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UutStatus {
    Passed,
    Failed,
}

impl UutStatus {
    /// Maps the raw `Ctrl_OverallVerdict` header value to a report status.
    ///
    /// Only the literal string `"1"` is a pass. Warning, noise, invalid, void
    /// and anything unrecognized all count as a failure.
    pub fn from_verdict_code(code: &str) -> Self {
        if code == "1" {
            Self::Passed
        } else {
            Self::Failed
        }
    }
}

/// Verdict codes the instrument writes into `Ctrl_OverallVerdict`.
///
/// Only used for diagnostics; the report status is derived with
/// [`UutStatus::from_verdict_code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentVerdict {
    /// No result.
    Void,
    Fail,
    Pass,
    Warning,
    Noise,
    Invalid,
}

impl InstrumentVerdict {
    /// Decodes a verdict code, returning `None` for unknown codes.
    ///
    /// # Examples
    ///
    /// ```
    /// use klippel_report_core::InstrumentVerdict;
    ///
    /// assert_eq!(InstrumentVerdict::from_code("-1"), Some(InstrumentVerdict::Void));
    /// assert_eq!(InstrumentVerdict::from_code("3"), Some(InstrumentVerdict::Noise));
    /// assert_eq!(InstrumentVerdict::from_code("ok"), None);
    /// ```
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "-1" => Some(Self::Void),
            "0" => Some(Self::Fail),
            "1" => Some(Self::Pass),
            "2" => Some(Self::Warning),
            "3" => Some(Self::Noise),
            "4" => Some(Self::Invalid),
            _ => None,
        }
    }
}

impl std::fmt::Display for InstrumentVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Void => write!(f, "void"),
            Self::Fail => write!(f, "fail"),
            Self::Pass => write!(f, "pass"),
            Self::Warning => write!(f, "warning"),
            Self::Noise => write!(f, "noise"),
            Self::Invalid => write!(f, "invalid"),
        }
    }
}

/// Pass/fail outcome of a single test or step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    Passed,
    Failed,
}

/// Comparison applied between a measured value and its limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompOperator {
    /// No comparison; the value is only logged.
    Log,
    /// `low <= value <= high`.
    Gele,
    /// `value < high`.
    Lt,
}

impl CompOperator {
    /// Evaluates `value` against the limits.
    ///
    /// An absent value or limit never satisfies a comparison.
    ///
    /// # Examples
    ///
    /// ```
    /// use klippel_report_core::CompOperator;
    ///
    /// assert!(CompOperator::Gele.evaluate(Some(1.1), Some(0.5), Some(2.0)));
    /// assert!(!CompOperator::Lt.evaluate(Some(1.0), None, Some(1.0)));
    /// assert!(CompOperator::Log.evaluate(None, None, None));
    /// ```
    pub fn evaluate(self, value: Option<f64>, low: Option<f64>, high: Option<f64>) -> bool {
        match (self, value, low, high) {
            (Self::Log, _, _, _) => true,
            (Self::Gele, Some(v), Some(lo), Some(hi)) => lo <= v && v <= hi,
            (Self::Lt, Some(v), _, Some(hi)) => v < hi,
            _ => false,
        }
    }
}

impl std::fmt::Display for CompOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Log => write!(f, "LOG"),
            Self::Gele => write!(f, "GELE"),
            Self::Lt => write!(f, "LT"),
        }
    }
}

/// One numeric measurement with optional limits.
///
/// Use the constructors [`log`](NumericTest::log),
/// [`between`](NumericTest::between) and [`less_than`](NumericTest::less_than);
/// the status is evaluated once at construction.
///
/// # Examples
///
/// ```
/// use klippel_report_core::{NumericTest, TestStatus};
///
/// let thd = NumericTest::between(Some(1.1), 0.5, 2.0, "");
/// assert_eq!(thd.status, TestStatus::Passed);
///
/// let oob = NumericTest::less_than(Some(3.0), 1.0, "#").named("OutOfBounds");
/// assert_eq!(oob.status, TestStatus::Failed);
/// assert_eq!(oob.name.as_deref(), Some("OutOfBounds"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericTest {
    /// Test name inside a multi-test step (`None` for single-test steps)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Measured value, `None` when the instrument did not supply one
    pub value: Option<f64>,
    pub comp_operator: CompOperator,
    pub low_limit: Option<f64>,
    pub high_limit: Option<f64>,
    pub unit: String,
    pub status: TestStatus,
}

impl NumericTest {
    fn evaluated(
        value: Option<f64>,
        comp_operator: CompOperator,
        low_limit: Option<f64>,
        high_limit: Option<f64>,
        unit: &str,
    ) -> Self {
        let status = if comp_operator.evaluate(value, low_limit, high_limit) {
            TestStatus::Passed
        } else {
            TestStatus::Failed
        };
        Self {
            name: None,
            value,
            comp_operator,
            low_limit,
            high_limit,
            unit: unit.to_string(),
            status,
        }
    }

    /// Creates a test that only logs its value.
    pub fn log(value: Option<f64>, unit: &str) -> Self {
        Self::evaluated(value, CompOperator::Log, None, None, unit)
    }

    /// Creates a two-sided inclusive test (`low <= value <= high`).
    pub fn between(value: Option<f64>, low: f64, high: f64, unit: &str) -> Self {
        Self::evaluated(value, CompOperator::Gele, Some(low), Some(high), unit)
    }

    /// Creates a strict upper-bound test (`value < limit`).
    pub fn less_than(value: Option<f64>, limit: f64, unit: &str) -> Self {
        Self::evaluated(value, CompOperator::Lt, None, Some(limit), unit)
    }

    /// Sets the test name.
    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn passed(&self) -> bool {
        self.status == TestStatus::Passed
    }
}

/// Chart rendering type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    /// Line chart with a logarithmic x axis.
    LineLogX,
}

/// A named series of points.
///
/// `x` and `y` may differ in length; series are stored as supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub x: Vec<Option<f64>>,
    pub y: Vec<Option<f64>>,
}

/// Chart attached to a step.
///
/// # Examples
///
/// ```
/// use klippel_report_core::{Chart, ChartType};
///
/// let mut chart = Chart::new(ChartType::LineLogX, "SPL")
///     .with_x_axis("Frequency", "Hz")
///     .with_y_axis("res", "");
/// chart.add_series("values", vec![Some(100.0), Some(200.0)], vec![Some(1.0), Some(2.0)]);
/// chart.add_series("max", vec![Some(100.0), Some(200.0)], vec![Some(1.5)]);
///
/// assert_eq!(chart.series.len(), 2);
/// assert_eq!(chart.find_series("max").unwrap().y.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub chart_type: ChartType,
    pub title: String,
    pub x_label: String,
    pub x_unit: String,
    pub y_label: String,
    pub y_unit: String,
    pub series: Vec<Series>,
}

impl Chart {
    pub fn new(chart_type: ChartType, title: &str) -> Self {
        Self {
            chart_type,
            title: title.to_string(),
            x_label: String::new(),
            x_unit: String::new(),
            y_label: String::new(),
            y_unit: String::new(),
            series: Vec::new(),
        }
    }

    /// Sets the x axis label and unit.
    pub fn with_x_axis(mut self, label: &str, unit: &str) -> Self {
        self.x_label = label.to_string();
        self.x_unit = unit.to_string();
        self
    }

    /// Sets the y axis label and unit.
    pub fn with_y_axis(mut self, label: &str, unit: &str) -> Self {
        self.y_label = label.to_string();
        self.y_unit = unit.to_string();
        self
    }

    pub fn add_series(&mut self, name: &str, x: Vec<Option<f64>>, y: Vec<Option<f64>>) {
        self.series.push(Series {
            name: name.to_string(),
            x,
            y,
        });
    }

    pub fn find_series(&self, name: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.name == name)
    }
}

/// A step holding one or more numeric tests and an optional chart.
///
/// The step status is recomputed whenever a test is added: the step passes
/// only when every test passes.
///
/// # Examples
///
/// ```
/// use klippel_report_core::{NumericLimitStep, NumericTest, TestStatus};
///
/// let mut step = NumericLimitStep::new("SPL");
/// step.add_test(NumericTest::log(Some(1.5), "Hz").named("avg"));
/// step.add_test(NumericTest::less_than(Some(1.0), 1.0, "#").named("OutOfBounds"));
///
/// assert!(step.is_multiple());
/// assert_eq!(step.status, TestStatus::Failed);
/// assert_eq!(step.find_test("avg").unwrap().value, Some(1.5));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericLimitStep {
    pub name: String,
    pub status: TestStatus,
    pub tests: Vec<NumericTest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart: Option<Chart>,
}

impl NumericLimitStep {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            status: TestStatus::Passed,
            tests: Vec::new(),
            chart: None,
        }
    }

    /// Appends a test and updates the step status.
    pub fn add_test(&mut self, test: NumericTest) {
        if !test.passed() {
            self.status = TestStatus::Failed;
        }
        self.tests.push(test);
    }

    pub fn set_chart(&mut self, chart: Chart) {
        self.chart = Some(chart);
    }

    /// Returns `true` when the step carries named tests (a multi-test step).
    pub fn is_multiple(&self) -> bool {
        self.tests.len() > 1 || self.tests.iter().any(|t| t.name.is_some())
    }

    pub fn find_test(&self, name: &str) -> Option<&NumericTest> {
        self.tests.iter().find(|t| t.name.as_deref() == Some(name))
    }
}

/// A named node grouping steps and nested sequence calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SequenceCall {
    pub name: String,
    pub sequences: Vec<SequenceCall>,
    pub steps: Vec<NumericLimitStep>,
}

impl SequenceCall {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Appends a nested sequence call and returns it.
    ///
    /// Always appends; an existing sequence with the same name is not reused.
    ///
    /// # Examples
    ///
    /// ```
    /// use klippel_report_core::SequenceCall;
    ///
    /// let mut root = SequenceCall::new("Main");
    /// root.add_sequence_call("Seq1");
    /// root.add_sequence_call("Seq1");
    /// assert_eq!(root.sequence_names(), vec!["Seq1", "Seq1"]);
    /// ```
    pub fn add_sequence_call(&mut self, name: &str) -> &mut SequenceCall {
        self.sequences.push(SequenceCall::new(name));
        let last = self.sequences.len() - 1;
        &mut self.sequences[last]
    }

    pub fn add_step(&mut self, step: NumericLimitStep) {
        self.steps.push(step);
    }

    /// Finds the first nested sequence call with the given name.
    pub fn find_sequence(&self, name: &str) -> Option<&SequenceCall> {
        self.sequences.iter().find(|s| s.name == name)
    }

    /// Finds a step directly owned by this sequence call.
    pub fn find_step(&self, name: &str) -> Option<&NumericLimitStep> {
        self.steps.iter().find(|s| s.name == name)
    }

    pub fn sequence_names(&self) -> Vec<&str> {
        self.sequences.iter().map(|s| s.name.as_str()).collect()
    }

    /// Counts steps in this sequence call and all nested ones.
    pub fn step_count(&self) -> usize {
        self.steps.len()
            + self
                .sequences
                .iter()
                .map(SequenceCall::step_count)
                .sum::<usize>()
    }
}

/// Identity fields a report is created with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UutIdentity {
    /// Operator name
    pub operator: String,
    pub part_number: String,
    pub part_revision: String,
    pub serial_number: String,
    /// Operation type code
    pub operation_type: String,
    pub sequence_name: String,
    pub sequence_version: String,
}

/// Free-form key/value metadata attached to a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiscInfo {
    pub description: String,
    pub value: String,
}

/// A complete UUT test report.
///
/// # Examples
///
/// ```
/// use klippel_report_core::{UutIdentity, UutReport, UutStatus};
///
/// let mut report = UutReport::new(UutIdentity {
///     operator: "oper".into(),
///     serial_number: "xyz116".into(),
///     sequence_name: "SequenceName1".into(),
///     ..Default::default()
/// });
/// report.add_misc_info("Cfg_Speaker", "Woofer");
/// report.status = Some(UutStatus::Passed);
///
/// assert_eq!(report.root.name, "SequenceName1");
/// assert_eq!(report.misc_value("Cfg_Speaker"), Some("Woofer"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UutReport {
    pub identity: UutIdentity,
    pub misc_info: Vec<MiscInfo>,
    /// Local start time as recorded by the instrument
    pub start_date_time: Option<NaiveDateTime>,
    pub start_date_time_utc: Option<DateTime<Utc>>,
    /// Overall status, set once all data has been attached
    pub status: Option<UutStatus>,
    pub root: SequenceCall,
}

impl UutReport {
    /// Creates an empty report whose root sequence is named after the
    /// identity's sequence name.
    pub fn new(identity: UutIdentity) -> Self {
        let root = SequenceCall::new(&identity.sequence_name);
        Self {
            identity,
            misc_info: Vec::new(),
            start_date_time: None,
            start_date_time_utc: None,
            status: None,
            root,
        }
    }

    pub fn add_misc_info(&mut self, description: &str, value: &str) {
        self.misc_info.push(MiscInfo {
            description: description.to_string(),
            value: value.to_string(),
        });
    }

    pub fn misc_value(&self, description: &str) -> Option<&str> {
        self.misc_info
            .iter()
            .find(|m| m.description == description)
            .map(|m| m.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_code_only_literal_one_passes() {
        assert_eq!(UutStatus::from_verdict_code("1"), UutStatus::Passed);
        for code in ["-1", "0", "2", "3", "4", " 1", "1.0", ""] {
            assert_eq!(UutStatus::from_verdict_code(code), UutStatus::Failed, "{code}");
        }
    }

    #[test]
    fn test_gele_is_inclusive() {
        assert!(CompOperator::Gele.evaluate(Some(0.5), Some(0.5), Some(2.0)));
        assert!(CompOperator::Gele.evaluate(Some(2.0), Some(0.5), Some(2.0)));
        assert!(!CompOperator::Gele.evaluate(Some(2.01), Some(0.5), Some(2.0)));
        assert!(!CompOperator::Gele.evaluate(None, Some(0.5), Some(2.0)));
    }

    #[test]
    fn test_lt_is_strict() {
        assert!(CompOperator::Lt.evaluate(Some(0.0), None, Some(1.0)));
        assert!(!CompOperator::Lt.evaluate(Some(1.0), None, Some(1.0)));
    }

    #[test]
    fn test_log_test_always_passes() {
        let test = NumericTest::log(None, "");
        assert!(test.passed());
        assert_eq!(test.comp_operator, CompOperator::Log);
        assert!(test.low_limit.is_none() && test.high_limit.is_none());
    }

    #[test]
    fn test_step_status_follows_tests() {
        let mut step = NumericLimitStep::new("THD");
        step.add_test(NumericTest::between(Some(1.1), 0.5, 2.0, ""));
        assert_eq!(step.status, TestStatus::Passed);
        assert!(!step.is_multiple());

        step.add_test(NumericTest::between(Some(3.0), 0.5, 2.0, ""));
        assert_eq!(step.status, TestStatus::Failed);
    }

    #[test]
    fn test_step_count_is_recursive() {
        let mut root = SequenceCall::new("Main");
        root.add_sequence_call("Seq1")
            .add_step(NumericLimitStep::new("a"));
        let seq2 = root.add_sequence_call("Seq2");
        seq2.add_step(NumericLimitStep::new("b"));
        seq2.add_step(NumericLimitStep::new("c"));

        assert_eq!(root.step_count(), 3);
        assert!(root.find_sequence("Seq2").unwrap().find_step("c").is_some());
    }

    #[test]
    fn test_absent_values_serialize_as_null() {
        let mut chart = Chart::new(ChartType::LineLogX, "SPL");
        chart.add_series("values", vec![Some(100.0)], vec![None]);
        let json = serde_json::to_value(&chart).unwrap();
        assert_eq!(json["chart_type"], "line_log_x");
        assert!(json["series"][0]["y"][0].is_null());
    }
}
