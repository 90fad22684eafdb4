//! Frequency-sweep (`frq`-format) data files.
//!
//! Each data row is `frequency<TAB>value[<TAB>max[<TAB>min]]`. Rows are
//! accumulated into four independent sequences and summarised into a single
//! multi-test step with a chart:
//!
//! - `avg`: mean of the measured values, always emitted.
//! - `min`: smallest measured value, emitted only if any row supplied a min
//!   limit.
//! - `max`: largest measured value, emitted only if any row supplied a max
//!   limit.
//! - `OutOfBounds`: number of limit violations, must be `< 1`.
//!
//! The `max`/`min` sequences only grow when a row supplies that column, so
//! they can be shorter than `x`/`y`. Index `i` of a limit sequence lines up
//! with row `i` only while every earlier row supplied the column too.

use klippel_report_core::{Chart, ChartType, NumericLimitStep, NumericTest};

use crate::error::{ConvertError, Result};
use crate::row::parse_fields;

const STAT_UNIT: &str = "Hz";
const COUNT_UNIT: &str = "#";

/// Accumulated rows of one sweep file.
///
/// # Examples
///
/// ```
/// use klippel_report_converter::Sweep;
///
/// let mut sweep = Sweep::default();
/// sweep.push_row("100\t1.0\t1.5\t0.5", "SPL-001", 2).unwrap();
/// sweep.push_row("200\t2.0\t1.5\t0.5", "SPL-001", 3).unwrap();
///
/// assert_eq!(sweep.average(), Some(1.5));
/// assert_eq!(sweep.out_of_bounds(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sweep {
    pub x: Vec<Option<f64>>,
    pub y: Vec<Option<f64>>,
    pub max: Vec<Option<f64>>,
    pub min: Vec<Option<f64>>,
}

impl Sweep {
    /// Adds one data row.
    ///
    /// Returns `false` when the row has a single field and was skipped.
    ///
    /// # Errors
    ///
    /// Rows with more than four fields are
    /// [`UnsupportedRowShape`](ConvertError::UnsupportedRowShape).
    pub fn push_row(&mut self, line: &str, file: &str, line_number: usize) -> Result<bool> {
        let fields = parse_fields(line);
        match fields.as_slice() {
            [_] => return Ok(false),
            [x, y] => {
                self.x.push(*x);
                self.y.push(*y);
            }
            [x, y, max] => {
                self.x.push(*x);
                self.y.push(*y);
                self.max.push(*max);
            }
            [x, y, max, min] => {
                self.x.push(*x);
                self.y.push(*y);
                self.max.push(*max);
                self.min.push(*min);
            }
            _ => {
                return Err(ConvertError::UnsupportedRowShape {
                    file: file.to_string(),
                    line: line_number,
                    fields: fields.len(),
                    reason: "sweep row must have 2, 3 or 4 fields",
                });
            }
        }
        Ok(true)
    }

    fn measured(&self) -> impl Iterator<Item = f64> + '_ {
        self.y.iter().flatten().copied()
    }

    /// Mean of the present measured values.
    pub fn average(&self) -> Option<f64> {
        let (sum, count) = self
            .measured()
            .fold((0.0, 0usize), |(sum, count), y| (sum + y, count + 1));
        (count > 0).then(|| sum / count as f64)
    }

    /// Smallest present measured value.
    pub fn y_min(&self) -> Option<f64> {
        self.measured().reduce(f64::min)
    }

    /// Largest present measured value.
    pub fn y_max(&self) -> Option<f64> {
        self.measured().reduce(f64::max)
    }

    /// Counts limit violations.
    ///
    /// Index `i` is skipped entirely when `max[i]` does not exist or is
    /// absent. Otherwise `y[i] > max[i]` counts once and, when any min limit
    /// was recorded, `y[i] < min[i]` counts once more.
    pub fn out_of_bounds(&self) -> usize {
        let mut count = 0;
        for (i, y) in self.y.iter().enumerate() {
            let Some(Some(max)) = self.max.get(i) else {
                continue;
            };
            let Some(y) = *y else {
                continue;
            };
            if y > *max {
                count += 1;
            }
            if self.min.get(i).copied().flatten().is_some_and(|min| y < min) {
                count += 1;
            }
        }
        count
    }

    /// Log-frequency line chart of the measured values and any limits.
    ///
    /// Limit series are passed through as recorded, even when shorter than
    /// the frequency axis.
    pub fn chart(&self, title: &str) -> Chart {
        let mut chart = Chart::new(ChartType::LineLogX, title)
            .with_x_axis("Frequency", "Hz")
            .with_y_axis("res", "");
        chart.add_series("values", self.x.clone(), self.y.clone());
        if !self.min.is_empty() {
            chart.add_series("min", self.x.clone(), self.min.clone());
        }
        if !self.max.is_empty() {
            chart.add_series("max", self.x.clone(), self.max.clone());
        }
        chart
    }

    /// Summarises the sweep into a multi-test step named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`EmptySweep`](ConvertError::EmptySweep) when the file has no
    /// data rows. Rows whose values are all absent still produce a step with
    /// absent statistics.
    pub fn into_step(self, name: &str, file: &str) -> Result<NumericLimitStep> {
        if self.y.is_empty() {
            return Err(ConvertError::EmptySweep {
                file: file.to_string(),
            });
        }

        let mut step = NumericLimitStep::new(name);
        step.add_test(NumericTest::log(self.average(), STAT_UNIT).named("avg"));
        if !self.min.is_empty() {
            step.add_test(NumericTest::log(self.y_min(), STAT_UNIT).named("min"));
        }
        if !self.max.is_empty() {
            step.add_test(NumericTest::log(self.y_max(), STAT_UNIT).named("max"));
        }
        let violations = self.out_of_bounds() as f64;
        step.add_test(NumericTest::less_than(Some(violations), 1.0, COUNT_UNIT).named("OutOfBounds"));
        step.set_chart(self.chart(name));
        Ok(step)
    }
}

/// Builds the step for a sweep file.
///
/// `header` is the file's first line; its second label names the step.
/// `lines` are the rows after it.
///
/// # Examples
///
/// ```
/// use klippel_report_converter::sweep_step;
///
/// let step = sweep_step("frq\tSPL", ["100\t1.0", "200\t3.0"], "SPL-001").unwrap();
/// assert_eq!(step.name, "SPL");
/// assert_eq!(step.find_test("avg").unwrap().value, Some(2.0));
/// assert!(step.find_test("max").is_none());
/// ```
pub fn sweep_step<'a>(
    header: &str,
    lines: impl IntoIterator<Item = &'a str>,
    file: &str,
) -> Result<NumericLimitStep> {
    let name = header
        .split('\t')
        .nth(1)
        .ok_or_else(|| ConvertError::UnsupportedRowShape {
            file: file.to_string(),
            line: 1,
            fields: 1,
            reason: "sweep header has no name label",
        })?;

    let mut sweep = Sweep::default();
    let mut skipped = 0usize;
    for (offset, line) in lines.into_iter().enumerate() {
        if !sweep.push_row(line, file, offset + 2)? {
            skipped += 1;
        }
    }
    if skipped > 0 {
        tracing::debug!(file, skipped, "Skipped sweep rows without a value");
    }
    tracing::debug!(
        file,
        points = sweep.x.len(),
        max_limits = sweep.max.len(),
        min_limits = sweep.min.len(),
        "Accumulated sweep"
    );

    sweep.into_step(name, file)
}
