//! Conversion of Klippel test-instrument logs into UUT test reports.
//!
//! An instrument run produces a header file of `key=value` lines and a
//! sibling folder of tab-delimited data files. This crate turns that pair
//! into one [`UutReport`] tree in a single pass:
//!
//! - [`Header`]: header parsing and [`StartTime`] decoding.
//! - [`parse_fields`]: data row tokenizing with explicit absent values.
//! - [`SequenceGrouper`]: adjacency-only grouping of data files by name
//!   prefix.
//! - [`scalar_step`] / [`Sweep`]: `name` and `frq` data file conversion.
//! - [`ReportBuilder`]: identity, misc info, tree assembly and verdict.
//!
//! # Main entry points
//!
//! - [`convert_file`]: convert a header file on disk, discovering its data
//!   folder.
//! - [`convert`]: convert already-loaded header text and data files.
//!
//! # Example
//!
//! ```
//! use klippel_report_converter::{ConverterConfig, DataFile, convert};
//! use klippel_report_core::UutStatus;
//!
//! let header = "\
//! Cfg_DutStartTime=2020-5-20-135-5-14-10-1-37-563-120
//! Cfg_UserName=oper
//! Cfg_SerialNumber=xyz116
//! Cfg_LoginMode=Operator
//! Cfg_Speaker=Woofer
//! Ctrl_OverallVerdict=1
//! ";
//! let files = vec![
//!     DataFile::new("SPL-001.txt", "frq\tSPL\tmax\tmin\n100\t1.0\t1.5\t0.5\n200\t2.0\t1.5\t0.5\n"),
//! ];
//!
//! let report = convert(&ConverterConfig::default(), "DUT xyz116.txt", header, files).unwrap();
//! assert_eq!(report.status, Some(UutStatus::Passed));
//!
//! let spl = report.root.find_sequence("SPL").unwrap().find_step("SPL").unwrap();
//! assert_eq!(spl.find_test("avg").unwrap().value, Some(1.5));
//! assert_eq!(spl.find_test("OutOfBounds").unwrap().value, Some(1.0));
//! ```
//!
//! [`UutReport`]: klippel_report_core::UutReport

pub mod config;
pub mod discover;
pub mod error;
pub mod grouping;
pub mod header;
pub mod report;
pub mod row;
pub mod scalar;
pub mod sweep;

use std::path::Path;

use klippel_report_core::UutReport;

pub use config::ConverterConfig;
pub use discover::{DataFile, DataFormat, data_folder, discover_data_files};
pub use error::{ConvertError, Result};
pub use grouping::{SequenceGrouper, group_id};
pub use header::{Header, StartTime};
pub use report::ReportBuilder;
pub use row::parse_fields;
pub use scalar::scalar_step;
pub use sweep::{Sweep, sweep_step};

/// Converts loaded header text and data files into a report.
///
/// `source_name` is recorded as the `FileName` misc info. Data files are
/// processed in the order given; any error aborts the whole conversion.
pub fn convert(
    config: &ConverterConfig,
    source_name: &str,
    header_text: &str,
    data_files: impl IntoIterator<Item = DataFile>,
) -> Result<UutReport> {
    let header = Header::parse(header_text)?;
    let mut builder = ReportBuilder::new(config, &header, source_name)?;
    for file in data_files {
        builder.add_data_file(&file)?;
    }
    builder.finish(&header)
}

/// Converts a header file and the data files in its sibling folder.
///
/// Data files are read and converted in directory enumeration order.
///
/// # Errors
///
/// Any read failure, including a missing data folder, is
/// [`Io`](ConvertError::Io); see [`ConvertError`] for the rest.
pub fn convert_file(config: &ConverterConfig, header_path: &Path) -> Result<UutReport> {
    let header_text = discover::read_text(header_path)?;
    let source_name = header_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    tracing::debug!(path = %header_path.display(), "Converting header file");

    let header = Header::parse(&header_text)?;
    let mut builder = ReportBuilder::new(config, &header, &source_name)?;
    for path in discover_data_files(header_path)? {
        builder.add_data_file(&DataFile::read(&path)?)?;
    }
    builder.finish(&header)
}
