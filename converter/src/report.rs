//! UUT report assembly.
//!
//! [`ReportBuilder`] creates the report from the header, attaches the steps
//! of each data file under its sequence group, and sets the overall status
//! once every file has been processed.

use klippel_report_core::{InstrumentVerdict, UutIdentity, UutReport, UutStatus, validate_report};

use crate::config::ConverterConfig;
use crate::discover::DataFile;
use crate::error::Result;
use crate::grouping::SequenceGrouper;
use crate::header::{Header, LOGIN_MODE, OVERALL_VERDICT, SERIAL_NUMBER, SPEAKER, USER_NAME};

/// Misc info key carrying the header file name.
pub const FILE_NAME_INFO: &str = "FileName";

/// Single-pass builder for one report.
///
/// The group cursor lives in the builder, so nothing carries over between
/// conversions.
///
/// # Examples
///
/// ```
/// use klippel_report_converter::{ConverterConfig, DataFile, Header, ReportBuilder};
/// use klippel_report_core::UutStatus;
///
/// let header = Header::parse(
///     "Cfg_DutStartTime=2020-5-20-135-5-14-10-1-37-563-120\n\
///      Cfg_UserName=oper\nCfg_SerialNumber=xyz116\nCfg_LoginMode=Operator\n\
///      Cfg_Speaker=Woofer\nCtrl_OverallVerdict=1\n",
/// )
/// .unwrap();
/// let config = ConverterConfig::default();
///
/// let mut builder = ReportBuilder::new(&config, &header, "DUT xyz116.txt").unwrap();
/// builder
///     .add_data_file(&DataFile::new("THD-001.txt", "name\tvalue\tmax\tmin\nTHD\t1.1\t2.0\t0.5"))
///     .unwrap();
/// let report = builder.finish(&header).unwrap();
///
/// assert_eq!(report.status, Some(UutStatus::Passed));
/// assert_eq!(report.root.sequence_names(), vec!["THD"]);
/// ```
#[derive(Debug)]
pub struct ReportBuilder {
    report: UutReport,
    grouper: SequenceGrouper,
}

impl ReportBuilder {
    /// Creates the report identity, misc info and start time.
    ///
    /// # Errors
    ///
    /// Returns [`MissingHeaderKey`](crate::ConvertError::MissingHeaderKey)
    /// or [`MalformedTimestamp`](crate::ConvertError::MalformedTimestamp).
    pub fn new(config: &ConverterConfig, header: &Header, source_name: &str) -> Result<Self> {
        let identity = UutIdentity {
            operator: header.get(USER_NAME)?.to_string(),
            part_number: config.part_number.clone(),
            part_revision: config.part_revision.clone(),
            serial_number: header.get(SERIAL_NUMBER)?.to_string(),
            operation_type: config.operation_type_code.clone(),
            sequence_name: config.sequence_name.clone(),
            sequence_version: config.sequence_version.clone(),
        };

        let mut report = UutReport::new(identity);
        report.add_misc_info(LOGIN_MODE, header.get(LOGIN_MODE)?);
        report.add_misc_info(SPEAKER, header.get(SPEAKER)?);

        let start = header.start_time()?;
        report.start_date_time = Some(start.local);
        report.start_date_time_utc = Some(start.utc);
        report.add_misc_info(FILE_NAME_INFO, source_name);

        Ok(Self {
            report,
            grouper: SequenceGrouper::new(),
        })
    }

    /// Converts one data file and attaches its steps to the file's group.
    ///
    /// The file is fully converted before anything is attached.
    pub fn add_data_file(&mut self, file: &DataFile) -> Result<()> {
        let format = file.format()?;
        let steps = file.steps()?;
        let group = self.grouper.enter(&mut self.report.root, file.stem());
        tracing::debug!(
            file = %file.name,
            group = %group.name,
            format = format.label(),
            steps = steps.len(),
            "Converted data file"
        );
        for step in steps {
            group.add_step(step);
        }
        Ok(())
    }

    /// Sets the overall status from `Ctrl_OverallVerdict` and returns the
    /// finished report.
    ///
    /// Validation findings are logged as warnings and do not fail the
    /// conversion.
    pub fn finish(mut self, header: &Header) -> Result<UutReport> {
        let code = header.get(OVERALL_VERDICT)?;
        let status = UutStatus::from_verdict_code(code);
        match InstrumentVerdict::from_code(code) {
            Some(verdict) => tracing::debug!(%verdict, ?status, "Mapped instrument verdict"),
            None => tracing::warn!(code, ?status, "Unknown instrument verdict code"),
        }
        self.report.status = Some(status);

        for finding in validate_report(&self.report) {
            tracing::warn!(%finding, "Report validation finding");
        }

        tracing::info!(
            serial = %self.report.identity.serial_number,
            groups = self.report.root.sequences.len(),
            steps = self.report.root.step_count(),
            ?status,
            "Converted report"
        );
        Ok(self.report)
    }
}
