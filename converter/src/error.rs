//! Error types for log conversion.
//!
//! Every variant is fatal for the report being converted: no partial report
//! is produced once an error is returned.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while converting an instrument log.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// A header key the report needs is absent.
    #[error("missing header key: {0}")]
    MissingHeaderKey(String),

    /// The same header key appears on more than one line.
    #[error("duplicate header key: {0}")]
    DuplicateHeaderKey(String),

    /// `Cfg_DutStartTime` does not match the composite timestamp layout or
    /// names an impossible date/time.
    #[error("malformed start timestamp: {0:?}")]
    MalformedTimestamp(String),

    /// A data row has a field pattern the converter does not handle.
    #[error("unsupported row shape in {file} line {line} ({fields} fields): {reason}")]
    UnsupportedRowShape {
        file: String,
        /// 1-based line number
        line: usize,
        fields: usize,
        reason: &'static str,
    },

    /// A data file's first header label is neither `name` nor `frq`.
    #[error("unrecognized data file format in {file}: header label {label:?}")]
    UnrecognizedFileFormat { file: String, label: String },

    /// A sweep file contained no data rows.
    #[error("sweep has no data rows: {file}")]
    EmptySweep { file: String },

    /// A converter parameter is absent from a parameter map.
    #[error("missing converter parameter: {0}")]
    MissingParameter(String),

    /// File or directory I/O failure.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ConvertError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience alias for results with [`ConvertError`].
pub type Result<T> = std::result::Result<T, ConvertError>;
