//! Static converter configuration.
//!
//! Identity fields that are not present in the instrument log (part number,
//! revision, sequence metadata, operation type) are supplied by the caller and
//! passed into every conversion.
//!
//! # Example YAML
//!
//! ```yaml
//! part_number: PartNumber1
//! part_revision: "1.0"
//! sequence_name: SequenceName1
//! sequence_version: 1.0.0
//! operation_type_code: "10"
//! ```

use std::collections::HashMap;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConvertError, Result};

const PART_NUMBER: &str = "partNumber";
const PART_REVISION: &str = "partRevision";
const SEQUENCE_NAME: &str = "sequenceName";
const SEQUENCE_VERSION: &str = "sequenceVersion";
const OPERATION_TYPE_CODE: &str = "operationTypeCode";

/// Caller-supplied report identity defaults.
///
/// # Examples
///
/// ```
/// use klippel_report_converter::ConverterConfig;
///
/// let config = ConverterConfig::default();
/// assert_eq!(config.part_number, "PartNumber1");
/// assert_eq!(config.operation_type_code, "10");
///
/// let params = config.parameters();
/// assert_eq!(params["sequenceVersion"], "1.0.0");
/// assert_eq!(ConverterConfig::from_parameters(&params).unwrap(), config);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverterConfig {
    pub part_number: String,
    pub part_revision: String,
    pub sequence_name: String,
    pub sequence_version: String,
    pub operation_type_code: String,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            part_number: "PartNumber1".to_string(),
            part_revision: "1.0".to_string(),
            sequence_name: "SequenceName1".to_string(),
            sequence_version: "1.0.0".to_string(),
            operation_type_code: "10".to_string(),
        }
    }
}

impl ConverterConfig {
    /// Builds a configuration from flat parameter names
    /// (`partNumber`, `partRevision`, `sequenceName`, `sequenceVersion`,
    /// `operationTypeCode`).
    ///
    /// # Errors
    ///
    /// Returns [`MissingParameter`](ConvertError::MissingParameter) for the
    /// first absent name.
    pub fn from_parameters(parameters: &HashMap<String, String>) -> Result<Self> {
        let get = |name: &str| {
            parameters
                .get(name)
                .cloned()
                .ok_or_else(|| ConvertError::MissingParameter(name.to_string()))
        };
        Ok(Self {
            part_number: get(PART_NUMBER)?,
            part_revision: get(PART_REVISION)?,
            sequence_name: get(SEQUENCE_NAME)?,
            sequence_version: get(SEQUENCE_VERSION)?,
            operation_type_code: get(OPERATION_TYPE_CODE)?,
        })
    }

    /// Returns the configuration as flat parameter names.
    pub fn parameters(&self) -> HashMap<String, String> {
        [
            (PART_NUMBER, &self.part_number),
            (PART_REVISION, &self.part_revision),
            (SEQUENCE_NAME, &self.sequence_name),
            (SEQUENCE_VERSION, &self.sequence_version),
            (OPERATION_TYPE_CODE, &self.operation_type_code),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](ConvertError::Io) if the file cannot be read, or
    /// [`Yaml`](ConvertError::Yaml) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| ConvertError::io(path, e))?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path).map_err(|e| ConvertError::io(path, e))?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }
}
