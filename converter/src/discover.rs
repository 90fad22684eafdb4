//! Data file discovery and classification.
//!
//! Measurement data lives next to the header file, in a folder with the
//! header's base name:
//!
//! ```text
//! DUT xyz116 2020-05-14.txt        <- header
//! DUT xyz116 2020-05-14/
//!     SPL-001.txt                  <- data files
//!     THD-001.txt
//! ```
//!
//! Files are returned in directory enumeration order. That order decides
//! group adjacency and is not re-sorted.

use std::fs;
use std::path::{Path, PathBuf};

use klippel_report_core::NumericLimitStep;

use crate::error::{ConvertError, Result};
use crate::row::first_token;
use crate::scalar::scalar_steps;
use crate::sweep::sweep_step;

const DATA_EXTENSION: &str = "txt";

/// Layout of a data file, chosen by its first header label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    /// `name`: one scalar measurement per row.
    Scalar,
    /// `frq`: one frequency-sweep sample per row.
    Sweep,
}

impl DataFormat {
    /// Classifies a header label.
    ///
    /// # Examples
    ///
    /// ```
    /// use klippel_report_converter::DataFormat;
    ///
    /// assert_eq!(DataFormat::from_label("name"), Some(DataFormat::Scalar));
    /// assert_eq!(DataFormat::from_label("frq"), Some(DataFormat::Sweep));
    /// assert_eq!(DataFormat::from_label("Frq"), None);
    /// ```
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "name" => Some(Self::Scalar),
            "frq" => Some(Self::Sweep),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Scalar => "name",
            Self::Sweep => "frq",
        }
    }
}

/// One tab-delimited measurement file.
///
/// # Examples
///
/// ```
/// use klippel_report_converter::{DataFile, DataFormat};
///
/// let file = DataFile::new("THD-001.txt", "name\tvalue\tmax\tmin\nTHD\t1.1\t2.0\t0.5\n");
/// assert_eq!(file.stem(), "THD-001");
/// assert_eq!(file.format().unwrap(), DataFormat::Scalar);
/// assert_eq!(file.steps().unwrap().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFile {
    /// File name including extension
    pub name: String,
    pub contents: String,
}

impl DataFile {
    pub fn new(name: &str, contents: &str) -> Self {
        Self {
            name: name.to_string(),
            contents: contents.to_string(),
        }
    }

    /// Reads a data file from disk.
    pub fn read(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            name,
            contents: read_text(path)?,
        })
    }

    /// File name without its extension.
    pub fn stem(&self) -> &str {
        Path::new(&self.name)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(&self.name)
    }

    /// Classifies the file by its first header label.
    ///
    /// # Errors
    ///
    /// Returns [`UnrecognizedFileFormat`](ConvertError::UnrecognizedFileFormat)
    /// for an empty file or an unknown label.
    pub fn format(&self) -> Result<DataFormat> {
        let label = first_token(self.contents.lines().next().unwrap_or_default());
        DataFormat::from_label(label).ok_or_else(|| ConvertError::UnrecognizedFileFormat {
            file: self.name.clone(),
            label: label.to_string(),
        })
    }

    /// Converts the file into report steps.
    ///
    /// A scalar file yields one step per row, a sweep file exactly one step.
    pub fn steps(&self) -> Result<Vec<NumericLimitStep>> {
        let format = self.format()?;
        let mut lines = self.contents.lines();
        let header = lines.next().unwrap_or_default();
        match format {
            DataFormat::Scalar => scalar_steps(lines, &self.name),
            DataFormat::Sweep => sweep_step(header, lines, &self.name).map(|step| vec![step]),
        }
    }
}

/// Reads a text file, dropping a leading UTF-8 byte order mark.
pub fn read_text(path: &Path) -> Result<String> {
    let text = fs::read_to_string(path).map_err(|e| ConvertError::io(path, e))?;
    Ok(match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

/// Returns the data folder belonging to a header file: a sibling directory
/// named like the header without its extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use klippel_report_converter::data_folder;
///
/// let folder = data_folder(Path::new("/logs/DUT xyz116.txt"));
/// assert_eq!(folder, Path::new("/logs/DUT xyz116"));
/// ```
pub fn data_folder(header_path: &Path) -> PathBuf {
    let stem = header_path.file_stem().unwrap_or_default();
    match header_path.parent() {
        Some(parent) => parent.join(stem),
        None => PathBuf::from(stem),
    }
}

/// Lists the `*.txt` files in a header's data folder, in enumeration order.
///
/// The extension match is ASCII case-insensitive; subdirectories are ignored.
///
/// # Errors
///
/// Returns [`Io`](ConvertError::Io) when the folder cannot be read.
pub fn discover_data_files(header_path: &Path) -> Result<Vec<PathBuf>> {
    let folder = data_folder(header_path);
    let entries = fs::read_dir(&folder).map_err(|e| ConvertError::io(&folder, e))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ConvertError::io(&folder, e))?;
        let path = entry.path();
        let is_txt = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(DATA_EXTENSION));
        if is_txt && path.is_file() {
            paths.push(path);
        }
    }

    tracing::debug!(folder = %folder.display(), files = paths.len(), "Discovered data files");
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_unrecognized() {
        let err = DataFile::new("empty.txt", "").steps().unwrap_err();
        assert!(matches!(
            err,
            ConvertError::UnrecognizedFileFormat { ref label, .. } if label.is_empty()
        ));
    }

    #[test]
    fn test_unknown_label_is_unrecognized() {
        let err = DataFile::new("Imp-001.txt", "time\tvalue\n0\t1\n")
            .steps()
            .unwrap_err();
        assert!(matches!(
            err,
            ConvertError::UnrecognizedFileFormat { ref file, ref label }
                if file == "Imp-001.txt" && label == "time"
        ));
    }

    #[test]
    fn test_sweep_file_yields_one_step() {
        let file = DataFile::new("SPL-001.txt", "frq\tSPL\n100\t80\n200\t82\n");
        let steps = file.steps().unwrap();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].name, "SPL");
        assert!(steps[0].chart.is_some());
    }

    #[test]
    fn test_scalar_file_with_only_header_yields_no_steps() {
        let file = DataFile::new("TS-001.txt", "name\tvalue\tmax\tmin\n");
        assert!(file.steps().unwrap().is_empty());
    }

    #[test]
    fn test_stem_keeps_inner_dots() {
        assert_eq!(DataFile::new("Seq1-0.5V.txt", "").stem(), "Seq1-0.5V");
        assert_eq!(DataFile::new("noext", "").stem(), "noext");
    }

    #[test]
    fn test_discover_filters_txt_files() {
        let dir = tempfile::tempdir().unwrap();
        let header = dir.path().join("DUT 1.txt");
        let folder = dir.path().join("DUT 1");
        fs::create_dir(&folder).unwrap();
        fs::create_dir(folder.join("nested.txt")).unwrap();
        fs::write(folder.join("SPL-001.txt"), "frq\tSPL\n").unwrap();
        fs::write(folder.join("THD-001.TXT"), "frq\tTHD\n").unwrap();
        fs::write(folder.join("notes.csv"), "ignored").unwrap();

        let mut names: Vec<_> = discover_data_files(&header)
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["SPL-001.txt", "THD-001.TXT"]);
    }

    #[test]
    fn test_discover_missing_folder_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover_data_files(&dir.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, ConvertError::Io { .. }));
    }

    #[test]
    fn test_read_strips_byte_order_mark() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("SPL-001.txt");
        fs::write(&path, "\u{feff}frq\tSPL\n100\t1\n").unwrap();

        let file = DataFile::read(&path).unwrap();
        assert_eq!(file.name, "SPL-001.txt");
        assert_eq!(file.format().unwrap(), DataFormat::Sweep);
    }
}
