use std::{
    fs,
    path::{Path, PathBuf},
};

use shared::domain::SimulationResult;
use thiserror::Error;
use tracing::info;

use crate::format::{to_csv, CsvError};

pub const EXPORT_FILE_NAME: &str = "investment_simulation_results.csv";
pub const EXPORT_MIME_TYPE: &str = "text/csv";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no simulation result is available to export")]
    NoResult,
    #[error(transparent)]
    Csv(#[from] CsvError),
    #[error("failed to write '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A ready-to-save CSV download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub file_name: &'static str,
    pub mime_type: &'static str,
    pub contents: String,
}

impl CsvExport {
    pub fn from_result(result: &SimulationResult) -> Result<Self, ExportError> {
        Ok(Self {
            file_name: EXPORT_FILE_NAME,
            mime_type: EXPORT_MIME_TYPE,
            contents: to_csv(result)?,
        })
    }

    /// Writes the file into `dir`, creating the directory when missing, and
    /// returns the full path.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(dir).map_err(|source| ExportError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let path = dir.join(self.file_name);
        fs::write(&path, self.contents.as_bytes()).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;

        info!(path = %path.display(), bytes = self.contents.len(), "exported simulation csv");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use shared::domain::BreakdownEntry;

    use super::*;

    fn result() -> SimulationResult {
        SimulationResult {
            final_investment_value: dec!(110),
            total_returns: dec!(10),
            monthly_values: vec![dec!(105), dec!(110)],
            investment_breakdown: vec![BreakdownEntry {
                category: "bank".to_string(),
                amount: dec!(110),
            }],
        }
    }

    #[test]
    fn export_carries_fixed_name_and_mime_type() {
        let export = CsvExport::from_result(&result()).expect("export");

        assert_eq!(export.file_name, "investment_simulation_results.csv");
        assert_eq!(export.mime_type, "text/csv");
        assert!(export.contents.starts_with("Period,Value,bank\n"));
    }

    #[test]
    fn writes_file_into_nested_directory() {
        let temp = tempfile::tempdir().expect("tempdir");
        let target = temp.path().join("exports").join("today");
        let export = CsvExport::from_result(&result()).expect("export");

        let path = export.write_to_dir(&target).expect("write");

        assert_eq!(path, target.join(EXPORT_FILE_NAME));
        let written = fs::read_to_string(&path).expect("read back");
        assert_eq!(written, "Period,Value,bank\n1,105.00,110.00\n2,110.00,110.00");
    }
}
