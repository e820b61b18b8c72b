use std::fs;
use std::path::{Path, PathBuf};

use glit_core::HarvestReport;

use crate::persist::{write_atomic, PersistError};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Persist {
        path: String,
        #[source]
        source: PersistError,
    },
    #[error("report at {path} is not valid JSON: {source}")]
    Serialize {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Writes the whole report as a JSON array of `{repository, emails}` objects.
pub fn export_report(path: &Path, report: &HarvestReport) -> Result<PathBuf, ExportError> {
    let json = serde_json::to_string_pretty(report).map_err(|source| ExportError::Serialize {
        path: path.display().to_string(),
        source,
    })?;
    write_atomic(path, &json).map_err(|source| ExportError::Persist {
        path: path.display().to_string(),
        source,
    })
}

pub fn read_report(path: &Path) -> Result<HarvestReport, ExportError> {
    let content = fs::read_to_string(path).map_err(|source| ExportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ExportError::Serialize {
        path: path.display().to_string(),
        source,
    })
}
