pub mod filesystem;

use crate::error::{Result, TallyError};
use crate::types::document::ScoreDocument;
use chrono::{DateTime, Local};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const SESSION_FILE: &str = ".redflag/session.json";

pub fn default_data_file_name(now: DateTime<Local>) -> String {
    format!("流动红旗分数数据_{}.json", now.format("%Y%m%d_%H%M%S"))
}

/// Write a data document. A missing parent directory is created once; a
/// read-only directory or file is reported without retrying.
pub fn save_document(path: &Path, document: &ScoreDocument) -> Result<PathBuf> {
    if path.as_os_str().is_empty() {
        return Err(TallyError::Validation("file path must not be empty".to_string()));
    }

    if let Some(directory) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        if !directory.exists() {
            debug!(directory = %directory.display(), "creating data directory");
            fs::create_dir_all(directory).map_err(|error| io_error(directory, error))?;
        } else if is_read_only(directory) {
            return Err(TallyError::PermissionDenied(format!(
                "directory is not writable: {}",
                directory.display()
            )));
        }
    }
    if path.exists() && is_read_only(path) {
        return Err(TallyError::PermissionDenied(format!(
            "file is not writable: {}",
            path.display()
        )));
    }

    let json = serde_json::to_string_pretty(document)?;
    fs::write(path, json).map_err(|error| io_error(path, error))?;
    info!(path = %path.display(), "data saved");
    Ok(path.to_path_buf())
}

pub fn load_document(path: &Path) -> Result<ScoreDocument> {
    if !path.exists() {
        return Err(TallyError::PathNotFound(path.display().to_string()));
    }
    let content = fs::read_to_string(path).map_err(|error| io_error(path, error))?;
    let document = serde_json::from_str(&content)?;
    debug!(path = %path.display(), "data document parsed");
    Ok(document)
}

fn is_read_only(path: &Path) -> bool {
    fs::metadata(path)
        .map(|metadata| metadata.permissions().readonly())
        .unwrap_or(false)
}

fn io_error(path: &Path, error: std::io::Error) -> TallyError {
    if error.kind() == ErrorKind::PermissionDenied {
        TallyError::PermissionDenied(path.display().to_string())
    } else {
        TallyError::Io(error)
    }
}
