use crate::config::{CLASS_CONFIG_FILE, DEFAULT_SETTINGS_FILE};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Saved data documents directly inside `root`, sorted by file name.
pub fn list_data_files(root: &Path) -> Vec<PathBuf> {
    let mut files = WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path().to_path_buf())
        .filter(|path| is_data_file(path))
        .collect::<Vec<_>>();
    files.sort();
    files
}

fn is_data_file(path: &Path) -> bool {
    let is_json = path
        .extension()
        .and_then(|value| value.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let name = path
        .file_name()
        .and_then(|value| value.to_str())
        .unwrap_or_default();
    is_json && name != DEFAULT_SETTINGS_FILE && name != CLASS_CONFIG_FILE
}
