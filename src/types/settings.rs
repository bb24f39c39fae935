use crate::types::category::CategoryKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Where data documents and the class config live. Relative paths resolve
    /// against the workspace; unset means the workspace itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_directory: Option<PathBuf>,
    #[serde(default = "default_max_scores")]
    pub max_scores: BTreeMap<String, f64>,
    #[serde(default = "default_classes")]
    pub classes: Vec<String>,
    #[serde(default = "default_weighted_addition")]
    pub weighted_addition: BTreeMap<String, f64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root_directory: None,
            max_scores: default_max_scores(),
            classes: default_classes(),
            weighted_addition: default_weighted_addition(),
        }
    }
}

impl Settings {
    pub fn root_dir(&self, workspace: &Path) -> PathBuf {
        match &self.root_directory {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => workspace.join(dir),
            None => workspace.to_path_buf(),
        }
    }
}

fn default_max_scores() -> BTreeMap<String, f64> {
    CategoryKind::ALL
        .into_iter()
        .map(|kind| (kind.name().to_string(), kind.default_max_score()))
        .collect()
}

fn default_classes() -> Vec<String> {
    (1..=10).map(|i| format!("高二{i}班")).collect()
}

fn default_weighted_addition() -> BTreeMap<String, f64> {
    default_classes()
        .into_iter()
        .enumerate()
        .map(|(index, class_id)| {
            let weight = match index {
                0 => 0.0,
                1 => 0.5,
                _ => 2.0,
            };
            (class_id, weight)
        })
        .collect()
}

/// Standalone copy of the class roster kept next to the data documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassConfig {
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub weighted_addition: BTreeMap<String, f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_ten_classes_and_all_categories() {
        let settings = Settings::default();
        assert_eq!(settings.classes.len(), 10);
        assert_eq!(settings.classes[0], "高二1班");
        assert_eq!(settings.weighted_addition["高二1班"], 0.0);
        assert_eq!(settings.weighted_addition["高二2班"], 0.5);
        assert_eq!(settings.weighted_addition["高二10班"], 2.0);
        assert_eq!(settings.max_scores.len(), 10);
        assert_eq!(settings.max_scores["跑操"], 30.0);
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"max_scores": {"早读": 8}}"#).expect("settings should parse");
        assert_eq!(settings.classes.len(), 10);
        assert_eq!(settings.max_scores.len(), 1);
        assert!(settings.root_directory.is_none());
    }

    #[test]
    fn relative_root_directory_resolves_against_workspace() {
        let settings = Settings {
            root_directory: Some(PathBuf::from("data")),
            ..Settings::default()
        };
        assert_eq!(
            settings.root_dir(Path::new("/work")),
            PathBuf::from("/work/data")
        );
    }
}
