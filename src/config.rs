use crate::error::{Result, TallyError};
use crate::types::settings::{ClassConfig, Settings};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";
pub const DEFAULT_LOCAL_FILE: &str = ".redflag/local.json";
pub const DEFAULT_GLOBAL_SETTINGS_FILE: &str = ".config/redflag/settings.json";
pub const CLASS_CONFIG_FILE: &str = "class_config.json";

pub fn load_settings(workspace: &Path) -> Result<Option<Settings>> {
    let global = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(DEFAULT_GLOBAL_SETTINGS_FILE));
    load_settings_with_global(workspace, global.as_deref())
}

pub(crate) fn load_settings_with_global(
    workspace: &Path,
    global_path: Option<&Path>,
) -> Result<Option<Settings>> {
    let workspace_path = workspace.join(DEFAULT_SETTINGS_FILE);
    if !workspace_path.exists() {
        return Ok(None);
    }

    let mut merged = Value::Object(Map::new());
    if let Some(path) = global_path {
        merge_file_if_exists(&mut merged, path)?;
    }
    merge_file_if_exists(&mut merged, &workspace_path)?;
    merge_file_if_exists(&mut merged, &workspace.join(DEFAULT_LOCAL_FILE))?;

    let settings: Settings = serde_json::from_value(merged)
        .map_err(|e| TallyError::ConfigParse(e.to_string()))?;
    Ok(Some(settings))
}

pub fn save_settings(workspace: &Path, settings: &Settings) -> Result<PathBuf> {
    let path = workspace.join(DEFAULT_SETTINGS_FILE);
    write_json(&path, settings)?;
    debug!(path = %path.display(), "settings saved");
    Ok(path)
}

pub fn write_class_config(root: &Path, config: &ClassConfig) -> Result<PathBuf> {
    std::fs::create_dir_all(root)?;
    let path = root.join(CLASS_CONFIG_FILE);
    write_json(&path, config)?;
    Ok(path)
}

pub fn read_class_config(root: &Path) -> Result<Option<ClassConfig>> {
    let path = root.join(CLASS_CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(&path)?;
    let config = serde_json::from_str(&content)
        .map_err(|e| TallyError::ConfigParse(format!("{}: {}", path.display(), e)))?;
    Ok(Some(config))
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}

fn merge_file_if_exists(merged: &mut Value, path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    let value = read_json_value(path)?;
    merge_json(merged, value);
    Ok(())
}

fn read_json_value(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| TallyError::ConfigParse(format!("{}: {}", path.display(), e)))
}

fn merge_json(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_json(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => {
            *slot = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn load_settings_returns_none_when_workspace_file_missing() {
        let dir = TempDir::new().expect("temp dir should be created");
        let settings = load_settings_with_global(dir.path(), None).expect("load should not fail");
        assert!(settings.is_none());
    }

    #[test]
    fn load_settings_merges_global_workspace_and_local_in_order() {
        let root = TempDir::new().expect("root temp dir should be created");
        let global_root = TempDir::new().expect("global temp dir should be created");
        let global_path = global_root.path().join("settings.json");

        fs::write(
            &global_path,
            r#"{
  "max_scores": {"早读": 8, "宿舍": 4},
  "weighted_addition": {"高二1班": 1}
}"#,
        )
        .expect("global settings should write");

        fs::write(
            root.path().join(DEFAULT_SETTINGS_FILE),
            r#"{
  "classes": ["高二1班", "高二2班"],
  "max_scores": {"早读": 9}
}"#,
        )
        .expect("workspace settings should write");

        fs::create_dir_all(root.path().join(".redflag")).expect("local dir should create");
        fs::write(
            root.path().join(DEFAULT_LOCAL_FILE),
            r#"{"weighted_addition": {"高二2班": 0.5}}"#,
        )
        .expect("local override should write");

        let settings = load_settings_with_global(root.path(), Some(&global_path))
            .expect("load should succeed")
            .expect("merged settings should exist");

        assert_eq!(settings.classes, vec!["高二1班", "高二2班"]);
        assert_eq!(settings.max_scores["早读"], 9.0);
        assert_eq!(settings.max_scores["宿舍"], 4.0);
        assert_eq!(settings.weighted_addition["高二1班"], 1.0);
        assert_eq!(settings.weighted_addition["高二2班"], 0.5);
    }

    #[test]
    fn malformed_settings_are_reported_as_config_errors() {
        let root = TempDir::new().expect("temp dir should be created");
        fs::write(root.path().join(DEFAULT_SETTINGS_FILE), "{ not json")
            .expect("settings should write");
        let err = load_settings_with_global(root.path(), None).expect_err("load should fail");
        assert!(matches!(err, TallyError::ConfigParse(_)));
    }

    #[test]
    fn saved_settings_load_back() {
        let root = TempDir::new().expect("temp dir should be created");
        let mut settings = Settings::default();
        settings.classes.truncate(3);
        save_settings(root.path(), &settings).expect("save should succeed");
        let loaded = load_settings_with_global(root.path(), None)
            .expect("load should succeed")
            .expect("settings should exist");
        assert_eq!(loaded, settings);
    }

    #[test]
    fn class_config_round_trips_through_root() {
        let root = TempDir::new().expect("temp dir should be created");
        assert!(read_class_config(root.path()).expect("read should succeed").is_none());
        let config = ClassConfig {
            classes: vec!["高一1班".to_string()],
            weighted_addition: [("高一1班".to_string(), 1.5)].into_iter().collect(),
        };
        write_class_config(root.path(), &config).expect("write should succeed");
        let loaded = read_class_config(root.path())
            .expect("read should succeed")
            .expect("config should exist");
        assert_eq!(loaded, config);
    }
}
