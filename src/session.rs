use crate::config;
use crate::error::{Result, TallyError};
use crate::history::{Snapshot, SnapshotHistory};
use crate::storage::{self, SESSION_FILE};
use crate::tally::aggregate::{self, Aggregator};
use crate::tally::ledger::{Adjustment, AdjustmentKind, AdjustmentLedger};
use crate::tally::store::ScoreStore;
use crate::types::category::{Catalog, HalfDay};
use crate::types::document::{ScoreDocument, SAVE_TIME_FORMAT};
use crate::types::report::{
    AdjustmentLine, ClassLine, EvaluationResult, HistoryLine, ScoreTable, Standing,
};
use crate::types::settings::{ClassConfig, Settings};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// What is carried between invocations besides the settings file.
#[derive(Debug, Serialize, Deserialize)]
struct SessionState {
    scores: ScoreStore,
    adjustments: AdjustmentLedger,
    history: SnapshotHistory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// The evaluation of one workspace: settings, live state and its history.
/// The roster, weights and max scores live only in `settings`.
pub struct Evaluation {
    workspace: PathBuf,
    settings: Settings,
    catalog: Catalog,
    scores: ScoreStore,
    adjustments: AdjustmentLedger,
    history: SnapshotHistory,
}

impl Evaluation {
    pub fn open(workspace: &Path) -> Result<Self> {
        if !workspace.exists() {
            return Err(TallyError::PathNotFound(workspace.display().to_string()));
        }
        let settings = match config::load_settings(workspace)? {
            Some(settings) => settings,
            None => {
                warn!(
                    workspace = %workspace.display(),
                    "no {} found, using built-in defaults",
                    config::DEFAULT_SETTINGS_FILE
                );
                Settings::default()
            }
        };
        Self::open_with_settings(workspace, settings)
    }

    pub(crate) fn open_with_settings(workspace: &Path, settings: Settings) -> Result<Self> {
        let catalog = Catalog::from_max_scores(&settings.max_scores);
        let session_path = workspace.join(SESSION_FILE);

        let mut evaluation = if session_path.exists() {
            let content = std::fs::read_to_string(&session_path)?;
            let state: SessionState = serde_json::from_str(&content)
                .map_err(|e| TallyError::ConfigParse(format!("{}: {}", session_path.display(), e)))?;
            debug!(path = %session_path.display(), entries = state.history.len(), "session restored");
            Self {
                workspace: workspace.to_path_buf(),
                settings,
                catalog,
                scores: state.scores,
                adjustments: state.adjustments,
                history: state.history,
            }
        } else {
            let scores = ScoreStore::seeded(&catalog, &settings.classes);
            Self {
                workspace: workspace.to_path_buf(),
                settings,
                catalog,
                scores,
                adjustments: AdjustmentLedger::default(),
                history: SnapshotHistory::default(),
            }
        };

        // the settings file may have been edited since the session was written
        evaluation
            .scores
            .sync_classes(&evaluation.catalog, &evaluation.settings.classes);
        if evaluation.history.is_empty() {
            evaluation.record();
        }
        Ok(evaluation)
    }

    pub fn persist(&self) -> Result<PathBuf> {
        let path = self.workspace.join(SESSION_FILE);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let state = SessionState {
            scores: self.scores.clone(),
            adjustments: self.adjustments.clone(),
            history: self.history.clone(),
        };
        std::fs::write(&path, serde_json::to_string(&state)?)?;
        debug!(path = %path.display(), "session persisted");
        Ok(path)
    }

    pub fn classes(&self) -> &[String] {
        &self.settings.classes
    }

    pub fn history(&self) -> &SnapshotHistory {
        &self.history
    }

    pub fn root_dir(&self) -> PathBuf {
        self.settings.root_dir(&self.workspace)
    }

    pub fn set_score(
        &mut self,
        category: &str,
        class_id: &str,
        period: u8,
        value: f64,
        half: Option<HalfDay>,
    ) -> Result<f64> {
        let category = *self.catalog.lookup(category)?;
        self.scores
            .set_score(&category, class_id, period, value, half)?;
        self.record();
        let average = self.scores.get_average(&category, class_id);
        info!(
            class = class_id,
            category = category.name(),
            period,
            value,
            average,
            "score updated"
        );
        Ok(average)
    }

    pub fn add_adjustment(
        &mut self,
        class_id: &str,
        kind: &str,
        amount: f64,
        note: &str,
    ) -> Result<u64> {
        let kind: AdjustmentKind = kind.parse()?;
        self.require_class(class_id)?;
        let id = self.adjustments.add(class_id, kind, amount, note)?;
        self.record();
        info!(class = class_id, %kind, amount, note, id, "adjustment added");
        Ok(id)
    }

    pub fn remove_adjustment(&mut self, id: u64) -> Result<Adjustment> {
        let (class_id, removed) = self
            .adjustments
            .remove_by_id(id)
            .ok_or(TallyError::AdjustmentNotFound(id))?;
        self.record();
        info!(class = %class_id, id, "adjustment removed");
        Ok(removed)
    }

    /// Value-matched removal: `None` and no history entry when nothing matches.
    pub fn remove_matching_adjustment(
        &mut self,
        class_id: &str,
        kind: &str,
        amount: f64,
        note: &str,
    ) -> Result<Option<Adjustment>> {
        let kind: AdjustmentKind = kind.parse()?;
        let removed = self.adjustments.remove(class_id, kind, amount, note);
        match &removed {
            Some(entry) => {
                self.record();
                info!(class = class_id, id = entry.id, "adjustment removed");
            }
            None => debug!(class = class_id, "no matching adjustment"),
        }
        Ok(removed)
    }

    pub fn adjustment_lines(&self) -> Vec<AdjustmentLine> {
        let known = self
            .classes()
            .iter()
            .flat_map(|class_id| {
                self.adjustments
                    .entries_for(class_id)
                    .iter()
                    .map(move |entry| (class_id.as_str(), entry))
            })
            .collect::<Vec<_>>();
        known
            .into_iter()
            .chain(
                self.adjustments
                    .entries()
                    .filter(|(class_id, _)| !self.classes().iter().any(|c| c.as_str() == *class_id)),
            )
            .map(|(class_id, entry)| AdjustmentLine {
                id: entry.id,
                class_id: class_id.to_string(),
                kind: entry.kind.to_string(),
                amount: entry.amount,
                note: entry.note.clone(),
            })
            .collect()
    }

    /// Scores back to full marks and all adjustments cleared.
    pub fn reset(&mut self) {
        self.scores.reset_to_max(&self.catalog);
        self.adjustments.clear();
        self.record();
        info!("scores reset to max and adjustments cleared");
    }

    /// Returns false when already at the oldest entry.
    pub fn undo(&mut self) -> Result<bool> {
        let Some(snapshot) = self.history.undo().cloned() else {
            debug!("nothing to undo");
            return Ok(false);
        };
        self.apply(&snapshot)?;
        info!(index = self.history.current_index(), "undo");
        Ok(true)
    }

    pub fn redo(&mut self) -> Result<bool> {
        let Some(snapshot) = self.history.redo().cloned() else {
            debug!("nothing to redo");
            return Ok(false);
        };
        self.apply(&snapshot)?;
        info!(index = self.history.current_index(), "redo");
        Ok(true)
    }

    /// Load a history entry into the live state without moving the cursor.
    pub fn restore(&mut self, index: usize) -> Result<String> {
        let snapshot = self.history.get(index)?.clone();
        self.apply(&snapshot)?;
        info!(index, recorded_at = snapshot.recorded_at(), "history entry restored");
        Ok(snapshot.recorded_at().to_string())
    }

    pub fn totals(&self) -> Vec<Standing> {
        self.aggregator()
            .compute_totals(self.classes(), self.catalog.categories())
    }

    pub fn table(&self) -> ScoreTable {
        self.aggregator()
            .table(self.classes(), self.catalog.categories())
    }

    pub fn result(&self) -> EvaluationResult {
        aggregate::evaluation_result(&self.totals())
    }

    pub fn history_lines(&self) -> Vec<HistoryLine> {
        self.history.lines()
    }

    pub fn class_lines(&self) -> Vec<ClassLine> {
        let aggregator = self.aggregator();
        self.classes()
            .iter()
            .enumerate()
            .map(|(index, class_id)| ClassLine {
                position: index + 1,
                class_id: class_id.clone(),
                weighted_addition: aggregator.weight_for(class_id),
            })
            .collect()
    }

    pub fn document(&self) -> ScoreDocument {
        ScoreDocument {
            scores: self.scores.sheets().clone(),
            punishments: self.adjustments.to_records(),
            weighted_addition: self.settings.weighted_addition.clone(),
            classes: self.settings.classes.clone(),
            save_time: Local::now().format(SAVE_TIME_FORMAT).to_string(),
        }
    }

    /// Save to `output`, or to a timestamped file in the root directory.
    pub fn save_data(&self, output: Option<&Path>) -> Result<PathBuf> {
        let path = match output {
            Some(path) => path.to_path_buf(),
            None => self
                .root_dir()
                .join(storage::default_data_file_name(Local::now())),
        };
        storage::save_document(&path, &self.document())
    }

    /// Replace roster, scores, adjustments and weights with a saved document.
    pub fn load_data(&mut self, path: &Path) -> Result<()> {
        let document = storage::load_document(path)?;
        let classes = if document.classes.is_empty() {
            self.settings.classes.clone()
        } else {
            document.classes.clone()
        };
        validate_roster(&classes)?;

        let mut scores = ScoreStore::seeded(&self.catalog, &classes);
        let imported = scores.import(&self.catalog, &document.scores)?;
        let adjustments = AdjustmentLedger::from_records(&document.punishments)?;
        let mut weighted_addition = document.weighted_addition.clone();
        for class_id in &classes {
            weighted_addition.entry(class_id.clone()).or_insert(0.0);
        }

        self.settings.classes = classes;
        self.settings.weighted_addition = weighted_addition;
        config::save_settings(&self.workspace, &self.settings)?;
        self.scores = scores;
        self.adjustments = adjustments;
        self.record();
        info!(path = %path.display(), rows = imported, "data loaded");
        Ok(())
    }

    pub fn add_class(&mut self, class_id: &str, weight: f64) -> Result<()> {
        let class_id = class_id.trim();
        if class_id.is_empty() {
            return Err(TallyError::Validation("class name is required".to_string()));
        }
        if self.classes().iter().any(|existing| existing == class_id) {
            return Err(TallyError::Validation(format!(
                "class {class_id} already exists"
            )));
        }
        validate_weight(weight)?;
        self.settings.classes.push(class_id.to_string());
        self.settings
            .weighted_addition
            .insert(class_id.to_string(), weight);
        self.roster_changed()?;
        info!(class = class_id, weight, "class added");
        Ok(())
    }

    pub fn remove_class(&mut self, class_id: &str) -> Result<()> {
        let index = self.class_position(class_id)?;
        self.settings.classes.remove(index);
        self.settings.weighted_addition.remove(class_id);
        self.adjustments.retain_classes(&self.settings.classes);
        self.roster_changed()?;
        info!(class = class_id, "class removed");
        Ok(())
    }

    /// Returns false when the class is already at that end of the roster.
    pub fn move_class(&mut self, class_id: &str, direction: MoveDirection) -> Result<bool> {
        let index = self.class_position(class_id)?;
        let target = match direction {
            MoveDirection::Up if index > 0 => index - 1,
            MoveDirection::Down if index + 1 < self.settings.classes.len() => index + 1,
            _ => return Ok(false),
        };
        self.settings.classes.swap(index, target);
        self.roster_changed()?;
        info!(class = class_id, position = target + 1, "class moved");
        Ok(true)
    }

    pub fn set_weight(&mut self, class_id: &str, weight: f64) -> Result<()> {
        self.require_class(class_id)?;
        validate_weight(weight)?;
        self.settings
            .weighted_addition
            .insert(class_id.to_string(), weight);
        config::save_settings(&self.workspace, &self.settings)?;
        self.record();
        info!(class = class_id, weight, "weighted addition updated");
        Ok(())
    }

    /// New max for one category; its sheets are reset to the new full marks.
    pub fn set_max_score(&mut self, category: &str, max_score: f64) -> Result<()> {
        let kind = self.catalog.lookup(category)?.kind;
        if !max_score.is_finite() || max_score <= 0.0 {
            return Err(TallyError::Validation(format!(
                "max score must be a positive number, got {max_score}"
            )));
        }
        self.settings
            .max_scores
            .insert(kind.name().to_string(), max_score);
        self.catalog = Catalog::from_max_scores(&self.settings.max_scores);
        config::save_settings(&self.workspace, &self.settings)?;
        self.scores.reset_category(self.catalog.get(kind));
        self.record();
        info!(category = kind.name(), max_score, "max score updated");
        Ok(())
    }

    pub fn set_root_directory(&mut self, directory: &Path) -> Result<PathBuf> {
        self.settings.root_directory = Some(directory.to_path_buf());
        let root = self.root_dir();
        if !root.exists() {
            std::fs::create_dir_all(&root)?;
        }
        config::save_settings(&self.workspace, &self.settings)?;
        info!(root = %root.display(), "root directory updated");
        Ok(root)
    }

    pub fn export_class_config(&self) -> Result<PathBuf> {
        let config = ClassConfig {
            classes: self.settings.classes.clone(),
            weighted_addition: self.settings.weighted_addition.clone(),
        };
        let path = config::write_class_config(&self.root_dir(), &config)?;
        info!(path = %path.display(), "class config exported");
        Ok(path)
    }

    /// Returns false when the root directory has no class config.
    pub fn import_class_config(&mut self) -> Result<bool> {
        let Some(class_config) = config::read_class_config(&self.root_dir())? else {
            debug!("no class config found, keeping current roster");
            return Ok(false);
        };
        validate_roster(&class_config.classes)?;
        self.settings.classes = class_config.classes;
        self.settings.weighted_addition = class_config.weighted_addition;
        self.adjustments.retain_classes(&self.settings.classes);
        self.roster_changed()?;
        info!(classes = self.settings.classes.len(), "class config imported");
        Ok(true)
    }

    /// Paths of saved data documents in the root directory.
    pub fn data_files(&self) -> Vec<PathBuf> {
        storage::filesystem::list_data_files(&self.root_dir())
    }

    fn aggregator(&self) -> Aggregator<'_> {
        Aggregator::new(
            &self.scores,
            &self.adjustments,
            &self.settings.weighted_addition,
        )
    }

    fn record(&mut self) {
        self.history.record(Snapshot::capture(
            &self.scores,
            &self.adjustments,
            &self.settings,
        ));
    }

    /// Replace the live state with a snapshot, roster and max scores included,
    /// and write the restored settings back.
    fn apply(&mut self, snapshot: &Snapshot) -> Result<()> {
        self.settings.classes = snapshot.classes().to_vec();
        self.settings.weighted_addition = snapshot.weighted_addition().clone();
        self.settings.max_scores = snapshot.max_scores().clone();
        self.catalog = Catalog::from_max_scores(&self.settings.max_scores);
        self.scores = snapshot.scores().clone();
        self.scores.sync_classes(&self.catalog, &self.settings.classes);
        self.adjustments = snapshot.adjustments().clone();
        config::save_settings(&self.workspace, &self.settings)?;
        Ok(())
    }

    fn roster_changed(&mut self) -> Result<()> {
        self.scores.sync_classes(&self.catalog, &self.settings.classes);
        config::save_settings(&self.workspace, &self.settings)?;
        self.record();
        Ok(())
    }

    fn require_class(&self, class_id: &str) -> Result<()> {
        self.class_position(class_id).map(|_| ())
    }

    fn class_position(&self, class_id: &str) -> Result<usize> {
        self.classes()
            .iter()
            .position(|existing| existing == class_id)
            .ok_or_else(|| TallyError::UnknownClass(class_id.to_string()))
    }
}

fn validate_weight(weight: f64) -> Result<()> {
    if weight.is_finite() {
        Ok(())
    } else {
        Err(TallyError::Validation(
            "weighted addition must be a number".to_string(),
        ))
    }
}

fn validate_roster(classes: &[String]) -> Result<()> {
    for (index, class_id) in classes.iter().enumerate() {
        if class_id.trim().is_empty() {
            return Err(TallyError::Validation("class name is required".to_string()));
        }
        if classes[..index].contains(class_id) {
            return Err(TallyError::Validation(format!(
                "class {class_id} is listed twice"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn small_settings() -> Settings {
        Settings {
            classes: vec!["高二1班".to_string(), "高二2班".to_string(), "高二3班".to_string()],
            weighted_addition: [
                ("高二1班".to_string(), 0.0),
                ("高二2班".to_string(), 0.5),
                ("高二3班".to_string(), 2.0),
            ]
            .into_iter()
            .collect(),
            ..Settings::default()
        }
    }

    fn open(dir: &TempDir) -> Evaluation {
        Evaluation::open_with_settings(dir.path(), small_settings()).expect("session should open")
    }

    #[test]
    fn fresh_session_records_initial_snapshot() {
        let dir = TempDir::new().expect("temp dir should be created");
        let evaluation = open(&dir);
        assert_eq!(evaluation.history().len(), 1);
        assert!(!evaluation.history().can_undo());
        assert_eq!(evaluation.totals()[0].class_id, "高二3班");
    }

    #[test]
    fn every_mutation_appends_history() {
        let dir = TempDir::new().expect("temp dir should be created");
        let mut evaluation = open(&dir);
        evaluation
            .set_score("早读", "高二1班", 2, 7.0, None)
            .expect("score should be accepted");
        let id = evaluation
            .add_adjustment("高二1班", "add", 1.0, "值周")
            .expect("adjustment should be accepted");
        evaluation.remove_adjustment(id).expect("adjustment should be removed");
        evaluation.reset();
        assert_eq!(evaluation.history().len(), 5);
    }

    #[test]
    fn rejected_input_does_not_touch_history() {
        let dir = TempDir::new().expect("temp dir should be created");
        let mut evaluation = open(&dir);
        assert!(evaluation.set_score("早读", "高二1班", 2, 70.0, None).is_err());
        assert!(evaluation.set_score("体育", "高二1班", 2, 7.0, None).is_err());
        assert!(evaluation.add_adjustment("高二1班", "bonus", 1.0, "x").is_err());
        assert!(evaluation.add_adjustment("高三1班", "add", 1.0, "x").is_err());
        let removed = evaluation
            .remove_matching_adjustment("高二1班", "add", 5.0, "note")
            .expect("kind should parse");
        assert!(removed.is_none());
        assert_eq!(evaluation.history().len(), 1);
    }

    #[test]
    fn undo_and_redo_move_live_state() {
        let dir = TempDir::new().expect("temp dir should be created");
        let mut evaluation = open(&dir);
        evaluation
            .add_adjustment("高二2班", "subtract", 3.0, "迟到")
            .expect("adjustment should be accepted");
        assert_eq!(evaluation.adjustments.net_for("高二2班"), -3.0);

        assert!(evaluation.undo().expect("undo should not fail"));
        assert_eq!(evaluation.adjustments.net_for("高二2班"), 0.0);
        assert!(!evaluation.undo().expect("undo should not fail"));

        assert!(evaluation.redo().expect("redo should not fail"));
        assert_eq!(evaluation.adjustments.net_for("高二2班"), -3.0);
        assert!(!evaluation.redo().expect("redo should not fail"));
    }

    #[test]
    fn session_survives_reopen() {
        let dir = TempDir::new().expect("temp dir should be created");
        let mut evaluation = open(&dir);
        evaluation
            .set_score("跑操", "高二1班", 1, 20.0, Some(HalfDay::Am))
            .expect("score should be accepted");
        evaluation.persist().expect("session should persist");

        let mut reopened = open(&dir);
        assert_eq!(reopened.history().len(), 2);
        assert!(reopened.undo().expect("undo should not fail"));
        let exercise = *reopened.catalog.lookup("跑操").expect("category exists");
        assert_eq!(reopened.scores.get_average(&exercise, "高二1班"), 30.0);
    }

    #[test]
    fn save_and_load_data_round_trip() {
        let dir = TempDir::new().expect("temp dir should be created");
        let mut evaluation = open(&dir);
        evaluation
            .set_score("卫生", "高二2班", 3, 10.0, Some(HalfDay::Pm))
            .expect("score should be accepted");
        evaluation
            .add_adjustment("高二2班", "add", 2.0, "运动会")
            .expect("adjustment should be accepted");
        let path = evaluation
            .save_data(Some(&dir.path().join("week.json")))
            .expect("save should succeed");
        let expected = evaluation.totals();

        evaluation.reset();
        assert_ne!(evaluation.totals(), expected);
        evaluation.load_data(&path).expect("load should succeed");
        assert_eq!(evaluation.totals(), expected);
        assert_eq!(evaluation.data_files(), vec![path]);
    }

    #[test]
    fn load_data_defaults_missing_weights_and_updates_roster() {
        let dir = TempDir::new().expect("temp dir should be created");
        let mut evaluation = open(&dir);
        let path = dir.path().join("other.json");
        fs::write(
            &path,
            r#"{"classes": ["高一1班", "高一2班"], "weighted_addition": {"高一1班": 1}}"#,
        )
        .expect("document should write");

        evaluation.load_data(&path).expect("load should succeed");
        assert_eq!(evaluation.classes(), ["高一1班", "高一2班"]);
        let lines = evaluation.class_lines();
        assert_eq!(lines[1].weighted_addition, 0.0);
        assert_eq!(evaluation.totals()[0].class_id, "高一1班");
        let saved = config::load_settings_with_global(dir.path(), None)
            .expect("settings should load")
            .expect("settings should exist");
        assert_eq!(saved.classes, vec!["高一1班", "高一2班"]);
    }

    #[test]
    fn class_management_keeps_store_in_step() {
        let dir = TempDir::new().expect("temp dir should be created");
        let mut evaluation = open(&dir);
        evaluation.add_class("高二4班", 1.0).expect("class should be added");
        assert!(evaluation.add_class("高二4班", 1.0).is_err());
        assert!(evaluation.add_class("  ", 1.0).is_err());
        assert_eq!(evaluation.totals().len(), 4);

        assert!(evaluation
            .move_class("高二4班", MoveDirection::Up)
            .expect("class exists"));
        assert_eq!(evaluation.classes()[2], "高二4班");
        assert!(evaluation
            .move_class("高二4班", MoveDirection::Down)
            .expect("class exists"));
        assert!(!evaluation
            .move_class("高二4班", MoveDirection::Down)
            .expect("class exists"));
        assert_eq!(evaluation.classes()[3], "高二4班");

        evaluation
            .add_adjustment("高二1班", "add", 1.0, "x")
            .expect("adjustment should be accepted");
        evaluation.remove_class("高二1班").expect("class should be removed");
        assert!(evaluation.adjustments.entries().next().is_none());
        assert!(matches!(
            evaluation.remove_class("高二1班"),
            Err(TallyError::UnknownClass(_))
        ));
    }

    #[test]
    fn max_score_change_resets_that_category() {
        let dir = TempDir::new().expect("temp dir should be created");
        let mut evaluation = open(&dir);
        evaluation
            .set_score("宿舍", "高二1班", 1, 1.0, None)
            .expect("score should be accepted");
        evaluation.set_max_score("宿舍", 8.0).expect("max should update");
        let dormitory = *evaluation.catalog.lookup("宿舍").expect("category exists");
        assert_eq!(dormitory.max_score, 8.0);
        assert_eq!(evaluation.scores.get_average(&dormitory, "高二1班"), 8.0);
        assert!(evaluation.set_max_score("宿舍", 0.0).is_err());
    }

    #[test]
    fn undo_max_score_change_restores_catalog_and_scores() {
        let dir = TempDir::new().expect("temp dir should be created");
        let mut evaluation = open(&dir);
        evaluation.set_max_score("宿舍", 3.0).expect("max should update");
        assert!(evaluation.undo().expect("undo should not fail"));

        let dormitory = *evaluation.catalog.lookup("宿舍").expect("category exists");
        assert_eq!(dormitory.max_score, 5.0);
        let average = evaluation.scores.get_average(&dormitory, "高二1班");
        assert!(average <= dormitory.max_score);
        let saved = config::load_settings_with_global(dir.path(), None)
            .expect("settings should load")
            .expect("settings should exist");
        assert_eq!(saved.max_scores["宿舍"], 5.0);

        assert!(evaluation.redo().expect("redo should not fail"));
        let dormitory = *evaluation.catalog.lookup("宿舍").expect("category exists");
        assert_eq!(dormitory.max_score, 3.0);
        assert_eq!(evaluation.scores.get_average(&dormitory, "高二1班"), 3.0);
    }

    #[test]
    fn undo_add_class_takes_the_class_and_weight_away() {
        let dir = TempDir::new().expect("temp dir should be created");
        let mut evaluation = open(&dir);
        evaluation.add_class("高二4班", 1.5).expect("class should be added");
        assert!(evaluation.undo().expect("undo should not fail"));
        assert_eq!(evaluation.classes().len(), 3);
        assert!(evaluation
            .class_lines()
            .iter()
            .all(|line| line.class_id != "高二4班"));
        assert_eq!(evaluation.totals().len(), 3);

        assert!(evaluation.redo().expect("redo should not fail"));
        let added = evaluation
            .class_lines()
            .into_iter()
            .find(|line| line.class_id == "高二4班")
            .expect("class should be back");
        assert_eq!(added.weighted_addition, 1.5);
    }

    #[test]
    fn undo_remove_class_brings_back_class_and_adjustments() {
        let dir = TempDir::new().expect("temp dir should be created");
        let mut evaluation = open(&dir);
        evaluation
            .add_adjustment("高二3班", "add", 4.0, "运动会")
            .expect("adjustment should be accepted");
        evaluation.remove_class("高二3班").expect("class should be removed");
        assert!(evaluation.adjustment_lines().is_empty());

        assert!(evaluation.undo().expect("undo should not fail"));
        assert_eq!(evaluation.classes()[2], "高二3班");
        assert_eq!(evaluation.class_lines()[2].weighted_addition, 2.0);
        let lines = evaluation.adjustment_lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].class_id, "高二3班");
        assert_eq!(evaluation.totals()[0].class_id, "高二3班");
        assert_eq!(evaluation.totals()[0].total, 126.0);
    }

    #[test]
    fn undo_move_class_restores_order() {
        let dir = TempDir::new().expect("temp dir should be created");
        let mut evaluation = open(&dir);
        evaluation
            .move_class("高二3班", MoveDirection::Up)
            .expect("class exists");
        assert_eq!(evaluation.classes()[1], "高二3班");
        assert!(evaluation.undo().expect("undo should not fail"));
        assert_eq!(evaluation.classes(), ["高二1班", "高二2班", "高二3班"]);
    }

    #[test]
    fn undo_weight_change_rewrites_settings_file() {
        let dir = TempDir::new().expect("temp dir should be created");
        let mut evaluation = open(&dir);
        evaluation.set_weight("高二1班", 5.0).expect("weight should update");
        assert!(evaluation.undo().expect("undo should not fail"));
        assert_eq!(evaluation.class_lines()[0].weighted_addition, 0.0);

        let saved = config::load_settings_with_global(dir.path(), None)
            .expect("settings should load")
            .expect("settings should exist");
        assert_eq!(saved.weighted_addition["高二1班"], 0.0);

        fs::remove_file(dir.path().join(SESSION_FILE)).ok();
        let reopened =
            Evaluation::open_with_settings(dir.path(), saved).expect("session should open");
        assert_eq!(reopened.class_lines()[0].weighted_addition, 0.0);
    }

    #[test]
    fn restore_loads_entry_without_moving_cursor() {
        let dir = TempDir::new().expect("temp dir should be created");
        let mut evaluation = open(&dir);
        evaluation.set_weight("高二1班", 5.0).expect("weight should update");
        evaluation.restore(0).expect("entry should exist");
        assert_eq!(evaluation.class_lines()[0].weighted_addition, 0.0);
        assert_eq!(evaluation.history().current_index(), 1);
        assert!(matches!(
            evaluation.restore(9),
            Err(TallyError::HistoryIndex { .. })
        ));
    }

    #[test]
    fn class_config_export_then_import() {
        let dir = TempDir::new().expect("temp dir should be created");
        let mut evaluation = open(&dir);
        assert!(!evaluation.import_class_config().expect("import should not fail"));
        evaluation.export_class_config().expect("export should succeed");
        evaluation.remove_class("高二3班").expect("class should be removed");
        assert!(evaluation.import_class_config().expect("import should succeed"));
        assert_eq!(evaluation.classes().len(), 3);
        assert_eq!(evaluation.totals()[0].class_id, "高二3班");
    }
}
