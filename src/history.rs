use crate::error::{Result, TallyError};
use crate::tally::ledger::AdjustmentLedger;
use crate::tally::store::ScoreStore;
use crate::types::report::HistoryLine;
use crate::types::settings::Settings;
use chrono::Local;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

pub const MAX_HISTORY: usize = 50;

pub const RECORDED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Full copy of the mutable evaluation state: scores, adjustments, the class
/// roster with its weights, and the max scores the sheets were filled against.
/// Fields are private so a stored snapshot cannot be edited in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    scores: ScoreStore,
    adjustments: AdjustmentLedger,
    classes: Vec<String>,
    weighted_addition: BTreeMap<String, f64>,
    max_scores: BTreeMap<String, f64>,
    recorded_at: String,
}

impl Snapshot {
    pub fn capture(
        scores: &ScoreStore,
        adjustments: &AdjustmentLedger,
        settings: &Settings,
    ) -> Self {
        Self {
            scores: scores.clone(),
            adjustments: adjustments.clone(),
            classes: settings.classes.clone(),
            weighted_addition: settings.weighted_addition.clone(),
            max_scores: settings.max_scores.clone(),
            recorded_at: Local::now().format(RECORDED_AT_FORMAT).to_string(),
        }
    }

    pub fn scores(&self) -> &ScoreStore {
        &self.scores
    }

    pub fn adjustments(&self) -> &AdjustmentLedger {
        &self.adjustments
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn weighted_addition(&self) -> &BTreeMap<String, f64> {
        &self.weighted_addition
    }

    pub fn max_scores(&self) -> &BTreeMap<String, f64> {
        &self.max_scores
    }

    pub fn recorded_at(&self) -> &str {
        &self.recorded_at
    }

    /// Short SHA-256 of the captured state, ignoring the timestamp.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for part in [
            serde_json::to_vec(&self.scores),
            serde_json::to_vec(&self.adjustments),
            serde_json::to_vec(&self.classes),
            serde_json::to_vec(&self.weighted_addition),
            serde_json::to_vec(&self.max_scores),
        ] {
            // serializing plain maps and numbers cannot fail
            hasher.update(part.unwrap_or_default());
        }
        hasher
            .finalize()
            .iter()
            .take(6)
            .map(|byte| format!("{byte:02x}"))
            .collect()
    }
}

/// Bounded undo/redo log. `current_index` is -1 while empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotHistory {
    entries: Vec<Snapshot>,
    current_index: isize,
}

impl Default for SnapshotHistory {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            current_index: -1,
        }
    }
}

impl SnapshotHistory {
    pub fn record(&mut self, snapshot: Snapshot) {
        let keep = usize::try_from(self.current_index + 1).unwrap_or(0);
        self.entries.truncate(keep);
        self.entries.push(snapshot);
        self.current_index = self.entries.len() as isize - 1;

        if self.entries.len() > MAX_HISTORY {
            self.entries.remove(0);
            self.current_index -= 1;
        }
    }

    pub fn can_undo(&self) -> bool {
        self.current_index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.current_index < self.entries.len() as isize - 1
    }

    /// Step back one entry. The oldest entry is never returned by undo.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if !self.can_undo() {
            return None;
        }
        self.current_index -= 1;
        self.current()
    }

    pub fn redo(&mut self) -> Option<&Snapshot> {
        if !self.can_redo() {
            return None;
        }
        self.current_index += 1;
        self.current()
    }

    pub fn current(&self) -> Option<&Snapshot> {
        usize::try_from(self.current_index)
            .ok()
            .and_then(|index| self.entries.get(index))
    }

    pub fn current_index(&self) -> isize {
        self.current_index
    }

    /// Entry by position without moving the cursor.
    pub fn get(&self, index: usize) -> Result<&Snapshot> {
        self.entries.get(index).ok_or(TallyError::HistoryIndex {
            index,
            len: self.entries.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lines(&self) -> Vec<HistoryLine> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, snapshot)| HistoryLine {
                index,
                recorded_at: snapshot.recorded_at.clone(),
                fingerprint: snapshot.fingerprint(),
                current: index as isize == self.current_index,
            })
            .collect()
    }
}
