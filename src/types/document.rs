use crate::tally::ledger::AdjustmentKind;
use crate::tally::store::ScoreRow;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const SAVE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The saved score data file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreDocument {
    #[serde(default)]
    pub scores: BTreeMap<String, Vec<ScoreRow>>,
    #[serde(default)]
    pub punishments: BTreeMap<String, Vec<AdjustmentRecord>>,
    #[serde(default)]
    pub weighted_addition: BTreeMap<String, f64>,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub save_time: String,
}

/// Adjustment as it appears in data documents; ids are not persisted there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentRecord {
    #[serde(rename = "type")]
    pub kind: AdjustmentKind,
    pub score: f64,
    pub note: String,
}
