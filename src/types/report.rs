use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RankTier {
    FirstPlace,
    TopFive,
    Normal,
}

impl RankTier {
    /// Display tag for a 1-based rank.
    pub fn for_rank(rank: usize) -> Self {
        match rank {
            1 => Self::FirstPlace,
            2..=5 => Self::TopFive,
            _ => Self::Normal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standing {
    pub rank: usize,
    pub class_id: String,
    pub total: f64,
    pub tier: RankTier,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub class_id: String,
    pub category_scores: Vec<f64>,
    pub weighted_addition: f64,
    pub adjustment_total: f64,
    pub adjustment_notes: String,
    pub total: f64,
}

/// Per-class breakdown behind the totals, one column per category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreTable {
    pub categories: Vec<String>,
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationResult {
    /// School-level flag (校级流动红旗): the top class.
    pub school_flag: Option<Standing>,
    /// Grade-level flags (年级流动红旗): ranks two to five.
    pub grade_flags: Vec<Standing>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryLine {
    pub index: usize,
    pub recorded_at: String,
    pub fingerprint: String,
    pub current: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdjustmentLine {
    pub id: u64,
    pub class_id: String,
    pub kind: String,
    pub amount: f64,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassLine {
    pub position: usize,
    pub class_id: String,
    pub weighted_addition: f64,
}
