use crate::tally::ledger::AdjustmentLedger;
use crate::tally::round2;
use crate::tally::store::ScoreStore;
use crate::types::category::Category;
use crate::types::report::{EvaluationResult, RankTier, ScoreTable, Standing, TableRow};
use std::collections::BTreeMap;

/// Number of classes awarded a flag: one school-level, the rest grade-level.
pub const FLAG_COUNT: usize = 5;

pub struct Aggregator<'a> {
    store: &'a ScoreStore,
    ledger: &'a AdjustmentLedger,
    weighted_addition: &'a BTreeMap<String, f64>,
}

impl<'a> Aggregator<'a> {
    pub fn new(
        store: &'a ScoreStore,
        ledger: &'a AdjustmentLedger,
        weighted_addition: &'a BTreeMap<String, f64>,
    ) -> Self {
        Self {
            store,
            ledger,
            weighted_addition,
        }
    }

    /// Classes missing from the weighted addition table get 0.
    pub fn weight_for(&self, class_id: &str) -> f64 {
        self.weighted_addition.get(class_id).copied().unwrap_or(0.0)
    }

    pub fn total_for(&self, class_id: &str, categories: &[Category]) -> f64 {
        let category_sum: f64 = categories
            .iter()
            .map(|category| self.store.get_average(category, class_id))
            .sum();
        round2(category_sum + self.weight_for(class_id) + self.ledger.net_for(class_id))
    }

    /// Totals in descending order. Equal totals keep the roster order.
    pub fn compute_totals(&self, classes: &[String], categories: &[Category]) -> Vec<Standing> {
        let mut totals = classes
            .iter()
            .map(|class_id| (class_id.clone(), self.total_for(class_id, categories)))
            .collect::<Vec<_>>();
        // sort_by is stable
        totals.sort_by(|a, b| b.1.total_cmp(&a.1));

        totals
            .into_iter()
            .enumerate()
            .map(|(index, (class_id, total))| Standing {
                rank: index + 1,
                class_id,
                total,
                tier: RankTier::for_rank(index + 1),
            })
            .collect()
    }

    pub fn table(&self, classes: &[String], categories: &[Category]) -> ScoreTable {
        let rows = classes
            .iter()
            .map(|class_id| TableRow {
                class_id: class_id.clone(),
                category_scores: categories
                    .iter()
                    .map(|category| self.store.get_average(category, class_id))
                    .collect(),
                weighted_addition: self.weight_for(class_id),
                adjustment_total: round2(self.ledger.net_for(class_id)),
                adjustment_notes: self.ledger.joined_notes_for(class_id),
                total: self.total_for(class_id, categories),
            })
            .collect();

        ScoreTable {
            categories: categories
                .iter()
                .map(|category| category.name().to_string())
                .collect(),
            rows,
        }
    }
}

pub fn evaluation_result(standings: &[Standing]) -> EvaluationResult {
    let mut flagged = standings.iter().take(FLAG_COUNT).cloned();
    EvaluationResult {
        school_flag: flagged.next(),
        grade_flags: flagged.collect(),
    }
}
