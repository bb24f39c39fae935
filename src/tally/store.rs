use crate::error::{Result, TallyError};
use crate::tally::round2;
use crate::types::category::{
    parse_sheet_key, sheet_key, Catalog, Category, HalfDay, PERIOD_COUNT,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One class's five period scores on one sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Cell>", into = "RowTuple")]
pub struct ScoreRow {
    class_id: String,
    periods: [f64; PERIOD_COUNT],
}

type RowTuple = (String, f64, f64, f64, f64, f64, f64);

/// Row cells may be numbers or numeric text in older data files.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Cell {
    Number(f64),
    Text(String),
}

impl ScoreRow {
    pub fn new(class_id: &str, periods: [f64; PERIOD_COUNT]) -> Self {
        Self {
            class_id: class_id.to_string(),
            periods,
        }
    }

    pub fn filled(class_id: &str, value: f64) -> Self {
        Self::new(class_id, [value; PERIOD_COUNT])
    }

    pub fn average(&self) -> f64 {
        round2(self.periods.iter().sum::<f64>() / PERIOD_COUNT as f64)
    }
}

impl From<ScoreRow> for RowTuple {
    fn from(row: ScoreRow) -> Self {
        let average = row.average();
        let [p1, p2, p3, p4, p5] = row.periods;
        (row.class_id, p1, p2, p3, p4, p5, average)
    }
}

impl TryFrom<Vec<Cell>> for ScoreRow {
    type Error = String;

    fn try_from(cells: Vec<Cell>) -> std::result::Result<Self, Self::Error> {
        let mut cells = cells.into_iter();
        let class_id = match cells.next() {
            Some(Cell::Text(name)) if !name.trim().is_empty() => name.trim().to_string(),
            _ => return Err("score row must start with a class name".to_string()),
        };
        let mut periods = [0.0; PERIOD_COUNT];
        for (index, slot) in periods.iter_mut().enumerate() {
            *slot = match cells.next() {
                Some(Cell::Number(value)) => value,
                Some(Cell::Text(text)) => text.trim().parse().map_err(|_| {
                    format!("score row for {class_id}: period {} is not a number", index + 1)
                })?,
                None => return Err(format!("score row for {class_id} has fewer than 5 periods")),
            };
        }
        // trailing cached average is recomputed from the periods
        Ok(Self { class_id, periods })
    }
}

/// Explicit score table: sheet key × class × period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreStore {
    sheets: BTreeMap<String, Vec<ScoreRow>>,
}

impl ScoreStore {
    /// Every category sheet with one row per class at the category max.
    pub fn seeded(catalog: &Catalog, classes: &[String]) -> Self {
        let mut store = Self::default();
        store.sync_classes(catalog, classes);
        store
    }

    /// Reshape the sheets to `classes`: new classes start at the category max,
    /// removed classes are dropped, rows follow the class order.
    pub fn sync_classes(&mut self, catalog: &Catalog, classes: &[String]) {
        for category in catalog.categories() {
            for key in category.sheet_keys() {
                let mut existing = self.sheets.remove(&key).unwrap_or_default();
                let rows = classes
                    .iter()
                    .map(|class_id| {
                        match existing.iter().position(|row| row.class_id == *class_id) {
                            Some(index) => existing.swap_remove(index),
                            None => ScoreRow::filled(class_id, category.max_score),
                        }
                    })
                    .collect();
                self.sheets.insert(key, rows);
            }
        }
    }

    pub fn set_score(
        &mut self,
        category: &Category,
        class_id: &str,
        period: u8,
        value: f64,
        half: Option<HalfDay>,
    ) -> Result<()> {
        validate_score(category, value)?;
        let index = period_index(period)?;
        let half = match (category.has_dual_period(), half) {
            (true, Some(half)) => Some(half),
            (true, None) => {
                return Err(TallyError::Validation(format!(
                    "{} is scored per session; choose am or pm",
                    category.name()
                )))
            }
            (false, None) => None,
            (false, Some(_)) => {
                return Err(TallyError::Validation(format!(
                    "{} has no am/pm sessions",
                    category.name()
                )))
            }
        };

        let row = self
            .sheets
            .get_mut(&sheet_key(category.kind, half))
            .and_then(|rows| rows.iter_mut().find(|row| row.class_id == class_id))
            .ok_or_else(|| TallyError::UnknownClass(class_id.to_string()))?;
        row.periods[index] = value;
        Ok(())
    }

    /// Rounded weekly average; dual-period categories average the AM and PM
    /// sheets. Classes without a row count as 0.
    pub fn get_average(&self, category: &Category, class_id: &str) -> f64 {
        if category.has_dual_period() {
            let am = self.sheet_average(&sheet_key(category.kind, Some(HalfDay::Am)), class_id);
            let pm = self.sheet_average(&sheet_key(category.kind, Some(HalfDay::Pm)), class_id);
            round2((am + pm) / 2.0)
        } else {
            self.sheet_average(&sheet_key(category.kind, None), class_id)
        }
    }

    pub fn row(&self, key: &str, class_id: &str) -> Option<&ScoreRow> {
        self.sheets
            .get(key)
            .and_then(|rows| rows.iter().find(|row| row.class_id == class_id))
    }

    pub fn reset_to_max(&mut self, catalog: &Catalog) {
        for category in catalog.categories() {
            self.reset_category(category);
        }
    }

    pub fn reset_category(&mut self, category: &Category) {
        for key in category.sheet_keys() {
            if let Some(rows) = self.sheets.get_mut(&key) {
                for row in rows.iter_mut() {
                    row.periods = [category.max_score; PERIOD_COUNT];
                }
            }
        }
    }

    /// Overwrite rows from a data document, matching rows to classes by name.
    /// Unknown sheets and classes are skipped; out-of-range values reject the
    /// whole import before anything is changed.
    pub fn import(
        &mut self,
        catalog: &Catalog,
        sheets: &BTreeMap<String, Vec<ScoreRow>>,
    ) -> Result<usize> {
        let mut accepted = Vec::new();
        for (key, rows) in sheets {
            let Some((kind, _)) = parse_sheet_key(key) else {
                continue;
            };
            let category = catalog.get(kind);
            for row in rows {
                for value in row.periods {
                    validate_score(category, value)?;
                }
                accepted.push((key.as_str(), row));
            }
        }

        let mut imported = 0;
        for (key, incoming) in accepted {
            let target = self
                .sheets
                .get_mut(key)
                .and_then(|rows| rows.iter_mut().find(|row| row.class_id == incoming.class_id));
            if let Some(target) = target {
                target.periods = incoming.periods;
                imported += 1;
            }
        }
        Ok(imported)
    }

    pub fn sheets(&self) -> &BTreeMap<String, Vec<ScoreRow>> {
        &self.sheets
    }

    fn sheet_average(&self, key: &str, class_id: &str) -> f64 {
        self.row(key, class_id).map(ScoreRow::average).unwrap_or(0.0)
    }
}

pub fn validate_score(category: &Category, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(TallyError::Validation(format!(
            "score for {} must be a number",
            category.name()
        )));
    }
    if value < 0.0 || value > category.max_score {
        return Err(TallyError::Validation(format!(
            "score for {} must be within 0-{}, got {}",
            category.name(),
            category.max_score,
            value
        )));
    }
    Ok(())
}

fn period_index(period: u8) -> Result<usize> {
    let index = usize::from(period);
    if (1..=PERIOD_COUNT).contains(&index) {
        Ok(index - 1)
    } else {
        Err(TallyError::Validation(format!(
            "period must be within 1-{PERIOD_COUNT}, got {period}"
        )))
    }
}
