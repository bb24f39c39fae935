use crate::error::{Result, TallyError};
use crate::types::document::AdjustmentRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentKind {
    Add,
    Subtract,
}

impl AdjustmentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
        }
    }

    fn signed(self, amount: f64) -> f64 {
        match self {
            Self::Add => amount,
            Self::Subtract => -amount,
        }
    }
}

impl fmt::Display for AdjustmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdjustmentKind {
    type Err = TallyError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim() {
            "add" => Ok(Self::Add),
            "subtract" => Ok(Self::Subtract),
            "" => Err(TallyError::Validation(
                "adjustment type is required".to_string(),
            )),
            other => Err(TallyError::Validation(format!(
                "adjustment type must be add or subtract, got {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    pub id: u64,
    pub kind: AdjustmentKind,
    pub amount: f64,
    pub note: String,
}

impl Adjustment {
    fn matches(&self, kind: AdjustmentKind, amount: f64, note: &str) -> bool {
        self.kind == kind && self.amount == amount && self.note == note
    }
}

/// Manual bonuses and penalties per class, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentLedger {
    next_id: u64,
    by_class: BTreeMap<String, Vec<Adjustment>>,
}

impl AdjustmentLedger {
    pub fn add(
        &mut self,
        class_id: &str,
        kind: AdjustmentKind,
        amount: f64,
        note: &str,
    ) -> Result<u64> {
        let class_id = class_id.trim();
        if class_id.is_empty() {
            return Err(TallyError::Validation("class is required".to_string()));
        }
        if !amount.is_finite() {
            return Err(TallyError::Validation(
                "adjustment amount must be a number".to_string(),
            ));
        }
        if amount < 0.0 {
            return Err(TallyError::Validation(format!(
                "adjustment amount must not be negative, got {amount}"
            )));
        }
        if note.trim().is_empty() {
            return Err(TallyError::Validation(
                "adjustment note is required".to_string(),
            ));
        }

        self.next_id += 1;
        let id = self.next_id;
        self.by_class
            .entry(class_id.to_string())
            .or_default()
            .push(Adjustment {
                id,
                kind,
                amount,
                note: note.to_string(),
            });
        Ok(id)
    }

    /// Remove the first entry equal to the given values. Nothing happens when
    /// no entry matches.
    pub fn remove(
        &mut self,
        class_id: &str,
        kind: AdjustmentKind,
        amount: f64,
        note: &str,
    ) -> Option<Adjustment> {
        let class_id = class_id.trim();
        let entries = self.by_class.get_mut(class_id)?;
        let index = entries
            .iter()
            .position(|entry| entry.matches(kind, amount, note))?;
        let removed = entries.remove(index);
        if entries.is_empty() {
            self.by_class.remove(class_id);
        }
        Some(removed)
    }

    pub fn remove_by_id(&mut self, id: u64) -> Option<(String, Adjustment)> {
        let (class_id, index) = self.by_class.iter().find_map(|(class_id, entries)| {
            entries
                .iter()
                .position(|entry| entry.id == id)
                .map(|index| (class_id.clone(), index))
        })?;
        let entries = self.by_class.get_mut(&class_id)?;
        let removed = entries.remove(index);
        if entries.is_empty() {
            self.by_class.remove(&class_id);
        }
        Some((class_id, removed))
    }

    pub fn net_for(&self, class_id: &str) -> f64 {
        self.entries_for(class_id)
            .iter()
            .map(|entry| entry.kind.signed(entry.amount))
            .sum()
    }

    pub fn notes_for(&self, class_id: &str) -> Vec<&str> {
        self.entries_for(class_id)
            .iter()
            .map(|entry| entry.note.as_str())
            .collect()
    }

    pub fn joined_notes_for(&self, class_id: &str) -> String {
        self.notes_for(class_id).join("\n")
    }

    pub fn entries_for(&self, class_id: &str) -> &[Adjustment] {
        self.by_class
            .get(class_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &Adjustment)> {
        self.by_class.iter().flat_map(|(class_id, entries)| {
            entries.iter().map(move |entry| (class_id.as_str(), entry))
        })
    }

    pub fn clear(&mut self) {
        self.by_class.clear();
    }

    /// Drop adjustments of classes no longer on the roster.
    pub fn retain_classes(&mut self, classes: &[String]) {
        self.by_class.retain(|class_id, _| classes.contains(class_id));
    }

    pub fn to_records(&self) -> BTreeMap<String, Vec<AdjustmentRecord>> {
        self.by_class
            .iter()
            .map(|(class_id, entries)| {
                let records = entries
                    .iter()
                    .map(|entry| AdjustmentRecord {
                        kind: entry.kind,
                        score: entry.amount,
                        note: entry.note.clone(),
                    })
                    .collect();
                (class_id.clone(), records)
            })
            .collect()
    }

    /// Rebuild a ledger from document records, assigning fresh ids.
    pub fn from_records(records: &BTreeMap<String, Vec<AdjustmentRecord>>) -> Result<Self> {
        let mut ledger = Self::default();
        for (class_id, entries) in records {
            for record in entries {
                ledger.add(class_id, record.kind, record.score, &record.note)?;
            }
        }
        Ok(ledger)
    }
}
