use crate::error::{Result, TallyError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Number of scored periods (Monday to Friday) in one evaluation week.
pub const PERIOD_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CategoryKind {
    Punctuality,
    MorningReading,
    EnergySaving,
    Appearance,
    Exercise,
    NoonRest,
    Hygiene,
    Patrol,
    Paperwork,
    Dormitory,
}

impl CategoryKind {
    /// Display order of the evaluation sheet.
    pub const ALL: [CategoryKind; 10] = [
        Self::Punctuality,
        Self::MorningReading,
        Self::EnergySaving,
        Self::Appearance,
        Self::Exercise,
        Self::NoonRest,
        Self::Hygiene,
        Self::Patrol,
        Self::Paperwork,
        Self::Dormitory,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Punctuality => "早迟到",
            Self::MorningReading => "早读",
            Self::EnergySaving => "节能开窗",
            Self::Appearance => "仪容仪表",
            Self::Exercise => "跑操",
            Self::NoonRest => "午休",
            Self::Hygiene => "卫生",
            Self::Patrol => "巡视",
            Self::Paperwork => "及时上交文件",
            Self::Dormitory => "宿舍",
        }
    }

    pub fn default_max_score(self) -> f64 {
        match self {
            Self::Punctuality | Self::MorningReading | Self::NoonRest | Self::Patrol => 10.0,
            Self::EnergySaving | Self::Appearance | Self::Paperwork | Self::Dormitory => 5.0,
            Self::Exercise | Self::Hygiene => 30.0,
        }
    }

    /// Morning and afternoon sessions are scored on separate sheets.
    pub fn has_dual_period(self) -> bool {
        matches!(self, Self::Exercise | Self::Hygiene)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CategoryKind {
    type Err = TallyError;

    fn from_str(value: &str) -> Result<Self> {
        Self::from_name(value.trim()).ok_or_else(|| TallyError::UnknownCategory(value.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HalfDay {
    Am,
    Pm,
}

impl HalfDay {
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Am => "_am",
            Self::Pm => "_pm",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Am => "上午",
            Self::Pm => "下午",
        }
    }
}

/// Key of one score sheet: the category name, suffixed `_am`/`_pm` for
/// dual-period categories.
pub fn sheet_key(kind: CategoryKind, half: Option<HalfDay>) -> String {
    match half {
        Some(half) => format!("{}{}", kind.name(), half.suffix()),
        None => kind.name().to_string(),
    }
}

/// Inverse of [`sheet_key`]. Keys whose shape does not match the category's
/// period layout are rejected.
pub fn parse_sheet_key(key: &str) -> Option<(CategoryKind, Option<HalfDay>)> {
    for half in [HalfDay::Am, HalfDay::Pm] {
        if let Some(base) = key.strip_suffix(half.suffix()) {
            return CategoryKind::from_name(base)
                .filter(|kind| kind.has_dual_period())
                .map(|kind| (kind, Some(half)));
        }
    }
    CategoryKind::from_name(key)
        .filter(|kind| !kind.has_dual_period())
        .map(|kind| (kind, None))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Category {
    pub kind: CategoryKind,
    pub max_score: f64,
}

impl Category {
    pub fn new(kind: CategoryKind, max_score: f64) -> Self {
        Self { kind, max_score }
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn has_dual_period(&self) -> bool {
        self.kind.has_dual_period()
    }

    pub fn sheet_keys(&self) -> Vec<String> {
        if self.has_dual_period() {
            vec![
                sheet_key(self.kind, Some(HalfDay::Am)),
                sheet_key(self.kind, Some(HalfDay::Pm)),
            ]
        } else {
            vec![sheet_key(self.kind, None)]
        }
    }
}

/// The ten categories with their effective max scores, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    categories: Vec<Category>,
}

impl Catalog {
    pub fn from_max_scores(max_scores: &BTreeMap<String, f64>) -> Self {
        let categories = CategoryKind::ALL
            .into_iter()
            .map(|kind| {
                let max_score = max_scores
                    .get(kind.name())
                    .copied()
                    .unwrap_or_else(|| kind.default_max_score());
                Category::new(kind, max_score)
            })
            .collect();
        Self { categories }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn get(&self, kind: CategoryKind) -> &Category {
        // built from ALL, whose order matches the discriminants
        &self.categories[kind as usize]
    }

    pub fn lookup(&self, name: &str) -> Result<&Category> {
        let kind: CategoryKind = name.parse()?;
        Ok(self.get(kind))
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::from_max_scores(&BTreeMap::new())
    }
}
