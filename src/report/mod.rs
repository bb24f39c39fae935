pub mod json;
pub mod md;

use crate::error::TallyError;
use crate::types::report::{
    AdjustmentLine, ClassLine, EvaluationResult, HistoryLine, ScoreTable, Standing,
};

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Md,
}

/// Something the CLI prints.
#[derive(Debug, Clone, Copy)]
pub enum View<'a> {
    Standings(&'a [Standing]),
    Table(&'a ScoreTable),
    Result(&'a EvaluationResult),
    History(&'a [HistoryLine]),
    Adjustments(&'a [AdjustmentLine]),
    Classes(&'a [ClassLine]),
}

pub fn render(view: View<'_>, format: OutputFormat) -> Result<String, TallyError> {
    match format {
        OutputFormat::Json => json::to_json(view).map_err(TallyError::Json),
        OutputFormat::Md => Ok(md::to_markdown(view)),
    }
}
