use thiserror::Error;

#[derive(Error, Debug)]
pub enum TallyError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("unknown class: {0}")]
    UnknownClass(String),

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("history index {index} out of range [0, {len})")]
    HistoryIndex { index: usize, len: usize },

    #[error("adjustment not found: #{0}")]
    AdjustmentNotFound(u64),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("path does not exist: {0}")]
    PathNotFound(String),

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TallyError {
    /// Errors caused by what the user typed rather than by the environment.
    pub fn is_user_input(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::UnknownClass(_)
                | Self::UnknownCategory(_)
                | Self::HistoryIndex { .. }
                | Self::AdjustmentNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TallyError>;
