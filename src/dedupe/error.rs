use thiserror::Error;

#[derive(Debug, Error)]
pub enum DedupeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Training file error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Settings file error: {0}")]
    Settings(#[from] bincode::Error),

    #[error("Invalid record on line {line}: {reason}")]
    InvalidRecord { line: u64, reason: String },

    #[error("Need at least one match and one distinct example, have {matches} and {distinct}")]
    NotEnoughTraining { matches: usize, distinct: usize },
}
