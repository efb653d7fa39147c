use thiserror::Error;

#[derive(Error, Debug)]
pub enum BudgetError {
    #[error("Invalid {kind}: {details}")]
    InvalidRecord { kind: &'static str, details: String },

    #[error("Unknown month name: {0}")]
    UnknownMonth(String),

    #[error("Invalid month index {0}: must be between 0 and 11")]
    InvalidMonthIndex(usize),

    #[error("No {kind} with id {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BudgetError>;
