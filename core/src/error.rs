use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenError {
    #[error("Invalid configuration: {reason}")]
    Config { reason: String },

    #[error("Date out of range: {date} + {months} months")]
    DateOutOfRange { date: NaiveDate, months: u32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GenError {
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config { reason: reason.into() }
    }
}

pub type GenResult<T> = Result<T, GenError>;
