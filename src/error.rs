//! Error types for the AQS county data collector

use thiserror::Error;


pub type Result<T> = std::result::Result<T, AqsError>;

#[derive(Error, Debug)]
pub enum AqsError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid year: {input}")]
    InvalidYear { input: String },

    #[error("First year {first} is after last year {last}")]
    InvalidYearRange { first: u16, last: u16 },

    #[error("State not found in AQS state list: {name}")]
    UnknownState { name: String },

    #[error("{name} not provided and {env_var} environment variable not set")]
    MissingCredential { name: String, env_var: String },

    #[error("AQS response from {endpoint} has no Data field")]
    MissingData { endpoint: String },

    #[error("AQS {endpoint} request returned status {status}")]
    Status { endpoint: String, status: u16 },
}
