use crate::models::Actuator;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SmartGrowError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Unknown actuator: {0}")]
    UnknownActuator(String),

    #[error("Automation is active for {0}; disable it before issuing manual commands")]
    AutomationActive(Actuator),

    #[error("Unknown fuzzy variable: {0}")]
    UnknownVariable(String),

    #[error("Unknown label '{label}' for fuzzy variable '{variable}'")]
    UnknownLabel { variable: String, label: String },

    #[error("Invalid membership function: {0}")]
    InvalidMembership(String),

    #[error("Missing input for fuzzy variable: {0}")]
    MissingInput(String),
}

pub type Result<T> = std::result::Result<T, SmartGrowError>;
