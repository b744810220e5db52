use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum ServlogError {
    #[error("Draft not found: {0}")]
    DraftNotFound(Uuid),

    #[error("Service log not found: {0}")]
    LogNotFound(Uuid),

    #[error("No active draft")]
    NoActiveDraft,

    #[error("Unknown field: {0}")]
    InvalidField(String),

    #[error("Field {0} is derived and cannot be edited")]
    ReadOnlyField(String),

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Draft is incomplete: {0} is missing")]
    Incomplete(String),

    #[error("{0}")]
    Selector(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, ServlogError>;
