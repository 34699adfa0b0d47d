use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GooError {
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Config parse error: {0}")]
    TomlDeError(#[from] toml::de::Error),
    #[error("Config encode error: {0}")]
    TomlSerError(#[from] toml::ser::Error),
    #[error("Malformed record: {0}")]
    MalformedRecord(String),
    #[error("Field count mismatch for {kind}: expected {expected}, found {found}")]
    FieldCountMismatch {
        kind: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("Record not found: {0}")]
    RecordNotFound(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Vote data is incomplete for request {0}")]
    Incomplete(String),
    #[error("Hash mismatch - value or salt incorrect (check ~/.goo/votes/)")]
    HashMismatch,
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Executor error: {0}")]
    ExecutorError(String),
    #[error("{0}")]
    ContractError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Research error: {0}")]
    ResearchError(String),
    #[error("Lock error: {0}")]
    LockError(String),
    #[error("Home directory not found")]
    HomeDirectoryNotFound,
}
