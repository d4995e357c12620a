use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("database unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed command table: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("query worker failed: {0}")]
    Worker(String),
}

/// A command-cost row whose columns do not line up with
/// `{id, name, healthCost, actionCost, mindCost, damageModifier}`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("expected {expected} columns, got {actual}")]
    ColumnCount { expected: usize, actual: usize },

    #[error("column {index} ({name}) is not {expected}")]
    ColumnType {
        index: usize,
        name: &'static str,
        expected: &'static str,
    },

    #[error("column {index} ({name}) value {value} does not fit")]
    OutOfRange {
        index: usize,
        name: &'static str,
        value: i64,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
