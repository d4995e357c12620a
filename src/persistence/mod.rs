//! Boundary to the zone database. Query execution is somebody else's
//! problem; sampling only needs to hand over a statement and get rows back.

pub mod memory;

use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;

pub use memory::CommandTable;

/// A read query plus the single command-name filter it binds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub sql: String,
    pub command_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Text(String),
    Null,
}

pub type Row = Vec<Value>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub rows: Vec<Row>,
}

impl ResultSet {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }
}

/// Blocking query execution. The cost loader runs it on a worker thread.
pub trait Database: Send + Sync {
    fn execute(&self, statement: &Statement) -> Result<ResultSet, PersistenceError>;
}
