use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Database, ResultSet, Statement, Value};
use crate::error::PersistenceError;

/// One `command_table` row as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRecord {
    pub id: u32,
    pub command_name: String,
    pub health_cost: i32,
    pub action_cost: i32,
    pub mind_cost: i32,
    #[serde(default)]
    pub damage_multiplier: i32,
}

impl CommandRecord {
    fn to_row(&self) -> Vec<Value> {
        vec![
            Value::Int(i64::from(self.id)),
            Value::Text(self.command_name.clone()),
            Value::Int(i64::from(self.health_cost)),
            Value::Int(i64::from(self.action_cost)),
            Value::Int(i64::from(self.mind_cost)),
            Value::Int(i64::from(self.damage_multiplier)),
        ]
    }
}

/// In-memory `command_table`, optionally seeded from a JSON array file.
#[derive(Debug, Clone, Default)]
pub struct CommandTable {
    records: Vec<CommandRecord>,
}

impl CommandTable {
    pub fn new(records: Vec<CommandRecord>) -> Self {
        Self { records }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let content = std::fs::read_to_string(path)?;
        let records: Vec<CommandRecord> = serde_json::from_str(&content)?;
        Ok(Self { records })
    }

    pub fn records(&self) -> &[CommandRecord] {
        &self.records
    }
}

impl Database for CommandTable {
    fn execute(&self, statement: &Statement) -> Result<ResultSet, PersistenceError> {
        debug!("command_table <- {}", statement.sql);
        let rows = self
            .records
            .iter()
            .filter(|r| r.command_name.eq_ignore_ascii_case(&statement.command_name))
            .map(CommandRecord::to_row)
            .collect();
        Ok(ResultSet { rows })
    }
}
