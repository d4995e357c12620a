use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{CommandCosts, CostConfigStore};
use crate::error::{DecodeError, PersistenceError};
use crate::persistence::{Database, ResultSet, Row, Statement, Value};

const COST_COLUMNS: &str = "id, commandname, healthcost, actioncost, mindcost, damage_multiplier";

/// The startup queries, one per command whose costs sampling needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CostQuery {
    SampleCosts,
    SurveyCosts,
}

impl CostQuery {
    pub const ALL: [CostQuery; 2] = [CostQuery::SampleCosts, CostQuery::SurveyCosts];

    pub fn command_name(&self) -> &'static str {
        match self {
            CostQuery::SampleCosts => "dosample",
            CostQuery::SurveyCosts => "requestSurvey",
        }
    }

    pub fn statement(&self) -> Statement {
        let command_name = self.command_name();
        Statement {
            sql: format!("select {COST_COLUMNS} from command_table where commandname in ('{command_name}');"),
            command_name: command_name.to_string(),
        }
    }

    pub(crate) fn bit(&self) -> u8 {
        match self {
            CostQuery::SampleCosts => 0b01,
            CostQuery::SurveyCosts => 0b10,
        }
    }
}

/// Correlation token handed to the database with a query and returned,
/// untouched, with its completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTicket {
    pub query: CostQuery,
    pub id: Uuid,
}

impl QueryTicket {
    pub fn new(query: CostQuery) -> Self {
        Self { query, id: Uuid::new_v4() }
    }
}

#[derive(Debug)]
pub struct QueryCompletion {
    pub ticket: QueryTicket,
    pub result: Result<ResultSet, PersistenceError>,
}

/// A decoded `command_table` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandCostRow {
    pub id: u32,
    pub command_name: String,
    pub health_cost: i32,
    pub action_cost: i32,
    pub mind_cost: i32,
    pub damage_modifier: i32,
}

const COLUMN_NAMES: [&str; 6] = ["id", "commandname", "healthcost", "actioncost", "mindcost", "damage_multiplier"];

fn int_column(row: &Row, index: usize) -> Result<i64, DecodeError> {
    match &row[index] {
        Value::Int(v) => Ok(*v),
        _ => Err(DecodeError::ColumnType {
            index,
            name: COLUMN_NAMES[index],
            expected: "an integer",
        }),
    }
}

fn i32_column(row: &Row, index: usize) -> Result<i32, DecodeError> {
    let value = int_column(row, index)?;
    i32::try_from(value).map_err(|_| DecodeError::OutOfRange {
        index,
        name: COLUMN_NAMES[index],
        value,
    })
}

impl CommandCostRow {
    /// Positional decode of `{id, name, health, action, mind, damage}`.
    pub fn decode(row: &Row) -> Result<Self, DecodeError> {
        if row.len() != COLUMN_NAMES.len() {
            return Err(DecodeError::ColumnCount {
                expected: COLUMN_NAMES.len(),
                actual: row.len(),
            });
        }

        let raw_id = int_column(row, 0)?;
        let id = u32::try_from(raw_id).map_err(|_| DecodeError::OutOfRange {
            index: 0,
            name: COLUMN_NAMES[0],
            value: raw_id,
        })?;
        let command_name = match &row[1] {
            Value::Text(s) => s.clone(),
            _ => {
                return Err(DecodeError::ColumnType {
                    index: 1,
                    name: COLUMN_NAMES[1],
                    expected: "text",
                })
            }
        };
        // Survey rows commonly carry no multiplier.
        let damage_modifier = match row[5] {
            Value::Null => 0,
            _ => i32_column(row, 5)?,
        };

        Ok(Self {
            id,
            command_name,
            health_cost: i32_column(row, 2)?,
            action_cost: i32_column(row, 3)?,
            mind_cost: i32_column(row, 4)?,
            damage_modifier,
        })
    }

    fn costs_for(&self, query: CostQuery) -> CommandCosts {
        CommandCosts {
            health: self.health_cost,
            action: self.action_cost,
            mind: self.mind_cost,
            damage_modifier: match query {
                CostQuery::SampleCosts => self.damage_modifier,
                CostQuery::SurveyCosts => 0,
            },
        }
    }
}

/// Applies one finished query to the store. Runs on whichever worker
/// delivered the completion; the ticket is dropped on return.
pub fn handle_completion(store: &CostConfigStore, completion: QueryCompletion) {
    let QueryCompletion { ticket, result } = completion;
    let query = ticket.query;

    match result {
        Ok(rows) => match rows.first().map(CommandCostRow::decode) {
            Some(Ok(row)) => {
                store.apply(query, row.costs_for(query));
                match query {
                    CostQuery::SampleCosts => info!("Loaded sample costs."),
                    CostQuery::SurveyCosts => info!("Loaded survey costs."),
                }
            }
            Some(Err(e)) => warn!("Ignoring {} cost row ({}): {}", query.command_name(), ticket.id, e),
            None => {}
        },
        Err(e) => warn!("{} cost query failed ({}): {}", query.command_name(), ticket.id, e),
    }

    store.mark_completed(query);
}

/// Fires the startup cost queries and feeds their completions to the store.
pub struct AsyncConfigLoader {
    db: Arc<dyn Database>,
    store: Arc<CostConfigStore>,
}

impl AsyncConfigLoader {
    pub fn new(db: Arc<dyn Database>, store: Arc<CostConfigStore>) -> Self {
        Self { db, store }
    }

    /// Submits both queries and returns without waiting for them.
    pub fn submit_all(&self, shutdown: CancellationToken) -> Vec<JoinHandle<()>> {
        CostQuery::ALL
            .iter()
            .map(|&query| self.submit(QueryTicket::new(query), shutdown.clone()))
            .collect()
    }

    fn submit(&self, ticket: QueryTicket, shutdown: CancellationToken) -> JoinHandle<()> {
        let db = Arc::clone(&self.db);
        let store = Arc::clone(&self.store);

        tokio::spawn(async move {
            let statement = ticket.query.statement();
            let work = tokio::task::spawn_blocking(move || db.execute(&statement));

            let result = tokio::select! {
                _ = shutdown.cancelled() => {
                    debug!("{} cost query abandoned ({})", ticket.query.command_name(), ticket.id);
                    return;
                }
                joined = work => joined.unwrap_or_else(|e| Err(PersistenceError::Worker(e.to_string()))),
            };

            handle_completion(&store, QueryCompletion { ticket, result });
        })
    }
}
