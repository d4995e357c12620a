//! Tunable pool costs for the `dosample` and `requestSurvey` commands.
//!
//! The values come from the command table at startup. Loading happens off the
//! simulation thread, so the store is atomic and reports readiness once both
//! queries have completed.

pub mod loader;
pub mod manager;
pub mod store;

use serde::{Deserialize, Serialize};

pub use loader::{AsyncConfigLoader, CommandCostRow, CostQuery, QueryCompletion, QueryTicket};
pub use manager::CollectionManager;
pub use store::CostConfigStore;

/// Pool costs of one command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandCosts {
    pub health: i32,
    pub action: i32,
    pub mind: i32,
    /// Extra health damage when sampling a radioactive resource. Sample only.
    pub damage_modifier: i32,
}
