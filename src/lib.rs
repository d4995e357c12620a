pub mod config;
pub mod costs;
pub mod error;
pub mod kernel;
pub mod persistence;
pub mod services;

pub use config::SamplingConfig;
pub use costs::{CollectionManager, CostConfigStore};
pub use kernel::reactor::{PlayerReactor, Services};
pub use kernel::workflow::SamplingWorkflow;
