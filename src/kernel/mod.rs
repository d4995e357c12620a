//! The sampling kernel: per-player session state, the dialog state machine,
//! the continuation tick and the reactor that serializes them.

pub mod dialog;
pub mod event;
pub mod gamble;
pub mod reactor;
pub mod sample;
pub mod scheduler;
pub mod session;
pub mod telemetry;
pub mod time;
pub mod workflow;
