//! Sampling telemetry.
//!
//! Write-only from the kernel's point of view: decision logic never reads it.
//! Events carry ids and counts only, never player positions or chat text.

pub mod event;
pub mod metrics;
pub mod recorder;
