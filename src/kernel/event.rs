use serde::{Deserialize, Serialize};

use super::dialog::DialogCallback;
use super::scheduler::SampleContinuation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u64);

/// Inventory object identifier (tools live here).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceId(pub u64);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZoneId(pub u32);

/// Ground-plane coordinate. Height is not tracked by sampling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position2 {
    pub x: f32,
    pub z: f32,
}

impl Position2 {
    pub fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }
}

/// Everything a player's reactor can be woken by.
#[derive(Debug)]
pub enum PlayerEvent {
    /// A client answered one of the sampling dialogs.
    Dialog(DialogCallback),
    /// A previously scheduled continuation came due.
    Continuation(SampleContinuation),
}
