use serde::{Deserialize, Serialize};

use super::event::{Position2, ResourceId, ZoneId};
use super::time::Timestamp;

/// Per-player sampling state. Owned by the player's reactor and never shared.
///
/// The radioactive, gamble and node-offer stages are sequential steps of one
/// cycle; at most one of them is in play at a time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SamplingSessionState {
    pub pending_sample: bool,
    pub pass_radioactive: bool,
    pub sample_gamble_flag: bool,
    /// Gamble won. Consumed by the sampling tick as a yield bonus.
    pub sample_event_flag: bool,
    pub sample_node_flag: bool,
    /// When the scheduled sample is due, for display. The tick runs when its
    /// timer fires and does not check this.
    pub next_sample_time: Timestamp,
    /// Provisional node location, meaningful only while `sample_node_flag` is set.
    pub position: Position2,
    pub zone: ZoneId,
    pub resource: Option<ResourceId>,
}

impl SamplingSessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fresh cycle against `resource`.
    pub fn begin(&mut self, resource: ResourceId) {
        *self = Self::default();
        self.pending_sample = true;
        self.resource = Some(resource);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Clears every per-cycle flag. The node offer and its location survive.
    pub fn end_cycle(&mut self) {
        self.pending_sample = false;
        self.pass_radioactive = false;
        self.sample_gamble_flag = false;
        self.sample_event_flag = false;
    }

    /// Drops the provisional node location and the resource it pointed at.
    pub fn clear_node(&mut self) {
        self.sample_node_flag = false;
        self.position = Position2::default();
        self.zone = ZoneId::default();
        self.resource = None;
    }
}
