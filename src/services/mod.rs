//! Outbound collaborators of the sampling kernel.
//!
//! Pool arithmetic, posture replication, client messaging, map waypoints,
//! inventory and the resource catalogue all live elsewhere in the zone
//! server. The kernel only talks to them through these traits.

pub mod memory;

use serde::{Deserialize, Serialize};

use crate::kernel::event::{ObjectId, PlayerId, Position2, ResourceId, ZoneId};

pub trait StatPools: Send + Sync {
    /// True when health, action and mind each hold at least the given amount.
    fn has_sufficient_pools(&self, player: PlayerId, health: i32, action: i32, mind: i32) -> bool;
    fn debit(&self, player: PlayerId, health: i32, action: i32, mind: i32);
}

pub trait PostureService: Send + Sync {
    fn set_idle_posture(&self, player: PlayerId);
    fn broadcast_movement_update(&self, player: PlayerId);
    fn broadcast_posture_update(&self, player: PlayerId);
    fn broadcast_self_posture_update(&self, player: PlayerId);

    /// Stand the player up and tell everyone, including the player's own client.
    fn return_to_idle(&self, player: PlayerId) {
        self.set_idle_posture(player);
        self.broadcast_movement_update(player);
        self.broadcast_posture_update(player);
        self.broadcast_self_posture_update(player);
    }
}

pub trait Messenger: Send + Sync {
    fn send_localized(&self, player: PlayerId, category: &str, key: &str);
}

pub trait WaypointService: Send + Sync {
    fn request_waypoint(&self, player: PlayerId, request: WaypointRequest);
}

pub trait Inventory: Send + Sync {
    fn survey_tool(&self, id: ObjectId) -> ToolLookup;
}

pub trait ResourceCatalog: Send + Sync {
    fn resource(&self, id: ResourceId) -> Option<CurrentResource>;
}

pub trait WorldView: Send + Sync {
    fn position(&self, player: PlayerId) -> Option<Position2>;
    fn zone_id(&self) -> ZoneId;
}

/// Localized system messages sampling can send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Notice {
    GambleNoAction,
    GambleFail,
    NodeWaypoint,
    SampleCancel,
}

impl Notice {
    pub fn category(&self) -> &'static str {
        "survey"
    }

    pub fn key(&self) -> &'static str {
        match self {
            Notice::GambleNoAction => "gamble_no_action",
            Notice::GambleFail => "gamble_fail",
            Notice::NodeWaypoint => "node_waypoint",
            Notice::SampleCancel => "sample_cancel",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WaypointColor {
    #[default]
    Blue,
    Green,
    Orange,
    Yellow,
    Purple,
    White,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaypointRequest {
    pub name: String,
    pub position: Position2,
    pub zone: ZoneId,
    pub color: WaypointColor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyTool {
    pub id: ObjectId,
    /// Survey radius in metres.
    pub range: u32,
}

/// Result of asking the inventory for a survey tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolLookup {
    Found(SurveyTool),
    /// The object exists but is something else.
    NotASurveyTool,
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentResource {
    pub id: ResourceId,
    pub name: String,
    pub radioactive: bool,
}
