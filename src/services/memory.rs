//! In-process collaborators. The demo driver and the integration tests run
//! against these; a zone server plugs in its real services instead.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use super::{
    CurrentResource, Inventory, Messenger, PostureService, ResourceCatalog, StatPools, SurveyTool,
    ToolLookup, WaypointRequest, WaypointService, WorldView,
};
use crate::kernel::event::{ObjectId, PlayerId, Position2, ResourceId, ZoneId};
use crate::kernel::scheduler::{ContinuationScheduler, SampleContinuation};

fn guard<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pools {
    pub health: i32,
    pub action: i32,
    pub mind: i32,
}

#[derive(Debug, Default)]
pub struct MemoryStatPools {
    pools: Mutex<HashMap<PlayerId, Pools>>,
}

impl MemoryStatPools {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, player: PlayerId, pools: Pools) {
        guard(&self.pools).insert(player, pools);
    }

    pub fn get(&self, player: PlayerId) -> Pools {
        guard(&self.pools).get(&player).copied().unwrap_or_default()
    }
}

impl StatPools for MemoryStatPools {
    fn has_sufficient_pools(&self, player: PlayerId, health: i32, action: i32, mind: i32) -> bool {
        let p = self.get(player);
        p.health >= health && p.action >= action && p.mind >= mind
    }

    fn debit(&self, player: PlayerId, health: i32, action: i32, mind: i32) {
        let mut pools = guard(&self.pools);
        let p = pools.entry(player).or_default();
        p.health -= health;
        p.action -= action;
        p.mind -= mind;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostureCall {
    SetIdle(PlayerId),
    Movement(PlayerId),
    Posture(PlayerId),
    SelfPosture(PlayerId),
}

#[derive(Debug, Default)]
pub struct RecordingPosture {
    calls: Mutex<Vec<PostureCall>>,
}

impl RecordingPosture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<PostureCall> {
        guard(&self.calls).clone()
    }

    /// Number of full idle groups (set + three broadcasts) seen so far.
    pub fn idle_resets(&self) -> usize {
        guard(&self.calls)
            .iter()
            .filter(|c| matches!(c, PostureCall::SetIdle(_)))
            .count()
    }
}

impl PostureService for RecordingPosture {
    fn set_idle_posture(&self, player: PlayerId) {
        guard(&self.calls).push(PostureCall::SetIdle(player));
    }

    fn broadcast_movement_update(&self, player: PlayerId) {
        guard(&self.calls).push(PostureCall::Movement(player));
    }

    fn broadcast_posture_update(&self, player: PlayerId) {
        guard(&self.calls).push(PostureCall::Posture(player));
    }

    fn broadcast_self_posture_update(&self, player: PlayerId) {
        guard(&self.calls).push(PostureCall::SelfPosture(player));
    }
}

#[derive(Debug, Default)]
pub struct RecordingMessenger {
    sent: Mutex<Vec<(PlayerId, String, String)>>,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// `category:key` strings in send order.
    pub fn keys(&self) -> Vec<String> {
        guard(&self.sent)
            .iter()
            .map(|(_, category, key)| format!("{category}:{key}"))
            .collect()
    }
}

impl Messenger for RecordingMessenger {
    fn send_localized(&self, player: PlayerId, category: &str, key: &str) {
        guard(&self.sent).push((player, category.to_string(), key.to_string()));
    }
}

#[derive(Debug, Default)]
pub struct RecordingWaypoints {
    requests: Mutex<Vec<(PlayerId, WaypointRequest)>>,
}

impl RecordingWaypoints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<(PlayerId, WaypointRequest)> {
        guard(&self.requests).clone()
    }
}

impl WaypointService for RecordingWaypoints {
    fn request_waypoint(&self, player: PlayerId, request: WaypointRequest) {
        guard(&self.requests).push((player, request));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryItem {
    SurveyTool(SurveyTool),
    Other(String),
}

#[derive(Debug, Default)]
pub struct MemoryInventory {
    items: Mutex<HashMap<ObjectId, InventoryItem>>,
}

impl MemoryInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, id: ObjectId, item: InventoryItem) {
        guard(&self.items).insert(id, item);
    }

    pub fn remove(&self, id: ObjectId) {
        guard(&self.items).remove(&id);
    }
}

impl Inventory for MemoryInventory {
    fn survey_tool(&self, id: ObjectId) -> ToolLookup {
        match guard(&self.items).get(&id) {
            Some(InventoryItem::SurveyTool(tool)) => ToolLookup::Found(tool.clone()),
            Some(InventoryItem::Other(_)) => ToolLookup::NotASurveyTool,
            None => ToolLookup::Missing,
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryResources {
    resources: Mutex<HashMap<ResourceId, CurrentResource>>,
}

impl MemoryResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, resource: CurrentResource) {
        guard(&self.resources).insert(resource.id, resource);
    }

    pub fn despawn(&self, id: ResourceId) {
        guard(&self.resources).remove(&id);
    }
}

impl ResourceCatalog for MemoryResources {
    fn resource(&self, id: ResourceId) -> Option<CurrentResource> {
        guard(&self.resources).get(&id).cloned()
    }
}

#[derive(Debug)]
pub struct StaticWorld {
    zone: ZoneId,
    positions: Mutex<HashMap<PlayerId, Position2>>,
}

impl StaticWorld {
    pub fn new(zone: ZoneId) -> Self {
        Self {
            zone,
            positions: Mutex::new(HashMap::new()),
        }
    }

    pub fn place(&self, player: PlayerId, position: Position2) {
        guard(&self.positions).insert(player, position);
    }
}

impl WorldView for StaticWorld {
    fn position(&self, player: PlayerId) -> Option<Position2> {
        guard(&self.positions).get(&player).copied()
    }

    fn zone_id(&self) -> ZoneId {
        self.zone
    }
}

/// Scheduler that only records what it was asked to do.
#[derive(Debug, Default)]
pub struct RecordingScheduler {
    scheduled: Mutex<Vec<(Duration, SampleContinuation)>>,
}

impl RecordingScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scheduled(&self) -> Vec<(Duration, SampleContinuation)> {
        guard(&self.scheduled).clone()
    }
}

impl ContinuationScheduler for RecordingScheduler {
    fn schedule_once_after(&self, delay: Duration, continuation: SampleContinuation) {
        guard(&self.scheduled).push((delay, continuation));
    }
}
