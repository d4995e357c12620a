#![allow(dead_code)]

use std::sync::Arc;

use surveyor::config::SamplingConfig;
use surveyor::costs::loader::handle_completion;
use surveyor::costs::{CostConfigStore, CostQuery, QueryCompletion, QueryTicket};
use surveyor::kernel::dialog::{DialogCallback, DialogKind, SessionPayload};
use surveyor::kernel::event::{ObjectId, PlayerId, Position2, ResourceId, ZoneId};
use surveyor::kernel::time::{ManualClock, Timestamp};
use surveyor::kernel::workflow::{PlayerContext, SamplingWorkflow};
use surveyor::persistence::{ResultSet, Value};
use surveyor::services::memory::{
    InventoryItem, MemoryInventory, MemoryResources, MemoryStatPools, Pools, RecordingMessenger, RecordingPosture,
    RecordingWaypoints, StaticWorld,
};
use surveyor::services::{CurrentResource, Inventory, SurveyTool};
use surveyor::Services;

pub const PLAYER: PlayerId = PlayerId(42);
pub const TOOL: ObjectId = ObjectId(900);
pub const RESOURCE: ResourceId = ResourceId(31);
pub const ZONE: ZoneId = ZoneId(8);
pub const START: Timestamp = Timestamp { millis: 50_000 };

pub const SAMPLE_HEALTH: i32 = 10;
pub const SAMPLE_ACTION: i32 = 120;
pub const SAMPLE_MIND: i32 = 5;
pub const SAMPLE_DAMAGE: i32 = 25;

/// A store that has finished loading the standard `dosample` row.
pub fn loaded_costs() -> Arc<CostConfigStore> {
    costs_with(SAMPLE_HEALTH, SAMPLE_ACTION, SAMPLE_MIND, SAMPLE_DAMAGE)
}

/// A ready store whose `dosample` row holds the given costs.
pub fn costs_with(health: i32, action: i32, mind: i32, damage: i32) -> Arc<CostConfigStore> {
    let store = CostConfigStore::default();
    handle_completion(
        &store,
        QueryCompletion {
            ticket: QueryTicket::new(CostQuery::SampleCosts),
            result: Ok(ResultSet {
                rows: vec![vec![
                    Value::Int(1),
                    Value::Text("dosample".into()),
                    Value::Int(i64::from(health)),
                    Value::Int(i64::from(action)),
                    Value::Int(i64::from(mind)),
                    Value::Int(i64::from(damage)),
                ]],
            }),
        },
    );
    handle_completion(
        &store,
        QueryCompletion {
            ticket: QueryTicket::new(CostQuery::SurveyCosts),
            result: Ok(ResultSet::default()),
        },
    );
    Arc::new(store)
}

pub struct Harness {
    pub pools: Arc<MemoryStatPools>,
    pub posture: Arc<RecordingPosture>,
    pub messenger: Arc<RecordingMessenger>,
    pub waypoints: Arc<RecordingWaypoints>,
    pub world: Arc<StaticWorld>,
    pub resources: Arc<MemoryResources>,
    pub inventory: Arc<MemoryInventory>,
    pub clock: Arc<ManualClock>,
    pub costs: Arc<CostConfigStore>,
    pub config: Arc<SamplingConfig>,
}

impl Harness {
    pub fn new() -> Self {
        let pools = Arc::new(MemoryStatPools::new());
        pools.set(PLAYER, Pools { health: 1000, action: 1000, mind: 1000 });

        let world = Arc::new(StaticWorld::new(ZONE));
        world.place(PLAYER, Position2::new(100.0, -250.0));

        let resources = Arc::new(MemoryResources::new());
        resources.insert(CurrentResource {
            id: RESOURCE,
            name: "Polymetric Ore".into(),
            radioactive: false,
        });

        let inventory = Arc::new(MemoryInventory::new());
        inventory.insert(TOOL, InventoryItem::SurveyTool(SurveyTool { id: TOOL, range: 64 }));

        Self {
            pools,
            posture: Arc::new(RecordingPosture::new()),
            messenger: Arc::new(RecordingMessenger::new()),
            waypoints: Arc::new(RecordingWaypoints::new()),
            world,
            resources,
            inventory,
            clock: Arc::new(ManualClock::new(START)),
            costs: loaded_costs(),
            config: Arc::new(SamplingConfig::default()),
        }
    }

    pub fn set_action_pool(&self, action: i32) {
        self.pools.set(PLAYER, Pools { health: 1000, action, mind: 1000 });
    }

    pub fn workflow(&self) -> SamplingWorkflow {
        SamplingWorkflow::new(self.costs.clone(), self.config.clone())
    }

    pub fn ctx(&self) -> PlayerContext<'_> {
        PlayerContext {
            player: PLAYER,
            inventory: Some(&*self.inventory as &dyn Inventory),
            pools: &*self.pools,
            world: &*self.world,
            resources: &*self.resources,
            now: START,
        }
    }

    pub fn services(&self) -> Services {
        Services {
            pools: self.pools.clone(),
            posture: self.posture.clone(),
            messenger: self.messenger.clone(),
            waypoints: self.waypoints.clone(),
            world: self.world.clone(),
            resources: self.resources.clone(),
            clock: self.clock.clone(),
        }
    }
}

pub fn payload() -> SessionPayload {
    SessionPayload {
        tool_id: TOOL,
        resource: Some(RESOURCE),
    }
}

pub fn callback(kind: DialogKind, action: u32, element: i32) -> DialogCallback {
    DialogCallback::new(PLAYER, kind, action, element, payload())
}
