use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use surveyor::costs::CollectionManager;
use surveyor::kernel::dialog::{DialogCallback, DialogKind, SessionPayload, ACTION_CONFIRM};
use surveyor::kernel::event::{ObjectId, PlayerEvent, PlayerId, Position2, ResourceId, ZoneId};
use surveyor::kernel::time::SystemClock;
use surveyor::persistence::memory::CommandRecord;
use surveyor::persistence::{CommandTable, Database};
use surveyor::services::memory::{
    InventoryItem, MemoryInventory, MemoryResources, MemoryStatPools, Pools, RecordingMessenger, RecordingPosture,
    RecordingWaypoints, StaticWorld,
};
use surveyor::services::{CurrentResource, SurveyTool};
use surveyor::{PlayerReactor, SamplingConfig, Services};

fn default_command_table() -> CommandTable {
    CommandTable::new(vec![
        CommandRecord {
            id: 1,
            command_name: "dosample".to_string(),
            health_cost: 0,
            action_cost: 200,
            mind_cost: 0,
            damage_multiplier: 50,
        },
        CommandRecord {
            id: 2,
            command_name: "requestSurvey".to_string(),
            health_cost: 0,
            action_cost: 0,
            mind_cost: 100,
            damage_multiplier: 0,
        },
    ])
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    tracing::info!("Surveyor booting...");

    let config = SamplingConfig::from_env()?;
    let db: Arc<dyn Database> = match std::env::args().nth(1) {
        Some(path) => Arc::new(CommandTable::load(&path).with_context(|| format!("loading command table {path}"))?),
        None => Arc::new(default_command_table()),
    };

    let mut manager = CollectionManager::start(db, config);
    let loaded = tokio::time::timeout(Duration::from_secs(5), manager.wait_ready())
        .await
        .context("command costs did not load")?;
    anyhow::ensure!(loaded, "command cost loading was abandoned");
    tracing::info!("Sample costs: {:?}", manager.costs().sample_costs());

    let player = PlayerId(1);
    let tool_id = ObjectId(100);
    let resource_id = ResourceId(7);

    let pools = Arc::new(MemoryStatPools::new());
    pools.set(player, Pools { health: 1000, action: 1000, mind: 1000 });
    let world = Arc::new(StaticWorld::new(ZoneId(5)));
    world.place(player, Position2::new(-1200.0, 3400.0));
    let resources = Arc::new(MemoryResources::new());
    resources.insert(CurrentResource {
        id: resource_id,
        name: "Radioactive Polymetric".to_string(),
        radioactive: true,
    });
    let inventory = Arc::new(MemoryInventory::new());
    inventory.insert(tool_id, InventoryItem::SurveyTool(SurveyTool { id: tool_id, range: 64 }));
    let waypoints = Arc::new(RecordingWaypoints::new());

    let services = Services {
        pools: pools.clone(),
        posture: Arc::new(RecordingPosture::new()),
        messenger: Arc::new(RecordingMessenger::new()),
        waypoints: waypoints.clone(),
        world,
        resources,
        clock: Arc::new(SystemClock::new()),
    };

    let mut reactor = PlayerReactor::new(player, &manager, services).with_inventory(inventory);
    reactor.begin_sampling(resource_id);
    let tx = reactor.sender();
    let driver = tokio::spawn(async move {
        reactor.run().await;
        reactor
    });

    let payload = SessionPayload { tool_id, resource: Some(resource_id) };
    tx.send(PlayerEvent::Dialog(DialogCallback::new(
        player,
        DialogKind::RadioactiveWarning,
        ACTION_CONFIRM,
        0,
        payload.clone(),
    )))
    .await?;

    // Radioactive acceptance waits four seconds before the sample lands.
    tokio::time::sleep(Duration::from_millis(4500)).await;

    tx.send(PlayerEvent::Dialog(DialogCallback::new(
        player,
        DialogKind::WaypointOffer,
        ACTION_CONFIRM,
        1,
        payload,
    )))
    .await?;
    tokio::time::sleep(Duration::from_millis(100)).await;

    manager.shutdown();
    let reactor = driver.await.context("reactor task panicked")?;

    tracing::info!("Pools after sampling: {:?}", pools.get(player));
    tracing::info!("Waypoints: {:?}", waypoints.requests());
    println!("{:#?}", reactor.telemetry.snapshot());

    Ok(())
}
