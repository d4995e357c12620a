mod common;

use std::sync::Arc;
use std::time::Duration;

use common::*;
use surveyor::config::SamplingConfig;
use surveyor::costs::CollectionManager;
use surveyor::kernel::dialog::DialogKind;
use surveyor::kernel::event::PlayerEvent;
use surveyor::kernel::scheduler::SampleContinuation;
use surveyor::persistence::memory::CommandRecord;
use surveyor::persistence::CommandTable;
use surveyor::services::memory::{Pools, PostureCall, RecordingScheduler};
use surveyor::PlayerReactor;

fn command_table() -> CommandTable {
    CommandTable::new(vec![
        CommandRecord {
            id: 1,
            command_name: "dosample".into(),
            health_cost: SAMPLE_HEALTH,
            action_cost: SAMPLE_ACTION,
            mind_cost: SAMPLE_MIND,
            damage_multiplier: SAMPLE_DAMAGE,
        },
        CommandRecord {
            id: 2,
            command_name: "requestSurvey".into(),
            health_cost: 0,
            action_cost: 0,
            mind_cost: 100,
            damage_multiplier: 0,
        },
    ])
}

async fn ready_manager() -> CollectionManager {
    let manager = CollectionManager::start(Arc::new(command_table()), SamplingConfig::default());
    assert!(manager.wait_ready().await);
    manager
}

fn reactor(h: &Harness, manager: &CollectionManager) -> PlayerReactor {
    let mut reactor = PlayerReactor::new(PLAYER, manager, h.services())
        .with_inventory(h.inventory.clone())
        .with_seed(11);
    reactor.begin_sampling(RESOURCE);
    reactor
}

/// Lets spawned timer tasks register their deadlines or deliver their events.
async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

const FULL: Pools = Pools { health: 1000, action: 1000, mind: 1000 };

#[tokio::test(start_paused = true)]
async fn test_continuation_fires_after_gamble_delay() {
    let h = Harness::new();
    let manager = ready_manager().await;
    let mut reactor = reactor(&h, &manager);

    reactor
        .sender()
        .send(PlayerEvent::Dialog(callback(DialogKind::GambleChoice, 0, 0)))
        .await
        .unwrap();
    assert_eq!(reactor.drain(), 1);
    settle().await;

    tokio::time::advance(Duration::from_millis(999)).await;
    settle().await;
    assert_eq!(reactor.drain(), 0, "not due yet");
    assert_eq!(h.pools.get(PLAYER), FULL);

    tokio::time::advance(Duration::from_millis(2)).await;
    settle().await;
    assert_eq!(reactor.drain(), 1);

    assert_eq!(
        h.pools.get(PLAYER),
        Pools {
            health: 1000 - SAMPLE_HEALTH,
            action: 1000 - SAMPLE_ACTION,
            mind: 1000 - SAMPLE_MIND,
        }
    );
    assert!(!reactor.session.pending_sample);
    assert_eq!(h.posture.idle_resets(), 1);
    assert_eq!(reactor.telemetry.snapshot().samples_taken, 1);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_before_due_makes_continuation_a_noop() {
    let h = Harness::new();
    let manager = ready_manager().await;
    let mut reactor = reactor(&h, &manager);
    let tx = reactor.sender();

    tx.send(PlayerEvent::Dialog(callback(DialogKind::WaypointOffer, 0, 0)))
        .await
        .unwrap();
    reactor.drain();
    settle().await;

    tx.send(PlayerEvent::Dialog(callback(DialogKind::RadioactiveWarning, 1, 0)))
        .await
        .unwrap();
    reactor.drain();
    assert!(!reactor.session.pending_sample);

    tokio::time::advance(Duration::from_secs(10)).await;
    settle().await;
    assert_eq!(reactor.drain(), 1, "continuation still arrives");

    assert_eq!(h.pools.get(PLAYER), FULL);
    assert_eq!(reactor.telemetry.snapshot().samples_taken, 0);
}

#[tokio::test(start_paused = true)]
async fn test_manager_shutdown_drops_pending_continuations() {
    let h = Harness::new();
    let mut manager = ready_manager().await;
    let mut reactor = reactor(&h, &manager);

    reactor
        .sender()
        .send(PlayerEvent::Dialog(callback(DialogKind::RadioactiveWarning, 0, 0)))
        .await
        .unwrap();
    reactor.drain();
    settle().await;

    manager.shutdown();
    settle().await;
    tokio::time::advance(Duration::from_secs(5)).await;
    settle().await;

    assert_eq!(reactor.drain(), 0);
    assert_eq!(h.pools.get(PLAYER), FULL);
    assert!(reactor.session.pending_sample);
}

#[tokio::test(start_paused = true)]
async fn test_run_loop_handles_events_until_stopped() {
    let h = Harness::new();
    let manager = ready_manager().await;
    let mut reactor = reactor(&h, &manager);
    let tx = reactor.sender();

    let driver = tokio::spawn(async move {
        reactor.run().await;
        reactor
    });

    tx.send(PlayerEvent::Dialog(callback(DialogKind::RadioactiveWarning, 0, 0)))
        .await
        .unwrap();
    settle().await;
    tokio::time::advance(Duration::from_millis(4001)).await;
    settle().await;

    tx.send(PlayerEvent::Dialog(callback(DialogKind::WaypointOffer, 0, 1)))
        .await
        .unwrap();
    settle().await;

    drop(manager);
    let reactor = driver.await.unwrap();

    assert_eq!(h.pools.get(PLAYER).action, 1000 - SAMPLE_ACTION);
    assert_eq!(h.waypoints.requests().len(), 1);
    assert_eq!(h.messenger.keys(), vec!["survey:node_waypoint".to_string()]);
    assert!(reactor.session.sample_node_flag);

    let snap = reactor.telemetry.snapshot();
    assert_eq!(snap.continuations_scheduled, 1);
    assert_eq!(snap.avg_continuation_delay_ms, 4000.0);
    assert_eq!(snap.cycles.samples_collected, 1);
    assert_eq!(snap.cycles.nodes_marked, 1);
    assert_eq!(snap.waypoints_created, 1);
}

#[tokio::test]
async fn test_return_to_idle_broadcasts_in_order() {
    let h = Harness::new();
    let manager = ready_manager().await;
    let mut reactor = reactor(&h, &manager);

    reactor.dispatch(PlayerEvent::Dialog(callback(DialogKind::GambleChoice, 1, 0)));

    assert_eq!(
        h.posture.calls(),
        vec![
            PostureCall::SetIdle(PLAYER),
            PostureCall::Movement(PLAYER),
            PostureCall::Posture(PLAYER),
            PostureCall::SelfPosture(PLAYER),
        ]
    );
}

#[tokio::test]
async fn test_custom_scheduler_receives_continuations() {
    let h = Harness::new();
    let manager = ready_manager().await;
    let scheduler = Arc::new(RecordingScheduler::new());
    let mut reactor = reactor(&h, &manager).with_scheduler(scheduler.clone());

    reactor.dispatch(PlayerEvent::Dialog(callback(DialogKind::WaypointOffer, 0, 0)));

    assert_eq!(
        scheduler.scheduled(),
        vec![(
            Duration::from_secs(10),
            SampleContinuation {
                player: PLAYER,
                tool_id: TOOL,
                resource: Some(RESOURCE),
            }
        )]
    );
    assert_eq!(
        reactor.session.next_sample_time.millis,
        START.millis + 10_000,
        "timestamps come from the injected clock"
    );
}
