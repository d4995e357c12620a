mod common;

use common::*;
use surveyor::kernel::scheduler::{SampleContinuation, SideEffect};
use surveyor::kernel::session::SamplingSessionState;
use surveyor::kernel::telemetry::recorder::TelemetryRecorder;
use surveyor::kernel::time::Timestamp;
use surveyor::kernel::workflow::SamplingWorkflow;
use surveyor::services::memory::Pools;
use surveyor::services::{CurrentResource, Notice};

fn continuation() -> SampleContinuation {
    SampleContinuation {
        player: PLAYER,
        tool_id: TOOL,
        resource: Some(RESOURCE),
    }
}

fn debits(effects: &[SideEffect]) -> Vec<(i32, i32, i32)> {
    effects
        .iter()
        .filter_map(|e| match e {
            SideEffect::DebitPools { health, action, mind, .. } => Some((*health, *action, *mind)),
            _ => None,
        })
        .collect()
}

fn pending() -> SamplingSessionState {
    let mut session = SamplingSessionState::new();
    session.begin(RESOURCE);
    session
}

#[test]
fn test_tick_takes_plain_sample() {
    let h = Harness::new();
    let mut session = pending();
    let mut telemetry = TelemetryRecorder::new();

    let effects = h.workflow().sample_tick(&mut session, continuation(), &h.ctx(), &mut telemetry);

    assert_eq!(debits(&effects), vec![(SAMPLE_HEALTH, SAMPLE_ACTION, SAMPLE_MIND)]);
    assert!(effects.contains(&SideEffect::SampleTaken {
        player: PLAYER,
        resource: RESOURCE,
        gambled: false,
        bonus: false,
    }));
    assert_eq!(effects.last(), Some(&SideEffect::ReturnToIdle(PLAYER)));
    assert!(!session.pending_sample);

    let snap = telemetry.snapshot();
    assert_eq!(snap.samples_taken, 1);
    assert_eq!(snap.cycles.samples_collected, 1);
}

#[test]
fn test_tick_without_pending_sample_is_noop() {
    let h = Harness::new();
    let mut session = SamplingSessionState::new();

    let effects = h
        .workflow()
        .sample_tick(&mut session, continuation(), &h.ctx(), &mut TelemetryRecorder::new());

    assert!(effects.is_empty());
    assert_eq!(session, SamplingSessionState::new());
}

#[test]
fn test_won_gamble_doubles_action_cost() {
    let h = Harness::new();
    let mut session = pending();
    session.sample_gamble_flag = true;
    session.sample_event_flag = true;

    let effects = h
        .workflow()
        .sample_tick(&mut session, continuation(), &h.ctx(), &mut TelemetryRecorder::new());

    assert_eq!(debits(&effects), vec![(SAMPLE_HEALTH, SAMPLE_ACTION * 2, SAMPLE_MIND)]);
    assert!(effects.contains(&SideEffect::SampleTaken {
        player: PLAYER,
        resource: RESOURCE,
        gambled: true,
        bonus: true,
    }));
    assert!(!session.sample_gamble_flag);
    assert!(!session.sample_event_flag);
}

#[test]
fn test_radioactive_sample_costs_extra_health() {
    let h = Harness::new();
    h.resources.insert(CurrentResource {
        id: RESOURCE,
        name: "Radioactive Polymetric".into(),
        radioactive: true,
    });

    let mut session = pending();
    session.pass_radioactive = true;
    let effects = h
        .workflow()
        .sample_tick(&mut session, continuation(), &h.ctx(), &mut TelemetryRecorder::new());
    assert_eq!(debits(&effects), vec![(SAMPLE_HEALTH + SAMPLE_DAMAGE, SAMPLE_ACTION, SAMPLE_MIND)]);
    assert!(!session.pass_radioactive);

    // Radioactive resource but the warning was never accepted.
    let mut session = pending();
    let effects = h
        .workflow()
        .sample_tick(&mut session, continuation(), &h.ctx(), &mut TelemetryRecorder::new());
    assert_eq!(debits(&effects), vec![(SAMPLE_HEALTH, SAMPLE_ACTION, SAMPLE_MIND)]);
}

#[test]
fn test_tick_with_drained_pools_cancels_sample() {
    let h = Harness::new();
    h.pools.set(PLAYER, Pools { health: 1000, action: SAMPLE_ACTION - 1, mind: 1000 });
    let mut session = pending();
    session.sample_gamble_flag = true;
    let mut telemetry = TelemetryRecorder::new();

    let effects = h.workflow().sample_tick(&mut session, continuation(), &h.ctx(), &mut telemetry);

    assert!(debits(&effects).is_empty());
    assert_eq!(
        effects,
        vec![
            SideEffect::ReturnToIdle(PLAYER),
            SideEffect::Notify(PLAYER, Notice::SampleCancel)
        ]
    );
    assert_eq!(session, SamplingSessionState::new());
    assert_eq!(telemetry.snapshot().cycles.starved, 1);
}

#[test]
fn test_tick_after_resource_despawns_is_noop() {
    let h = Harness::new();
    h.resources.despawn(RESOURCE);
    let mut session = pending();
    let before = session.clone();

    let effects = h
        .workflow()
        .sample_tick(&mut session, continuation(), &h.ctx(), &mut TelemetryRecorder::new());

    assert!(effects.is_empty());
    assert_eq!(session, before);
}

#[test]
fn test_tick_after_tool_removed_is_noop() {
    let h = Harness::new();
    h.inventory.remove(TOOL);
    let mut session = pending();

    let effects = h
        .workflow()
        .sample_tick(&mut session, continuation(), &h.ctx(), &mut TelemetryRecorder::new());

    assert!(effects.is_empty());
    assert!(session.pending_sample);
}

fn assert_cancelled(effects: &[SideEffect], session: &SamplingSessionState) {
    assert!(debits(effects).is_empty());
    assert_eq!(
        effects,
        [
            SideEffect::ReturnToIdle(PLAYER),
            SideEffect::Notify(PLAYER, Notice::SampleCancel)
        ]
    );
    assert_eq!(session, &SamplingSessionState::new());
}

#[test]
fn test_gambled_cost_overflow_cancels_sample() {
    let h = Harness::new();
    h.pools.set(PLAYER, Pools { health: i32::MAX, action: i32::MAX, mind: i32::MAX });
    let workflow = SamplingWorkflow::new(costs_with(0, i32::MAX, 0, 0), h.config.clone());
    let mut session = pending();
    session.sample_gamble_flag = true;

    let effects = workflow.sample_tick(&mut session, continuation(), &h.ctx(), &mut TelemetryRecorder::new());

    assert_cancelled(&effects, &session);
}

#[test]
fn test_radioactive_cost_overflow_cancels_sample() {
    let h = Harness::new();
    h.pools.set(PLAYER, Pools { health: i32::MAX, action: i32::MAX, mind: i32::MAX });
    h.resources.insert(CurrentResource {
        id: RESOURCE,
        name: "Radioactive Polymetric".into(),
        radioactive: true,
    });
    let workflow = SamplingWorkflow::new(costs_with(i32::MAX, 0, 0, 1), h.config.clone());
    let mut session = pending();
    session.pass_radioactive = true;

    let effects = workflow.sample_tick(&mut session, continuation(), &h.ctx(), &mut TelemetryRecorder::new());

    assert_cancelled(&effects, &session);
}

#[test]
fn test_tick_does_not_wait_on_next_sample_time() {
    let h = Harness::new();
    let mut session = pending();
    session.next_sample_time = Timestamp::from_millis(START.millis + 60_000);

    let effects = h
        .workflow()
        .sample_tick(&mut session, continuation(), &h.ctx(), &mut TelemetryRecorder::new());

    assert_eq!(debits(&effects), vec![(SAMPLE_HEALTH, SAMPLE_ACTION, SAMPLE_MIND)]);
}
