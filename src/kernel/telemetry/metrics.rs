use std::collections::VecDeque;

use super::event::{CycleEnd, SamplingEvent};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TelemetrySnapshot {
    pub ignored_callbacks: u64,
    pub cycles: CycleStats,
    pub gambles: GambleStats,
    pub continuations_scheduled: u64,
    pub avg_continuation_delay_ms: f64,
    pub waypoints_created: u64,
    pub samples_taken: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleStats {
    pub cancelled: u64,
    pub starved: u64,
    pub tool_unavailable: u64,
    pub nodes_marked: u64,
    pub samples_collected: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GambleStats {
    pub won: u64,
    pub lost: u64,
}

pub fn compute_snapshot(events: &VecDeque<SamplingEvent>) -> TelemetrySnapshot {
    let mut snap = TelemetrySnapshot::default();
    let mut total_delay_ms = 0u64;

    for event in events {
        match event {
            SamplingEvent::CallbackIgnored { .. } => snap.ignored_callbacks += 1,
            SamplingEvent::CycleEnded { reason, .. } => match reason {
                CycleEnd::Cancelled => snap.cycles.cancelled += 1,
                CycleEnd::InsufficientPools => snap.cycles.starved += 1,
                CycleEnd::ToolUnavailable => snap.cycles.tool_unavailable += 1,
                CycleEnd::NodeMarked => snap.cycles.nodes_marked += 1,
                CycleEnd::SampleCollected => snap.cycles.samples_collected += 1,
            },
            SamplingEvent::ContinuationScheduled { delay_ms, .. } => {
                snap.continuations_scheduled += 1;
                total_delay_ms += delay_ms;
            }
            SamplingEvent::Gamble { won: true, .. } => snap.gambles.won += 1,
            SamplingEvent::Gamble { won: false, .. } => snap.gambles.lost += 1,
            SamplingEvent::WaypointCreated { .. } => snap.waypoints_created += 1,
            SamplingEvent::SampleTaken { .. } => snap.samples_taken += 1,
        }
    }

    if snap.continuations_scheduled > 0 {
        snap.avg_continuation_delay_ms = total_delay_ms as f64 / snap.continuations_scheduled as f64;
    }

    snap
}
