use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::event::{ObjectId, PlayerEvent, PlayerId, Position2, ResourceId, ZoneId};
use crate::services::{Notice, WaypointColor};

/// Work bundle that re-enters the sampling tick once its delay elapses.
///
/// Holds identifiers only; the tool and resource are resolved again when it
/// fires, and the tick is a no-op if either has gone away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleContinuation {
    pub player: PlayerId,
    pub tool_id: ObjectId,
    pub resource: Option<ResourceId>,
}

/// Decisions produced by the kernel and carried out by the reactor.
#[derive(Debug, Clone, PartialEq)]
pub enum SideEffect {
    /// Upright posture plus the movement/posture/self-posture broadcasts.
    ReturnToIdle(PlayerId),
    Notify(PlayerId, Notice),
    RequestWaypoint {
        player: PlayerId,
        name: String,
        position: Position2,
        zone: ZoneId,
        color: WaypointColor,
    },
    Schedule {
        delay: Duration,
        continuation: SampleContinuation,
    },
    DebitPools {
        player: PlayerId,
        health: i32,
        action: i32,
        mind: i32,
    },
    SampleTaken {
        player: PlayerId,
        resource: ResourceId,
        gambled: bool,
        bonus: bool,
    },
}

pub trait ContinuationScheduler: Send + Sync {
    /// Runs `continuation` once, no earlier than `delay` from now, on the
    /// owning player's event context.
    fn schedule_once_after(&self, delay: Duration, continuation: SampleContinuation);
}

/// Timer-backed scheduler that feeds due continuations into a player's
/// event channel.
#[derive(Debug, Clone)]
pub struct TokioContinuationScheduler {
    tx: mpsc::Sender<PlayerEvent>,
    shutdown: CancellationToken,
}

impl TokioContinuationScheduler {
    pub fn new(tx: mpsc::Sender<PlayerEvent>, shutdown: CancellationToken) -> Self {
        Self { tx, shutdown }
    }
}

impl ContinuationScheduler for TokioContinuationScheduler {
    fn schedule_once_after(&self, delay: Duration, continuation: SampleContinuation) {
        let tx = self.tx.clone();
        let shutdown = self.shutdown.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    debug!("Dropped continuation for {:?}: reactor shut down", continuation.player);
                }
                _ = tokio::time::sleep(delay) => {
                    // A closed channel means the player is gone; nothing left to resume.
                    let _ = tx.send(PlayerEvent::Continuation(continuation)).await;
                }
            }
        });
    }
}
