use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::event::{PlayerEvent, PlayerId, ResourceId};
use super::scheduler::{ContinuationScheduler, SideEffect, TokioContinuationScheduler};
use super::session::SamplingSessionState;
use super::telemetry::recorder::TelemetryRecorder;
use super::time::Clock;
use super::workflow::{PlayerContext, SamplingWorkflow};
use crate::costs::CollectionManager;
use crate::services::{
    Inventory, Messenger, PostureService, ResourceCatalog, StatPools, WaypointRequest, WaypointService, WorldView,
};

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Zone-wide collaborators shared by every player's reactor.
#[derive(Clone)]
pub struct Services {
    pub pools: Arc<dyn StatPools>,
    pub posture: Arc<dyn PostureService>,
    pub messenger: Arc<dyn Messenger>,
    pub waypoints: Arc<dyn WaypointService>,
    pub world: Arc<dyn WorldView>,
    pub resources: Arc<dyn ResourceCatalog>,
    pub clock: Arc<dyn Clock>,
}

/// One player's sampling event loop.
///
/// Dialog replies and due continuations arrive on the same channel and are
/// handled strictly one at a time, so the session needs no locking.
pub struct PlayerReactor {
    pub player: PlayerId,
    pub session: SamplingSessionState,
    pub telemetry: TelemetryRecorder,
    receiver: mpsc::Receiver<PlayerEvent>,
    sender: mpsc::Sender<PlayerEvent>,
    workflow: SamplingWorkflow,
    services: Services,
    inventory: Option<Arc<dyn Inventory>>,
    scheduler: Arc<dyn ContinuationScheduler>,
    rng: StdRng,
    shutdown: CancellationToken,
}

impl PlayerReactor {
    pub fn new(player: PlayerId, manager: &CollectionManager, services: Services) -> Self {
        let (sender, receiver) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let shutdown = manager.shutdown_token().child_token();
        let scheduler = Arc::new(TokioContinuationScheduler::new(sender.clone(), shutdown.clone()));

        Self {
            player,
            session: SamplingSessionState::new(),
            telemetry: TelemetryRecorder::new(),
            receiver,
            sender,
            workflow: SamplingWorkflow::new(manager.costs(), manager.config()),
            services,
            inventory: None,
            scheduler,
            rng: StdRng::from_entropy(),
            shutdown,
        }
    }

    pub fn with_inventory(mut self, inventory: Arc<dyn Inventory>) -> Self {
        self.inventory = Some(inventory);
        self
    }

    pub fn with_scheduler(mut self, scheduler: Arc<dyn ContinuationScheduler>) -> Self {
        self.scheduler = scheduler;
        self
    }

    /// Fixes the gamble and node-offset draws, for replays and tests.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Handle for the UI layer to push dialog replies into this reactor.
    pub fn sender(&self) -> mpsc::Sender<PlayerEvent> {
        self.sender.clone()
    }

    pub fn set_inventory(&mut self, inventory: Option<Arc<dyn Inventory>>) {
        self.inventory = inventory;
    }

    /// Called when the player starts sampling with a survey tool.
    pub fn begin_sampling(&mut self, resource: ResourceId) {
        debug!("{:?} begins sampling {:?}", self.player, resource);
        self.session.begin(resource);
    }

    /// Pure decision for one event. Nothing outside the session and the
    /// telemetry buffer changes until the effects are applied.
    pub fn step(&mut self, event: PlayerEvent) -> Vec<SideEffect> {
        let ctx = PlayerContext {
            player: self.player,
            inventory: self.inventory.as_deref(),
            pools: &*self.services.pools,
            world: &*self.services.world,
            resources: &*self.services.resources,
            now: self.services.clock.now(),
        };

        match event {
            PlayerEvent::Dialog(callback) => {
                self.workflow
                    .handle_dialog(&mut self.session, callback, &ctx, &mut self.rng, &mut self.telemetry)
            }
            PlayerEvent::Continuation(continuation) => {
                self.workflow
                    .sample_tick(&mut self.session, continuation, &ctx, &mut self.telemetry)
            }
        }
    }

    pub fn apply(&self, effects: Vec<SideEffect>) {
        for effect in effects {
            match effect {
                SideEffect::ReturnToIdle(player) => self.services.posture.return_to_idle(player),
                SideEffect::Notify(player, notice) => {
                    self.services
                        .messenger
                        .send_localized(player, notice.category(), notice.key())
                }
                SideEffect::RequestWaypoint { player, name, position, zone, color } => {
                    self.services.waypoints.request_waypoint(
                        player,
                        WaypointRequest { name, position, zone, color },
                    );
                }
                SideEffect::Schedule { delay, continuation } => {
                    self.scheduler.schedule_once_after(delay, continuation)
                }
                SideEffect::DebitPools { player, health, action, mind } => {
                    self.services.pools.debit(player, health, action, mind)
                }
                SideEffect::SampleTaken { player, resource, gambled, bonus } => {
                    info!("{:?} sampled {:?} (gambled: {}, bonus: {})", player, resource, gambled, bonus);
                }
            }
        }
    }

    /// Step and apply in one go.
    pub fn dispatch(&mut self, event: PlayerEvent) {
        let effects = self.step(event);
        self.apply(effects);
    }

    /// Handles whatever is already queued without waiting. Returns how many
    /// events were processed.
    pub fn drain(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.receiver.try_recv() {
            self.dispatch(event);
            handled += 1;
        }
        handled
    }

    /// Drives the reactor until it is stopped or the manager shuts down.
    pub async fn run(&mut self) {
        info!("Sampling reactor for {:?} started", self.player);

        loop {
            let next = tokio::select! {
                _ = self.shutdown.cancelled() => None,
                event = self.receiver.recv() => event,
            };
            match next {
                Some(event) => self.dispatch(event),
                None => break,
            }
        }

        info!("Sampling reactor for {:?} stopped", self.player);
    }

    pub fn stop(&self) {
        self.shutdown.cancel();
    }
}
