use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, warn};

use super::dialog::{
    DialogCallback, DialogResponse, GambleResponse, RadioactiveResponse, SessionPayload, WaypointResponse,
};
use super::event::{PlayerId, Position2};
use super::gamble::resolve_gamble;
use super::scheduler::{SampleContinuation, SideEffect};
use super::session::SamplingSessionState;
use super::telemetry::event::{CycleEnd, SamplingEvent};
use super::telemetry::recorder::TelemetryRecorder;
use super::time::Timestamp;
use crate::config::SamplingConfig;
use crate::costs::CostConfigStore;
use crate::services::{
    Inventory, Notice, ResourceCatalog, StatPools, ToolLookup, WaypointColor, WorldView,
};

/// What the workflow may consult about the acting player while deciding.
/// Nothing in here is mutated; changes leave as [`SideEffect`]s.
pub struct PlayerContext<'a> {
    pub player: PlayerId,
    /// `None` when the player has no inventory equipped.
    pub inventory: Option<&'a dyn Inventory>,
    pub pools: &'a dyn StatPools,
    pub world: &'a dyn WorldView,
    pub resources: &'a dyn ResourceCatalog,
    pub now: Timestamp,
}

/// Per-player sampling state machine.
///
/// Each call takes the session, one input and the player's context, mutates
/// the session in place and returns the effects for the reactor to carry out.
pub struct SamplingWorkflow {
    pub(super) costs: Arc<CostConfigStore>,
    pub(super) config: Arc<SamplingConfig>,
}

impl SamplingWorkflow {
    pub fn new(costs: Arc<CostConfigStore>, config: Arc<SamplingConfig>) -> Self {
        Self { costs, config }
    }

    pub fn handle_dialog<R: Rng + ?Sized>(
        &self,
        session: &mut SamplingSessionState,
        callback: DialogCallback,
        ctx: &PlayerContext<'_>,
        rng: &mut R,
        telemetry: &mut TelemetryRecorder,
    ) -> Vec<SideEffect> {
        let mut effects = Vec::new();

        let (Some(inventory), Some(payload), true) =
            (ctx.inventory, callback.payload.as_ref(), callback.player == ctx.player)
        else {
            debug!("Ignoring {:?} reply from {:?}: no dialog context", callback.kind, callback.player);
            telemetry.record(SamplingEvent::CallbackIgnored {
                player: callback.player,
                kind: callback.kind,
            });
            return effects;
        };

        match callback.response() {
            DialogResponse::Radioactive(RadioactiveResponse::Decline) => {
                session.pass_radioactive = false;
                session.pending_sample = false;
                self.end_cycle(ctx.player, CycleEnd::Cancelled, &mut effects, telemetry);
            }
            DialogResponse::Radioactive(RadioactiveResponse::Accept) => {
                debug!("sampling radioactive box: Yes");
                session.pass_radioactive = true;
                session.pending_sample = true;

                // Without the action to spare the cycle just stays pending.
                if ctx.pools.has_sufficient_pools(ctx.player, 0, self.costs.sample_action_cost(), 0) {
                    let delay = self.config.radioactive_delay();
                    self.continue_sampling(session, inventory, payload, ctx, delay, &mut effects, telemetry);
                }
            }

            DialogResponse::Gamble(GambleResponse::Cancel) => {
                session.pending_sample = false;
                session.sample_gamble_flag = false;
                self.end_cycle(ctx.player, CycleEnd::Cancelled, &mut effects, telemetry);
            }
            DialogResponse::Gamble(GambleResponse::Continue) => {
                session.pending_sample = true;
                session.sample_gamble_flag = false;
                let delay = self.config.gamble_delay();
                self.continue_sampling(session, inventory, payload, ctx, delay, &mut effects, telemetry);
            }
            DialogResponse::Gamble(GambleResponse::Gamble) => {
                debug!("sampling gamble box ... gamble");
                // An overflowing stake is unaffordable.
                let affordable = self
                    .costs
                    .sample_action_cost()
                    .checked_mul(self.config.gamble_cost_multiplier)
                    .is_some_and(|stake| ctx.pools.has_sufficient_pools(ctx.player, 0, stake, 0));
                if !affordable {
                    session.sample_event_flag = false;
                    session.sample_gamble_flag = false;
                    self.end_cycle(ctx.player, CycleEnd::InsufficientPools, &mut effects, telemetry);
                    effects.push(SideEffect::Notify(ctx.player, Notice::GambleNoAction));
                    return effects;
                }

                session.pending_sample = true;
                let won = resolve_gamble(rng).is_success();
                session.sample_event_flag = won;
                session.sample_gamble_flag = won;
                telemetry.record(SamplingEvent::Gamble { player: ctx.player, won });
                if !won {
                    effects.push(SideEffect::Notify(ctx.player, Notice::GambleFail));
                }

                let delay = self.config.gamble_delay();
                self.continue_sampling(session, inventory, payload, ctx, delay, &mut effects, telemetry);
            }

            DialogResponse::Waypoint(WaypointResponse::Dismiss) => {
                debug!("sampling waypoint node box dismissed");
                session.pending_sample = false;
                session.clear_node();
                self.end_cycle(ctx.player, CycleEnd::Cancelled, &mut effects, telemetry);
            }
            DialogResponse::Waypoint(WaypointResponse::MarkNode) => {
                let Some(origin) = ctx.world.position(ctx.player) else {
                    debug!("Ignoring node offer for {:?}: player not in world", ctx.player);
                    telemetry.record(SamplingEvent::CallbackIgnored {
                        player: ctx.player,
                        kind: callback.kind,
                    });
                    return effects;
                };

                let position = self.node_position(origin, rng);
                let zone = ctx.world.zone_id();

                session.pending_sample = false;
                session.sample_node_flag = true;
                session.position = position;
                session.zone = zone;
                session.resource = payload.resource;

                effects.push(SideEffect::RequestWaypoint {
                    player: ctx.player,
                    name: self.config.waypoint_name.clone(),
                    position,
                    zone,
                    color: WaypointColor::Blue,
                });
                effects.push(SideEffect::Notify(ctx.player, Notice::NodeWaypoint));
                telemetry.record(SamplingEvent::WaypointCreated { player: ctx.player });
                self.end_cycle(ctx.player, CycleEnd::NodeMarked, &mut effects, telemetry);
            }
            DialogResponse::Waypoint(WaypointResponse::KeepSampling) => {
                session.pending_sample = true;
                session.sample_gamble_flag = false;
                let delay = self.config.node_ignore_delay();
                self.continue_sampling(session, inventory, payload, ctx, delay, &mut effects, telemetry);
            }
            DialogResponse::Waypoint(WaypointResponse::Unrecognized(element)) => {
                debug!("Ignoring node offer entry {} from {:?}", element, ctx.player);
            }
        }

        effects
    }

    /// Player position pushed out by a random `[1, node_offset_max]` on each axis.
    fn node_position<R: Rng + ?Sized>(&self, origin: Position2, rng: &mut R) -> Position2 {
        let max = self.config.node_offset_max.max(1);
        Position2 {
            x: origin.x + rng.gen_range(1..=max) as f32,
            z: origin.z + rng.gen_range(1..=max) as f32,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn continue_sampling(
        &self,
        session: &mut SamplingSessionState,
        inventory: &dyn Inventory,
        payload: &SessionPayload,
        ctx: &PlayerContext<'_>,
        delay: Duration,
        effects: &mut Vec<SideEffect>,
        telemetry: &mut TelemetryRecorder,
    ) {
        let tool = match inventory.survey_tool(payload.tool_id) {
            ToolLookup::Found(tool) => tool,
            other => {
                warn!("{:?} cannot keep sampling: tool {:?} is {:?}", ctx.player, payload.tool_id, other);
                session.end_cycle();
                self.end_cycle(ctx.player, CycleEnd::ToolUnavailable, effects, telemetry);
                return;
            }
        };

        session.next_sample_time = ctx.now.after(delay);
        effects.push(SideEffect::Schedule {
            delay,
            continuation: SampleContinuation {
                player: ctx.player,
                tool_id: tool.id,
                resource: payload.resource,
            },
        });
        telemetry.record(SamplingEvent::ContinuationScheduled {
            player: ctx.player,
            delay_ms: delay.as_millis() as u64,
        });
    }

    pub(super) fn end_cycle(
        &self,
        player: PlayerId,
        reason: CycleEnd,
        effects: &mut Vec<SideEffect>,
        telemetry: &mut TelemetryRecorder,
    ) {
        effects.push(SideEffect::ReturnToIdle(player));
        telemetry.record(SamplingEvent::CycleEnded { player, reason });
    }
}
