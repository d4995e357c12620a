use tracing::debug;

use super::scheduler::{SampleContinuation, SideEffect};
use super::session::SamplingSessionState;
use super::telemetry::event::{CycleEnd, SamplingEvent};
use super::telemetry::recorder::TelemetryRecorder;
use super::workflow::{PlayerContext, SamplingWorkflow};
use crate::costs::CommandCosts;
use crate::services::{CurrentResource, Notice, ToolLookup};

impl SamplingWorkflow {
    /// Re-entry point for a due [`SampleContinuation`]: pays for and takes
    /// one sample, then ends the cycle.
    ///
    /// A cancelled cycle, a tool that left the inventory or a resource that
    /// despawned all turn the tick into a no-op.
    pub fn sample_tick(
        &self,
        session: &mut SamplingSessionState,
        continuation: SampleContinuation,
        ctx: &PlayerContext<'_>,
        telemetry: &mut TelemetryRecorder,
    ) -> Vec<SideEffect> {
        let mut effects = Vec::new();

        if continuation.player != ctx.player || !session.pending_sample {
            debug!("Stale sample continuation for {:?}", continuation.player);
            return effects;
        }

        let Some(inventory) = ctx.inventory else {
            return effects;
        };
        if !matches!(inventory.survey_tool(continuation.tool_id), ToolLookup::Found(_)) {
            debug!("Survey tool {:?} gone; dropping sample tick", continuation.tool_id);
            return effects;
        }
        let Some(resource) = continuation.resource.and_then(|id| ctx.resources.resource(id)) else {
            debug!("Resource {:?} gone; dropping sample tick", continuation.resource);
            return effects;
        };

        let cost = self.tick_cost(session, &resource);
        let Some(cost) = cost.filter(|c| ctx.pools.has_sufficient_pools(ctx.player, c.health, c.action, c.mind))
        else {
            session.reset();
            self.end_cycle(ctx.player, CycleEnd::InsufficientPools, &mut effects, telemetry);
            effects.push(SideEffect::Notify(ctx.player, Notice::SampleCancel));
            return effects;
        };

        let gambled = session.sample_gamble_flag;
        effects.push(SideEffect::DebitPools {
            player: ctx.player,
            health: cost.health,
            action: cost.action,
            mind: cost.mind,
        });
        effects.push(SideEffect::SampleTaken {
            player: ctx.player,
            resource: resource.id,
            gambled,
            bonus: session.sample_event_flag,
        });
        telemetry.record(SamplingEvent::SampleTaken {
            player: ctx.player,
            resource: resource.id,
            gambled,
        });

        session.end_cycle();
        self.end_cycle(ctx.player, CycleEnd::SampleCollected, &mut effects, telemetry);

        effects
    }

    /// Price of one sample given where the cycle stands. `None` when the
    /// price does not fit in a pool value, which no pool can cover.
    fn tick_cost(&self, session: &SamplingSessionState, resource: &CurrentResource) -> Option<CommandCosts> {
        let base = self.costs.sample_costs();
        let action = if session.sample_gamble_flag {
            base.action.checked_mul(self.config.gamble_cost_multiplier)?
        } else {
            base.action
        };
        let health = if resource.radioactive && session.pass_radioactive {
            base.health.checked_add(base.damage_modifier)?
        } else {
            base.health
        };

        Some(CommandCosts {
            health,
            action,
            mind: base.mind,
            damage_modifier: 0,
        })
    }
}
