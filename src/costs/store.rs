use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU8, Ordering};

use tokio::sync::Notify;

use super::{CommandCosts, CostQuery};

#[derive(Debug, Default)]
struct AtomicCosts {
    health: AtomicI32,
    action: AtomicI32,
    mind: AtomicI32,
    damage_modifier: AtomicI32,
}

impl AtomicCosts {
    fn load(&self) -> CommandCosts {
        CommandCosts {
            health: self.health.load(Ordering::Relaxed),
            action: self.action.load(Ordering::Relaxed),
            mind: self.mind.load(Ordering::Relaxed),
            damage_modifier: self.damage_modifier.load(Ordering::Relaxed),
        }
    }
}

/// Loaded cost constants, written by the loader's worker tasks and read by
/// every player's workflow.
///
/// Reads before [`is_ready`](Self::is_ready) return the fallback costs.
#[derive(Debug)]
pub struct CostConfigStore {
    sample: AtomicCosts,
    survey: AtomicCosts,
    fallback: CommandCosts,
    /// One bit per [`CostQuery`] that has finished, rows or not.
    completed: AtomicU8,
    ready: AtomicBool,
    /// Loading was abandoned before both queries finished.
    closed: AtomicBool,
    ready_notify: Notify,
}

impl CostConfigStore {
    pub fn new(fallback: CommandCosts) -> Self {
        Self {
            sample: AtomicCosts::default(),
            survey: AtomicCosts::default(),
            fallback,
            completed: AtomicU8::new(0),
            ready: AtomicBool::new(false),
            closed: AtomicBool::new(false),
            ready_notify: Notify::new(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Resolves once both startup queries have completed, or once loading
    /// is abandoned. Returns whether the loaded costs are in effect.
    pub async fn wait_ready(&self) -> bool {
        loop {
            let notified = self.ready_notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.is_ready() {
                return true;
            }
            if self.closed.load(Ordering::Acquire) {
                return false;
            }
            notified.await;
        }
    }

    /// Gives up on queries still in flight. Waiters are released and reads
    /// keep returning the fallback costs. A store that is already ready stays ready.
    pub(crate) fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            self.ready_notify.notify_waiters();
        }
    }

    /// `dosample` costs, including the radioactive damage modifier.
    pub fn sample_costs(&self) -> CommandCosts {
        if self.is_ready() {
            self.sample.load()
        } else {
            self.fallback
        }
    }

    /// `requestSurvey` costs. The damage modifier is always zero.
    pub fn survey_costs(&self) -> CommandCosts {
        if self.is_ready() {
            CommandCosts {
                damage_modifier: 0,
                ..self.survey.load()
            }
        } else {
            CommandCosts {
                damage_modifier: 0,
                ..self.fallback
            }
        }
    }

    pub fn sample_action_cost(&self) -> i32 {
        self.sample_costs().action
    }

    pub(crate) fn apply(&self, query: CostQuery, costs: CommandCosts) {
        match query {
            CostQuery::SampleCosts => {
                self.sample.health.store(costs.health, Ordering::Relaxed);
                self.sample.action.store(costs.action, Ordering::Relaxed);
                self.sample.mind.store(costs.mind, Ordering::Relaxed);
                self.sample.damage_modifier.store(costs.damage_modifier, Ordering::Relaxed);
            }
            CostQuery::SurveyCosts => {
                self.survey.health.store(costs.health, Ordering::Relaxed);
                self.survey.action.store(costs.action, Ordering::Relaxed);
                self.survey.mind.store(costs.mind, Ordering::Relaxed);
            }
        }
    }

    /// Records that `query` finished. The last one to finish opens the gate.
    pub(crate) fn mark_completed(&self, query: CostQuery) {
        let all = CostQuery::ALL.iter().fold(0u8, |acc, q| acc | q.bit());
        let seen = self.completed.fetch_or(query.bit(), Ordering::AcqRel) | query.bit();
        if seen == all && !self.ready.swap(true, Ordering::AcqRel) {
            self.ready_notify.notify_waiters();
        }
    }
}

impl Default for CostConfigStore {
    fn default() -> Self {
        Self::new(CommandCosts::default())
    }
}
