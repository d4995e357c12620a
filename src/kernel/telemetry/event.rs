use serde::{Deserialize, Serialize};

use crate::kernel::dialog::DialogKind;
use crate::kernel::event::{PlayerId, ResourceId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SamplingEvent {
    /// A dialog reply was dropped for lack of context.
    CallbackIgnored { player: PlayerId, kind: DialogKind },

    CycleEnded { player: PlayerId, reason: CycleEnd },

    ContinuationScheduled { player: PlayerId, delay_ms: u64 },

    Gamble { player: PlayerId, won: bool },

    WaypointCreated { player: PlayerId },

    SampleTaken {
        player: PlayerId,
        resource: ResourceId,
        gambled: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CycleEnd {
    Cancelled,
    InsufficientPools,
    ToolUnavailable,
    /// Terminal success: the node was marked.
    NodeMarked,
    SampleCollected,
}
