use serde::{Deserialize, Serialize};

use super::event::{ObjectId, PlayerId, ResourceId};

/// Action code every sampling dialog uses for its cancel button.
pub const ACTION_CANCEL: u32 = 1;
/// Action code for the primary (OK) button.
pub const ACTION_CONFIRM: u32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DialogKind {
    /// Yes/no box warning that the resource is radioactive.
    RadioactiveWarning,
    /// Two-entry list: keep sampling, or gamble for a better yield.
    GambleChoice,
    /// Two-entry list: ignore the node, or mark it with a waypoint.
    WaypointOffer,
}

/// Context attached when the dialog was opened and handed back on the reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPayload {
    pub tool_id: ObjectId,
    pub resource: Option<ResourceId>,
}

/// One client reply to a sampling dialog.
///
/// Consumed by value: whichever branch handles it, the callback and its
/// payload are dropped exactly once when handling returns.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogCallback {
    pub player: PlayerId,
    pub kind: DialogKind,
    pub action: u32,
    pub element: i32,
    pub payload: Option<SessionPayload>,
}

impl DialogCallback {
    pub fn new(player: PlayerId, kind: DialogKind, action: u32, element: i32, payload: SessionPayload) -> Self {
        Self { player, kind, action, element, payload: Some(payload) }
    }

    /// Typed reading of the raw `(kind, action, element)` triple.
    pub fn response(&self) -> DialogResponse {
        match self.kind {
            DialogKind::RadioactiveWarning => DialogResponse::Radioactive(if self.action == ACTION_CANCEL {
                RadioactiveResponse::Decline
            } else {
                RadioactiveResponse::Accept
            }),
            DialogKind::GambleChoice => DialogResponse::Gamble(match (self.action, self.element) {
                (ACTION_CANCEL, _) => GambleResponse::Cancel,
                (_, 0) => GambleResponse::Continue,
                _ => GambleResponse::Gamble,
            }),
            DialogKind::WaypointOffer => DialogResponse::Waypoint(match (self.action, self.element) {
                (ACTION_CONFIRM, 1) => WaypointResponse::MarkNode,
                (ACTION_CONFIRM, 0) => WaypointResponse::KeepSampling,
                (ACTION_CONFIRM, other) => WaypointResponse::Unrecognized(other),
                _ => WaypointResponse::Dismiss,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogResponse {
    Radioactive(RadioactiveResponse),
    Gamble(GambleResponse),
    Waypoint(WaypointResponse),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioactiveResponse {
    Decline,
    Accept,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GambleResponse {
    Cancel,
    /// Sample normally, no gamble.
    Continue,
    Gamble,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaypointResponse {
    /// Any non-zero top-level action: stay put and drop the node.
    Dismiss,
    MarkNode,
    KeepSampling,
    Unrecognized(i32),
}
