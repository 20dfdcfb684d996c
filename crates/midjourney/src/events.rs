//! Events emitted by the Midjourney bridge.

use fourtoon_core::types::DbId;
use serde::Serialize;

/// Outcome of one panel request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MidjourneyEvent {
    /// The upscaled panel image is available at `image_url`.
    PanelCompleted {
        diary_id: DbId,
        grid_position: i16,
        image_url: String,
    },

    /// The request was abandoned (send failure or timeout).
    PanelFailed {
        diary_id: DbId,
        grid_position: i16,
        reason: String,
    },
}
