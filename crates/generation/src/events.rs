//! Lifecycle events emitted by the generation controller.

use serde::Serialize;

/// A state change the rest of the platform may care about. Broadcast on
/// the controller's event channel; subscribe via
/// [`crate::controller::GenerationController::subscribe`].
#[derive(Debug, Clone, Serialize)]
pub enum GenerationEvent {
    /// A prediction was accepted by the provider and polling started.
    Submitted {
        user_id: String,
        prediction_id: String,
    },

    /// A prediction finished with images.
    Completed {
        user_id: String,
        prediction_id: String,
        images: Vec<String>,
    },

    /// A prediction finished with an error.
    Failed {
        user_id: String,
        prediction_id: String,
        error: String,
    },

    /// The user cancelled; polling stopped. The provider-side job is
    /// left to run out on its own.
    Cancelled {
        user_id: String,
        prediction_id: String,
    },

    /// The history record for a completed generation was written.
    HistoryPersisted { user_id: String, record_id: String },

    /// Writing the history record failed. The generation itself is still
    /// successful; only history continuity is lost.
    HistoryPersistFailed { user_id: String, error: String },
}
