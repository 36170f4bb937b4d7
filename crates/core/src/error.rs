//! Shared error taxonomy for the generation platform.

/// Domain-level errors. HTTP mapping lives in the api crate.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Invalid caller input (empty prompt, out-of-range setting, ...).
    /// Reported inline, never retried.
    #[error("{0}")]
    Validation(String),

    /// A required credential or configuration value is missing. Fatal to
    /// the operation; surfaced before any network call is made.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The provider rejected the request for billing reasons (HTTP 402).
    #[error("{0}")]
    Billing(String),

    /// The provider returned an error: a non-2xx response or a terminal
    /// failed status. Surfaced verbatim when a message is available.
    #[error("{0}")]
    Provider(String),

    /// A generation was submitted while another is still in flight.
    #[error("A generation is already in progress")]
    ConcurrentRequest,

    /// The requested entity does not exist for this user.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// A history or preset write failed. Does not roll back an
    /// already-successful generation result.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Uploading an image to the asset host failed. Callers fall back to
    /// the original URL rather than failing the save.
    #[error("Asset upload error: {0}")]
    AssetUpload(String),

    /// Anything else.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience alias used across the workspace.
pub type CoreResult<T> = Result<T, CoreError>;
