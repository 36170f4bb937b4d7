//! Shared scalar types.

/// Owner identifier for user-scoped records. Opaque to this backend; it
/// comes from the session context of every request.
pub type UserId = String;

/// UTC timestamp used across models and the wire format.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
