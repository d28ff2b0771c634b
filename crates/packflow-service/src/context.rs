//! Request context carrying the authenticated actor identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Context for the current authenticated request.
///
/// Authentication itself is an external collaborator; the actor identity
/// arrives pre-verified and is recorded verbatim in audit columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated actor's ID.
    pub actor_id: Uuid,
    /// The actor's display name (convenience field for log lines).
    pub actor_name: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(actor_id: Uuid, actor_name: String) -> Self {
        Self {
            actor_id,
            actor_name,
            request_time: Utc::now(),
        }
    }
}
