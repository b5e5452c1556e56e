use axum::http::StatusCode;

use crate::models::Owned;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny,
}

/// Only the owner of a record may change or remove it.
pub fn authorize<R: Owned + ?Sized>(record: &R, requester_id: &str) -> Access {
    if record.owner_id() == requester_id {
        Access::Allow
    } else {
        Access::Deny
    }
}

/// [`authorize`] mapped onto the handler error type.
pub fn require_owner<R: Owned + ?Sized>(
    record: &R,
    requester_id: &str,
    action: &str,
    noun: &str,
) -> Result<(), (StatusCode, String)> {
    match authorize(record, requester_id) {
        Access::Allow => Ok(()),
        Access::Deny => {
            tracing::warn!(requester_id, action, noun, "ownership check denied");
            Err((
                StatusCode::FORBIDDEN,
                format!("Not authorized to {} this {}", action, noun.to_lowercase()),
            ))
        }
    }
}
