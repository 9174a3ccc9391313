//! Identity port trait.
//!
//! Identity is explicit context handed into mutating operations, never ambient
//! process state. Storage adapters take the owner id as a plain argument; this
//! port only answers who the current owner is.

use crate::domain::error::PropplanError;

pub trait IdentityPort {
    /// The authenticated owner id, or `None` when unauthenticated.
    fn current_owner(&self) -> Option<String>;
}

/// Resolve the owner or refuse with an authorization error. Every save,
/// append and delete goes through this gate.
pub fn require_owner(identity: &dyn IdentityPort) -> Result<String, PropplanError> {
    match identity.current_owner() {
        Some(owner) if !owner.trim().is_empty() => Ok(owner),
        _ => Err(PropplanError::Authorization {
            reason: "an owner identity is required for this operation".to_string(),
        }),
    }
}
