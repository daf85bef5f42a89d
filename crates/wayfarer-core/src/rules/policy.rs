//! Ownership-or-capability access checks
//!
//! All role-based decisions go through [`AccessPolicy::can_manage`]; services do
//! not compare roles themselves.

use crate::entities::Role;
use crate::error::DomainError;
use crate::value_objects::{Capabilities, Snowflake};

pub struct AccessPolicy;

impl AccessPolicy {
    /// The owner may always act on their own resource; anyone else needs `capability`.
    pub fn can_manage(
        actor_role: Role,
        actor_id: Snowflake,
        owner_id: Snowflake,
        capability: Capabilities,
    ) -> bool {
        actor_id == owner_id || actor_role.capabilities().contains(capability)
    }

    /// [`can_manage`](Self::can_manage), failing with `Forbidden` naming the action.
    pub fn require(
        actor_role: Role,
        actor_id: Snowflake,
        owner_id: Snowflake,
        capability: Capabilities,
        action: &str,
    ) -> Result<(), DomainError> {
        if Self::can_manage(actor_role, actor_id, owner_id, capability) {
            Ok(())
        } else {
            Err(DomainError::Forbidden(action.to_string()))
        }
    }
}
