use bson::oid::ObjectId;

use crate::model::user::{AuthUser, Role};
use crate::util::error::ServiceError;

/// Whether `actor` may change a resource owned by `owner_id`
pub fn can_modify(actor: &AuthUser, owner_id: &ObjectId) -> bool {
    actor.role == Role::Admin || actor.id == *owner_id
}

/// [`can_modify`] as a 403 for service code
pub fn ensure_can_modify(actor: &AuthUser, owner_id: &ObjectId, action: &str) -> Result<(), ServiceError> {
    if can_modify(actor, owner_id) {
        Ok(())
    } else {
        Err(ServiceError::Forbidden(format!(
            "User {} is not authorized to {}",
            actor.id.to_hex(),
            action
        )))
    }
}
