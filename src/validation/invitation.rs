use uuid::Uuid;

use crate::error::AppError;

use super::{auth::validate_email, rules};

/// Normalized invitee email, or 400 when missing or malformed.
pub fn invitee_email(raw: &str) -> Result<String, AppError> {
    validate_email(raw)?;
    Ok(rules::normalize_email(raw))
}

/// Nobody invites themselves, the owner, or an existing member.
pub fn check_invitee(
    inviter_id: Uuid,
    owner_id: Uuid,
    invitee_id: Uuid,
    already_member: bool,
) -> Result<(), AppError> {
    if invitee_id == inviter_id {
        return Err(AppError::validation("You cannot invite yourself"));
    }
    if invitee_id == owner_id {
        return Err(AppError::validation("The owner is already part of the project"));
    }
    if already_member {
        return Err(AppError::validation("User is already a member of this project"));
    }
    Ok(())
}
