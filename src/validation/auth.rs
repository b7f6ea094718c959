use crate::db::models::user::{
    AdminCreateUserRequest, RegisterRequest, ResetPasswordRequest, UpdateSettingsRequest,
};
use crate::error::AppError;

use super::{is_blank, rules};

pub const SUPPORTED_LANGUAGES: [&str; 2] = ["es", "en"];
pub const SUPPORTED_THEMES: [&str; 2] = ["light", "dark"];

pub fn validate_email(email: &str) -> Result<(), AppError> {
    if is_blank(email) {
        return Err(AppError::validation("Email is required"));
    }
    if !rules::is_valid_email(email) {
        return Err(AppError::validation("Invalid email format"));
    }
    Ok(())
}

pub fn validate_register(req: &RegisterRequest) -> Result<(), AppError> {
    if is_blank(&req.name) || is_blank(&req.email) || req.password.is_empty() {
        return Err(AppError::validation("Please fill in all fields"));
    }
    validate_email(&req.email)
}

pub fn validate_admin_create(req: &AdminCreateUserRequest) -> Result<(), AppError> {
    if is_blank(&req.name) || is_blank(&req.email) || req.password.is_empty() {
        return Err(AppError::validation("Name, email and password are required"));
    }
    validate_email(&req.email)
}

pub fn validate_reset_password(req: &ResetPasswordRequest) -> Result<(), AppError> {
    if is_blank(&req.email) || is_blank(&req.token) || req.password.is_empty() {
        return Err(AppError::validation("Email, token and new password are required"));
    }
    Ok(())
}

pub fn validate_settings(req: &UpdateSettingsRequest) -> Result<(), AppError> {
    if let Some(language) = req.language.as_deref() {
        if !SUPPORTED_LANGUAGES.contains(&language) {
            return Err(AppError::validation("Unsupported language"));
        }
    }
    if let Some(theme) = req.theme.as_deref() {
        if !SUPPORTED_THEMES.contains(&theme) {
            return Err(AppError::validation("Unsupported theme"));
        }
    }
    Ok(())
}
