use crate::db::models::link::{AddResourceLinkRequest, SetWorkLinkRequest};
use crate::db::models::project::{CreateProjectRequest, UpdateProjectRequest};
use crate::error::AppError;

use super::{is_blank, rules};

pub fn validate_create_project(req: &CreateProjectRequest) -> Result<(), AppError> {
    if is_blank(&req.name) || is_blank(&req.description) || is_blank(&req.subject_area) {
        return Err(AppError::validation(
            "Name, description and subject area are required",
        ));
    }
    Ok(())
}

/// Fields that are present must not be blank.
pub fn validate_update_project(req: &UpdateProjectRequest) -> Result<(), AppError> {
    let fields = [
        ("name", &req.name),
        ("description", &req.description),
        ("subject area", &req.subject_area),
    ];
    for (label, value) in fields {
        if value.as_deref().is_some_and(is_blank) {
            return Err(AppError::validation(format!("Project {} cannot be empty", label)));
        }
    }
    Ok(())
}

pub fn validate_work_link(req: &SetWorkLinkRequest) -> Result<(), AppError> {
    if !rules::is_http_url(&req.url) {
        return Err(AppError::validation("A valid http(s) URL is required"));
    }
    Ok(())
}

pub fn validate_resource_link(req: &AddResourceLinkRequest) -> Result<(), AppError> {
    if is_blank(&req.name) {
        return Err(AppError::validation("Link name is required"));
    }
    if !rules::is_http_url(&req.url) {
        return Err(AppError::validation("A valid http(s) URL is required"));
    }
    Ok(())
}
