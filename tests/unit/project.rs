use research_hub::db::models::link::{AddResourceLinkRequest, SetWorkLinkRequest};
use research_hub::db::models::project::{CreateProjectRequest, UpdateProjectRequest};
use research_hub::validation::project::{
    validate_create_project, validate_resource_link, validate_update_project, validate_work_link,
};

#[test]
fn create_project_needs_all_three_fields() {
    let full = CreateProjectRequest {
        name: "Coral reefs".to_string(),
        description: "Bleaching survey".to_string(),
        subject_area: "Marine biology".to_string(),
    };
    assert!(validate_create_project(&full).is_ok());
    assert!(
        validate_create_project(&CreateProjectRequest {
            subject_area: "  ".to_string(),
            ..full
        })
        .is_err()
    );
    assert!(validate_create_project(&CreateProjectRequest::default()).is_err());
}

#[test]
fn update_project_rejects_blanked_fields() {
    assert!(validate_update_project(&UpdateProjectRequest::default()).is_ok());
    assert!(
        validate_update_project(&UpdateProjectRequest {
            name: Some("Renamed".to_string()),
            ..Default::default()
        })
        .is_ok()
    );
    assert!(
        validate_update_project(&UpdateProjectRequest {
            description: Some("".to_string()),
            ..Default::default()
        })
        .is_err()
    );
}

#[test]
fn links_must_be_http() {
    let work = |url: &str| SetWorkLinkRequest {
        url: url.to_string(),
    };
    assert!(validate_work_link(&work("https://docs.example.org/d/1")).is_ok());
    assert!(validate_work_link(&work("docs.example.org")).is_err());
    assert!(validate_work_link(&work("")).is_err());

    let link = |name: &str, url: &str| AddResourceLinkRequest {
        name: name.to_string(),
        url: url.to_string(),
    };
    assert!(validate_resource_link(&link("Dataset", "http://data.example.org")).is_ok());
    assert!(validate_resource_link(&link("", "http://data.example.org")).is_err());
    assert!(validate_resource_link(&link("Dataset", "ftp://data.example.org")).is_err());
}
