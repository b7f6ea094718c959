// Account input rules, independent of the database

use research_hub::db::enums::UserRole;
use research_hub::db::models::user::{
    AdminCreateUserRequest, RegisterRequest, ResetPasswordRequest, UpdateSettingsRequest,
};
use research_hub::error::AppError;
use research_hub::services::account_service::{
    generate_reset_token, hash_reset_token, resolve_register_role,
};
use research_hub::validation::auth::{
    validate_admin_create, validate_email, validate_register, validate_reset_password,
    validate_settings,
};

fn register(name: &str, email: &str, password: &str) -> RegisterRequest {
    RegisterRequest {
        name: name.to_string(),
        email: email.to_string(),
        password: password.to_string(),
        ..Default::default()
    }
}

#[test]
fn register_requires_every_field() {
    assert!(validate_register(&register("Ada", "ada@example.com", "secret")).is_ok());
    assert!(matches!(
        validate_register(&register(" ", "ada@example.com", "secret")),
        Err(AppError::Validation { .. })
    ));
    assert!(validate_register(&register("Ada", "", "secret")).is_err());
    assert!(validate_register(&register("Ada", "ada@example.com", "")).is_err());
    assert!(validate_register(&register("Ada", "not-an-email", "secret")).is_err());
}

#[test]
fn admin_create_requires_every_field() {
    let ok = AdminCreateUserRequest {
        name: "Grace".to_string(),
        email: "grace@example.com".to_string(),
        password: "pw".to_string(),
        role: Some("researcher".to_string()),
    };
    assert!(validate_admin_create(&ok).is_ok());

    let missing = AdminCreateUserRequest {
        password: String::new(),
        ..ok
    };
    assert!(validate_admin_create(&missing).is_err());
}

#[test]
fn email_checks() {
    assert!(validate_email("ada@example.com").is_ok());
    assert!(validate_email("").is_err());
    assert!(validate_email("ada@localhost").is_err());
}

#[test]
fn register_role_resolution() {
    let secret = Some("let-me-in");
    assert_eq!(resolve_register_role(None, None, secret), UserRole::User);
    assert_eq!(
        resolve_register_role(Some("Researcher"), None, secret),
        UserRole::Researcher
    );
    assert_eq!(resolve_register_role(Some("student"), None, secret), UserRole::Student);
    assert_eq!(
        resolve_register_role(Some("admin"), Some("let-me-in"), secret),
        UserRole::Admin
    );
    assert_eq!(
        resolve_register_role(Some("admin"), Some("wrong"), secret),
        UserRole::User
    );
    assert_eq!(resolve_register_role(Some("admin"), Some("x"), None), UserRole::User);
    assert_eq!(
        resolve_register_role(Some("superadmin"), Some("let-me-in"), secret),
        UserRole::User
    );
}

#[test]
fn reset_tokens_are_stored_hashed() {
    let raw = generate_reset_token();
    assert_eq!(raw.len(), 64);
    let hashed = hash_reset_token(&raw);
    assert_eq!(hashed.len(), 64);
    assert_ne!(hashed, raw);
    assert_eq!(hashed, hash_reset_token(&raw));
    assert_ne!(generate_reset_token(), raw);
}

#[test]
fn reset_password_requires_email_token_and_password() {
    let full = ResetPasswordRequest {
        email: "ada@example.com".to_string(),
        token: "abc".to_string(),
        password: "new-secret".to_string(),
    };
    assert!(validate_reset_password(&full).is_ok());
    assert!(
        validate_reset_password(&ResetPasswordRequest {
            token: String::new(),
            ..full
        })
        .is_err()
    );
}

#[test]
fn settings_accept_known_values_only() {
    assert!(validate_settings(&UpdateSettingsRequest::default()).is_ok());
    assert!(
        validate_settings(&UpdateSettingsRequest {
            language: Some("en".to_string()),
            theme: Some("dark".to_string()),
            notify_email_on_article: Some(false),
        })
        .is_ok()
    );
    assert!(
        validate_settings(&UpdateSettingsRequest {
            language: Some("fr".to_string()),
            ..Default::default()
        })
        .is_err()
    );
    assert!(
        validate_settings(&UpdateSettingsRequest {
            theme: Some("sepia".to_string()),
            ..Default::default()
        })
        .is_err()
    );
}
