use research_hub::error::AppError;
use research_hub::validation::invitation::{check_invitee, invitee_email};
use uuid::Uuid;

#[test]
fn invitee_email_is_normalized() {
    assert_eq!(
        invitee_email("  Marie.Curie@Example.ORG ").unwrap(),
        "marie.curie@example.org"
    );
    assert!(invitee_email("").is_err());
    assert!(invitee_email("no-at.example.org").is_err());
}

#[test]
fn self_owner_and_members_cannot_be_invited() {
    let owner = Uuid::new_v4();
    let other = Uuid::new_v4();

    assert!(check_invitee(owner, owner, other, false).is_ok());
    assert!(matches!(
        check_invitee(owner, owner, owner, false),
        Err(AppError::Validation { .. })
    ));
    assert!(check_invitee(other, owner, owner, false).is_err());
    assert!(check_invitee(owner, owner, other, true).is_err());
}
