// Project ownership and invitation transitions against a migrated Postgres.
// Set TEST_DATABASE_URL to run them; without it each test returns early.
// Every test runs inside a transaction that is rolled back.

use diesel::prelude::*;
use research_hub::config::Config;
use research_hub::db::enums::{InvitationStatus, UserRole};
use research_hub::db::models::project::{CreateProjectRequest, Project};
use research_hub::db::models::user::{AdminCreateUserRequest, NewUser, User};
use research_hub::db::repositories::{members::MembersRepo, users::UsersRepo};
use research_hub::error::AppError;
use research_hub::services::context::RequestContext;
use research_hub::services::{AdminUsersService, InvitationsService, ProjectsService};
use uuid::Uuid;

fn connect() -> Option<PgConnection> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    Some(PgConnection::establish(&url).expect("TEST_DATABASE_URL should accept connections"))
}

fn user(conn: &mut PgConnection, name: &str) -> User {
    UsersRepo::insert(
        conn,
        &NewUser {
            name: name.to_string(),
            email: format!("{}-{}@example.org", name, Uuid::new_v4()),
            password_hash: "not-a-real-hash".to_string(),
            role: UserRole::User,
            notify_email_on_article: true,
        },
    )
    .unwrap()
}

fn ctx(user: &User) -> RequestContext {
    RequestContext {
        user_id: user.id,
        email: user.email.clone(),
        role: user.role,
        ip: None,
    }
}

fn project(conn: &mut PgConnection, owner: &User) -> Project {
    ProjectsService::create(
        conn,
        owner.id,
        &CreateProjectRequest {
            name: "Protein folding".to_string(),
            description: "Reading group".to_string(),
            subject_area: "Biology".to_string(),
        },
    )
    .unwrap()
}

#[test]
fn only_the_owner_deletes_a_project() {
    let Some(mut conn) = connect() else { return };
    conn.test_transaction::<_, AppError, _>(|conn| {
        let owner = user(conn, "owner");
        let member = user(conn, "member");
        let outsider = user(conn, "outsider");
        let project = project(conn, &owner);
        let invite = InvitationsService::invite(conn, &ctx(&owner), project.id, &member.email)?;
        InvitationsService::accept(conn, &ctx(&member), invite.invitation.id)?;

        for other in [&member, &outsider] {
            assert!(matches!(
                ProjectsService::delete(conn, other.id, project.id),
                Err(AppError::Forbidden { .. })
            ));
        }

        ProjectsService::delete(conn, owner.id, project.id)?;
        assert!(matches!(
            ProjectsService::find(conn, project.id),
            Err(AppError::NotFound { .. })
        ));
        Ok(())
    });
}

#[test]
fn duplicate_pending_invitation_is_a_conflict() {
    let Some(mut conn) = connect() else { return };
    conn.test_transaction::<_, AppError, _>(|conn| {
        let owner = user(conn, "owner");
        let invitee = user(conn, "invitee");
        let project = project(conn, &owner);

        InvitationsService::invite(conn, &ctx(&owner), project.id, &invitee.email)?;
        let again = InvitationsService::invite(conn, &ctx(&owner), project.id, &invitee.email);
        assert!(matches!(again, Err(AppError::Conflict { .. })));
        Ok(())
    });
}

#[test]
fn declined_invitation_cannot_be_accepted_or_canceled() {
    let Some(mut conn) = connect() else { return };
    conn.test_transaction::<_, AppError, _>(|conn| {
        let owner = user(conn, "owner");
        let invitee = user(conn, "invitee");
        let project = project(conn, &owner);
        let id = InvitationsService::invite(conn, &ctx(&owner), project.id, &invitee.email)?
            .invitation
            .id;

        let declined = InvitationsService::decline(conn, &ctx(&invitee), id)?;
        assert_eq!(declined.status, InvitationStatus::Declined);

        assert!(matches!(
            InvitationsService::accept(conn, &ctx(&invitee), id),
            Err(AppError::NotFound { .. })
        ));
        assert!(matches!(
            InvitationsService::cancel(conn, &ctx(&owner), id),
            Err(AppError::NotFound { .. })
        ));
        assert!(!MembersRepo::is_member(conn, project.id, invitee.id)?);

        // a settled invitation no longer blocks a fresh one
        InvitationsService::invite(conn, &ctx(&owner), project.id, &invitee.email)?;
        Ok(())
    });
}

#[test]
fn accepted_invitation_adds_member_once() {
    let Some(mut conn) = connect() else { return };
    conn.test_transaction::<_, AppError, _>(|conn| {
        let owner = user(conn, "owner");
        let invitee = user(conn, "invitee");
        let project = project(conn, &owner);
        let id = InvitationsService::invite(conn, &ctx(&owner), project.id, &invitee.email)?
            .invitation
            .id;

        InvitationsService::accept(conn, &ctx(&invitee), id)?;
        assert!(MembersRepo::is_member(conn, project.id, invitee.id)?);

        assert!(matches!(
            InvitationsService::decline(conn, &ctx(&invitee), id),
            Err(AppError::NotFound { .. })
        ));
        assert!(matches!(
            InvitationsService::accept(conn, &ctx(&invitee), id),
            Err(AppError::NotFound { .. })
        ));
        Ok(())
    });
}

#[test]
fn canceled_invitation_cannot_be_accepted() {
    let Some(mut conn) = connect() else { return };
    conn.test_transaction::<_, AppError, _>(|conn| {
        let owner = user(conn, "owner");
        let invitee = user(conn, "invitee");
        let stranger = user(conn, "stranger");
        let project = project(conn, &owner);
        let id = InvitationsService::invite(conn, &ctx(&owner), project.id, &invitee.email)?
            .invitation
            .id;

        assert!(matches!(
            InvitationsService::accept(conn, &ctx(&stranger), id),
            Err(AppError::Forbidden { .. })
        ));
        assert!(matches!(
            InvitationsService::cancel(conn, &ctx(&invitee), id),
            Err(AppError::Forbidden { .. })
        ));

        InvitationsService::cancel(conn, &ctx(&owner), id)?;
        assert!(matches!(
            InvitationsService::accept(conn, &ctx(&invitee), id),
            Err(AppError::NotFound { .. })
        ));
        Ok(())
    });
}

#[test]
fn outsiders_are_forbidden_from_project_resources() {
    let Some(mut conn) = connect() else { return };
    conn.test_transaction::<_, AppError, _>(|conn| {
        let owner = user(conn, "owner");
        let outsider = user(conn, "outsider");
        let project = project(conn, &owner);

        assert!(matches!(
            ProjectsService::stats(conn, outsider.id, project.id),
            Err(AppError::Forbidden { .. })
        ));
        assert!(matches!(
            ProjectsService::work_link(conn, outsider.id, project.id),
            Err(AppError::Forbidden { .. })
        ));
        assert!(matches!(
            ProjectsService::links(conn, outsider.id, project.id),
            Err(AppError::Forbidden { .. })
        ));
        assert!(matches!(
            ProjectsService::delete_link(conn, outsider.id, project.id, Uuid::new_v4()),
            Err(AppError::Forbidden { .. })
        ));
        // existence stays hidden on the project itself
        assert!(matches!(
            ProjectsService::require_visible(conn, project.id, outsider.id),
            Err(AppError::NotFound { .. })
        ));

        let link = ProjectsService::work_link(conn, owner.id, project.id)?;
        assert_eq!(link.url, "");
        Ok(())
    });
}

#[test]
fn removing_a_non_member_succeeds() {
    let Some(mut conn) = connect() else { return };
    conn.test_transaction::<_, AppError, _>(|conn| {
        let owner = user(conn, "owner");
        let outsider = user(conn, "outsider");
        let project = project(conn, &owner);

        ProjectsService::remove_member(conn, owner.id, project.id, outsider.id)?;
        assert!(matches!(
            ProjectsService::remove_member(conn, owner.id, project.id, owner.id),
            Err(AppError::Validation { .. })
        ));
        Ok(())
    });
}

#[test]
fn admin_created_users_take_the_configured_email_default() {
    let Some(mut conn) = connect() else { return };
    let config = Config::from_vars(vec![
        ("DATABASE_URL".to_string(), "postgres://unused".to_string()),
        ("JWT_SECRET".to_string(), "collab-test-secret".to_string()),
        ("BCRYPT_COST".to_string(), "4".to_string()),
        ("NOTIFY_EMAIL_ON_ARTICLE".to_string(), "false".to_string()),
    ])
    .unwrap();

    conn.test_transaction::<_, AppError, _>(|conn| {
        let admin = user(conn, "admin");
        let mut admin_ctx = ctx(&admin);
        admin_ctx.role = UserRole::Admin;

        let created = AdminUsersService::create(
            conn,
            &admin_ctx,
            &config,
            &AdminCreateUserRequest {
                name: "Rosalind".to_string(),
                email: format!("rosalind-{}@example.org", Uuid::new_v4()),
                password: "secret123".to_string(),
                role: None,
            },
        )?;
        assert!(!created.notify_email_on_article);
        assert_eq!(created.role, UserRole::User);
        Ok(())
    });
}
