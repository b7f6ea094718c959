use diesel::prelude::*;
use uuid::Uuid;

use crate::{
    db::models::link::{
        AddResourceLinkRequest, NewResourceLink, NewWorkLink, ResourceLink, SetWorkLinkRequest,
        WorkLink, WorkLinkInfo,
    },
    db::models::member::{MEMBER_ROLE, OWNER_ROLE},
    db::models::notification::{NewNotification, kinds},
    db::models::project::{
        CreateProjectRequest, NewProject, Project, ProjectChanges, ProjectMemberInfo, ProjectStats,
        UpdateProjectRequest,
    },
    db::models::user::UserSummary,
    db::repositories::{
        invitations::InvitationsRepo, links::LinksRepo, members::MembersRepo,
        notifications::NotificationsRepo, projects::ProjectsRepo, users::UsersRepo,
    },
    error::{AppError, AppResult},
    utils::AssetUrlHelper,
    validation::project::{
        validate_create_project, validate_resource_link, validate_update_project,
        validate_work_link,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectAccess {
    Owner,
    Member,
}

pub struct ProjectsService;

impl ProjectsService {
    pub fn find(conn: &mut PgConnection, project_id: Uuid) -> AppResult<Project> {
        ProjectsRepo::find_by_id(conn, project_id)?.ok_or_else(|| AppError::not_found("Project"))
    }

    pub fn access_of(
        conn: &mut PgConnection,
        project: &Project,
        user_id: Uuid,
    ) -> AppResult<Option<ProjectAccess>> {
        if project.owner_id == user_id {
            return Ok(Some(ProjectAccess::Owner));
        }
        if MembersRepo::is_member(conn, project.id, user_id)? {
            return Ok(Some(ProjectAccess::Member));
        }
        Ok(None)
    }

    /// Owner or member; outsiders get the same 404 as a missing project.
    pub fn require_visible(
        conn: &mut PgConnection,
        project_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<(Project, ProjectAccess)> {
        let project = Self::find(conn, project_id)?;
        match Self::access_of(conn, &project, user_id)? {
            Some(access) => Ok((project, access)),
            None => Err(AppError::not_found("Project")),
        }
    }

    /// Owner or member; outsiders get 403.
    pub fn require_participant(
        conn: &mut PgConnection,
        project_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<(Project, ProjectAccess)> {
        let project = Self::find(conn, project_id)?;
        match Self::access_of(conn, &project, user_id)? {
            Some(access) => Ok((project, access)),
            None => Err(AppError::forbidden("You do not have access to this project")),
        }
    }

    pub fn require_owner(
        conn: &mut PgConnection,
        project_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Project> {
        let project = Self::find(conn, project_id)?;
        if project.owner_id != user_id {
            return Err(AppError::forbidden("Only the project owner can do this"));
        }
        Ok(project)
    }

    pub fn list(conn: &mut PgConnection, user_id: Uuid) -> AppResult<Vec<Project>> {
        Ok(ProjectsRepo::list_accessible(conn, user_id)?)
    }

    pub fn create(
        conn: &mut PgConnection,
        user_id: Uuid,
        req: &CreateProjectRequest,
    ) -> AppResult<Project> {
        validate_create_project(req)?;
        let project = ProjectsRepo::insert(
            conn,
            &NewProject {
                owner_id: user_id,
                name: req.name.trim().to_string(),
                description: req.description.trim().to_string(),
                subject_area: req.subject_area.trim().to_string(),
            },
        )?;
        tracing::info!(project_id = %project.id, owner = %user_id, "Project created");
        Ok(project)
    }

    pub fn update(
        conn: &mut PgConnection,
        user_id: Uuid,
        project_id: Uuid,
        req: &UpdateProjectRequest,
    ) -> AppResult<Project> {
        validate_update_project(req)?;
        let project = Self::require_owner(conn, project_id, user_id)?;
        let trimmed = |v: &Option<String>| v.as_deref().map(|s| s.trim().to_string());
        let changes = ProjectChanges {
            name: trimmed(&req.name),
            description: trimmed(&req.description),
            subject_area: trimmed(&req.subject_area),
            updated_at: None,
        };
        Ok(ProjectsRepo::update(conn, project.id, changes)?)
    }

    pub fn delete(conn: &mut PgConnection, user_id: Uuid, project_id: Uuid) -> AppResult<()> {
        let project = Self::require_owner(conn, project_id, user_id)?;
        ProjectsRepo::delete_by_id(conn, project.id)?;
        tracing::info!(project_id = %project.id, "Project deleted");
        Ok(())
    }

    /// Member count includes the owner; pending invitations are only counted for the owner.
    pub fn stats(conn: &mut PgConnection, user_id: Uuid, project_id: Uuid) -> AppResult<ProjectStats> {
        let (project, access) = Self::require_participant(conn, project_id, user_id)?;
        let members = MembersRepo::count_for_project(conn, project.id)? + 1;
        let pending = match access {
            ProjectAccess::Owner => InvitationsRepo::count_pending_for_project(conn, project.id)?,
            ProjectAccess::Member => 0,
        };
        Ok(ProjectStats { members, pending })
    }

    pub fn members(
        conn: &mut PgConnection,
        assets: &AssetUrlHelper,
        user_id: Uuid,
        project_id: Uuid,
    ) -> AppResult<Vec<ProjectMemberInfo>> {
        let (project, _) = Self::require_participant(conn, project_id, user_id)?;
        let owner = UsersRepo::find_by_id(conn, project.owner_id)?
            .ok_or_else(|| AppError::internal("Project owner not found"))?;

        let mut list = vec![ProjectMemberInfo {
            user: UserSummary::from_user(&owner, assets),
            role: OWNER_ROLE.to_string(),
            joined_at: project.created_at,
        }];
        list.extend(
            MembersRepo::list_with_users(conn, project.id)?
                .into_iter()
                .filter(|(_, user)| user.id != project.owner_id)
                .map(|(member, user)| ProjectMemberInfo {
                    user: UserSummary::from_user(&user, assets),
                    role: if member.role.is_empty() {
                        MEMBER_ROLE.to_string()
                    } else {
                        member.role
                    },
                    joined_at: member.created_at,
                }),
        );
        Ok(list)
    }

    pub fn remove_member(
        conn: &mut PgConnection,
        user_id: Uuid,
        project_id: Uuid,
        member_id: Uuid,
    ) -> AppResult<()> {
        let project = Self::require_owner(conn, project_id, user_id)?;
        if member_id == project.owner_id {
            return Err(AppError::validation("The project owner cannot be removed"));
        }

        // removing a non-member is a no-op
        let removed = conn.transaction::<bool, AppError, _>(|tx| {
            if MembersRepo::remove(tx, project.id, member_id)? == 0 {
                return Ok(false);
            }
            NotificationsRepo::insert(
                tx,
                &NewNotification::new(
                    member_id,
                    kinds::MEMBER_REMOVED,
                    format!("You were removed from the project {}", project.name),
                ),
            )?;
            Ok(true)
        })?;

        if removed {
            tracing::info!(project_id = %project.id, member = %member_id, "Member removed");
        }
        Ok(())
    }

    pub fn work_link(
        conn: &mut PgConnection,
        user_id: Uuid,
        project_id: Uuid,
    ) -> AppResult<WorkLinkInfo> {
        let (project, _) = Self::require_participant(conn, project_id, user_id)?;
        Ok(LinksRepo::find_work_link(conn, project.id)?
            .map(WorkLinkInfo::from)
            .unwrap_or_else(|| WorkLinkInfo::empty(project.id)))
    }

    pub fn set_work_link(
        conn: &mut PgConnection,
        user_id: Uuid,
        project_id: Uuid,
        req: &SetWorkLinkRequest,
    ) -> AppResult<WorkLink> {
        validate_work_link(req)?;
        let (project, _) = Self::require_participant(conn, project_id, user_id)?;
        Ok(LinksRepo::upsert_work_link(
            conn,
            &NewWorkLink {
                project_id: project.id,
                url: req.url.trim().to_string(),
                added_by: Some(user_id),
            },
        )?)
    }

    pub fn links(
        conn: &mut PgConnection,
        user_id: Uuid,
        project_id: Uuid,
    ) -> AppResult<Vec<ResourceLink>> {
        let (project, _) = Self::require_participant(conn, project_id, user_id)?;
        Ok(LinksRepo::list_resources(conn, project.id)?)
    }

    pub fn add_link(
        conn: &mut PgConnection,
        user_id: Uuid,
        project_id: Uuid,
        req: &AddResourceLinkRequest,
    ) -> AppResult<ResourceLink> {
        validate_resource_link(req)?;
        let (project, _) = Self::require_participant(conn, project_id, user_id)?;
        Ok(LinksRepo::insert_resource(
            conn,
            &NewResourceLink {
                project_id: project.id,
                name: req.name.trim().to_string(),
                url: req.url.trim().to_string(),
                added_by: Some(user_id),
            },
        )?)
    }

    pub fn delete_link(
        conn: &mut PgConnection,
        user_id: Uuid,
        project_id: Uuid,
        link_id: Uuid,
    ) -> AppResult<()> {
        let (project, _) = Self::require_participant(conn, project_id, user_id)?;
        if LinksRepo::delete_resource(conn, project.id, link_id)? == 0 {
            return Err(AppError::not_found("Link"));
        }
        Ok(())
    }
}
