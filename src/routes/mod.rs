pub mod admin_users;
pub mod ai;
pub mod audit;
pub mod health;
pub mod invitations;
pub mod library;
pub mod metrics;
pub mod notifications;
pub mod projects;
pub mod settings;
pub mod tasks;
pub mod users;

use crate::AppState;
use crate::middleware::auth::{auth_middleware, require_admin, require_superadmin};
use crate::validation::library::MAX_PDF_BYTES;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post, put},
};
use std::sync::Arc;

/// Multipart overhead allowed on top of the file size limits.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/healthz", get(health::healthz))
        .route("/readyz", get(health::readyz))
        .route("/api/users/register", post(users::register))
        .route("/api/users/login", post(users::login))
        .route("/api/users/forgot-password", post(users::forgot_password))
        .route("/api/users/reset-password", post(users::reset_password))
}

fn account_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/users/me",
            get(users::get_me)
                .put(users::update_me)
                .delete(users::delete_me),
        )
        .route("/api/users/check-email", get(users::check_email))
        .route(
            "/api/users/me/avatar",
            put(users::update_avatar)
                .layer(DefaultBodyLimit::max(users::MAX_AVATAR_BYTES + FORM_OVERHEAD_BYTES)),
        )
        .route(
            "/api/settings",
            get(settings::get_settings).put(settings::update_settings),
        )
        .route(
            "/api/notifications",
            get(notifications::get_notifications),
        )
        .route(
            "/api/notifications/unread-count",
            get(notifications::unread_count),
        )
        .route(
            "/api/notifications/read-all",
            post(notifications::mark_all_read),
        )
        .route(
            "/api/notifications/:notification_id/read",
            post(notifications::mark_read),
        )
        .route("/api/metrics/overview", get(metrics::user_overview))
        .route("/api/metrics/timeseries", get(metrics::user_timeseries))
}

fn project_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/projects",
            get(projects::get_projects).post(projects::create_project),
        )
        .route(
            "/api/projects/invitations/me",
            get(invitations::get_my_invitations),
        )
        .route(
            "/api/projects/invitations/:id",
            delete(invitations::cancel_invitation),
        )
        .route(
            "/api/projects/invitations/:id/accept",
            post(invitations::accept_invitation),
        )
        .route(
            "/api/projects/invitations/:id/decline",
            post(invitations::decline_invitation),
        )
        .route(
            "/api/projects/:id",
            get(projects::get_project)
                .put(projects::update_project)
                .delete(projects::delete_project),
        )
        .route("/api/projects/:id/stats", get(projects::get_project_stats))
        .route(
            "/api/projects/:id/members",
            get(projects::get_project_members),
        )
        .route(
            "/api/projects/:id/members/:user_id",
            delete(projects::remove_project_member),
        )
        .route(
            "/api/projects/:id/invite",
            post(invitations::invite_to_project),
        )
        .route(
            "/api/projects/:id/invitations",
            get(invitations::get_project_invitations),
        )
        .route(
            "/api/projects/:id/tasks",
            get(tasks::get_tasks).post(tasks::create_task),
        )
        .route(
            "/api/projects/:id/tasks/:task_id",
            delete(tasks::delete_task),
        )
        .route(
            "/api/projects/:id/tasks/:task_id/status",
            put(tasks::update_task_status),
        )
        .route(
            "/api/projects/:id/work-link",
            get(projects::get_work_link).put(projects::set_work_link),
        )
        .route(
            "/api/projects/:id/links",
            get(projects::get_links).post(projects::add_link),
        )
        .route(
            "/api/projects/:id/links/:link_id",
            delete(projects::delete_link),
        )
        .route("/api/tasks/upcoming", get(tasks::get_upcoming_tasks))
}

fn library_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/library", get(library::get_library))
        .route(
            "/api/library/upload",
            post(library::upload_pdf)
                .layer(DefaultBodyLimit::max(MAX_PDF_BYTES + FORM_OVERHEAD_BYTES)),
        )
        .route("/api/library/suggested", post(library::save_suggested))
        .route("/api/library/:id", delete(library::delete_library_item))
        .route("/api/ai/summarize", post(ai::summarize))
        .route("/api/ai/chat", post(ai::chat))
        .route("/api/ai/suggest", post(ai::suggest_articles))
}

fn admin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/admin/users",
            get(admin_users::list_users).post(admin_users::create_user),
        )
        .route(
            "/api/admin/users/:id",
            get(admin_users::get_user)
                .put(admin_users::update_user)
                .delete(admin_users::delete_user),
        )
        .route("/api/admin/metrics/overview", get(metrics::admin_overview))
        .route("/api/admin/metrics/export", get(metrics::admin_export))
        .route(
            "/api/admin/metrics/timeseries",
            get(metrics::admin_timeseries),
        )
        .route_layer(from_fn(require_admin))
}

fn superadmin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/superadmin/audit-logs", get(audit::list_audit_logs))
        .route_layer(from_fn(require_superadmin))
}

pub fn create_router(state: Arc<AppState>) -> Router {
    // Role layers sit inside the auth layer so the caller is known when they run.
    let protected_routes = Router::new()
        .merge(account_routes())
        .merge(project_routes())
        .merge(library_routes())
        .merge(admin_routes())
        .merge(superadmin_routes())
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    public_routes()
        .merge(protected_routes)
        .with_state(state)
}
