pub mod account_service;
pub mod admin_users_service;
pub mod audit_service;
pub mod context;
pub mod invitations_service;
pub mod library_service;
pub mod metrics_service;
pub mod notifications_service;
pub mod projects_service;
pub mod settings_service;
pub mod tasks_service;

pub use account_service::AccountService;
pub use admin_users_service::AdminUsersService;
pub use audit_service::AuditService;
pub use context::RequestContext;
pub use invitations_service::InvitationsService;
pub use library_service::LibraryService;
pub use metrics_service::MetricsService;
pub use notifications_service::NotificationsService;
pub use projects_service::ProjectsService;
pub use settings_service::SettingsService;
pub use tasks_service::TasksService;
