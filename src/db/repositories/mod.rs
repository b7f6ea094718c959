pub mod audit;
pub mod invitations;
pub mod library;
pub mod links;
pub mod members;
pub mod metrics;
pub mod notifications;
pub mod projects;
pub mod tasks;
pub mod users;
