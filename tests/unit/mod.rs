mod auth;
mod clients;
mod collaboration;
mod invitation;
mod library;
mod project;
mod router;
mod task;
