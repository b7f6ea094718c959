pub mod ai;
pub mod api;
pub mod audit;
pub mod invitation;
pub mod library;
pub mod link;
pub mod member;
pub mod metric;
pub mod notification;
pub mod project;
pub mod task;
pub mod user;

pub use ai::*;
pub use api::*;
pub use audit::*;
pub use invitation::*;
pub use library::*;
pub use link::*;
pub use member::*;
pub use metric::*;
pub use notification::*;
pub use project::*;
pub use task::*;
pub use user::*;
