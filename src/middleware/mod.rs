pub mod auth;
pub mod request_tracking;
pub mod security;

pub use request_tracking::{
    REQUEST_ID_HEADER, SlowRequestThreshold, extract_request_id, request_tracking_middleware,
};
