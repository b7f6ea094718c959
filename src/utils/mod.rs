pub mod asset_url;
pub mod retry;

pub use asset_url::AssetUrlHelper;
pub use retry::{RetryPolicy, with_retry_and_timeout};
