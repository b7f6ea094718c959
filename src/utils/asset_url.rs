use crate::config::AssetsConfig;
use std::path::PathBuf;

/// Resolves stored asset paths (avatars and other local uploads) to public URLs.
#[derive(Clone, Debug)]
pub struct AssetUrlHelper {
    base_url_with_slash: String,
    upload_dir: PathBuf,
}

impl AssetUrlHelper {
    pub fn new(assets_config: &AssetsConfig) -> Self {
        let base_url_with_slash =
            format!("{}/", assets_config.base_url.trim_end_matches('/'));

        Self {
            base_url_with_slash,
            upload_dir: PathBuf::from(&assets_config.upload_dir),
        }
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url_with_slash, path.trim_start_matches('/'))
    }

    /// Local directory uploads are written to and served from.
    pub fn upload_dir(&self) -> &PathBuf {
        &self.upload_dir
    }

    /// Absolute URLs pass through; relative paths are resolved against the assets base.
    pub fn process_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            self.build_url(url)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn helper() -> AssetUrlHelper {
        AssetUrlHelper::new(&AssetsConfig {
            base_url: "http://localhost:5000/uploads/".to_string(),
            upload_dir: "uploads".to_string(),
        })
    }

    #[test]
    fn builds_urls_under_the_base() {
        let helper = helper();
        assert_eq!(
            helper.build_url("avatars/u1.png"),
            "http://localhost:5000/uploads/avatars/u1.png"
        );
        assert_eq!(
            helper.build_url("/avatars/u1.png"),
            "http://localhost:5000/uploads/avatars/u1.png"
        );
    }

    #[test]
    fn external_urls_pass_through() {
        let helper = helper();
        assert_eq!(
            helper.process_url("https://dl.dropboxusercontent.com/x.png?raw=1"),
            "https://dl.dropboxusercontent.com/x.png?raw=1"
        );
        assert_eq!(
            helper.process_url("https://example.com/a.png"),
            "https://example.com/a.png"
        );
        assert_eq!(
            helper.process_url("avatars/a.png"),
            "http://localhost:5000/uploads/avatars/a.png"
        );
    }
}
