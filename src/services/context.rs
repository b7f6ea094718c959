use axum::http::HeaderMap;
use uuid::Uuid;

use crate::db::enums::UserRole;
use crate::middleware::auth::AuthUserInfo;

#[derive(Clone, Debug)]
pub struct RequestContext {
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole,
    pub ip: Option<String>,
}

impl RequestContext {
    pub fn new(auth: &AuthUserInfo, headers: &HeaderMap) -> Self {
        Self {
            user_id: auth.user.id,
            email: auth.user.email.clone(),
            role: auth.user.role,
            ip: client_ip(headers),
        }
    }

    pub fn is_superadmin(&self) -> bool {
        self.role == UserRole::Superadmin
    }
}

/// First hop of `x-forwarded-for`, else `x-real-ip`.
pub fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .or_else(|| headers.get("x-real-ip").and_then(|v| v.to_str().ok()))
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn picks_first_forwarded_hop() {
        let mut headers = HeaderMap::new();
        assert_eq!(client_ip(&headers), None);

        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.9"));
        assert_eq!(client_ip(&headers).as_deref(), Some("10.0.0.9"));

        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7, 10.0.0.1"));
        assert_eq!(client_ip(&headers).as_deref(), Some("203.0.113.7"));
    }
}
