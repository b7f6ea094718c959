use crate::AppState;
use crate::config::AuthConfig;
use crate::db::enums::UserRole;
use crate::db::models::user::AuthUser;
use crate::db::repositories::users::UsersRepo;
use crate::error::{AppError, AppResult};
use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::{HeaderMap, Request, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid, // user_id
    pub email: String,
    pub role: UserRole,
    pub iat: u64,
    pub exp: u64,
    pub jti: String,
}

/// Issues and verifies HS256 access tokens.
#[derive(Clone)]
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expires_in: u64,
}

impl AuthService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            expires_in: config.access_token_expires_in,
        }
    }

    pub fn generate_access_token(&self, user: &AuthUser) -> AppResult<String> {
        let now = chrono::Utc::now().timestamp().max(0) as u64;

        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            iat: now,
            exp: now + self.expires_in,
            jti: Uuid::new_v4().to_string(),
        };

        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    pub fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &Validation::default())?;
        Ok(token_data.claims)
    }
}

/// Extracts `<token>` from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// The authenticated caller, placed in request extensions by [`auth_middleware`].
#[derive(Clone, Debug)]
pub struct AuthUserInfo {
    pub user: AuthUser,
}

impl AuthUserInfo {
    pub fn id(&self) -> Uuid {
        self.user.id
    }

    pub fn role(&self) -> UserRole {
        self.user.role
    }

    /// 403 unless the caller holds one of `roles`.
    pub fn require_any(&self, roles: &[UserRole]) -> AppResult<()> {
        if roles.contains(&self.user.role) {
            Ok(())
        } else {
            Err(AppError::forbidden("Insufficient role for this action"))
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUserInfo
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUserInfo>()
            .cloned()
            .ok_or_else(|| AppError::auth("Not authorized, no token"))
    }
}

pub async fn auth_middleware<B>(
    State(state): State<Arc<AppState>>,
    mut request: Request<B>,
    next: Next<B>,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())
        .ok_or_else(|| AppError::auth("Not authorized, no token"))?
        .to_string();

    let claims = state
        .auth_service
        .verify_token(&token)
        .map_err(|_| AppError::auth("Not authorized, invalid token"))?;

    let user = match state.user_cache.lookup(claims.sub).await {
        Some(user) => user,
        None => {
            let user_id = claims.sub;
            let found = state
                .db_call(move |conn| Ok(UsersRepo::find_by_id(conn, user_id)?))
                .await
                .map_err(|e| {
                    tracing::warn!("Auth user lookup failed: {}", e);
                    AppError::auth("Not authorized")
                })?
                .ok_or_else(|| AppError::auth("Not authorized, user not found"))?;

            let user = AuthUser::from(&found);
            state.user_cache.store(&user).await;
            user
        }
    };

    request.extensions_mut().insert(AuthUserInfo { user });
    Ok(next.run(request).await)
}

async fn require_roles<B>(
    roles: &[UserRole],
    request: Request<B>,
    next: Next<B>,
) -> Result<Response, AppError> {
    let info = request
        .extensions()
        .get::<AuthUserInfo>()
        .ok_or_else(|| AppError::auth("Not authorized"))?;
    info.require_any(roles)?;
    Ok(next.run(request).await)
}

/// Layer for routes reserved to `admin` and `superadmin`.
pub async fn require_admin<B>(request: Request<B>, next: Next<B>) -> Result<Response, AppError> {
    require_roles(&[UserRole::Admin, UserRole::Superadmin], request, next).await
}

pub async fn require_superadmin<B>(
    request: Request<B>,
    next: Next<B>,
) -> Result<Response, AppError> {
    require_roles(&[UserRole::Superadmin], request, next).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn service() -> AuthService {
        AuthService::new(&AuthConfig {
            jwt_secret: "unit-test-secret".to_string(),
            access_token_expires_in: 3600,
        })
    }

    fn user(role: UserRole) -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            role,
            avatar_url: None,
        }
    }

    #[test]
    fn token_round_trip_keeps_identity_and_role() {
        let svc = service();
        let u = user(UserRole::Researcher);
        let token = svc.generate_access_token(&u).unwrap();
        let claims = svc.verify_token(&token).unwrap();
        assert_eq!(claims.sub, u.id);
        assert_eq!(claims.email, u.email);
        assert_eq!(claims.role, UserRole::Researcher);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn tokens_from_another_secret_are_rejected() {
        let other = AuthService::new(&AuthConfig {
            jwt_secret: "different".to_string(),
            access_token_expires_in: 3600,
        });
        let token = other.generate_access_token(&user(UserRole::User)).unwrap();
        assert!(matches!(service().verify_token(&token), Err(AppError::Jwt(_))));
    }

    #[test]
    fn parses_bearer_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));
    }

    #[test]
    fn role_gate() {
        let info = AuthUserInfo {
            user: user(UserRole::Admin),
        };
        assert!(info.require_any(&[UserRole::Admin, UserRole::Superadmin]).is_ok());
        assert!(matches!(
            info.require_any(&[UserRole::Superadmin]),
            Err(AppError::Forbidden { .. })
        ));
    }
}
