use serde::Serialize;

/// Response envelope shared by every JSON endpoint.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ErrorDetail>>,
    pub timestamp: String,
}

#[derive(Serialize)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<i64>,
}

#[derive(Serialize)]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(page: i64, per_page: i64, total: i64) -> Self {
        let total_pages = if per_page > 0 {
            (total + per_page - 1) / per_page
        } else {
            0
        };
        Self {
            page,
            per_page,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }
}

#[derive(Serialize)]
pub struct ErrorDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    fn build(success: bool, code: u16, message: &str, data: Option<T>) -> Self {
        Self {
            success,
            code,
            message: message.to_string(),
            data,
            meta: None,
            errors: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    fn failure(code: u16, error_code: &str, message: &str, field: Option<String>) -> Self {
        let mut response = Self::build(false, code, message, None);
        response.errors = Some(vec![ErrorDetail {
            field,
            code: error_code.to_string(),
            message: message.to_string(),
        }]);
        response
    }

    pub fn success(data: T, message: &str) -> Self {
        Self::build(true, 200, message, Some(data))
    }

    pub fn success_with_meta(data: T, message: &str, meta: ResponseMeta) -> Self {
        let mut response = Self::build(true, 200, message, Some(data));
        response.meta = Some(meta);
        response
    }

    pub fn created(data: T, message: &str) -> Self {
        Self::build(true, 201, message, Some(data))
    }

    pub fn ok(message: &str) -> Self {
        Self::build(true, 200, message, None)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::failure(400, error_codes::BAD_REQUEST, message, None)
    }

    pub fn unauthorized(message: &str) -> Self {
        Self::failure(401, error_codes::UNAUTHORIZED, message, None)
    }

    pub fn forbidden(message: &str) -> Self {
        Self::failure(403, error_codes::FORBIDDEN, message, None)
    }

    pub fn not_found(message: &str) -> Self {
        Self::failure(404, error_codes::NOT_FOUND, message, None)
    }

    pub fn conflict(message: &str, field: Option<String>, error_code: &str) -> Self {
        Self::failure(409, error_code, message, field)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::failure(500, error_codes::INTERNAL_ERROR, message, None)
    }

    pub fn bad_gateway(message: &str) -> Self {
        Self::failure(502, error_codes::UPSTREAM_ERROR, message, None)
    }

    pub fn gateway_timeout(message: &str) -> Self {
        Self::failure(504, error_codes::UPSTREAM_TIMEOUT, message, None)
    }
}

pub mod error_codes {
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const FORBIDDEN: &str = "FORBIDDEN";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
    pub const UPSTREAM_ERROR: &str = "UPSTREAM_ERROR";
    pub const UPSTREAM_TIMEOUT: &str = "UPSTREAM_TIMEOUT";

    pub const USER_EMAIL_EXISTS: &str = "USER_EMAIL_EXISTS";
    pub const INVITATION_PENDING_EXISTS: &str = "INVITATION_PENDING_EXISTS";
    pub const LIBRARY_DUPLICATE_RESULT: &str = "LIBRARY_DUPLICATE_RESULT";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_counts_pages() {
        let p = Pagination::new(2, 20, 41);
        assert_eq!(p.total_pages, 3);
        assert!(p.has_next);
        assert!(p.has_prev);

        let empty = Pagination::new(1, 20, 0);
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_next);
    }

    #[test]
    fn conflict_carries_field_and_code() {
        let resp = ApiResponse::<()>::conflict(
            "Email already registered",
            Some("email".to_string()),
            error_codes::USER_EMAIL_EXISTS,
        );
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["code"], 409);
        assert_eq!(json["success"], false);
        assert_eq!(json["errors"][0]["field"], "email");
        assert_eq!(json["errors"][0]["code"], "USER_EMAIL_EXISTS");
        assert!(json.get("data").is_none());
    }
}
