use actix_web::http::header;
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

pub const LOGIN_ROUTE: &str = "/api/auth/login";

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("user not found: {0}")]
    UserNotFound(String),
    #[error("user already exists: {0}")]
    UserAlreadyExists(String),
    #[error("post not found: {0}")]
    PostNotFound(Uuid),
    #[error("category not found: {0}")]
    CategoryNotFound(String),
    #[error("comment not found: {0}")]
    CommentNotFound(Uuid),
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("login required")]
    LoginRequired,
    #[error("not the author")]
    NotAuthor { location: String },
    #[error("unauthorized")]
    Unauthorized,
    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        match self {
            DomainError::UserNotFound(_)
            | DomainError::PostNotFound(_)
            | DomainError::CategoryNotFound(_)
            | DomainError::CommentNotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::Unauthorized => StatusCode::UNAUTHORIZED,
            DomainError::LoginRequired | DomainError::NotAuthor { .. } => StatusCode::SEE_OTHER,
            DomainError::UserAlreadyExists(_) => StatusCode::CONFLICT,
            DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Refusals are redirects, not error pages: an unauthenticated
        // mutation goes to the login route, a non-author mutation goes back
        // to the resource's read view.
        match self {
            DomainError::LoginRequired => HttpResponse::SeeOther()
                .insert_header((header::LOCATION, LOGIN_ROUTE))
                .finish(),
            DomainError::NotAuthor { location } => HttpResponse::SeeOther()
                .insert_header((header::LOCATION, location.as_str()))
                .finish(),
            _ => {
                let message = self.to_string();
                let details = match self {
                    DomainError::PostNotFound(id) | DomainError::CommentNotFound(id) => {
                        Some(json!({ "resource": id }))
                    }
                    DomainError::UserNotFound(name) | DomainError::CategoryNotFound(name) => {
                        Some(json!({ "resource": name }))
                    }
                    _ => None,
                };
                let body = ErrorBody {
                    error: message.as_str(),
                    details,
                };
                HttpResponse::build(self.status_code()).json(body)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_required_redirects_to_login_route() {
        let res = DomainError::LoginRequired.error_response();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            res.headers().get(header::LOCATION).unwrap(),
            LOGIN_ROUTE
        );
    }

    #[test]
    fn not_author_redirects_to_resource_view() {
        let err = DomainError::NotAuthor {
            location: "/api/posts/abc".into(),
        };
        let res = err.error_response();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers().get(header::LOCATION).unwrap(), "/api/posts/abc");
    }

    #[test]
    fn not_found_is_404() {
        let err = DomainError::PostNotFound(Uuid::new_v4());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
