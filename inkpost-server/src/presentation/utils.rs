use actix_web::dev::Payload;
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{Ready, ready};
use uuid::Uuid;

use crate::domain::error::DomainError;

/// Identity decoded by the identity middleware. Extracting it directly
/// requires a logged-in viewer: an anonymous request is redirected to the
/// login route before any ownership check runs.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub username: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(DomainError::LoginRequired.into())),
        }
    }
}

/// Viewer identity for read endpoints, where anonymous is fine.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<AuthenticatedUser>);

impl MaybeUser {
    pub fn id(&self) -> Option<Uuid> {
        self.0.as_ref().map(|u| u.id)
    }
}

impl FromRequest for MaybeUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(MaybeUser(
            req.extensions().get::<AuthenticatedUser>().cloned(),
        )))
    }
}

pub fn post_detail_route(post_id: Uuid) -> String {
    format!("/api/posts/{}", post_id)
}

/// Author-only mutation guard. A non-author is sent back to the resource's
/// read view instead of getting an error page.
pub fn ensure_author(
    author_id: Uuid,
    user: &AuthenticatedUser,
    read_view: String,
) -> Result<(), DomainError> {
    if author_id != user.id {
        return Err(DomainError::NotAuthor {
            location: read_view,
        });
    }
    Ok(())
}

pub fn request_id(req: &HttpRequest) -> String {
    req.extensions()
        .get::<crate::presentation::middleware::RequestId>()
        .map(|rid| rid.0.clone())
        .unwrap_or_else(|| "unknown".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;

    fn user() -> AuthenticatedUser {
        AuthenticatedUser {
            id: Uuid::new_v4(),
            username: "alice".into(),
        }
    }

    #[test]
    fn author_passes_the_guard() {
        let user = user();
        assert!(ensure_author(user.id, &user, post_detail_route(Uuid::new_v4())).is_ok());
    }

    #[test]
    fn non_author_is_redirected_to_the_read_view() {
        let user = user();
        let post_id = Uuid::new_v4();
        let err = ensure_author(Uuid::new_v4(), &user, post_detail_route(post_id)).unwrap_err();
        match err {
            DomainError::NotAuthor { location } => {
                assert_eq!(location, format!("/api/posts/{}", post_id));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[actix_web::test]
    async fn missing_identity_redirects_to_login() {
        let req = TestRequest::default().to_http_request();
        let err = AuthenticatedUser::from_request(&req, &mut Payload::None)
            .into_inner()
            .unwrap_err();
        assert_eq!(err.as_response_error().status_code(), StatusCode::SEE_OTHER);
    }

    #[actix_web::test]
    async fn maybe_user_is_none_for_anonymous_requests() {
        let req = TestRequest::default().to_http_request();
        let viewer = MaybeUser::from_request(&req, &mut Payload::None)
            .into_inner()
            .unwrap();
        assert!(viewer.id().is_none());
    }

    #[actix_web::test]
    async fn maybe_user_picks_up_decoded_identity() {
        let req = TestRequest::default().to_http_request();
        let user = user();
        req.extensions_mut().insert(user.clone());
        let viewer = MaybeUser::from_request(&req, &mut Payload::None)
            .into_inner()
            .unwrap();
        assert_eq!(viewer.id(), Some(user.id));
    }
}
