use crate::domain::error::DomainError;
use crate::presentation::dto::{AuthResponse, LoginRequest, RegisterRequest};
use crate::presentation::handlers::Auth;
use actix_web::{HttpResponse, Responder, Scope, post, web};
use tracing::info;

pub fn scope() -> Scope {
    web::scope("/auth").service(register).service(login)
}

#[post("/register")]
async fn register(
    service: web::Data<Auth>,
    payload: web::Json<RegisterRequest>,
) -> Result<impl Responder, DomainError> {
    let user = service.register(&payload.0).await?;

    info!(user_id = %user.id, username = %user.username, "user registered");

    let jwt = service
        .login(&LoginRequest {
            email: user.email,
            password: payload.password.clone(),
        })
        .await?;

    Ok(HttpResponse::Created().json(AuthResponse {
        access_token: jwt,
        expires_in: service.keys().ttl_seconds(),
        token_type: "Bearer".to_string(),
    }))
}

#[post("/login")]
async fn login(
    service: web::Data<Auth>,
    payload: web::Json<LoginRequest>,
) -> Result<impl Responder, DomainError> {
    let jwt = service.login(&payload.0).await?;

    info!(email = %payload.email, "user logged in");

    Ok(HttpResponse::Ok().json(AuthResponse {
        access_token: jwt,
        expires_in: service.keys().ttl_seconds(),
        token_type: "Bearer".to_string(),
    }))
}
