mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;

use crate::application::auth_service::AuthService;
use crate::application::comment_service::CommentService;
use crate::application::post_service::PostService;
use crate::data::category_repository::PostgresCategoryRepository;
use crate::data::comment_repository::PostgresCommentRepository;
use crate::data::post_repository::PostgresPostRepository;
use crate::data::user_repository::PostgresUserRepository;
use actix_cors::Cors;
use actix_web::middleware::DefaultHeaders;
use actix_web::{App, HttpServer, web};
use infrastructure::config::AppConfig;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::logging::init_logging;
use infrastructure::security::JwtKeys;
use presentation::handlers;
use presentation::middleware::{IdentityMiddleware, RequestIdMiddleware, TimingMiddleware};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_logging();

    let config = AppConfig::from_env().expect("invalid configuration");
    let pool = create_pool(&config.database_url)
        .await
        .expect("failed to connect to database");
    run_migrations(&pool)
        .await
        .expect("failed to run migrations");

    let user_repo = Arc::new(PostgresUserRepository::new(pool.clone()));
    let post_repo = Arc::new(PostgresPostRepository::new(pool.clone()));
    let category_repo = Arc::new(PostgresCategoryRepository::new(pool.clone()));
    let comment_repo = Arc::new(PostgresCommentRepository::new(pool.clone()));

    let auth_service = AuthService::new(
        Arc::clone(&user_repo),
        JwtKeys::new(config.jwt_secret.clone(), config.token_ttl_hours),
    );
    let post_service = PostService::new(
        Arc::clone(&post_repo),
        Arc::clone(&category_repo),
        config.page_size,
    );
    let comment_service = CommentService::new(Arc::clone(&comment_repo));

    let config_data = config.clone();

    HttpServer::new(move || {
        let cors = build_cors(&config_data);
        App::new()
            .wrap(RequestIdMiddleware)
            .wrap(TimingMiddleware)
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("Referrer-Policy", "no-referrer"))
                    .add(("Permissions-Policy", "geolocation=()"))
                    .add(("Cross-Origin-Opener-Policy", "same-origin")),
            )
            .wrap(cors)
            .app_data(web::Data::new(post_service.clone()))
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(comment_service.clone()))
            .service(
                web::scope("/api")
                    .wrap(IdentityMiddleware::new(auth_service.keys().clone()))
                    .route("/health", web::get().to(handlers::health))
                    .service(handlers::auth::scope())
                    .service(handlers::post::list_posts)
                    .service(handlers::post::get_post)
                    .service(handlers::post::create_post)
                    .service(handlers::post::update_post)
                    .service(handlers::post::delete_post)
                    .service(handlers::comment::create_comment)
                    .service(handlers::comment::update_comment)
                    .service(handlers::comment::delete_comment)
                    .service(handlers::category::category_posts)
                    .service(handlers::profile::get_profile)
                    .service(handlers::profile::update_profile),
            )
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

fn build_cors(config: &AppConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::AUTHORIZATION,
        ])
        .supports_credentials()
        .max_age(3600);

    for origin in &config.cors_origins {
        cors = cors.allowed_origin(origin);
    }

    cors
}
