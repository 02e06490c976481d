//! Registration and login handlers.

use actix_web::{post, web, HttpResponse};

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::{AuthResponse, LoginRequest, PublicUser, RegisterRequest};
use crate::repository::UserRepository;
use crate::security;

/// Configure auth routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api/auth").service(register).service(login));
}

/// Create a new account with the default customer role.
#[post("/register")]
async fn register(
    repo: web::Data<UserRepository>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    if body.name.trim().is_empty() || body.email.trim().is_empty() || body.password.is_empty() {
        return Err(AppError::ValidationError(
            "Name, email and password are required".to_string(),
        ));
    }

    if repo.find_by_email(&body.email).await?.is_some() {
        return Err(AppError::DuplicateEmail);
    }

    let password_hash = security::hash_password(&body.password)?;
    let user = repo.create(&body.name, &body.email, &password_hash).await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "User created successfully",
        "user": { "id": user.id, "email": user.email }
    })))
}

/// Issue a token. Unknown email and wrong password both come back as the
/// same generic 400.
#[post("/login")]
async fn login(
    repo: web::Data<UserRepository>,
    config: web::Data<Config>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let user = repo
        .find_by_email(&body.email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !security::verify_password(&body.password, &user.password_hash)? {
        return Err(AppError::InvalidCredentials);
    }

    let token = security::issue_token(&user, &config.jwt_secret)?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        token,
        user: PublicUser::from(user),
    }))
}
