//! Error types for the API and the data layer.
//!
//! `AppError` is what handlers return; it renders a JSON `{error, code}`
//! body. `RepositoryError` stays inside the data layer, with handlers
//! mapping `NotFound` to the entity-specific 404.

use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Application-level errors returned by handlers.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("No product found with id {0}")]
    ProductNotFound(i32),

    #[error("No repair found with that code")]
    TicketNotFound(String),

    #[error("{0}")]
    ValidationError(String),

    #[error("User already exists")]
    DuplicateEmail,

    // Same message for unknown email and wrong password, so login
    // responses cannot be used to enumerate accounts.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Password hashing failed")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("Token error")]
    Token(#[from] jsonwebtoken::errors::Error),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::ProductNotFound(_) => HttpResponse::NotFound().json(ErrorResponse {
                error: self.to_string(),
                code: "PRODUCT_NOT_FOUND",
            }),
            AppError::TicketNotFound(_) => HttpResponse::NotFound().json(ErrorResponse {
                error: self.to_string(),
                code: "TICKET_NOT_FOUND",
            }),
            AppError::ValidationError(_) => HttpResponse::BadRequest().json(ErrorResponse {
                error: self.to_string(),
                code: "VALIDATION_ERROR",
            }),
            AppError::DuplicateEmail => HttpResponse::BadRequest().json(ErrorResponse {
                error: self.to_string(),
                code: "DUPLICATE_EMAIL",
            }),
            AppError::InvalidCredentials => HttpResponse::BadRequest().json(ErrorResponse {
                error: self.to_string(),
                code: "INVALID_CREDENTIALS",
            }),
            AppError::DatabaseError(e) => {
                tracing::error!(error = %e, "database error");
                internal_error_response()
            }
            AppError::PasswordHash(e) => {
                tracing::error!(error = %e, "password hashing error");
                internal_error_response()
            }
            AppError::Token(e) => {
                tracing::error!(error = %e, "token error");
                internal_error_response()
            }
        }
    }
}

fn internal_error_response() -> HttpResponse {
    HttpResponse::InternalServerError().json(ErrorResponse {
        error: "Internal server error".to_string(),
        code: "INTERNAL_ERROR",
    })
}

#[derive(serde::Serialize)]
struct ErrorResponse {
    error: String,
    code: &'static str,
}

/// Repository-level errors.
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Query error: {0}")]
    QueryError(#[from] sqlx::Error),
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => AppError::DatabaseError(sqlx::Error::RowNotFound),
            // The only application-level unique key is users.email.
            RepositoryError::DuplicateKey(_) => AppError::DuplicateEmail,
            RepositoryError::QueryError(e) => AppError::DatabaseError(e),
        }
    }
}

/// Result type alias for application errors.
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for repository errors.
pub type RepoResult<T> = Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn not_found_errors_map_to_404() {
        assert_eq!(
            AppError::ProductNotFound(7).error_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::TicketNotFound("A1B2C3".into())
                .error_response()
                .status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn domain_errors_map_to_400() {
        assert_eq!(
            AppError::ValidationError("Missing fields".into())
                .error_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::DuplicateEmail.error_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::InvalidCredentials.error_response().status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn invalid_credentials_message_is_generic() {
        // Must not hint at whether the email or the password was wrong.
        assert_eq!(AppError::InvalidCredentials.to_string(), "Invalid credentials");
    }

    #[test]
    fn duplicate_key_surfaces_as_duplicate_email() {
        // The repository-level duplicate check can race; whichever path
        // catches it, the client sees the same 400 response.
        let err: AppError = RepositoryError::DuplicateKey("email".to_string()).into();
        assert_eq!(err.to_string(), "User already exists");
        assert_eq!(err.error_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn database_errors_map_to_500() {
        let err = AppError::DatabaseError(sqlx::Error::RowNotFound);
        assert_eq!(
            err.error_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
