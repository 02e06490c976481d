//! User repository.

use sqlx::{postgres::PgRow, PgPool, Row};

use crate::errors::{RepoResult, RepositoryError};
use crate::models::{Role, User};

const USER_COLUMNS: &str = "id, name, email, password_hash, role, created_at";

pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by email.
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_user))
    }

    /// Insert a new account with the default CLIENTE role. The password must
    /// already be hashed by the caller.
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> RepoResult<User> {
        if self.find_by_email(email).await?.is_some() {
            return Err(RepositoryError::DuplicateKey("email".to_string()));
        }

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(Role::Cliente.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(map_user(&row))
    }
}

fn map_user(row: &PgRow) -> User {
    User {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        role: Role::parse(row.get("role")),
        created_at: row.get("created_at"),
    }
}
