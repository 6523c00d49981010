//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::entity::user::{NewUser, User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email, user_id::UserId, user_name::UserName, user_password::UserPassword,
};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed credential store
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl UserRepository for PgUserRepository {
    async fn create(&self, user: NewUser) -> AuthResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (email, name, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, email, name, password_hash, created_at
            "#,
        )
        .bind(user.email.as_str())
        .bind(user.name.as_str())
        .bind(user.password.as_phc_string())
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)?;

        Ok(row.into_user())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, name, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn find_by_id(&self, id: UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, name, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }
}

/// `users_email_key` is the last line of defense against concurrent
/// registrations with the same email.
fn map_insert_error(err: sqlx::Error) -> AuthError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => AuthError::EmailTaken,
        _ => AuthError::Database(err),
    }
}

// ============================================================================
// Row types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    name: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            id: UserId::new(self.id),
            email: Email::from_db(self.email),
            name: UserName::from_db(self.name),
            password: UserPassword::from_db(self.password_hash),
            created_at: self.created_at,
        }
    }
}
