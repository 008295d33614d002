use sqlx::{AnyPool, FromRow};
use uuid::Uuid;

use crate::db::now_rfc3339;

/// User record in the database. The session token lives on the row itself
/// and doubles as the authentication credential.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub session_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl User {
    /// Find a user by email.
    pub async fn find_by_email(db: &AnyPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, session_id, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await
    }

    /// Find the user owning a session token.
    pub async fn find_by_session(
        db: &AnyPool,
        session_id: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, session_id, created_at, updated_at
            FROM users
            WHERE session_id = $1
            "#,
        )
        .bind(session_id)
        .fetch_optional(db)
        .await
    }

    /// Insert a new user carrying the given session token.
    pub async fn create(
        db: &AnyPool,
        name: &str,
        email: &str,
        session_id: &str,
    ) -> Result<User, sqlx::Error> {
        let now = now_rfc3339();
        let user = User {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            session_id: session_id.to_string(),
            created_at: now.clone(),
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, session_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.session_id)
        .bind(&user.created_at)
        .bind(&user.updated_at)
        .execute(db)
        .await?;

        Ok(user)
    }
}
