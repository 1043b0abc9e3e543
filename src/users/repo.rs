use async_trait::async_trait;

use crate::{
    db::{like_pattern, PgStore},
    error::AppResult,
    users::repo_types::{NewUser, User, UserChanges},
};

/// Credential store. Emails are expected to be normalized by the caller.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>>;
    /// Fails with `Conflict` when the email is already taken.
    async fn create(&self, new: NewUser) -> AppResult<User>;
    /// Case-insensitive substring search over name and email.
    async fn list(&self, search: Option<&str>) -> AppResult<Vec<User>>;
    async fn update(&self, id: i32, changes: UserChanges) -> AppResult<Option<User>>;
    /// Linked profiles keep existing with `user_id = NULL`.
    async fn delete(&self, id: i32) -> AppResult<bool>;
}

const USER_COLUMNS: &str = "id, name, email, password_hash, status, created_at, updated_at";

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create(&self, new: NewUser) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, email, password_hash, status)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(new.status.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn list(&self, search: Option<&str>) -> AppResult<Vec<User>> {
        let rows = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE $1::text IS NULL OR name ILIKE $1 OR email ILIKE $1
            ORDER BY id
            "#
        ))
        .bind(search.map(like_pattern))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn update(&self, id: i32, changes: UserChanges) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
               SET name = COALESCE($2, name),
                   email = COALESCE($3, email),
                   status = COALESCE($4, status),
                   updated_at = now()
             WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.name)
        .bind(changes.email)
        .bind(changes.status.map(|s| s.as_str()))
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
