use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    db::db::DBClient,
    models::usermodel::{User, UserRole},
};

#[async_trait]
pub trait UserExt {
    /// Looks a user up by id or email; exactly one selector should be set.
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        email: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error>;

    async fn save_user(
        &self,
        name: String,
        email: String,
        password: String,
        role: UserRole,
    ) -> Result<User, sqlx::Error>;

    async fn count_users(&self, role: Option<UserRole>) -> Result<i64, sqlx::Error>;
}

#[async_trait]
impl UserExt for DBClient {
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        email: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password, role, created_at, updated_at
            FROM users
            WHERE ($1::uuid IS NULL OR id = $1)
              AND ($2::text IS NULL OR email = $2)
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn save_user(
        &self,
        name: String,
        email: String,
        password: String,
        role: UserRole,
    ) -> Result<User, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password, role, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password)
        .bind(role)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn count_users(&self, role: Option<UserRole>) -> Result<i64, sqlx::Error> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM users
            WHERE ($1::user_role IS NULL OR role = $1)
            "#,
        )
        .bind(role)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
