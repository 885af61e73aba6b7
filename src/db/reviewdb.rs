use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    db::{db::DBClient, page_offset},
    models::reviewmodel::Review,
};

#[async_trait]
pub trait ReviewExt {
    async fn get_reviews_by_room(
        &self,
        room_id: Uuid,
        page: u32,
        limit: usize,
    ) -> Result<Vec<Review>, sqlx::Error>;

    async fn count_reviews(&self) -> Result<i64, sqlx::Error>;
}

#[async_trait]
impl ReviewExt for DBClient {
    async fn get_reviews_by_room(
        &self,
        room_id: Uuid,
        page: u32,
        limit: usize,
    ) -> Result<Vec<Review>, sqlx::Error> {
        let offset = page_offset(page, limit);

        let reviews = sqlx::query_as::<_, Review>(
            r#"
            SELECT id, room_id, user_id, rating, comment, created_at
            FROM reviews
            WHERE room_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(room_id)
        .bind(limit as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    async fn count_reviews(&self) -> Result<i64, sqlx::Error> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM reviews")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
