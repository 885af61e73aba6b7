use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    db::{db::DBClient, page_offset},
    dtos::roomdtos::{CreateRoomDto, UpdateRoomDto},
    models::roommodel::{Room, RoomStatus},
};

#[derive(Debug, Default)]
pub struct RoomSearchFilters {
    pub city: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub guests: Option<i32>,
}

#[async_trait]
pub trait RoomExt {
    async fn create_room(
        &self,
        landlord_id: Uuid,
        room_data: CreateRoomDto,
    ) -> Result<Room, sqlx::Error>;

    async fn get_room_by_id(&self, room_id: Uuid) -> Result<Option<Room>, sqlx::Error>;

    async fn get_rooms_by_landlord(
        &self,
        landlord_id: Uuid,
        page: u32,
        limit: usize,
    ) -> Result<Vec<Room>, sqlx::Error>;

    /// Public listing search: only AVAILABLE rooms, newest first.
    async fn search_rooms(
        &self,
        filters: RoomSearchFilters,
        page: u32,
        limit: usize,
    ) -> Result<Vec<Room>, sqlx::Error>;

    async fn update_room(
        &self,
        room_id: Uuid,
        room_data: UpdateRoomDto,
    ) -> Result<Room, sqlx::Error>;

    async fn update_room_status(
        &self,
        room_id: Uuid,
        status: RoomStatus,
    ) -> Result<Room, sqlx::Error>;

    async fn delete_room(&self, room_id: Uuid) -> Result<u64, sqlx::Error>;

    async fn count_rooms(&self) -> Result<i64, sqlx::Error>;

    async fn count_rooms_by_landlord(&self, landlord_id: Uuid) -> Result<i64, sqlx::Error>;
}

#[async_trait]
impl RoomExt for DBClient {
    async fn create_room(
        &self,
        landlord_id: Uuid,
        room_data: CreateRoomDto,
    ) -> Result<Room, sqlx::Error> {
        let room = sqlx::query_as::<_, Room>(
            r#"
            INSERT INTO rooms (landlord_id, title, description, address, city, price, max_guests, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, landlord_id, title, description, address, city, price, max_guests, status, created_at, updated_at
            "#,
        )
        .bind(landlord_id)
        .bind(room_data.title)
        .bind(room_data.description)
        .bind(room_data.address)
        .bind(room_data.city)
        .bind(room_data.price)
        .bind(room_data.max_guests)
        .bind(RoomStatus::Available)
        .fetch_one(&self.pool)
        .await?;

        Ok(room)
    }

    async fn get_room_by_id(&self, room_id: Uuid) -> Result<Option<Room>, sqlx::Error> {
        let room = sqlx::query_as::<_, Room>(
            r#"
            SELECT id, landlord_id, title, description, address, city, price, max_guests, status, created_at, updated_at
            FROM rooms
            WHERE id = $1
            "#,
        )
        .bind(room_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(room)
    }

    async fn get_rooms_by_landlord(
        &self,
        landlord_id: Uuid,
        page: u32,
        limit: usize,
    ) -> Result<Vec<Room>, sqlx::Error> {
        let offset = page_offset(page, limit);

        let rooms = sqlx::query_as::<_, Room>(
            r#"
            SELECT id, landlord_id, title, description, address, city, price, max_guests, status, created_at, updated_at
            FROM rooms
            WHERE landlord_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(landlord_id)
        .bind(limit as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rooms)
    }

    async fn search_rooms(
        &self,
        filters: RoomSearchFilters,
        page: u32,
        limit: usize,
    ) -> Result<Vec<Room>, sqlx::Error> {
        let offset = page_offset(page, limit);

        let rooms = sqlx::query_as::<_, Room>(
            r#"
            SELECT id, landlord_id, title, description, address, city, price, max_guests, status, created_at, updated_at
            FROM rooms
            WHERE status = $1
              AND ($2::text IS NULL OR city ILIKE $2)
              AND ($3::bigint IS NULL OR price >= $3)
              AND ($4::bigint IS NULL OR price <= $4)
              AND ($5::int IS NULL OR max_guests >= $5)
            ORDER BY created_at DESC
            LIMIT $6 OFFSET $7
            "#,
        )
        .bind(RoomStatus::Available)
        .bind(filters.city.as_ref().map(|c| format!("%{}%", c)))
        .bind(filters.min_price)
        .bind(filters.max_price)
        .bind(filters.guests)
        .bind(limit as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rooms)
    }

    async fn update_room(
        &self,
        room_id: Uuid,
        room_data: UpdateRoomDto,
    ) -> Result<Room, sqlx::Error> {
        let room = sqlx::query_as::<_, Room>(
            r#"
            UPDATE rooms
            SET
                title = COALESCE($1, title),
                description = COALESCE($2, description),
                address = COALESCE($3, address),
                city = COALESCE($4, city),
                price = COALESCE($5, price),
                max_guests = COALESCE($6, max_guests),
                updated_at = NOW()
            WHERE id = $7
            RETURNING id, landlord_id, title, description, address, city, price, max_guests, status, created_at, updated_at
            "#,
        )
        .bind(room_data.title)
        .bind(room_data.description)
        .bind(room_data.address)
        .bind(room_data.city)
        .bind(room_data.price)
        .bind(room_data.max_guests)
        .bind(room_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(room)
    }

    async fn update_room_status(
        &self,
        room_id: Uuid,
        status: RoomStatus,
    ) -> Result<Room, sqlx::Error> {
        let room = sqlx::query_as::<_, Room>(
            r#"
            UPDATE rooms
            SET status = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING id, landlord_id, title, description, address, city, price, max_guests, status, created_at, updated_at
            "#,
        )
        .bind(status)
        .bind(room_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(room)
    }

    async fn delete_room(&self, room_id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM rooms WHERE id = $1")
            .bind(room_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn count_rooms(&self) -> Result<i64, sqlx::Error> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM rooms")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn count_rooms_by_landlord(&self, landlord_id: Uuid) -> Result<i64, sqlx::Error> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM rooms WHERE landlord_id = $1")
                .bind(landlord_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}
