use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    db::{db::DBClient, page_offset, roomdb::RoomExt},
    dtos::reviewdtos::CreateReviewDto,
    models::{
        bookingmodel::{Booking, BookingStatus},
        reviewmodel::Review,
        roommodel::Room,
    },
    service::{
        booking_service::{BookingStore, NewBooking},
        error::ServiceError,
    },
};

const BOOKING_COLUMNS: &str =
    "id, room_id, tenant_id, check_in, check_out, guests, status, total_price, notes, created_at, updated_at";

/// Read-side booking queries used by listings and dashboards. The write
/// path goes through `BookingStore`.
#[async_trait]
pub trait BookingExt {
    async fn get_bookings_by_tenant(
        &self,
        tenant_id: Uuid,
        page: u32,
        limit: usize,
    ) -> Result<Vec<Booking>, sqlx::Error>;

    async fn get_bookings_by_room(
        &self,
        room_id: Uuid,
        page: u32,
        limit: usize,
    ) -> Result<Vec<Booking>, sqlx::Error>;

    async fn count_bookings_by_tenant(
        &self,
        tenant_id: Uuid,
        status: Option<BookingStatus>,
    ) -> Result<i64, sqlx::Error>;

    async fn count_bookings_by_landlord(
        &self,
        landlord_id: Uuid,
        status: Option<BookingStatus>,
    ) -> Result<i64, sqlx::Error>;

    async fn count_bookings(&self, status: Option<BookingStatus>) -> Result<i64, sqlx::Error>;

    /// Total a tenant has committed across bookings that were never
    /// cancelled.
    async fn total_spent_by_tenant(&self, tenant_id: Uuid) -> Result<i64, sqlx::Error>;

    /// Revenue a landlord has realised from completed stays.
    async fn total_earned_by_landlord(&self, landlord_id: Uuid) -> Result<i64, sqlx::Error>;
}

#[async_trait]
impl BookingExt for DBClient {
    async fn get_bookings_by_tenant(
        &self,
        tenant_id: Uuid,
        page: u32,
        limit: usize,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let offset = page_offset(page, limit);

        let bookings = sqlx::query_as::<_, Booking>(&format!(
            r#"
            SELECT {BOOKING_COLUMNS}
            FROM bookings
            WHERE tenant_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        ))
        .bind(tenant_id)
        .bind(limit as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    async fn get_bookings_by_room(
        &self,
        room_id: Uuid,
        page: u32,
        limit: usize,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let offset = page_offset(page, limit);

        let bookings = sqlx::query_as::<_, Booking>(&format!(
            r#"
            SELECT {BOOKING_COLUMNS}
            FROM bookings
            WHERE room_id = $1
            ORDER BY check_in ASC
            LIMIT $2 OFFSET $3
            "#,
        ))
        .bind(room_id)
        .bind(limit as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    async fn count_bookings_by_tenant(
        &self,
        tenant_id: Uuid,
        status: Option<BookingStatus>,
    ) -> Result<i64, sqlx::Error> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM bookings
            WHERE tenant_id = $1
              AND ($2::booking_status IS NULL OR status = $2)
            "#,
        )
        .bind(tenant_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn count_bookings_by_landlord(
        &self,
        landlord_id: Uuid,
        status: Option<BookingStatus>,
    ) -> Result<i64, sqlx::Error> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM bookings b
            JOIN rooms r ON r.id = b.room_id
            WHERE r.landlord_id = $1
              AND ($2::booking_status IS NULL OR b.status = $2)
            "#,
        )
        .bind(landlord_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn count_bookings(&self, status: Option<BookingStatus>) -> Result<i64, sqlx::Error> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM bookings
            WHERE ($1::booking_status IS NULL OR status = $1)
            "#,
        )
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn total_spent_by_tenant(&self, tenant_id: Uuid) -> Result<i64, sqlx::Error> {
        // SUM over BIGINT widens to NUMERIC, so cast back.
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(SUM(total_price), 0)::BIGINT
            FROM bookings
            WHERE tenant_id = $1 AND status <> 'cancelled'
            "#,
        )
        .bind(tenant_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    async fn total_earned_by_landlord(&self, landlord_id: Uuid) -> Result<i64, sqlx::Error> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(SUM(b.total_price), 0)::BIGINT
            FROM bookings b
            JOIN rooms r ON r.id = b.room_id
            WHERE r.landlord_id = $1 AND b.status = 'completed'
            "#,
        )
        .bind(landlord_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }
}

#[async_trait]
impl BookingStore for DBClient {
    async fn get_room(&self, room_id: Uuid) -> Result<Option<Room>, ServiceError> {
        Ok(self.get_room_by_id(room_id).await?)
    }

    async fn find_overlapping(
        &self,
        room_id: Uuid,
        check_in: NaiveDate,
        check_out: NaiveDate,
        statuses: &[BookingStatus],
    ) -> Result<Vec<Booking>, ServiceError> {
        let statuses: Vec<String> = statuses.iter().map(|s| s.to_str().to_owned()).collect();

        // Inclusive bounds on both sides: a stay ending on day N conflicts
        // with one starting on day N.
        let bookings = sqlx::query_as::<_, Booking>(&format!(
            r#"
            SELECT {BOOKING_COLUMNS}
            FROM bookings
            WHERE room_id = $1
              AND status = ANY($2::booking_status[])
              AND check_in <= $4
              AND check_out >= $3
            "#,
        ))
        .bind(room_id)
        .bind(statuses)
        .bind(check_in)
        .bind(check_out)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    async fn insert_booking(&self, booking: NewBooking) -> Result<Booking, ServiceError> {
        // Racing inserts are settled by the bookings_no_overlap exclusion
        // constraint; its violation surfaces as DateConflict.
        let booking = sqlx::query_as::<_, Booking>(&format!(
            r#"
            INSERT INTO bookings (room_id, tenant_id, check_in, check_out, guests, status, total_price, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {BOOKING_COLUMNS}
            "#,
        ))
        .bind(booking.room_id)
        .bind(booking.tenant_id)
        .bind(booking.check_in)
        .bind(booking.check_out)
        .bind(booking.guests)
        .bind(BookingStatus::Pending)
        .bind(booking.total_price)
        .bind(booking.notes)
        .fetch_one(&self.pool)
        .await?;

        Ok(booking)
    }

    async fn get_booking(&self, booking_id: Uuid) -> Result<Option<Booking>, ServiceError> {
        let booking = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1",
        ))
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    async fn update_booking_status(
        &self,
        booking_id: Uuid,
        from: BookingStatus,
        to: BookingStatus,
    ) -> Result<Booking, ServiceError> {
        // Guarding on the status read during validation makes the update a
        // compare-and-set; a row that moved on in the meantime matches no
        // rows and the transition is rejected.
        let booking = sqlx::query_as::<_, Booking>(&format!(
            r#"
            UPDATE bookings
            SET status = $1, updated_at = NOW()
            WHERE id = $2 AND status = $3
            RETURNING {BOOKING_COLUMNS}
            "#,
        ))
        .bind(to)
        .bind(booking_id)
        .bind(from)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ServiceError::InvalidTransition { from, to })?;

        Ok(booking)
    }

    async fn has_completed_booking(
        &self,
        user_id: Uuid,
        room_id: Uuid,
    ) -> Result<bool, ServiceError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM bookings
                WHERE tenant_id = $1 AND room_id = $2 AND status = 'completed'
            )
            "#,
        )
        .bind(user_id)
        .bind(room_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn find_review(
        &self,
        user_id: Uuid,
        room_id: Uuid,
    ) -> Result<Option<Review>, ServiceError> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            SELECT id, room_id, user_id, rating, comment, created_at
            FROM reviews
            WHERE user_id = $1 AND room_id = $2
            "#,
        )
        .bind(user_id)
        .bind(room_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(review)
    }

    async fn insert_review(
        &self,
        user_id: Uuid,
        review: &CreateReviewDto,
    ) -> Result<Review, ServiceError> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (room_id, user_id, rating, comment)
            VALUES ($1, $2, $3, $4)
            RETURNING id, room_id, user_id, rating, comment, created_at
            "#,
        )
        .bind(review.room_id)
        .bind(user_id)
        .bind(review.rating)
        .bind(review.comment.clone())
        .fetch_one(&self.pool)
        .await?;

        Ok(review)
    }
}
