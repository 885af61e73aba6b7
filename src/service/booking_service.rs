use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    dtos::{bookingdtos::CreateBookingDto, reviewdtos::CreateReviewDto},
    models::{
        bookingmodel::{Booking, BookingStatus},
        reviewmodel::Review,
        roommodel::{Room, RoomStatus},
        usermodel::{User, UserRole},
    },
    service::error::ServiceError,
};

/// Fields of a booking row as handed to the store. The service computes
/// `total_price`; the store fills in identity and timestamps.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub room_id: Uuid,
    pub tenant_id: Uuid,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: i32,
    pub total_price: i64,
    pub notes: Option<String>,
}

/// Persistence capabilities the booking engine needs. `DBClient` implements
/// this over Postgres; tests implement it in memory. Implementations must
/// make `insert_booking` atomic with respect to the overlap invariant (the
/// Postgres impl relies on the bookings exclusion constraint) and surface
/// violations as `ServiceError::DateConflict`.
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn get_room(&self, room_id: Uuid) -> Result<Option<Room>, ServiceError>;

    async fn find_overlapping(
        &self,
        room_id: Uuid,
        check_in: NaiveDate,
        check_out: NaiveDate,
        statuses: &[BookingStatus],
    ) -> Result<Vec<Booking>, ServiceError>;

    async fn insert_booking(&self, booking: NewBooking) -> Result<Booking, ServiceError>;

    async fn get_booking(&self, booking_id: Uuid) -> Result<Option<Booking>, ServiceError>;

    /// Compare-and-set on the booking row: the update applies only while
    /// the row still holds `from`, so a transition validated against a
    /// stale read cannot overwrite a concurrent status change. Returns
    /// `InvalidTransition` when the row has moved on.
    async fn update_booking_status(
        &self,
        booking_id: Uuid,
        from: BookingStatus,
        to: BookingStatus,
    ) -> Result<Booking, ServiceError>;

    async fn has_completed_booking(
        &self,
        user_id: Uuid,
        room_id: Uuid,
    ) -> Result<bool, ServiceError>;

    async fn find_review(
        &self,
        user_id: Uuid,
        room_id: Uuid,
    ) -> Result<Option<Review>, ServiceError>;

    async fn insert_review(
        &self,
        user_id: Uuid,
        review: &CreateReviewDto,
    ) -> Result<Review, ServiceError>;
}

/// Total price for a stay: price per day times the day count. A pure
/// function of its inputs; the result is snapshotted onto the booking row
/// and never recomputed.
pub fn booking_price(price_per_day: i64, check_in: NaiveDate, check_out: NaiveDate) -> i64 {
    price_per_day * (check_out - check_in).num_days()
}

pub struct BookingService {
    store: Arc<dyn BookingStore>,
}

impl std::fmt::Debug for BookingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingService").finish()
    }
}

impl BookingService {
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self { store }
    }

    /// Admits a booking request or rejects it with the first violated
    /// precondition. On success exactly one PENDING booking row is
    /// created; nothing else is mutated.
    pub async fn create_booking(
        &self,
        tenant_id: Uuid,
        booking_data: CreateBookingDto,
    ) -> Result<Booking, ServiceError> {
        let room = self
            .store
            .get_room(booking_data.room_id)
            .await?
            .ok_or(ServiceError::RoomNotFound(booking_data.room_id))?;

        if room.status != RoomStatus::Available {
            return Err(ServiceError::RoomUnavailable(room.id));
        }

        if booking_data.guests > room.max_guests {
            return Err(ServiceError::GuestLimitExceeded {
                limit: room.max_guests,
            });
        }

        if booking_data.check_in >= booking_data.check_out {
            return Err(ServiceError::InvalidDateRange);
        }

        // Inclusive-bound overlap check against bookings that still occupy
        // the calendar. A second, racing request can still pass this read;
        // the store's insert is the backstop that rejects the loser.
        let overlapping = self
            .store
            .find_overlapping(
                room.id,
                booking_data.check_in,
                booking_data.check_out,
                &BookingStatus::ACTIVE,
            )
            .await?;

        if !overlapping.is_empty() {
            return Err(ServiceError::DateConflict);
        }

        let total_price = booking_price(room.price, booking_data.check_in, booking_data.check_out);

        let booking = self
            .store
            .insert_booking(NewBooking {
                room_id: room.id,
                tenant_id,
                check_in: booking_data.check_in,
                check_out: booking_data.check_out,
                guests: booking_data.guests,
                total_price,
                notes: booking_data.notes,
            })
            .await?;

        tracing::info!(
            "booking {} created for room {} ({} - {}, total {})",
            booking.id,
            room.id,
            booking.check_in,
            booking.check_out,
            booking.total_price
        );

        Ok(booking)
    }

    /// Moves a booking along its status state machine, enforcing both the
    /// allowed edges and who may take them. CANCELLED and COMPLETED are
    /// terminal.
    pub async fn transition(
        &self,
        booking_id: Uuid,
        new_status: BookingStatus,
        acting_user: &User,
    ) -> Result<Booking, ServiceError> {
        let booking = self
            .store
            .get_booking(booking_id)
            .await?
            .ok_or(ServiceError::BookingNotFound(booking_id))?;

        if booking.status.is_terminal() {
            return Err(ServiceError::InvalidTransition {
                from: booking.status,
                to: new_status,
            });
        }

        let room = self
            .store
            .get_room(booking.room_id)
            .await?
            .ok_or(ServiceError::RoomNotFound(booking.room_id))?;

        let is_admin = acting_user.role == UserRole::Admin;
        let is_owner_landlord = room.landlord_id == acting_user.id;
        let is_booking_tenant = booking.tenant_id == acting_user.id;

        let permitted = match (booking.status, new_status) {
            (BookingStatus::Pending, BookingStatus::Confirmed) => is_owner_landlord || is_admin,
            (BookingStatus::Confirmed, BookingStatus::Completed) => is_owner_landlord || is_admin,
            (BookingStatus::Pending | BookingStatus::Confirmed, BookingStatus::Cancelled) => {
                is_booking_tenant || is_owner_landlord || is_admin
            }
            (from, to) => {
                return Err(ServiceError::InvalidTransition { from, to });
            }
        };

        if !permitted {
            return Err(ServiceError::UnauthorizedBookingAccess(
                acting_user.id,
                booking.id,
            ));
        }

        let updated = self
            .store
            .update_booking_status(booking.id, booking.status, new_status)
            .await?;

        tracing::info!(
            "booking {} moved from {:?} to {:?} by user {}",
            booking.id,
            booking.status,
            new_status,
            acting_user.id
        );

        Ok(updated)
    }

    /// Creates a review for a room. Requires a completed stay by the same
    /// user; at most one review per (user, room).
    pub async fn create_review(
        &self,
        user_id: Uuid,
        review_data: CreateReviewDto,
    ) -> Result<Review, ServiceError> {
        let room = self
            .store
            .get_room(review_data.room_id)
            .await?
            .ok_or(ServiceError::RoomNotFound(review_data.room_id))?;

        if !self.store.has_completed_booking(user_id, room.id).await? {
            return Err(ServiceError::ReviewNotAllowed);
        }

        if self.store.find_review(user_id, room.id).await?.is_some() {
            return Err(ServiceError::DuplicateReview);
        }

        // The unique index on (user_id, room_id) backstops the read above.
        let review = self.store.insert_review(user_id, &review_data).await?;

        Ok(review)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::Utc;
    use tokio::sync::Mutex;

    use super::*;

    /// In-memory store. `insert_booking` re-checks the overlap invariant
    /// inside its lock, mirroring the exclusion constraint the Postgres
    /// store relies on.
    #[derive(Default)]
    struct InMemoryStore {
        rooms: Mutex<HashMap<Uuid, Room>>,
        bookings: Mutex<Vec<Booking>>,
        reviews: Mutex<Vec<Review>>,
    }

    #[async_trait]
    impl BookingStore for InMemoryStore {
        async fn get_room(&self, room_id: Uuid) -> Result<Option<Room>, ServiceError> {
            Ok(self.rooms.lock().await.get(&room_id).cloned())
        }

        async fn find_overlapping(
            &self,
            room_id: Uuid,
            check_in: NaiveDate,
            check_out: NaiveDate,
            statuses: &[BookingStatus],
        ) -> Result<Vec<Booking>, ServiceError> {
            let bookings = self.bookings.lock().await;
            Ok(bookings
                .iter()
                .filter(|b| {
                    b.room_id == room_id
                        && statuses.contains(&b.status)
                        && b.overlaps(check_in, check_out)
                })
                .cloned()
                .collect())
        }

        async fn insert_booking(&self, booking: NewBooking) -> Result<Booking, ServiceError> {
            let mut bookings = self.bookings.lock().await;

            let conflict = bookings.iter().any(|b| {
                b.room_id == booking.room_id
                    && BookingStatus::ACTIVE.contains(&b.status)
                    && b.overlaps(booking.check_in, booking.check_out)
            });
            if conflict {
                return Err(ServiceError::DateConflict);
            }

            let row = Booking {
                id: Uuid::new_v4(),
                room_id: booking.room_id,
                tenant_id: booking.tenant_id,
                check_in: booking.check_in,
                check_out: booking.check_out,
                guests: booking.guests,
                status: BookingStatus::Pending,
                total_price: booking.total_price,
                notes: booking.notes,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            };
            bookings.push(row.clone());
            Ok(row)
        }

        async fn get_booking(&self, booking_id: Uuid) -> Result<Option<Booking>, ServiceError> {
            let bookings = self.bookings.lock().await;
            Ok(bookings.iter().find(|b| b.id == booking_id).cloned())
        }

        async fn update_booking_status(
            &self,
            booking_id: Uuid,
            from: BookingStatus,
            to: BookingStatus,
        ) -> Result<Booking, ServiceError> {
            let mut bookings = self.bookings.lock().await;
            let booking = bookings
                .iter_mut()
                .find(|b| b.id == booking_id)
                .ok_or(ServiceError::BookingNotFound(booking_id))?;
            if booking.status != from {
                return Err(ServiceError::InvalidTransition { from, to });
            }
            booking.status = to;
            booking.updated_at = Utc::now();
            Ok(booking.clone())
        }

        async fn has_completed_booking(
            &self,
            user_id: Uuid,
            room_id: Uuid,
        ) -> Result<bool, ServiceError> {
            let bookings = self.bookings.lock().await;
            Ok(bookings.iter().any(|b| {
                b.tenant_id == user_id
                    && b.room_id == room_id
                    && b.status == BookingStatus::Completed
            }))
        }

        async fn find_review(
            &self,
            user_id: Uuid,
            room_id: Uuid,
        ) -> Result<Option<Review>, ServiceError> {
            let reviews = self.reviews.lock().await;
            Ok(reviews
                .iter()
                .find(|r| r.user_id == user_id && r.room_id == room_id)
                .cloned())
        }

        async fn insert_review(
            &self,
            user_id: Uuid,
            review: &CreateReviewDto,
        ) -> Result<Review, ServiceError> {
            let mut reviews = self.reviews.lock().await;
            if reviews
                .iter()
                .any(|r| r.user_id == user_id && r.room_id == review.room_id)
            {
                return Err(ServiceError::DuplicateReview);
            }
            let row = Review {
                id: Uuid::new_v4(),
                room_id: review.room_id,
                user_id,
                rating: review.rating,
                comment: review.comment.clone(),
                created_at: Utc::now(),
            };
            reviews.push(row.clone());
            Ok(row)
        }
    }

    fn test_user(role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Test User".to_string(),
            email: format!("{}@example.com", Uuid::new_v4()),
            password: "hashed".to_string(),
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn test_room(landlord_id: Uuid, price: i64, max_guests: i32, status: RoomStatus) -> Room {
        Room {
            id: Uuid::new_v4(),
            landlord_id,
            title: "Sunny room near the park".to_string(),
            description: "A bright room with a view over the park".to_string(),
            address: "12 Elm Street".to_string(),
            city: "Lagos".to_string(),
            price,
            max_guests,
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    async fn setup(room: Room) -> (Arc<BookingService>, Arc<InMemoryStore>, Room) {
        let store = Arc::new(InMemoryStore::default());
        store.rooms.lock().await.insert(room.id, room.clone());
        let service = Arc::new(BookingService::new(store.clone()));
        (service, store, room)
    }

    fn booking_request(room_id: Uuid, check_in: &str, check_out: &str, guests: i32) -> CreateBookingDto {
        CreateBookingDto {
            room_id,
            check_in: check_in.parse().unwrap(),
            check_out: check_out.parse().unwrap(),
            guests,
            notes: None,
        }
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn price_for_a_180_day_stay() {
        let total = booking_price(6000, date("2024-09-01"), date("2025-02-28"));
        assert_eq!(total, 6000 * 180);
        assert_eq!(total, 1_080_000);
    }

    #[test]
    fn price_is_deterministic() {
        let first = booking_price(7500, date("2024-03-10"), date("2024-04-02"));
        let second = booking_price(7500, date("2024-03-10"), date("2024-04-02"));
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn booking_a_valid_window_succeeds() {
        let landlord = test_user(UserRole::Landlord);
        let (service, _, room) = setup(test_room(landlord.id, 6000, 2, RoomStatus::Available)).await;

        let tenant_id = Uuid::new_v4();
        let booking = service
            .create_booking(tenant_id, booking_request(room.id, "2024-09-01", "2025-02-28", 2))
            .await
            .unwrap();

        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.total_price, 1_080_000);
        assert_eq!(booking.tenant_id, tenant_id);
    }

    #[tokio::test]
    async fn unknown_room_is_rejected() {
        let landlord = test_user(UserRole::Landlord);
        let (service, _, _) = setup(test_room(landlord.id, 6000, 2, RoomStatus::Available)).await;

        let missing = Uuid::new_v4();
        let err = service
            .create_booking(Uuid::new_v4(), booking_request(missing, "2024-06-01", "2024-06-05", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::RoomNotFound(id) if id == missing));
    }

    #[tokio::test]
    async fn room_under_maintenance_is_rejected() {
        let landlord = test_user(UserRole::Landlord);
        let (service, _, room) =
            setup(test_room(landlord.id, 6000, 2, RoomStatus::Maintenance)).await;

        let err = service
            .create_booking(Uuid::new_v4(), booking_request(room.id, "2024-06-01", "2024-06-05", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::RoomUnavailable(_)));
    }

    #[tokio::test]
    async fn guest_limit_is_enforced() {
        let landlord = test_user(UserRole::Landlord);
        let (service, _, room) = setup(test_room(landlord.id, 6000, 2, RoomStatus::Available)).await;

        let err = service
            .create_booking(Uuid::new_v4(), booking_request(room.id, "2024-06-01", "2024-06-05", 3))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::GuestLimitExceeded { limit: 2 }));

        // Exactly at the limit is fine.
        let booking = service
            .create_booking(Uuid::new_v4(), booking_request(room.id, "2024-06-01", "2024-06-05", 2))
            .await
            .unwrap();
        assert_eq!(booking.guests, 2);
    }

    #[tokio::test]
    async fn inverted_or_empty_date_range_is_rejected() {
        let landlord = test_user(UserRole::Landlord);
        let (service, _, room) = setup(test_room(landlord.id, 6000, 2, RoomStatus::Available)).await;

        let err = service
            .create_booking(Uuid::new_v4(), booking_request(room.id, "2024-06-05", "2024-06-05", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidDateRange));

        let err = service
            .create_booking(Uuid::new_v4(), booking_request(room.id, "2024-06-10", "2024-06-05", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidDateRange));
    }

    #[tokio::test]
    async fn boundary_touching_booking_conflicts() {
        let landlord = test_user(UserRole::Landlord);
        let (service, _, room) = setup(test_room(landlord.id, 6000, 4, RoomStatus::Available)).await;

        let tenant = test_user(UserRole::Tenant);
        let first = service
            .create_booking(tenant.id, booking_request(room.id, "2024-06-01", "2024-11-30", 1))
            .await
            .unwrap();
        service
            .transition(first.id, BookingStatus::Confirmed, &test_user_with_id(landlord.id))
            .await
            .unwrap();

        // New stay starting on the old check-out day is still a conflict.
        let err = service
            .create_booking(Uuid::new_v4(), booking_request(room.id, "2024-11-30", "2024-12-15", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::DateConflict));
    }

    #[tokio::test]
    async fn cancelled_booking_does_not_block() {
        let landlord = test_user(UserRole::Landlord);
        let (service, _, room) = setup(test_room(landlord.id, 6000, 4, RoomStatus::Available)).await;

        let tenant = test_user(UserRole::Tenant);
        let first = service
            .create_booking(tenant.id, booking_request(room.id, "2024-06-01", "2024-11-30", 1))
            .await
            .unwrap();
        service
            .transition(first.id, BookingStatus::Cancelled, &tenant)
            .await
            .unwrap();

        // Identical interval is free again once the old booking is cancelled.
        let booking = service
            .create_booking(Uuid::new_v4(), booking_request(room.id, "2024-06-01", "2024-11-30", 1))
            .await
            .unwrap();
        assert_eq!(booking.status, BookingStatus::Pending);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_overlapping_requests_admit_exactly_one() {
        let landlord = test_user(UserRole::Landlord);
        let (service, _, room) = setup(test_room(landlord.id, 6000, 4, RoomStatus::Available)).await;

        let svc1 = service.clone();
        let svc2 = service.clone();
        let room_id = room.id;

        let first = tokio::spawn(async move {
            svc1.create_booking(
                Uuid::new_v4(),
                booking_request(room_id, "2024-07-01", "2024-07-10", 1),
            )
            .await
        });
        let second = tokio::spawn(async move {
            svc2.create_booking(
                Uuid::new_v4(),
                booking_request(room_id, "2024-07-05", "2024-07-15", 1),
            )
            .await
        });

        let results = [first.await.unwrap(), second.await.unwrap()];
        let winners = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(winners, 1);

        let loser = results.into_iter().find(|r| r.is_err()).unwrap();
        assert!(matches!(loser.unwrap_err(), ServiceError::DateConflict));
    }

    /// Store that can serve a pinned stale snapshot from `get_booking`,
    /// standing in for a read that lost a race with another writer.
    struct StaleReadStore {
        inner: InMemoryStore,
        stale_booking: Mutex<Option<Booking>>,
    }

    #[async_trait]
    impl BookingStore for StaleReadStore {
        async fn get_room(&self, room_id: Uuid) -> Result<Option<Room>, ServiceError> {
            self.inner.get_room(room_id).await
        }

        async fn find_overlapping(
            &self,
            room_id: Uuid,
            check_in: NaiveDate,
            check_out: NaiveDate,
            statuses: &[BookingStatus],
        ) -> Result<Vec<Booking>, ServiceError> {
            self.inner
                .find_overlapping(room_id, check_in, check_out, statuses)
                .await
        }

        async fn insert_booking(&self, booking: NewBooking) -> Result<Booking, ServiceError> {
            self.inner.insert_booking(booking).await
        }

        async fn get_booking(&self, booking_id: Uuid) -> Result<Option<Booking>, ServiceError> {
            if let Some(stale) = self.stale_booking.lock().await.clone() {
                if stale.id == booking_id {
                    return Ok(Some(stale));
                }
            }
            self.inner.get_booking(booking_id).await
        }

        async fn update_booking_status(
            &self,
            booking_id: Uuid,
            from: BookingStatus,
            to: BookingStatus,
        ) -> Result<Booking, ServiceError> {
            self.inner.update_booking_status(booking_id, from, to).await
        }

        async fn has_completed_booking(
            &self,
            user_id: Uuid,
            room_id: Uuid,
        ) -> Result<bool, ServiceError> {
            self.inner.has_completed_booking(user_id, room_id).await
        }

        async fn find_review(
            &self,
            user_id: Uuid,
            room_id: Uuid,
        ) -> Result<Option<Review>, ServiceError> {
            self.inner.find_review(user_id, room_id).await
        }

        async fn insert_review(
            &self,
            user_id: Uuid,
            review: &CreateReviewDto,
        ) -> Result<Review, ServiceError> {
            self.inner.insert_review(user_id, review).await
        }
    }

    #[tokio::test]
    async fn confirm_built_on_a_stale_read_cannot_resurrect_a_cancelled_booking() {
        let landlord = test_user(UserRole::Landlord);
        let room = test_room(landlord.id, 6000, 2, RoomStatus::Available);
        let store = Arc::new(StaleReadStore {
            inner: InMemoryStore::default(),
            stale_booking: Mutex::new(None),
        });
        store.inner.rooms.lock().await.insert(room.id, room.clone());
        let service = BookingService::new(store.clone());
        let landlord = test_user_with_id(landlord.id);

        let tenant = test_user(UserRole::Tenant);
        let booking = service
            .create_booking(tenant.id, booking_request(room.id, "2024-06-01", "2024-06-05", 1))
            .await
            .unwrap();

        // Pin the PENDING snapshot, then let a cancel land first.
        *store.stale_booking.lock().await = Some(booking.clone());
        service
            .transition(booking.id, BookingStatus::Cancelled, &tenant)
            .await
            .unwrap();

        // The confirm validates against the stale PENDING row; the store's
        // compare-and-set must reject it instead of overwriting CANCELLED.
        let err = service
            .transition(booking.id, BookingStatus::Confirmed, &landlord)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTransition { .. }));

        let current = store
            .inner
            .get_booking(booking.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(current.status, BookingStatus::Cancelled);
    }

    fn test_user_with_id(id: Uuid) -> User {
        let mut user = test_user(UserRole::Landlord);
        user.id = id;
        user
    }

    #[tokio::test]
    async fn landlord_confirms_and_completes_a_booking() {
        let landlord = test_user(UserRole::Landlord);
        let (service, _, room) = setup(test_room(landlord.id, 6000, 2, RoomStatus::Available)).await;
        let landlord = test_user_with_id(landlord.id);

        let tenant = test_user(UserRole::Tenant);
        let booking = service
            .create_booking(tenant.id, booking_request(room.id, "2024-06-01", "2024-06-05", 1))
            .await
            .unwrap();

        let confirmed = service
            .transition(booking.id, BookingStatus::Confirmed, &landlord)
            .await
            .unwrap();
        assert_eq!(confirmed.status, BookingStatus::Confirmed);

        let completed = service
            .transition(booking.id, BookingStatus::Completed, &landlord)
            .await
            .unwrap();
        assert_eq!(completed.status, BookingStatus::Completed);
    }

    #[tokio::test]
    async fn tenant_cannot_confirm_their_own_booking() {
        let landlord = test_user(UserRole::Landlord);
        let (service, _, room) = setup(test_room(landlord.id, 6000, 2, RoomStatus::Available)).await;

        let tenant = test_user(UserRole::Tenant);
        let booking = service
            .create_booking(tenant.id, booking_request(room.id, "2024-06-01", "2024-06-05", 1))
            .await
            .unwrap();

        let err = service
            .transition(booking.id, BookingStatus::Confirmed, &tenant)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::UnauthorizedBookingAccess(_, _)));
    }

    #[tokio::test]
    async fn stranger_cannot_cancel_a_booking() {
        let landlord = test_user(UserRole::Landlord);
        let (service, _, room) = setup(test_room(landlord.id, 6000, 2, RoomStatus::Available)).await;

        let tenant = test_user(UserRole::Tenant);
        let booking = service
            .create_booking(tenant.id, booking_request(room.id, "2024-06-01", "2024-06-05", 1))
            .await
            .unwrap();

        let stranger = test_user(UserRole::Tenant);
        let err = service
            .transition(booking.id, BookingStatus::Cancelled, &stranger)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::UnauthorizedBookingAccess(_, _)));
    }

    #[tokio::test]
    async fn pending_booking_cannot_jump_to_completed() {
        let landlord = test_user(UserRole::Landlord);
        let (service, _, room) = setup(test_room(landlord.id, 6000, 2, RoomStatus::Available)).await;
        let landlord = test_user_with_id(landlord.id);

        let booking = service
            .create_booking(Uuid::new_v4(), booking_request(room.id, "2024-06-01", "2024-06-05", 1))
            .await
            .unwrap();

        let err = service
            .transition(booking.id, BookingStatus::Completed, &landlord)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn terminal_states_admit_no_transition() {
        let landlord = test_user(UserRole::Landlord);
        let (service, _, room) = setup(test_room(landlord.id, 6000, 2, RoomStatus::Available)).await;
        let landlord = test_user_with_id(landlord.id);

        let tenant = test_user(UserRole::Tenant);
        let booking = service
            .create_booking(tenant.id, booking_request(room.id, "2024-06-01", "2024-06-05", 1))
            .await
            .unwrap();
        service
            .transition(booking.id, BookingStatus::Cancelled, &tenant)
            .await
            .unwrap();

        for target in [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::Completed,
            BookingStatus::Cancelled,
        ] {
            let err = service
                .transition(booking.id, target, &landlord)
                .await
                .unwrap_err();
            assert!(matches!(err, ServiceError::InvalidTransition { .. }));
        }
    }

    #[tokio::test]
    async fn review_requires_a_completed_stay() {
        let landlord = test_user(UserRole::Landlord);
        let (service, _, room) = setup(test_room(landlord.id, 6000, 2, RoomStatus::Available)).await;
        let landlord = test_user_with_id(landlord.id);

        let tenant = test_user(UserRole::Tenant);
        let booking = service
            .create_booking(tenant.id, booking_request(room.id, "2024-06-01", "2024-06-05", 1))
            .await
            .unwrap();

        let review = CreateReviewDto {
            room_id: room.id,
            rating: 5,
            comment: "Lovely place".to_string(),
        };

        // Only a PENDING booking: no review yet.
        let err = service
            .create_review(tenant.id, review.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::ReviewNotAllowed));

        service
            .transition(booking.id, BookingStatus::Confirmed, &landlord)
            .await
            .unwrap();
        service
            .transition(booking.id, BookingStatus::Completed, &landlord)
            .await
            .unwrap();

        let created = service.create_review(tenant.id, review.clone()).await.unwrap();
        assert_eq!(created.rating, 5);

        // Second attempt for the same (user, room) pair is a duplicate.
        let err = service
            .create_review(tenant.id, review)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateReview));
    }
}
