use axum::http::StatusCode;
use thiserror::Error;
use uuid::Uuid;

use crate::{error::HttpError, models::bookingmodel::BookingStatus};

/// Postgres error code raised by the bookings exclusion constraint.
const EXCLUSION_VIOLATION: &str = "23P01";
/// Postgres error code raised by unique constraints.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Room {0} not found")]
    RoomNotFound(Uuid),

    #[error("Booking {0} not found")]
    BookingNotFound(Uuid),

    #[error("Room {0} is not available for booking")]
    RoomUnavailable(Uuid),

    #[error("Number of guests exceeds the room limit of {limit}")]
    GuestLimitExceeded { limit: i32 },

    #[error("Check-out date must be after check-in date")]
    InvalidDateRange,

    #[error("Room is already booked for the requested dates")]
    DateConflict,

    #[error("User {0} is not allowed to perform this action on booking {1}")]
    UnauthorizedBookingAccess(Uuid, Uuid),

    #[error("Booking cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("A review requires a completed stay in this room")]
    ReviewNotAllowed,

    #[error("You have already reviewed this room")]
    DuplicateReview,

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        // Race losers hit the storage constraints rather than the
        // read-side checks; translate them to the matching error kind.
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.code().as_deref() {
                Some(EXCLUSION_VIOLATION) => return ServiceError::DateConflict,
                Some(UNIQUE_VIOLATION) if db_err.constraint() == Some("reviews_user_room_key") => {
                    return ServiceError::DuplicateReview
                }
                _ => {}
            }
        }
        ServiceError::Database(err)
    }
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::RoomNotFound(_) | ServiceError::BookingNotFound(_) => {
                StatusCode::NOT_FOUND
            }

            ServiceError::RoomUnavailable(_)
            | ServiceError::GuestLimitExceeded { .. }
            | ServiceError::InvalidDateRange
            | ServiceError::InvalidTransition { .. }
            | ServiceError::ReviewNotAllowed => StatusCode::BAD_REQUEST,

            ServiceError::DateConflict | ServiceError::DuplicateReview => StatusCode::CONFLICT,

            ServiceError::UnauthorizedBookingAccess(_, _) => StatusCode::FORBIDDEN,

            ServiceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        let status = error.status_code();
        HttpError::new(error.to_string(), status)
    }
}
