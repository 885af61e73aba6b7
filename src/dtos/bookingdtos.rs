use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::bookingmodel::Booking;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBookingDto {
    pub room_id: Uuid,

    pub check_in: NaiveDate,
    pub check_out: NaiveDate,

    #[validate(range(min = 1, message = "At least one guest is required"))]
    pub guests: i32,

    #[validate(length(max = 1000, message = "Notes must not exceed 1000 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BookingFilterDto {
    pub id: Uuid,
    pub room_id: Uuid,
    pub tenant_id: Uuid,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: i32,
    pub status: String,
    pub total_price: i64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl BookingFilterDto {
    pub fn from_booking(booking: &Booking) -> Self {
        Self {
            id: booking.id,
            room_id: booking.room_id,
            tenant_id: booking.tenant_id,
            check_in: booking.check_in,
            check_out: booking.check_out,
            guests: booking.guests,
            status: booking.status.to_str().to_string(),
            total_price: booking.total_price,
            notes: booking.notes.clone(),
            created_at: booking.created_at,
        }
    }
}
