use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "booking_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    /// Statuses that still occupy the calendar.
    pub const ACTIVE: [BookingStatus; 2] = [BookingStatus::Pending, BookingStatus::Confirmed];

    pub fn to_str(&self) -> &str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Cancelled | BookingStatus::Completed)
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub id: Uuid,
    pub room_id: Uuid,
    pub tenant_id: Uuid,

    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: i32,

    pub status: BookingStatus,

    /// Snapshot taken at creation time; never recalculated afterwards,
    /// even if the room price changes.
    pub total_price: i64,
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Inclusive-bound overlap test: a booking ending on day D conflicts
    /// with one starting on day D. Back-to-back stays sharing a boundary
    /// date are deliberately treated as a conflict.
    pub fn overlaps(&self, check_in: NaiveDate, check_out: NaiveDate) -> bool {
        self.check_in <= check_out && self.check_out >= check_in
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking(check_in: &str, check_out: &str) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            room_id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            check_in: check_in.parse().unwrap(),
            check_out: check_out.parse().unwrap(),
            guests: 1,
            status: BookingStatus::Pending,
            total_price: 0,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn overlapping_intervals_conflict() {
        let existing = booking("2024-06-01", "2024-06-10");
        assert!(existing.overlaps("2024-06-05".parse().unwrap(), "2024-06-15".parse().unwrap()));
        assert!(existing.overlaps("2024-05-20".parse().unwrap(), "2024-06-02".parse().unwrap()));
    }

    #[test]
    fn boundary_touching_counts_as_conflict() {
        let existing = booking("2024-06-01", "2024-11-30");
        assert!(existing.overlaps("2024-11-30".parse().unwrap(), "2024-12-15".parse().unwrap()));
        assert!(existing.overlaps("2024-05-01".parse().unwrap(), "2024-06-01".parse().unwrap()));
    }

    #[test]
    fn disjoint_intervals_do_not_conflict() {
        let existing = booking("2024-06-01", "2024-06-10");
        assert!(!existing.overlaps("2024-06-11".parse().unwrap(), "2024-06-20".parse().unwrap()));
        assert!(!existing.overlaps("2024-05-01".parse().unwrap(), "2024-05-31".parse().unwrap()));
    }

    #[test]
    fn terminal_statuses() {
        assert!(BookingStatus::Cancelled.is_terminal());
        assert!(BookingStatus::Completed.is_terminal());
        assert!(!BookingStatus::Pending.is_terminal());
        assert!(!BookingStatus::Confirmed.is_terminal());
    }
}
