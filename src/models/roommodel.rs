use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "room_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Available,
    Occupied,
    Maintenance,
}

impl RoomStatus {
    pub fn to_str(&self) -> &str {
        match self {
            RoomStatus::Available => "available",
            RoomStatus::Occupied => "occupied",
            RoomStatus::Maintenance => "maintenance",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Room {
    pub id: Uuid,
    pub landlord_id: Uuid,

    pub title: String,
    pub description: String,

    pub address: String,
    pub city: String,

    /// Price per day, in the smallest currency unit.
    pub price: i64,
    pub max_guests: i32,

    pub status: RoomStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
