use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::roommodel::{Room, RoomStatus};

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateRoomDto {
    #[validate(length(min = 5, max = 200, message = "Title must be between 5 and 200 characters"))]
    pub title: String,

    #[validate(length(
        min = 20,
        max = 2000,
        message = "Description must be between 20 and 2000 characters"
    ))]
    pub description: String,

    #[validate(length(min = 5, max = 500, message = "Address must be between 5 and 500 characters"))]
    pub address: String,

    #[validate(length(min = 2, max = 100, message = "City is required"))]
    pub city: String,

    #[validate(range(min = 1, message = "Price must be a positive amount"))]
    pub price: i64,

    #[validate(range(min = 1, message = "Room must host at least one guest"))]
    pub max_guests: i32,
}

#[derive(Debug, Serialize, Deserialize, Validate, Default)]
pub struct UpdateRoomDto {
    #[validate(length(min = 5, max = 200, message = "Title must be between 5 and 200 characters"))]
    pub title: Option<String>,

    #[validate(length(
        min = 20,
        max = 2000,
        message = "Description must be between 20 and 2000 characters"
    ))]
    pub description: Option<String>,

    #[validate(length(min = 5, max = 500, message = "Address must be between 5 and 500 characters"))]
    pub address: Option<String>,

    #[validate(length(min = 2, max = 100, message = "City is required"))]
    pub city: Option<String>,

    /// Only affects future bookings; existing bookings keep their
    /// snapshotted total_price.
    #[validate(range(min = 1, message = "Price must be a positive amount"))]
    pub price: Option<i64>,

    #[validate(range(min = 1, message = "Room must host at least one guest"))]
    pub max_guests: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateRoomStatusDto {
    pub status: RoomStatus,
}

#[derive(Serialize, Deserialize, Validate)]
pub struct RoomSearchQueryDto {
    pub city: Option<String>,
    #[validate(range(min = 1))]
    pub min_price: Option<i64>,
    #[validate(range(min = 1))]
    pub max_price: Option<i64>,
    #[validate(range(min = 1))]
    pub guests: Option<i32>,
    #[validate(range(min = 1))]
    pub page: Option<usize>,
    #[validate(range(min = 1, max = 50))]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RoomFilterDto {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub address: String,
    pub city: String,
    pub price: i64,
    pub max_guests: i32,
    pub status: String,
    pub landlord_name: String,
    pub created_at: DateTime<Utc>,
}

impl RoomFilterDto {
    pub fn from_room(room: &Room, landlord_name: String) -> Self {
        Self {
            id: room.id,
            title: room.title.clone(),
            description: room.description.clone(),
            address: room.address.clone(),
            city: room.city.clone(),
            price: room.price,
            max_guests: room.max_guests,
            status: room.status.to_str().to_string(),
            landlord_name,
            created_at: room.created_at,
        }
    }
}
