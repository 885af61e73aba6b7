use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::reviewmodel::Review;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateReviewDto {
    pub room_id: Uuid,

    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,

    #[validate(length(min = 1, max = 2000, message = "Comment must be between 1 and 2000 characters"))]
    pub comment: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewFilterDto {
    pub id: Uuid,
    pub room_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl ReviewFilterDto {
    pub fn from_review(review: &Review) -> Self {
        Self {
            id: review.id,
            room_id: review.room_id,
            user_id: review.user_id,
            rating: review.rating,
            comment: review.comment.clone(),
            created_at: review.created_at,
        }
    }
}
