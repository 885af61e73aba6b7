use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::post,
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::reviewdb::ReviewExt,
    dtos::{
        reviewdtos::{CreateReviewDto, ReviewFilterDto},
        userdtos::RequestQueryDto,
    },
    error::HttpError,
    middleware::{role_check, JWTAuthMiddleware},
    models::usermodel::UserRole,
    AppState,
};

pub fn review_handler() -> Router {
    Router::new().route(
        "/",
        post(create_review).layer(middleware::from_fn(|state, req, next| {
            role_check(state, req, next, vec![UserRole::Tenant])
        })),
    )
}

pub async fn create_review(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
    Json(body): Json<CreateReviewDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let review = app_state
        .booking_service
        .create_review(user.user.id, body)
        .await
        .map_err(HttpError::from)?;

    let filtered_review = ReviewFilterDto::from_review(&review);

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "status": "success",
            "message": "Review submitted",
            "data": {
                "review": filtered_review
            }
        })),
    ))
}

/// Registered under the public rooms router as `/:room_id/reviews`.
pub async fn get_room_reviews(
    Path(room_id): Path<Uuid>,
    Query(query_params): Query<RequestQueryDto>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    query_params
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query_params.page.unwrap_or(1) as u32;
    let limit = query_params.limit.unwrap_or(10);

    let reviews = app_state
        .db_client
        .get_reviews_by_room(room_id, page, limit)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let filtered_reviews: Vec<ReviewFilterDto> =
        reviews.iter().map(ReviewFilterDto::from_review).collect();

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "reviews": filtered_reviews,
            "pagination": {
                "page": page,
                "limit": limit,
                "count": filtered_reviews.len()
            }
        }
    })))
}
