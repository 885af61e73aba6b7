use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use axum::http::StatusCode;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{bookingdb::BookingExt, roomdb::RoomExt},
    dtos::{
        bookingdtos::{BookingFilterDto, CreateBookingDto},
        userdtos::RequestQueryDto,
    },
    error::{ErrorMessage, HttpError},
    middleware::{role_check, JWTAuthMiddleware},
    models::{bookingmodel::BookingStatus, usermodel::UserRole},
    service::booking_service::BookingStore,
    AppState,
};

pub fn booking_handler() -> Router {
    Router::new()
        .route(
            "/",
            post(create_booking).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Tenant])
            })),
        )
        .route("/my", get(get_my_bookings))
        .route(
            "/room/:room_id",
            get(get_room_bookings).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Landlord, UserRole::Admin])
            })),
        )
        .route("/:booking_id", get(get_booking_by_id))
        .route("/:booking_id/confirm", put(confirm_booking))
        .route("/:booking_id/cancel", put(cancel_booking))
        .route("/:booking_id/complete", put(complete_booking))
}

pub async fn create_booking(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
    Json(body): Json<CreateBookingDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let booking = app_state
        .booking_service
        .create_booking(user.user.id, body)
        .await
        .map_err(HttpError::from)?;

    let filtered_booking = BookingFilterDto::from_booking(&booking);

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "status": "success",
            "message": "Booking placed and awaiting confirmation",
            "data": {
                "booking": filtered_booking
            }
        })),
    ))
}

pub async fn get_my_bookings(
    Query(query_params): Query<RequestQueryDto>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    query_params
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query_params.page.unwrap_or(1) as u32;
    let limit = query_params.limit.unwrap_or(10);

    let bookings = app_state
        .db_client
        .get_bookings_by_tenant(user.user.id, page, limit)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let filtered_bookings: Vec<BookingFilterDto> =
        bookings.iter().map(BookingFilterDto::from_booking).collect();

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "bookings": filtered_bookings,
            "pagination": {
                "page": page,
                "limit": limit,
                "count": filtered_bookings.len()
            }
        }
    })))
}

pub async fn get_room_bookings(
    Path(room_id): Path<Uuid>,
    Query(query_params): Query<RequestQueryDto>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    query_params
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let room = app_state
        .db_client
        .get_room_by_id(room_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found(format!("Room {} not found", room_id)))?;

    if user.user.role != UserRole::Admin && room.landlord_id != user.user.id {
        return Err(HttpError::forbidden(
            ErrorMessage::PermissionDenied.to_string(),
        ));
    }

    let page = query_params.page.unwrap_or(1) as u32;
    let limit = query_params.limit.unwrap_or(10);

    let bookings = app_state
        .db_client
        .get_bookings_by_room(room_id, page, limit)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let filtered_bookings: Vec<BookingFilterDto> =
        bookings.iter().map(BookingFilterDto::from_booking).collect();

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "bookings": filtered_bookings,
            "pagination": {
                "page": page,
                "limit": limit,
                "count": filtered_bookings.len()
            }
        }
    })))
}

pub async fn get_booking_by_id(
    Path(booking_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let booking = app_state
        .db_client
        .get_booking(booking_id)
        .await
        .map_err(HttpError::from)?
        .ok_or_else(|| HttpError::not_found(format!("Booking {} not found", booking_id)))?;

    let room = app_state
        .db_client
        .get_room_by_id(booking.room_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::server_error("Room not found".to_string()))?;

    let is_tenant = booking.tenant_id == user.user.id;
    let is_landlord = room.landlord_id == user.user.id;
    if !is_tenant && !is_landlord && user.user.role != UserRole::Admin {
        return Err(HttpError::forbidden(
            ErrorMessage::PermissionDenied.to_string(),
        ));
    }

    let filtered_booking = BookingFilterDto::from_booking(&booking);

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "booking": filtered_booking
        }
    })))
}

pub async fn confirm_booking(
    Path(booking_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    transition_booking(&app_state, booking_id, BookingStatus::Confirmed, &user).await
}

pub async fn cancel_booking(
    Path(booking_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    transition_booking(&app_state, booking_id, BookingStatus::Cancelled, &user).await
}

pub async fn complete_booking(
    Path(booking_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    transition_booking(&app_state, booking_id, BookingStatus::Completed, &user).await
}

async fn transition_booking(
    app_state: &AppState,
    booking_id: Uuid,
    new_status: BookingStatus,
    user: &JWTAuthMiddleware,
) -> Result<axum::response::Response, HttpError> {
    let booking = app_state
        .booking_service
        .transition(booking_id, new_status, &user.user)
        .await
        .map_err(HttpError::from)?;

    let filtered_booking = BookingFilterDto::from_booking(&booking);

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": format!("Booking is now {}", booking.status.to_str()),
        "data": {
            "booking": filtered_booking
        }
    }))
    .into_response())
}
