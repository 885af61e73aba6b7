use std::sync::Arc;

use axum::{
    middleware, response::IntoResponse, routing::get, Extension, Json, Router,
};

use crate::{
    db::{bookingdb::BookingExt, reviewdb::ReviewExt, roomdb::RoomExt, userdb::UserExt},
    error::HttpError,
    middleware::{role_check, JWTAuthMiddleware},
    models::{bookingmodel::BookingStatus, usermodel::UserRole},
    AppState,
};

pub fn dashboard_handler() -> Router {
    Router::new()
        .route(
            "/tenant",
            get(tenant_dashboard).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Tenant])
            })),
        )
        .route(
            "/landlord",
            get(landlord_dashboard).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Landlord])
            })),
        )
        .route(
            "/admin",
            get(admin_dashboard).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Admin])
            })),
        )
}

pub async fn tenant_dashboard(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let tenant_id = user.user.id;
    let db = &app_state.db_client;

    let total = db
        .count_bookings_by_tenant(tenant_id, None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;
    let pending = db
        .count_bookings_by_tenant(tenant_id, Some(BookingStatus::Pending))
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;
    let confirmed = db
        .count_bookings_by_tenant(tenant_id, Some(BookingStatus::Confirmed))
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;
    let completed = db
        .count_bookings_by_tenant(tenant_id, Some(BookingStatus::Completed))
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;
    let total_spent = db
        .total_spent_by_tenant(tenant_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "bookings": {
                "total": total,
                "pending": pending,
                "confirmed": confirmed,
                "completed": completed
            },
            "total_spent": total_spent
        }
    })))
}

pub async fn landlord_dashboard(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let landlord_id = user.user.id;
    let db = &app_state.db_client;

    let rooms = db
        .count_rooms_by_landlord(landlord_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;
    let total = db
        .count_bookings_by_landlord(landlord_id, None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;
    let pending = db
        .count_bookings_by_landlord(landlord_id, Some(BookingStatus::Pending))
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;
    let confirmed = db
        .count_bookings_by_landlord(landlord_id, Some(BookingStatus::Confirmed))
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;
    let total_earned = db
        .total_earned_by_landlord(landlord_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "rooms": rooms,
            "bookings": {
                "total": total,
                "pending": pending,
                "confirmed": confirmed
            },
            "total_earned": total_earned
        }
    })))
}

pub async fn admin_dashboard(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let db = &app_state.db_client;

    let users = db
        .count_users(None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;
    let tenants = db
        .count_users(Some(UserRole::Tenant))
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;
    let landlords = db
        .count_users(Some(UserRole::Landlord))
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;
    let rooms = db
        .count_rooms()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;
    let bookings = db
        .count_bookings(None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;
    let active_bookings = db
        .count_bookings(Some(BookingStatus::Confirmed))
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;
    let reviews = db
        .count_reviews()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "users": {
                "total": users,
                "tenants": tenants,
                "landlords": landlords
            },
            "rooms": rooms,
            "bookings": {
                "total": bookings,
                "confirmed": active_bookings
            },
            "reviews": reviews
        }
    })))
}
