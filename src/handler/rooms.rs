use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{
        roomdb::{RoomExt, RoomSearchFilters},
        userdb::UserExt,
    },
    dtos::{
        roomdtos::{
            CreateRoomDto, RoomFilterDto, RoomSearchQueryDto, UpdateRoomDto, UpdateRoomStatusDto,
        },
        userdtos::RequestQueryDto,
    },
    error::{ErrorMessage, HttpError},
    handler::reviews::get_room_reviews,
    middleware::{auth, role_check, JWTAuthMiddleware},
    models::usermodel::{User, UserRole},
    AppState,
};

/// Room routes. Browsing is open to unauthenticated visitors; management
/// routes carry their own auth and role layers so the two can share paths.
pub fn room_handler() -> Router {
    Router::new()
        .route(
            "/",
            get(search_rooms).merge(
                post(create_room)
                    .layer(middleware::from_fn(|state, req, next| {
                        role_check(state, req, next, vec![UserRole::Landlord])
                    }))
                    .layer(middleware::from_fn(auth)),
            ),
        )
        .route(
            "/my",
            get(get_my_rooms)
                .layer(middleware::from_fn(|state, req, next| {
                    role_check(state, req, next, vec![UserRole::Landlord])
                }))
                .layer(middleware::from_fn(auth)),
        )
        .route(
            "/:room_id",
            get(get_room_by_id).merge(
                put(update_room)
                    .delete(delete_room)
                    .layer(middleware::from_fn(|state, req, next| {
                        role_check(state, req, next, vec![UserRole::Landlord, UserRole::Admin])
                    }))
                    .layer(middleware::from_fn(auth)),
            ),
        )
        .route(
            "/:room_id/status",
            put(update_room_status)
                .layer(middleware::from_fn(|state, req, next| {
                    role_check(state, req, next, vec![UserRole::Landlord, UserRole::Admin])
                }))
                .layer(middleware::from_fn(auth)),
        )
        .route("/:room_id/reviews", get(get_room_reviews))
}

/// Landlords manage their own rooms; admins manage any.
fn ensure_room_access(user: &User, landlord_id: Uuid) -> Result<(), HttpError> {
    if user.role != UserRole::Admin && user.id != landlord_id {
        return Err(HttpError::forbidden(
            ErrorMessage::PermissionDenied.to_string(),
        ));
    }
    Ok(())
}

pub async fn create_room(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
    Json(body): Json<CreateRoomDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let room = app_state
        .db_client
        .create_room(user.user.id, body)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let filtered_room = RoomFilterDto::from_room(&room, user.user.name.clone());

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Room listed successfully",
        "data": {
            "room": filtered_room
        }
    })))
}

pub async fn get_my_rooms(
    Query(query_params): Query<RequestQueryDto>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    query_params
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query_params.page.unwrap_or(1) as u32;
    let limit = query_params.limit.unwrap_or(10);

    let rooms = app_state
        .db_client
        .get_rooms_by_landlord(user.user.id, page, limit)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let filtered_rooms: Vec<RoomFilterDto> = rooms
        .iter()
        .map(|room| RoomFilterDto::from_room(room, user.user.name.clone()))
        .collect();

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "rooms": filtered_rooms,
            "pagination": {
                "page": page,
                "limit": limit,
                "count": filtered_rooms.len()
            }
        }
    })))
}

pub async fn search_rooms(
    Query(query_params): Query<RoomSearchQueryDto>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    query_params
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query_params.page.unwrap_or(1) as u32;
    let limit = query_params.limit.unwrap_or(10);

    let filters = RoomSearchFilters {
        city: query_params.city,
        min_price: query_params.min_price,
        max_price: query_params.max_price,
        guests: query_params.guests,
    };

    let rooms = app_state
        .db_client
        .search_rooms(filters, page, limit)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let mut filtered_rooms = Vec::with_capacity(rooms.len());
    for room in &rooms {
        let landlord = app_state
            .db_client
            .get_user(Some(room.landlord_id), None)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?
            .ok_or_else(|| HttpError::server_error("Landlord not found".to_string()))?;

        filtered_rooms.push(RoomFilterDto::from_room(room, landlord.name));
    }

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "rooms": filtered_rooms,
            "pagination": {
                "page": page,
                "limit": limit,
                "count": filtered_rooms.len()
            }
        }
    })))
}

pub async fn get_room_by_id(
    Path(room_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let room = app_state
        .db_client
        .get_room_by_id(room_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found(format!("Room {} not found", room_id)))?;

    let landlord = app_state
        .db_client
        .get_user(Some(room.landlord_id), None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::server_error("Landlord not found".to_string()))?;

    let filtered_room = RoomFilterDto::from_room(&room, landlord.name);

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "room": filtered_room
        }
    })))
}

pub async fn update_room(
    Path(room_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
    Json(body): Json<UpdateRoomDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let room = app_state
        .db_client
        .get_room_by_id(room_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found(format!("Room {} not found", room_id)))?;

    ensure_room_access(&user.user, room.landlord_id)?;

    let updated_room = app_state
        .db_client
        .update_room(room_id, body)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let filtered_room = RoomFilterDto::from_room(&updated_room, user.user.name.clone());

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Room updated successfully",
        "data": {
            "room": filtered_room
        }
    })))
}

pub async fn update_room_status(
    Path(room_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
    Json(body): Json<UpdateRoomStatusDto>,
) -> Result<impl IntoResponse, HttpError> {
    let room = app_state
        .db_client
        .get_room_by_id(room_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found(format!("Room {} not found", room_id)))?;

    ensure_room_access(&user.user, room.landlord_id)?;

    let updated_room = app_state
        .db_client
        .update_room_status(room_id, body.status)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let filtered_room = RoomFilterDto::from_room(&updated_room, user.user.name.clone());

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Room status updated",
        "data": {
            "room": filtered_room
        }
    })))
}

pub async fn delete_room(
    Path(room_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    let room = app_state
        .db_client
        .get_room_by_id(room_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found(format!("Room {} not found", room_id)))?;

    ensure_room_access(&user.user, room.landlord_id)?;

    app_state
        .db_client
        .delete_room(room_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Room deleted successfully"
    })))
}
