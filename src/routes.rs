use std::sync::Arc;

use axum::{middleware, routing::get, Extension, Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    handler::{
        auth::auth_handler, bookings::booking_handler, dashboard::dashboard_handler,
        reviews::review_handler, rooms::room_handler, users::users_handler,
    },
    middleware::auth,
    AppState,
};

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running"
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_route = Router::new()
        .nest("/auth", auth_handler())
        .nest("/users", users_handler().layer(middleware::from_fn(auth)))
        // Room management layers auth per route so browsing stays public.
        .nest("/rooms", room_handler())
        .nest(
            "/bookings",
            booking_handler().layer(middleware::from_fn(auth)),
        )
        .nest("/reviews", review_handler().layer(middleware::from_fn(auth)))
        .nest(
            "/dashboard",
            dashboard_handler().layer(middleware::from_fn(auth)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_route)
}
