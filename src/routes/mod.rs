//! Rutas de la API
//!
//! Todo lo que cuelga de `/api` salvo el inicio de sesión pasa por el
//! middleware de autenticación. El stream SSE usa su variante con token
//! en el query.

pub mod auth_routes;
pub mod fuel_routes;
pub mod maintenance_routes;
pub mod notification_routes;
pub mod vehicle_routes;

use axum::{middleware::from_fn_with_state, response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::middleware::{auth::auth_middleware, cors::cors_layer};
use crate::state::AppState;

/// Router completo de la aplicación
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .nest("/api/vehicle", vehicle_routes::create_vehicle_router())
        .nest("/api/fuel", fuel_routes::create_fuel_router())
        .nest("/api/maintenance", maintenance_routes::create_maintenance_router())
        .nest("/api/notifications", notification_routes::create_notification_router())
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/health", get(health))
        .nest("/api/auth", auth_routes::create_auth_router(state.clone()))
        .nest(
            "/api/notifications",
            notification_routes::create_notification_stream_router(state.clone()),
        )
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config)),
        )
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
