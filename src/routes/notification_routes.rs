use std::convert::Infallible;

use axum::{
    extract::{Query, State},
    middleware::from_fn_with_state,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Extension, Json, Router,
};
use chrono::Utc;
use futures::{future, Stream, StreamExt};

use crate::controllers::notification_controller::NotificationController;
use crate::dto::notification_dto::{NotificationFilters, NotificationResponse};
use crate::middleware::auth::{stream_auth_middleware, AuthenticatedUser};
use crate::services::auth_service::UserIdentity;
use crate::session::watch_model;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_notification_router() -> Router<AppState> {
    Router::new().route("/", get(list_notifications))
}

/// Stream SSE con su propio middleware de autenticación
pub fn create_notification_stream_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/stream", get(stream_notifications))
        .route_layer(from_fn_with_state(state, stream_auth_middleware))
}

async fn list_notifications(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(filters): Query<NotificationFilters>,
) -> Result<Json<Vec<NotificationResponse>>, AppError> {
    let controller = NotificationController::new(state.record_service.clone());
    let response = controller.list(&user.user_id, filters, Utc::now()).await?;
    Ok(Json(response))
}

/// Lista completa de notificaciones cada vez que cambian los datos del usuario
async fn stream_notifications(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(filters): Query<NotificationFilters>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    tracing::debug!("📡 Stream de notificaciones abierto para {}", user.user_id);

    let identity = UserIdentity {
        user_id: user.user_id,
        email: None,
    };
    let vehicle_id = filters.vehicle_id;

    let events = watch_model(state.store.clone(), identity, Utc::now)
        .filter(|model| future::ready(!model.is_loading()))
        .map(move |mut model| {
            model.filter_vehicle_id = vehicle_id.clone();
            let notifications: Vec<NotificationResponse> = model
                .visible_notifications()
                .into_iter()
                .map(NotificationResponse::from)
                .collect();

            let event = Event::default()
                .event("notifications")
                .json_data(&notifications)
                .unwrap_or_else(|e| Event::default().event("error").data(e.to_string()));
            Ok(event)
        });

    Sse::new(events).keep_alive(KeepAlive::default())
}
