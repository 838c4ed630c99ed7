use axum::{
    extract::State,
    middleware::from_fn_with_state,
    routing::{delete, post},
    Extension, Json, Router,
};

use crate::controllers::auth_controller::AuthController;
use crate::dto::auth_dto::SessionResponse;
use crate::dto::ApiResponse;
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::services::auth_service::SignInCredential;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Inicio de sesión público; cerrar sesión requiere el token
pub fn create_auth_router(state: AppState) -> Router<AppState> {
    Router::new().route(
        "/session",
        post(sign_in).merge(delete(sign_out).route_layer(from_fn_with_state(state, auth_middleware))),
    )
}

async fn sign_in(
    State(state): State<AppState>,
    Json(credential): Json<SignInCredential>,
) -> Result<Json<ApiResponse<SessionResponse>>, AppError> {
    let controller = AuthController::new(state.auth_service.clone());
    let response = controller.sign_in(credential).await?;
    Ok(Json(response))
}

async fn sign_out(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = AuthController::new(state.auth_service.clone());
    let response = controller.sign_out(&user.claims).await?;
    Ok(Json(response))
}
