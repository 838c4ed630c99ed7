use axum::{
    extract::{Path, Query, State},
    routing::get,
    Extension, Json, Router,
};

use crate::controllers::fuel_controller::FuelController;
use crate::dto::fuel_dto::{CreateFuelRecordRequest, FuelRecordFilters, UpdateFuelRecordRequest};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::FuelRecord;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_fuel_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_fuel_records).post(create_fuel_record))
        .route(
            "/:id",
            get(get_fuel_record).put(update_fuel_record).delete(delete_fuel_record),
        )
}

async fn list_fuel_records(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(filters): Query<FuelRecordFilters>,
) -> Result<Json<Vec<FuelRecord>>, AppError> {
    let controller = FuelController::new(state.record_service.clone());
    let response = controller.list(&user.user_id, filters).await?;
    Ok(Json(response))
}

async fn get_fuel_record(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<FuelRecord>, AppError> {
    let controller = FuelController::new(state.record_service.clone());
    let response = controller.get_by_id(&user.user_id, &id).await?;
    Ok(Json(response))
}

async fn create_fuel_record(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateFuelRecordRequest>,
) -> Result<Json<ApiResponse<FuelRecord>>, AppError> {
    let controller = FuelController::new(state.record_service.clone());
    let response = controller.create(&user.user_id, request).await?;
    Ok(Json(response))
}

async fn update_fuel_record(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(request): Json<UpdateFuelRecordRequest>,
) -> Result<Json<ApiResponse<FuelRecord>>, AppError> {
    let controller = FuelController::new(state.record_service.clone());
    let response = controller.update(&user.user_id, &id, request).await?;
    Ok(Json(response))
}

async fn delete_fuel_record(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = FuelController::new(state.record_service.clone());
    let response = controller.delete(&user.user_id, &id).await?;
    Ok(Json(response))
}
