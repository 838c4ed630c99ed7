use axum::{
    extract::{Path, Query, State},
    routing::get,
    Extension, Json, Router,
};

use crate::controllers::maintenance_controller::MaintenanceController;
use crate::dto::maintenance_dto::{
    CreateMaintenanceRecordRequest, MaintenanceRecordFilters, UpdateMaintenanceRecordRequest,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::MaintenanceRecord;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_maintenance_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_maintenance_records).post(create_maintenance_record))
        .route(
            "/:id",
            get(get_maintenance_record)
                .put(update_maintenance_record)
                .delete(delete_maintenance_record),
        )
}

async fn list_maintenance_records(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(filters): Query<MaintenanceRecordFilters>,
) -> Result<Json<Vec<MaintenanceRecord>>, AppError> {
    let controller = MaintenanceController::new(state.record_service.clone());
    let response = controller.list(&user.user_id, filters).await?;
    Ok(Json(response))
}

async fn get_maintenance_record(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<MaintenanceRecord>, AppError> {
    let controller = MaintenanceController::new(state.record_service.clone());
    let response = controller.get_by_id(&user.user_id, &id).await?;
    Ok(Json(response))
}

async fn create_maintenance_record(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateMaintenanceRecordRequest>,
) -> Result<Json<ApiResponse<MaintenanceRecord>>, AppError> {
    let controller = MaintenanceController::new(state.record_service.clone());
    let response = controller.create(&user.user_id, request).await?;
    Ok(Json(response))
}

async fn update_maintenance_record(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(request): Json<UpdateMaintenanceRecordRequest>,
) -> Result<Json<ApiResponse<MaintenanceRecord>>, AppError> {
    let controller = MaintenanceController::new(state.record_service.clone());
    let response = controller.update(&user.user_id, &id, request).await?;
    Ok(Json(response))
}

async fn delete_maintenance_record(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = MaintenanceController::new(state.record_service.clone());
    let response = controller.delete(&user.user_id, &id).await?;
    Ok(Json(response))
}
