use chrono::Utc;
use validator::Validate;

use crate::dto::maintenance_dto::{
    CreateMaintenanceRecordRequest, MaintenanceRecordFilters, UpdateMaintenanceRecordRequest,
};
use crate::dto::ApiResponse;
use crate::models::MaintenanceRecord;
use crate::services::record_filters::maintenance_records_for_view;
use crate::services::record_service::RecordService;
use crate::utils::errors::AppError;

pub struct MaintenanceController {
    service: RecordService,
}

impl MaintenanceController {
    pub fn new(service: RecordService) -> Self {
        Self { service }
    }

    /// Mantenimientos filtrados por vehículo y vista, más recientes primero
    pub async fn list(
        &self,
        user_id: &str,
        filters: MaintenanceRecordFilters,
    ) -> Result<Vec<MaintenanceRecord>, AppError> {
        let records = self.service.list_maintenance_records(user_id).await?;
        Ok(maintenance_records_for_view(
            &records,
            filters.vehicle_id.as_deref(),
            filters.view,
        ))
    }

    pub async fn get_by_id(&self, user_id: &str, id: &str) -> Result<MaintenanceRecord, AppError> {
        self.service.get_maintenance_record(user_id, id).await
    }

    pub async fn create(
        &self,
        user_id: &str,
        request: CreateMaintenanceRecordRequest,
    ) -> Result<ApiResponse<MaintenanceRecord>, AppError> {
        request.validate()?;

        let record = self
            .service
            .add_maintenance_record(user_id, request.into_record(), Utc::now())
            .await?;

        Ok(ApiResponse::success_with_message(record, "Maintenance record added successfully"))
    }

    pub async fn update(
        &self,
        user_id: &str,
        id: &str,
        request: UpdateMaintenanceRecordRequest,
    ) -> Result<ApiResponse<MaintenanceRecord>, AppError> {
        request.validate()?;

        let mut record = self.service.get_maintenance_record(user_id, id).await?;
        request.apply_to(&mut record);
        self.service
            .edit_maintenance_record(user_id, &mut record, Utc::now())
            .await?;

        Ok(ApiResponse::success_with_message(record, "Maintenance record updated successfully"))
    }

    pub async fn delete(&self, user_id: &str, id: &str) -> Result<ApiResponse<()>, AppError> {
        self.service.delete_maintenance_record(user_id, id).await?;
        Ok(ApiResponse::message("Maintenance record deleted successfully"))
    }
}
