use validator::Validate;

use crate::dto::fuel_dto::{CreateFuelRecordRequest, FuelRecordFilters, UpdateFuelRecordRequest};
use crate::dto::ApiResponse;
use crate::models::FuelRecord;
use crate::services::record_filters::fuel_records_for_view;
use crate::services::record_service::RecordService;
use crate::utils::errors::AppError;

pub struct FuelController {
    service: RecordService,
}

impl FuelController {
    pub fn new(service: RecordService) -> Self {
        Self { service }
    }

    /// Repostajes filtrados, más recientes primero
    pub async fn list(&self, user_id: &str, filters: FuelRecordFilters) -> Result<Vec<FuelRecord>, AppError> {
        let records = self.service.list_fuel_records(user_id).await?;
        Ok(fuel_records_for_view(&records, filters.vehicle_id.as_deref()))
    }

    pub async fn get_by_id(&self, user_id: &str, id: &str) -> Result<FuelRecord, AppError> {
        self.service.get_fuel_record(user_id, id).await
    }

    pub async fn create(
        &self,
        user_id: &str,
        request: CreateFuelRecordRequest,
    ) -> Result<ApiResponse<FuelRecord>, AppError> {
        request.validate()?;

        let record = self.service.add_fuel_record(user_id, request.into_record()).await?;

        Ok(ApiResponse::success_with_message(record, "Fuel record added successfully"))
    }

    pub async fn update(
        &self,
        user_id: &str,
        id: &str,
        request: UpdateFuelRecordRequest,
    ) -> Result<ApiResponse<FuelRecord>, AppError> {
        request.validate()?;

        let mut record = self.service.get_fuel_record(user_id, id).await?;
        request.apply_to(&mut record);
        self.service.edit_fuel_record(user_id, &record).await?;

        Ok(ApiResponse::success_with_message(record, "Fuel record updated successfully"))
    }

    pub async fn delete(&self, user_id: &str, id: &str) -> Result<ApiResponse<()>, AppError> {
        self.service.delete_fuel_record(user_id, id).await?;
        Ok(ApiResponse::message("Fuel record deleted successfully"))
    }
}
