use validator::Validate;

use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest};
use crate::dto::ApiResponse;
use crate::models::Vehicle;
use crate::services::record_service::{CascadeReport, RecordService};
use crate::utils::errors::AppError;

pub struct VehicleController {
    service: RecordService,
}

impl VehicleController {
    pub fn new(service: RecordService) -> Self {
        Self { service }
    }

    pub async fn create(
        &self,
        user_id: &str,
        request: CreateVehicleRequest,
    ) -> Result<ApiResponse<Vehicle>, AppError> {
        request.validate()?;

        let vehicle = self.service.create_vehicle(user_id, request.into_vehicle()).await?;

        Ok(ApiResponse::success_with_message(vehicle, "Vehicle added successfully"))
    }

    pub async fn get_by_id(&self, user_id: &str, id: &str) -> Result<Vehicle, AppError> {
        self.service.get_vehicle(user_id, id).await
    }

    pub async fn list(&self, user_id: &str) -> Result<Vec<Vehicle>, AppError> {
        self.service.list_vehicles(user_id).await
    }

    pub async fn update(
        &self,
        user_id: &str,
        id: &str,
        request: UpdateVehicleRequest,
    ) -> Result<ApiResponse<Vehicle>, AppError> {
        request.validate()?;

        let mut vehicle = self.service.get_vehicle(user_id, id).await?;
        request.apply_to(&mut vehicle);
        self.service.update_vehicle(user_id, &vehicle).await?;

        Ok(ApiResponse::success_with_message(vehicle, "Vehicle updated successfully"))
    }

    /// Borra el vehículo con todos sus registros
    pub async fn delete(&self, user_id: &str, id: &str) -> Result<ApiResponse<CascadeReport>, AppError> {
        let report = self.service.delete_vehicle(user_id, id).await?;

        Ok(ApiResponse::success_with_message(
            report,
            "Vehicle and all its records deleted successfully",
        ))
    }
}
