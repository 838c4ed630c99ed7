use chrono::{DateTime, Utc};

use crate::dto::notification_dto::{NotificationFilters, NotificationResponse};
use crate::services::notification_service::{derive_notifications, filter_for_vehicle};
use crate::services::record_service::RecordService;
use crate::utils::errors::AppError;

pub struct NotificationController {
    service: RecordService,
}

impl NotificationController {
    pub fn new(service: RecordService) -> Self {
        Self { service }
    }

    /// Notificaciones derivadas del estado actual del store
    pub async fn list(
        &self,
        user_id: &str,
        filters: NotificationFilters,
        now: DateTime<Utc>,
    ) -> Result<Vec<NotificationResponse>, AppError> {
        let vehicles = self.service.list_vehicles(user_id).await?;
        let maintenance_records = self.service.list_maintenance_records(user_id).await?;

        let notifications = derive_notifications(&vehicles, &maintenance_records, now);

        Ok(filter_for_vehicle(&notifications, filters.vehicle_id.as_deref())
            .into_iter()
            .map(NotificationResponse::from)
            .collect())
    }
}
