use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::models::MaintenanceRecord;
use crate::services::record_filters::MaintenanceView;
use crate::utils::validation::{validate_non_negative_cost, validate_not_blank};

// Request para añadir un mantenimiento (realizado o planificado)
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMaintenanceRecordRequest {
    #[validate(custom = "validate_not_blank")]
    pub vehicle_id: String,

    pub date: NaiveDate,

    #[validate(custom = "validate_not_blank")]
    pub service_type: String,

    #[validate(custom = "validate_non_negative_cost")]
    pub cost: Decimal,

    #[validate(range(min = 0))]
    pub mileage: i64,

    pub notes: Option<String>,
}

impl CreateMaintenanceRecordRequest {
    /// `is_planned` lo fija el servicio al guardar
    pub fn into_record(self) -> MaintenanceRecord {
        MaintenanceRecord {
            id: String::new(),
            vehicle_id: self.vehicle_id,
            date: self.date,
            service_type: self.service_type.trim().to_string(),
            cost: self.cost,
            mileage: self.mileage,
            notes: normalize_notes(self.notes),
            is_planned: false,
        }
    }
}

// Request para editar un mantenimiento; sin `vehicle_id` se queda en su vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMaintenanceRecordRequest {
    #[validate(custom = "validate_not_blank")]
    pub vehicle_id: Option<String>,

    pub date: NaiveDate,

    #[validate(custom = "validate_not_blank")]
    pub service_type: String,

    #[validate(custom = "validate_non_negative_cost")]
    pub cost: Decimal,

    #[validate(range(min = 0))]
    pub mileage: i64,

    pub notes: Option<String>,
}

impl UpdateMaintenanceRecordRequest {
    pub fn apply_to(self, record: &mut MaintenanceRecord) {
        if let Some(vehicle_id) = self.vehicle_id {
            record.vehicle_id = vehicle_id;
        }
        record.date = self.date;
        record.service_type = self.service_type.trim().to_string();
        record.cost = self.cost;
        record.mileage = self.mileage;
        record.notes = normalize_notes(self.notes);
    }
}

// Filtros para el listado de mantenimientos
#[derive(Debug, Default, Deserialize)]
pub struct MaintenanceRecordFilters {
    pub vehicle_id: Option<String>,
    #[serde(default)]
    pub view: MaintenanceView,
}

fn normalize_notes(notes: Option<String>) -> Option<String> {
    notes.filter(|n| !n.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_negative_cost_and_blank_type_are_rejected() {
        let request: CreateMaintenanceRecordRequest = serde_json::from_value(json!({
            "vehicle_id": "v1",
            "date": "2024-05-01",
            "service_type": " ",
            "cost": "-1",
            "mileage": 1200
        }))
        .unwrap();
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("service_type"));
        assert!(fields.contains_key("cost"));
    }

    #[test]
    fn test_zero_cost_and_empty_notes() {
        let request: CreateMaintenanceRecordRequest = serde_json::from_value(json!({
            "vehicle_id": "v1",
            "date": "2024-05-01",
            "service_type": "Inspection",
            "cost": 0,
            "mileage": 1200,
            "notes": ""
        }))
        .unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.into_record().notes, None);
    }

    #[test]
    fn test_filters_default_to_all() {
        let filters: MaintenanceRecordFilters = serde_json::from_value(json!({})).unwrap();
        assert_eq!(filters.view, MaintenanceView::All);

        let filters: MaintenanceRecordFilters =
            serde_json::from_value(json!({"view": "planned", "vehicle_id": "v1"})).unwrap();
        assert_eq!(filters.view, MaintenanceView::Planned);
    }
}
