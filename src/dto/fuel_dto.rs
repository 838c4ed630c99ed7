use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::models::FuelRecord;
use crate::utils::validation::{validate_not_blank, validate_positive_amount};

// Request para añadir un repostaje
#[derive(Debug, Deserialize, Validate)]
pub struct CreateFuelRecordRequest {
    #[validate(custom = "validate_not_blank")]
    pub vehicle_id: String,

    pub date: NaiveDate,

    #[validate(custom = "validate_positive_amount")]
    pub amount: Decimal,

    #[validate(range(min = 0))]
    pub mileage: i64,
}

impl CreateFuelRecordRequest {
    pub fn into_record(self) -> FuelRecord {
        FuelRecord {
            id: String::new(),
            vehicle_id: self.vehicle_id,
            date: self.date,
            amount: self.amount,
            mileage: self.mileage,
        }
    }
}

// Request para editar un repostaje; sin `vehicle_id` se queda en su vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateFuelRecordRequest {
    #[validate(custom = "validate_not_blank")]
    pub vehicle_id: Option<String>,

    pub date: NaiveDate,

    #[validate(custom = "validate_positive_amount")]
    pub amount: Decimal,

    #[validate(range(min = 0))]
    pub mileage: i64,
}

impl UpdateFuelRecordRequest {
    pub fn apply_to(self, record: &mut FuelRecord) {
        if let Some(vehicle_id) = self.vehicle_id {
            record.vehicle_id = vehicle_id;
        }
        record.date = self.date;
        record.amount = self.amount;
        record.mileage = self.mileage;
    }
}

// Filtros para el listado de repostajes
#[derive(Debug, Default, Deserialize)]
pub struct FuelRecordFilters {
    pub vehicle_id: Option<String>,
}
