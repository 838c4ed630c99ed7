use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::dates::start_of_day;

/// Servicio de mantenimiento realizado o planificado (colección `maintenance_records`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceRecord {
    #[serde(default)]
    pub id: String,
    pub vehicle_id: String,
    pub date: NaiveDate,
    pub service_type: String,
    pub cost: Decimal,
    pub mileage: i64,
    #[serde(default)]
    pub notes: Option<String>,
    /// Se calcula al guardar: la fecha cae después del momento del guardado
    #[serde(default)]
    pub is_planned: bool,
}

/// Un servicio está planificado si su fecha es estrictamente posterior a `now`
pub fn is_planned_at(date: NaiveDate, now: DateTime<Utc>) -> bool {
    start_of_day(date) > now
}
