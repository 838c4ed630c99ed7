use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Repostaje de un vehículo (colección `fuel_records`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelRecord {
    #[serde(default)]
    pub id: String,
    pub vehicle_id: String,
    pub date: NaiveDate,
    /// Importe gastado
    pub amount: Decimal,
    /// Lectura del cuentakilómetros al repostar
    pub mileage: i64,
}

/// Máximo kilometraje entre los repostajes dados, 0 si no hay ninguno
pub fn max_mileage<'a>(records: impl IntoIterator<Item = &'a FuelRecord>) -> i64 {
    records.into_iter().map(|r| r.mileage).max().unwrap_or(0)
}
