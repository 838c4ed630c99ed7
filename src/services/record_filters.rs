//! Filtros y orden de los listados de registros
//!
//! Los mismos que usan las pestañas de combustible y mantenimiento:
//! filtro opcional por vehículo y orden por fecha descendente.

use serde::{Deserialize, Serialize};

use crate::models::{FuelRecord, MaintenanceRecord};

/// Vista de la pestaña de mantenimiento
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaintenanceView {
    #[default]
    All,
    Past,
    Planned,
}

impl MaintenanceView {
    pub fn matches(&self, record: &MaintenanceRecord) -> bool {
        match self {
            MaintenanceView::All => true,
            MaintenanceView::Past => !record.is_planned,
            MaintenanceView::Planned => record.is_planned,
        }
    }
}

fn belongs_to(vehicle_id: Option<&str>, record_vehicle: &str) -> bool {
    vehicle_id.map_or(true, |id| id == record_vehicle)
}

/// Repostajes del vehículo (o de todos), más recientes primero
pub fn fuel_records_for_view(records: &[FuelRecord], vehicle_id: Option<&str>) -> Vec<FuelRecord> {
    let mut visible: Vec<FuelRecord> = records
        .iter()
        .filter(|r| belongs_to(vehicle_id, &r.vehicle_id))
        .cloned()
        .collect();
    visible.sort_by(|a, b| b.date.cmp(&a.date));
    visible
}

/// Mantenimientos del vehículo (o de todos) según la vista, más recientes primero
pub fn maintenance_records_for_view(
    records: &[MaintenanceRecord],
    vehicle_id: Option<&str>,
    view: MaintenanceView,
) -> Vec<MaintenanceRecord> {
    let mut visible: Vec<MaintenanceRecord> = records
        .iter()
        .filter(|r| belongs_to(vehicle_id, &r.vehicle_id) && view.matches(r))
        .cloned()
        .collect();
    visible.sort_by(|a, b| b.date.cmp(&a.date));
    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, day).unwrap()
    }

    fn fuel(id: &str, vehicle_id: &str, day: u32) -> FuelRecord {
        FuelRecord {
            id: id.to_string(),
            vehicle_id: vehicle_id.to_string(),
            date: date(day),
            amount: Decimal::new(50, 0),
            mileage: 1000,
        }
    }

    fn maintenance(id: &str, vehicle_id: &str, day: u32, is_planned: bool) -> MaintenanceRecord {
        MaintenanceRecord {
            id: id.to_string(),
            vehicle_id: vehicle_id.to_string(),
            date: date(day),
            service_type: "Oil Change".to_string(),
            cost: Decimal::new(80, 0),
            mileage: 1000,
            notes: None,
            is_planned,
        }
    }

    #[test]
    fn test_fuel_records_filtered_and_newest_first() {
        let records = vec![fuel("a", "v1", 3), fuel("b", "v2", 9), fuel("c", "v1", 7)];

        let all: Vec<_> = fuel_records_for_view(&records, None).into_iter().map(|r| r.id).collect();
        assert_eq!(all, vec!["b", "c", "a"]);

        let v1: Vec<_> = fuel_records_for_view(&records, Some("v1")).into_iter().map(|r| r.id).collect();
        assert_eq!(v1, vec!["c", "a"]);
    }

    #[test]
    fn test_maintenance_views() {
        let records = vec![
            maintenance("past", "v1", 1, false),
            maintenance("planned", "v1", 20, true),
            maintenance("other", "v2", 5, false),
        ];

        let past: Vec<_> = maintenance_records_for_view(&records, Some("v1"), MaintenanceView::Past)
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(past, vec!["past"]);

        let planned = maintenance_records_for_view(&records, None, MaintenanceView::Planned);
        assert_eq!(planned.len(), 1);
        assert_eq!(planned[0].id, "planned");

        let all: Vec<_> = maintenance_records_for_view(&records, None, MaintenanceView::All)
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(all, vec!["planned", "other", "past"]);
    }
}
