//! Derivación de notificaciones
//!
//! Función pura: a partir de los vehículos y los mantenimientos calcula
//! los vencimientos de los próximos 30 días (o ya vencidos), ordenados
//! por días restantes.

use chrono::{DateTime, NaiveDate, Utc};

use crate::models::notification::NOTIFICATION_WINDOW_DAYS;
use crate::models::{MaintenanceRecord, Notification, NotificationStatus, Vehicle};
use crate::utils::dates::{days_until, start_of_day};

const PLANNED_SERVICE_PREFIX: &str = "Planned Service: ";

/// Días que faltan para `date` contados desde `now`, redondeando hacia arriba
pub fn days_left(date: NaiveDate, now: DateTime<Utc>) -> i64 {
    days_until(start_of_day(date), now)
}

/// Derivar la lista de notificaciones.
///
/// Por vehículo se evalúan seguro, impuesto, impuesto de circulación e ITV,
/// y después sus mantenimientos planificados. El resultado se ordena de
/// forma estable por `days_left`, así los empates conservan ese orden.
pub fn derive_notifications(
    vehicles: &[Vehicle],
    maintenance_records: &[MaintenanceRecord],
    now: DateTime<Utc>,
) -> Vec<Notification> {
    let mut notifications = Vec::new();

    for vehicle in vehicles {
        for (kind, date) in vehicle.expiries() {
            push_if_due(&mut notifications, vehicle, kind.label().to_string(), date, now);
        }

        maintenance_records
            .iter()
            .filter(|record| record.vehicle_id == vehicle.id && record.is_planned)
            .for_each(|record| {
                let kind = format!("{}{}", PLANNED_SERVICE_PREFIX, record.service_type);
                push_if_due(&mut notifications, vehicle, kind, record.date, now);
            });
    }

    // sort_by_key es estable
    notifications.sort_by_key(|n| n.days_left);
    notifications
}

fn push_if_due(
    notifications: &mut Vec<Notification>,
    vehicle: &Vehicle,
    kind: String,
    date: NaiveDate,
    now: DateTime<Utc>,
) {
    let days_left = days_left(date, now);
    if days_left > NOTIFICATION_WINDOW_DAYS {
        return;
    }

    notifications.push(Notification {
        vehicle_id: vehicle.id.clone(),
        vehicle_name: vehicle.name.clone(),
        kind,
        date,
        days_left,
        status: NotificationStatus::from_days_left(days_left),
    });
}

/// Filtrar por vehículo (`None` = todos)
pub fn filter_for_vehicle(notifications: &[Notification], vehicle_id: Option<&str>) -> Vec<Notification> {
    notifications
        .iter()
        .filter(|n| vehicle_id.map_or(true, |id| n.vehicle_id == id))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rust_decimal::Decimal;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn in_days(days: i64) -> NaiveDate {
        (now() + Duration::days(days)).date_naive()
    }

    fn vehicle(id: &str, name: &str, offsets: [i64; 4]) -> Vehicle {
        Vehicle {
            id: id.to_string(),
            name: name.to_string(),
            year: 2019,
            color: None,
            mileage: 0,
            insurance_expiry: in_days(offsets[0]),
            tax_expiry: in_days(offsets[1]),
            road_tax_expiry: in_days(offsets[2]),
            mot_expiry: in_days(offsets[3]),
            photo: None,
        }
    }

    fn service(vehicle_id: &str, service_type: &str, offset: i64, is_planned: bool) -> MaintenanceRecord {
        MaintenanceRecord {
            id: format!("m-{}", service_type),
            vehicle_id: vehicle_id.to_string(),
            date: in_days(offset),
            service_type: service_type.to_string(),
            cost: Decimal::new(120, 0),
            mileage: 40_000,
            notes: None,
            is_planned,
        }
    }

    #[test]
    fn test_days_left_uses_utc_midnight() {
        // now = 12:00; mañana a medianoche faltan 12h -> 1 día
        assert_eq!(days_left(in_days(1), now()), 1);
        // hoy a medianoche ya pasó -> 0
        assert_eq!(days_left(in_days(0), now()), 0);
        assert_eq!(days_left(in_days(-2), now()), -2);
    }

    #[test]
    fn test_only_dates_within_window_are_included() {
        let v = vehicle("v1", "Civic", [31, 30, 100, 5]);
        let notifications = derive_notifications(&[v], &[], now());

        let kinds: Vec<_> = notifications.iter().map(|n| n.kind.as_str()).collect();
        assert_eq!(kinds, vec!["MOT", "Tax"]);
    }

    #[test]
    fn test_status_assignment() {
        let v = vehicle("v1", "Civic", [-3, 10, 11, 0]);
        let notifications = derive_notifications(&[v], &[], now());

        let statuses: Vec<_> = notifications.iter().map(|n| (n.days_left, n.status)).collect();
        assert_eq!(
            statuses,
            vec![
                (-3, NotificationStatus::Expired),
                (0, NotificationStatus::Expired),
                (10, NotificationStatus::Upcoming10),
                (11, NotificationStatus::Upcoming30),
            ]
        );
    }

    #[test]
    fn test_sorted_and_stable_for_ties() {
        let a = vehicle("a", "Alpha", [5, 5, 90, 90]);
        let b = vehicle("b", "Beta", [5, 2, 90, 90]);
        let notifications = derive_notifications(&[a, b], &[], now());

        let order: Vec<_> = notifications
            .iter()
            .map(|n| format!("{}:{}", n.vehicle_name, n.kind))
            .collect();
        assert_eq!(
            order,
            vec!["Beta:Tax", "Alpha:Insurance", "Alpha:Tax", "Beta:Insurance"]
        );
        assert!(notifications.windows(2).all(|w| w[0].days_left <= w[1].days_left));
    }

    #[test]
    fn test_planned_services_are_included() {
        let v = vehicle("v1", "Civic", [90, 90, 90, 90]);
        let records = vec![
            service("v1", "Oil Change", 7, true),
            service("v1", "Brakes", 3, false),
            service("other", "Tyres", 2, true),
            service("v1", "Timing Belt", 45, true),
        ];
        let notifications = derive_notifications(&[v], &records, now());

        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].kind, "Planned Service: Oil Change");
        assert_eq!(notifications[0].days_left, 7);
        assert_eq!(notifications[0].status, NotificationStatus::Upcoming10);
    }

    #[test]
    fn test_planned_flag_is_trusted_even_when_date_passed() {
        let v = vehicle("v1", "Civic", [90, 90, 90, 90]);
        let records = vec![service("v1", "Service", -4, true)];
        let notifications = derive_notifications(&[v], &records, now());

        assert_eq!(notifications[0].days_left, -4);
        assert_eq!(notifications[0].status, NotificationStatus::Expired);
    }

    #[test]
    fn test_derivation_is_idempotent() {
        let vehicles = vec![vehicle("v1", "Civic", [1, 2, 3, 4])];
        let records = vec![service("v1", "Oil Change", 7, true)];

        let first = derive_notifications(&vehicles, &records, now());
        let second = derive_notifications(&vehicles, &records, now());
        assert_eq!(first, second);
    }

    #[test]
    fn test_filter_for_vehicle() {
        let vehicles = vec![
            vehicle("a", "Alpha", [1, 90, 90, 90]),
            vehicle("b", "Beta", [2, 90, 90, 90]),
        ];
        let notifications = derive_notifications(&vehicles, &[], now());

        assert_eq!(filter_for_vehicle(&notifications, None).len(), 2);
        let only_b = filter_for_vehicle(&notifications, Some("b"));
        assert_eq!(only_b.len(), 1);
        assert_eq!(only_b[0].vehicle_name, "Beta");
    }
}
