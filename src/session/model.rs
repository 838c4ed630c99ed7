//! Estado de la sesión de un usuario
//!
//! Todo el estado visible de la aplicación vive en `AppModel` y sólo
//! cambia a través de `update`. Los snapshots de las colecciones llegan
//! como mensajes y reemplazan la colección completa.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::models::{FuelRecord, MaintenanceRecord, Notification, Vehicle};
use crate::services::auth_service::{AuthFailure, UserIdentity};
use crate::services::notification_service::{derive_notifications, filter_for_vehicle};
use crate::services::record_filters::{fuel_records_for_view, maintenance_records_for_view, MaintenanceView};
use crate::store::Collection;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Cars,
    Fuel,
    Maintenance,
    Notifications,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "user", rename_all = "snake_case")]
pub enum AuthState {
    #[default]
    SignedOut,
    SigningIn,
    SignedIn(UserIdentity),
}

/// Diálogo abierto encima de la pestaña activa
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "modal", content = "id", rename_all = "snake_case")]
pub enum Modal {
    #[default]
    None,
    AddVehicle,
    EditVehicle(String),
    AddRecord,
    EditFuelRecord(String),
    EditMaintenanceRecord(String),
    ConfirmDeleteVehicle(String),
}

#[derive(Debug, Clone)]
pub enum Msg {
    SignInStarted,
    SignedIn(UserIdentity),
    SignInFailed(AuthFailure),
    SignedOut,
    VehiclesLoaded(Vec<Vehicle>),
    FuelRecordsLoaded(Vec<FuelRecord>),
    MaintenanceRecordsLoaded(Vec<MaintenanceRecord>),
    SubscriptionFailed { collection: Collection, message: String },
    SelectTab(Tab),
    FilterVehicle(Option<String>),
    SetMaintenanceView(MaintenanceView),
    OpenModal(Modal),
    CloseModal,
    /// Una escritura terminó bien: se cierra el diálogo
    WriteSucceeded,
    /// Una escritura falló: el diálogo sigue abierto
    WriteFailed(String),
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AppModel {
    pub auth: AuthState,
    pub auth_error: Option<String>,
    pub vehicles: Vec<Vehicle>,
    pub fuel_records: Vec<FuelRecord>,
    pub maintenance_records: Vec<MaintenanceRecord>,
    pub notifications: Vec<Notification>,
    pub active_tab: Tab,
    pub filter_vehicle_id: Option<String>,
    pub maintenance_view: MaintenanceView,
    pub modal: Modal,
    pub last_error: Option<String>,
    pub loading_vehicles: bool,
    pub loading_fuel_records: bool,
    pub loading_maintenance_records: bool,
}

impl AppModel {
    pub fn user(&self) -> Option<&UserIdentity> {
        match &self.auth {
            AuthState::SignedIn(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading_vehicles || self.loading_fuel_records || self.loading_maintenance_records
    }

    pub fn visible_fuel_records(&self) -> Vec<FuelRecord> {
        fuel_records_for_view(&self.fuel_records, self.filter_vehicle_id.as_deref())
    }

    pub fn visible_maintenance_records(&self) -> Vec<MaintenanceRecord> {
        maintenance_records_for_view(
            &self.maintenance_records,
            self.filter_vehicle_id.as_deref(),
            self.maintenance_view,
        )
    }

    pub fn visible_notifications(&self) -> Vec<Notification> {
        filter_for_vehicle(&self.notifications, self.filter_vehicle_id.as_deref())
    }

    /// Vehículo preseleccionado al añadir un registro: el del filtro o el primero
    pub fn default_record_vehicle(&self) -> Option<&str> {
        self.filter_vehicle_id
            .as_deref()
            .or_else(|| self.vehicles.first().map(|v| v.id.as_str()))
    }

    fn refresh_notifications(&mut self, now: DateTime<Utc>) {
        if !self.is_loading() {
            self.notifications = derive_notifications(&self.vehicles, &self.maintenance_records, now);
        }
    }
}

/// Aplicar un mensaje al modelo
pub fn update(model: &mut AppModel, msg: Msg, now: DateTime<Utc>) {
    match msg {
        Msg::SignInStarted => {
            model.auth = AuthState::SigningIn;
            model.auth_error = None;
        }
        Msg::SignedIn(user) => {
            debug!("Sesión de {} lista, cargando colecciones", user.user_id);
            model.auth = AuthState::SignedIn(user);
            model.auth_error = None;
            model.loading_vehicles = true;
            model.loading_fuel_records = true;
            model.loading_maintenance_records = true;
        }
        Msg::SignInFailed(failure) => {
            model.auth = AuthState::SignedOut;
            model.auth_error = Some(failure.user_message().to_string());
        }
        Msg::SignedOut => {
            *model = AppModel::default();
        }
        Msg::VehiclesLoaded(vehicles) => {
            model.vehicles = vehicles;
            model.loading_vehicles = false;
            model.refresh_notifications(now);
        }
        Msg::FuelRecordsLoaded(records) => {
            model.fuel_records = records;
            model.loading_fuel_records = false;
            model.refresh_notifications(now);
        }
        Msg::MaintenanceRecordsLoaded(records) => {
            model.maintenance_records = records;
            model.loading_maintenance_records = false;
            model.refresh_notifications(now);
        }
        Msg::SubscriptionFailed { collection, message } => {
            warn!("⚠️ Suscripción a {} fallida: {}", collection, message);
            match collection {
                Collection::Vehicles => model.loading_vehicles = false,
                Collection::FuelRecords => model.loading_fuel_records = false,
                Collection::MaintenanceRecords => model.loading_maintenance_records = false,
            }
            model.last_error = Some(format!("Error fetching {}", collection.as_str().replace('_', " ")));
            model.refresh_notifications(now);
        }
        Msg::SelectTab(tab) => {
            model.active_tab = tab;
            model.filter_vehicle_id = None;
        }
        Msg::FilterVehicle(vehicle_id) => {
            model.filter_vehicle_id = vehicle_id.filter(|id| !id.is_empty());
        }
        Msg::SetMaintenanceView(view) => {
            model.maintenance_view = view;
        }
        Msg::OpenModal(modal) => {
            model.modal = modal;
            model.last_error = None;
        }
        Msg::CloseModal | Msg::WriteSucceeded => {
            model.modal = Modal::None;
            model.last_error = None;
        }
        Msg::WriteFailed(message) => {
            model.last_error = Some(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, TimeZone};
    use rust_decimal::Decimal;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
    }

    fn user() -> UserIdentity {
        UserIdentity {
            user_id: "alice".to_string(),
            email: None,
        }
    }

    fn vehicle(id: &str, insurance_in_days: i64) -> Vehicle {
        let far = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        Vehicle {
            id: id.to_string(),
            name: format!("Car {}", id),
            year: 2020,
            color: None,
            mileage: 0,
            insurance_expiry: (now() + Duration::days(insurance_in_days)).date_naive(),
            tax_expiry: far,
            road_tax_expiry: far,
            mot_expiry: far,
            photo: None,
        }
    }

    fn fuel(id: &str, vehicle_id: &str, day: u32) -> FuelRecord {
        FuelRecord {
            id: id.to_string(),
            vehicle_id: vehicle_id.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
            amount: Decimal::new(40, 0),
            mileage: 100,
        }
    }

    fn signed_in() -> AppModel {
        let mut model = AppModel::default();
        update(&mut model, Msg::SignedIn(user()), now());
        model
    }

    #[test]
    fn test_notifications_wait_for_all_collections() {
        let mut model = signed_in();
        assert!(model.is_loading());

        update(&mut model, Msg::VehiclesLoaded(vec![vehicle("a", 5)]), now());
        assert!(model.notifications.is_empty());

        update(&mut model, Msg::FuelRecordsLoaded(vec![]), now());
        update(&mut model, Msg::MaintenanceRecordsLoaded(vec![]), now());
        assert!(!model.is_loading());
        assert_eq!(model.notifications.len(), 1);

        // Snapshot posterior: reemplaza y vuelve a derivar
        update(&mut model, Msg::VehiclesLoaded(vec![vehicle("a", 90)]), now());
        assert!(model.notifications.is_empty());
    }

    #[test]
    fn test_subscription_failure_stops_loading() {
        let mut model = signed_in();
        update(&mut model, Msg::VehiclesLoaded(vec![vehicle("a", 1)]), now());
        update(&mut model, Msg::FuelRecordsLoaded(vec![]), now());
        update(
            &mut model,
            Msg::SubscriptionFailed {
                collection: Collection::MaintenanceRecords,
                message: "offline".to_string(),
            },
            now(),
        );

        assert!(!model.is_loading());
        assert_eq!(model.last_error.as_deref(), Some("Error fetching maintenance records"));
        assert_eq!(model.notifications.len(), 1);
    }

    #[test]
    fn test_select_tab_clears_filter() {
        let mut model = signed_in();
        update(&mut model, Msg::FilterVehicle(Some("a".to_string())), now());
        assert_eq!(model.filter_vehicle_id.as_deref(), Some("a"));

        update(&mut model, Msg::SelectTab(Tab::Fuel), now());
        assert_eq!(model.active_tab, Tab::Fuel);
        assert_eq!(model.filter_vehicle_id, None);
    }

    #[test]
    fn test_visible_fuel_records_follow_filter() {
        let mut model = signed_in();
        update(
            &mut model,
            Msg::FuelRecordsLoaded(vec![fuel("1", "a", 1), fuel("2", "b", 2), fuel("3", "a", 3)]),
            now(),
        );
        update(&mut model, Msg::FilterVehicle(Some("a".to_string())), now());

        let ids: Vec<_> = model.visible_fuel_records().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["3", "1"]);

        update(&mut model, Msg::FilterVehicle(Some(String::new())), now());
        assert_eq!(model.visible_fuel_records().len(), 3);
    }

    #[test]
    fn test_sign_in_failure_sets_message() {
        let mut model = AppModel::default();
        update(&mut model, Msg::SignInStarted, now());
        assert_eq!(model.auth, AuthState::SigningIn);

        update(&mut model, Msg::SignInFailed(AuthFailure::Network), now());
        assert_eq!(model.auth, AuthState::SignedOut);
        assert_eq!(
            model.auth_error.as_deref(),
            Some("Network error. Please check your internet connection.")
        );
    }

    #[test]
    fn test_sign_out_clears_everything() {
        let mut model = signed_in();
        update(&mut model, Msg::VehiclesLoaded(vec![vehicle("a", 1)]), now());
        update(&mut model, Msg::FuelRecordsLoaded(vec![fuel("1", "a", 1)]), now());
        update(&mut model, Msg::MaintenanceRecordsLoaded(vec![]), now());
        update(&mut model, Msg::SelectTab(Tab::Notifications), now());
        update(&mut model, Msg::FilterVehicle(Some("a".to_string())), now());

        update(&mut model, Msg::SignedOut, now());

        assert_eq!(model.auth, AuthState::SignedOut);
        assert!(model.vehicles.is_empty());
        assert!(model.fuel_records.is_empty());
        assert!(model.notifications.is_empty());
        assert_eq!(model.filter_vehicle_id, None);
        assert_eq!(model.active_tab, Tab::Cars);
    }

    #[test]
    fn test_failed_write_keeps_modal_open() {
        let mut model = signed_in();
        update(&mut model, Msg::OpenModal(Modal::EditFuelRecord("1".to_string())), now());
        update(&mut model, Msg::WriteFailed("Store unavailable".to_string()), now());
        assert_eq!(model.modal, Modal::EditFuelRecord("1".to_string()));
        assert!(model.last_error.is_some());

        update(&mut model, Msg::WriteSucceeded, now());
        assert_eq!(model.modal, Modal::None);
        assert_eq!(model.last_error, None);
    }

    #[test]
    fn test_default_record_vehicle() {
        let mut model = signed_in();
        assert_eq!(model.default_record_vehicle(), None);

        update(&mut model, Msg::VehiclesLoaded(vec![vehicle("a", 90), vehicle("b", 90)]), now());
        assert_eq!(model.default_record_vehicle(), Some("a"));

        update(&mut model, Msg::FilterVehicle(Some("b".to_string())), now());
        assert_eq!(model.default_record_vehicle(), Some("b"));
    }
}
