//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos tal y como se guardan en el
//! store de documentos (vehículos, combustible, mantenimiento) y las
//! notificaciones derivadas, que nunca se persisten.

pub mod fuel_record;
pub mod maintenance_record;
pub mod notification;
pub mod vehicle;

pub use fuel_record::FuelRecord;
pub use maintenance_record::MaintenanceRecord;
pub use notification::{Notification, NotificationStatus};
pub use vehicle::{ExpiryKind, Vehicle};

/// Nombre del campo que enlaza un registro con su vehículo
pub const VEHICLE_ID_FIELD: &str = "vehicle_id";
