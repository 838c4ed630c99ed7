//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación: coherencia
//! entre registros, derivación de notificaciones, filtros de listados y
//! autenticación.

pub mod auth_service;
pub mod notification_service;
pub mod record_filters;
pub mod record_service;

pub use auth_service::AuthService;
pub use record_service::RecordService;
