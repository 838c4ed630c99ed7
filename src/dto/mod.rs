//! DTOs de la API
//!
//! Requests validados con `validator` y respuestas serializadas con `serde`.

pub mod api_response;
pub mod auth_dto;
pub mod fuel_dto;
pub mod maintenance_dto;
pub mod notification_dto;
pub mod vehicle_dto;

pub use api_response::ApiResponse;
