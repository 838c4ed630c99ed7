//! Controladores: validan la request y llaman a los servicios

pub mod auth_controller;
pub mod fuel_controller;
pub mod maintenance_controller;
pub mod notification_controller;
pub mod vehicle_controller;
