//! Car Manager
//!
//! Backend para llevar los coches de cada usuario: vehículos, repostajes,
//! mantenimientos y los avisos de vencimiento que se derivan de ellos.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod session;
pub mod state;
pub mod store;
pub mod utils;

pub use routes::create_router;
pub use state::AppState;
