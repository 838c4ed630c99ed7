//! Sesión de usuario: estado (`model`) y bucle en vivo (`runtime`)

pub mod model;
pub mod runtime;

pub use model::{update, AppModel, AuthState, Modal, Msg, Tab};
pub use runtime::watch_model;
