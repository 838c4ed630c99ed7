use serde::{Deserialize, Serialize};

use crate::models::Notification;

// Filtros de la pestaña de notificaciones
#[derive(Debug, Default, Deserialize)]
pub struct NotificationFilters {
    pub vehicle_id: Option<String>,
}

// Notificación con el texto de días restantes ya calculado
#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    #[serde(flatten)]
    pub notification: Notification,
    pub remaining: String,
}

impl From<Notification> for NotificationResponse {
    fn from(notification: Notification) -> Self {
        Self {
            remaining: notification.remaining_label(),
            notification,
        }
    }
}
