//! Notificaciones de renovación
//!
//! Se derivan en cada cambio de vehículos o mantenimientos y nunca se guardan.

use chrono::NaiveDate;
use serde::Serialize;

/// Días a partir de los cuales un vencimiento entra en la lista
pub const NOTIFICATION_WINDOW_DAYS: i64 = 30;

/// Días a partir de los cuales un vencimiento se considera urgente
pub const URGENT_WINDOW_DAYS: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NotificationStatus {
    #[serde(rename = "expired")]
    Expired,
    #[serde(rename = "upcoming-10")]
    Upcoming10,
    #[serde(rename = "upcoming-30")]
    Upcoming30,
}

impl NotificationStatus {
    /// `<= 0` vencido, `<= 10` próximo, resto dentro de los 30 días
    pub fn from_days_left(days_left: i64) -> Self {
        if days_left <= 0 {
            NotificationStatus::Expired
        } else if days_left <= URGENT_WINDOW_DAYS {
            NotificationStatus::Upcoming10
        } else {
            NotificationStatus::Upcoming30
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationStatus::Expired => "expired",
            NotificationStatus::Upcoming10 => "upcoming-10",
            NotificationStatus::Upcoming30 => "upcoming-30",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub vehicle_id: String,
    pub vehicle_name: String,
    /// "Insurance", "MOT", "Planned Service: Oil Change", ...
    pub kind: String,
    pub date: NaiveDate,
    pub days_left: i64,
    pub status: NotificationStatus,
}

impl Notification {
    /// Texto corto para la UI
    pub fn remaining_label(&self) -> String {
        if self.days_left <= 0 {
            "Expired".to_string()
        } else {
            format!("{} days left", self.days_left)
        }
    }
}
