//! Modelo de Vehicle
//!
//! Un coche del usuario con las cuatro fechas de vencimiento de sus
//! documentos y el kilometraje que se mantiene a partir del combustible.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Tipo de vencimiento que se vigila en cada vehículo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryKind {
    Insurance,
    Tax,
    RoadTax,
    Mot,
}

impl ExpiryKind {
    pub const ALL: [ExpiryKind; 4] = [
        ExpiryKind::Insurance,
        ExpiryKind::Tax,
        ExpiryKind::RoadTax,
        ExpiryKind::Mot,
    ];

    /// Etiqueta mostrada en las notificaciones
    pub fn label(&self) -> &'static str {
        match self {
            ExpiryKind::Insurance => "Insurance",
            ExpiryKind::Tax => "Tax",
            ExpiryKind::RoadTax => "Road Tax",
            ExpiryKind::Mot => "MOT",
        }
    }
}

/// Vehicle tal y como vive en la colección `vehicles`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub year: i32,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub mileage: i64,
    pub insurance_expiry: NaiveDate,
    pub tax_expiry: NaiveDate,
    pub road_tax_expiry: NaiveDate,
    pub mot_expiry: NaiveDate,
    /// Foto como data URL (`data:image/jpeg;base64,...`)
    #[serde(default)]
    pub photo: Option<String>,
}

impl Vehicle {
    pub fn expiry(&self, kind: ExpiryKind) -> NaiveDate {
        match kind {
            ExpiryKind::Insurance => self.insurance_expiry,
            ExpiryKind::Tax => self.tax_expiry,
            ExpiryKind::RoadTax => self.road_tax_expiry,
            ExpiryKind::Mot => self.mot_expiry,
        }
    }

    /// Los cuatro vencimientos en orden fijo: seguro, impuesto, impuesto de circulación, ITV
    pub fn expiries(&self) -> [(ExpiryKind, NaiveDate); 4] {
        ExpiryKind::ALL.map(|kind| (kind, self.expiry(kind)))
    }
}
