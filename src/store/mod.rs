//! Store de documentos por usuario
//!
//! Este módulo define la abstracción de almacenamiento de documentos:
//! cada usuario tiene su propio namespace con tres colecciones (vehículos,
//! registros de combustible y registros de mantenimiento). Las
//! implementaciones concretas viven en `memory` y `postgres`.

pub mod changes;
pub mod memory;
pub mod postgres;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::broadcast::{self, error::RecvError};

pub use memory::MemoryStore;
pub use postgres::PgDocumentStore;

/// Campos de un documento (objeto JSON plano)
pub type Fields = serde_json::Map<String, Value>;

/// Snapshot completo y ordenado de una colección
pub type Snapshot = Vec<Document>;

/// Secuencia perezosa e infinita de snapshots de una colección
pub type SnapshotStream = BoxStream<'static, Result<Snapshot, StoreError>>;

/// Colecciones disponibles dentro del namespace de un usuario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Vehicles,
    FuelRecords,
    MaintenanceRecords,
}

impl Collection {
    pub const ALL: [Collection; 3] = [
        Collection::Vehicles,
        Collection::FuelRecords,
        Collection::MaintenanceRecords,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Vehicles => "vehicles",
            Collection::FuelRecords => "fuel_records",
            Collection::MaintenanceRecords => "maintenance_records",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "vehicles" => Some(Collection::Vehicles),
            "fuel_records" => Some(Collection::FuelRecords),
            "maintenance_records" => Some(Collection::MaintenanceRecords),
            _ => None,
        }
    }

    /// Nombre legible de un documento de la colección
    pub fn singular(&self) -> &'static str {
        match self {
            Collection::Vehicles => "Vehicle",
            Collection::FuelRecords => "Fuel record",
            Collection::MaintenanceRecords => "Maintenance record",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errores de la capa de almacenamiento
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Document not found: {collection}/{id}")]
    NotFound { collection: Collection, id: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Documento almacenado: identificador asignado por el store + campos
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Decodificar el documento a un tipo del modelo, inyectando el `id`
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        let mut fields = self.fields.clone();
        fields.insert("id".to_string(), Value::String(self.id.clone()));
        Ok(serde_json::from_value(Value::Object(fields))?)
    }

    /// Leer un campo concreto
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

/// Codificar un valor del modelo como campos de documento (sin `id`)
pub fn encode_fields<T: Serialize>(value: &T) -> Result<Fields, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(mut fields) => {
            fields.remove("id");
            Ok(fields)
        }
        other => Err(StoreError::Serialization(serde::ser::Error::custom(format!(
            "expected a JSON object, got {}",
            other
        )))),
    }
}

/// Store de documentos con namespace por usuario.
///
/// `update` hace un merge superficial de los campos recibidos: el último
/// que escribe gana a nivel de campo. `delete` de un documento inexistente
/// no es un error.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Listar la colección completa en orden de creación
    async fn list(&self, user_id: &str, collection: Collection) -> Result<Snapshot, StoreError>;

    /// Obtener un documento por id
    async fn get(
        &self,
        user_id: &str,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Document>, StoreError>;

    /// Crear un documento y devolver el id asignado
    async fn create(
        &self,
        user_id: &str,
        collection: Collection,
        fields: Fields,
    ) -> Result<String, StoreError>;

    /// Actualizar parcialmente un documento existente
    async fn update(
        &self,
        user_id: &str,
        collection: Collection,
        id: &str,
        fields: Fields,
    ) -> Result<(), StoreError>;

    /// Eliminar un documento
    async fn delete(&self, user_id: &str, collection: Collection, id: &str) -> Result<(), StoreError>;

    /// Documentos cuyo campo `field` es igual a `value`
    async fn query(
        &self,
        user_id: &str,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> Result<Snapshot, StoreError>;

    /// Receptor de notificaciones de cambio para una colección
    fn changes(&self, user_id: &str, collection: Collection) -> broadcast::Receiver<()>;
}

/// Suscribirse a una colección.
///
/// El primer elemento es el snapshot actual; después se emite un snapshot
/// completo por cada cambio. La secuencia no se puede reiniciar: para volver
/// a empezar hay que crear otra suscripción.
pub fn subscribe(
    store: Arc<dyn DocumentStore>,
    user_id: impl Into<String>,
    collection: Collection,
) -> SnapshotStream {
    let user_id = user_id.into();
    // El receptor se crea antes del primer listado para no perder cambios
    let changes = store.changes(&user_id, collection);

    let state = Subscription {
        store,
        user_id,
        collection,
        changes,
        primed: false,
    };

    stream::unfold(state, |mut sub| async move {
        if sub.primed {
            match sub.changes.recv().await {
                Ok(()) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(
                        "Suscripción {} atrasada ({} cambios), se relista",
                        sub.collection,
                        skipped
                    );
                }
                Err(RecvError::Closed) => return None,
            }
        }
        sub.primed = true;
        let snapshot = sub.store.list(&sub.user_id, sub.collection).await;
        Some((snapshot, sub))
    })
    .boxed()
}

struct Subscription {
    store: Arc<dyn DocumentStore>,
    user_id: String,
    collection: Collection,
    changes: broadcast::Receiver<()>,
    primed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Sample {
        #[serde(default)]
        id: String,
        name: String,
    }

    #[test]
    fn test_encode_strips_id() {
        let sample = Sample {
            id: "abc".to_string(),
            name: "Civic".to_string(),
        };
        let fields = encode_fields(&sample).unwrap();
        assert!(!fields.contains_key("id"));
        assert_eq!(fields["name"], json!("Civic"));
    }

    #[test]
    fn test_decode_injects_id() {
        let mut fields = Fields::new();
        fields.insert("name".to_string(), json!("Golf"));
        let doc = Document::new("doc-1", fields);
        let sample: Sample = doc.decode().unwrap();
        assert_eq!(sample.id, "doc-1");
        assert_eq!(sample.name, "Golf");
    }

    #[test]
    fn test_encode_rejects_non_objects() {
        assert!(encode_fields(&42).is_err());
    }

    #[test]
    fn test_collection_names() {
        for collection in Collection::ALL {
            assert_eq!(Collection::from_str(collection.as_str()), Some(collection));
        }
        assert_eq!(Collection::from_str("cars"), None);
    }
}
