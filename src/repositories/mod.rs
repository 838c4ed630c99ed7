//! Repositorios tipados sobre el store de documentos
//!
//! Cada repositorio traduce entre documentos JSON y los modelos del
//! dominio y fija la colección con la que trabaja.

pub mod fuel_record_repository;
pub mod maintenance_record_repository;
pub mod vehicle_repository;

use std::marker::PhantomData;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use crate::store::{encode_fields, Collection, Document, DocumentStore, Fields, StoreError};

pub use fuel_record_repository::FuelRecordRepository;
pub use maintenance_record_repository::MaintenanceRecordRepository;
pub use vehicle_repository::VehicleRepository;

/// Modelo que se guarda como documento en una colección concreta
pub trait StoredRecord: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: Collection;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
}

/// Decodificar un snapshot completo
pub fn decode_all<T: StoredRecord>(docs: &[Document]) -> Result<Vec<T>, StoreError> {
    docs.iter().map(|doc| doc.decode::<T>()).collect()
}

pub struct Repository<T> {
    store: Arc<dyn DocumentStore>,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _record: PhantomData,
        }
    }
}

impl<T: StoredRecord> Repository<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    /// Guardar un registro nuevo; el id lo asigna el store
    pub async fn create(&self, user_id: &str, mut record: T) -> Result<T, StoreError> {
        let id = self
            .store
            .create(user_id, T::COLLECTION, encode_fields(&record)?)
            .await?;
        record.set_id(id);
        Ok(record)
    }

    pub async fn find_by_id(&self, user_id: &str, id: &str) -> Result<Option<T>, StoreError> {
        self.store
            .get(user_id, T::COLLECTION, id)
            .await?
            .map(|doc| doc.decode())
            .transpose()
    }

    /// Como `find_by_id` pero un documento inexistente es `NotFound`
    pub async fn get(&self, user_id: &str, id: &str) -> Result<T, StoreError> {
        self.find_by_id(user_id, id)
            .await?
            .ok_or_else(|| StoreError::NotFound {
                collection: T::COLLECTION,
                id: id.to_string(),
            })
    }

    pub async fn list(&self, user_id: &str) -> Result<Vec<T>, StoreError> {
        let docs = self.store.list(user_id, T::COLLECTION).await?;
        decode_all(&docs)
    }

    /// Sobrescribir todos los campos del registro
    pub async fn save(&self, user_id: &str, record: &T) -> Result<(), StoreError> {
        self.store
            .update(user_id, T::COLLECTION, record.id(), encode_fields(record)?)
            .await
    }

    pub async fn update_fields(&self, user_id: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        self.store.update(user_id, T::COLLECTION, id, fields).await
    }

    pub async fn delete(&self, user_id: &str, id: &str) -> Result<(), StoreError> {
        self.store.delete(user_id, T::COLLECTION, id).await
    }

    pub(crate) async fn find_where(
        &self,
        user_id: &str,
        field: &str,
        value: serde_json::Value,
    ) -> Result<Vec<T>, StoreError> {
        let docs = self.store.query(user_id, T::COLLECTION, field, &value).await?;
        decode_all(&docs)
    }
}
