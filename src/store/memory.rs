//! Store de documentos en memoria
//!
//! Usado en desarrollo y en los tests. Conserva el orden de creación y
//! permite simular caídas del backend con `set_available`, o sólo de las
//! escrituras de una colección con `set_writable`.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use super::changes::ChangeHub;
use super::{Collection, Document, DocumentStore, Fields, Snapshot, StoreError};

type Key = (String, Collection);

pub struct MemoryStore {
    collections: RwLock<HashMap<Key, Vec<Document>>>,
    hub: ChangeHub,
    available: AtomicBool,
    read_only: Mutex<HashSet<Collection>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            hub: ChangeHub::new(),
            available: AtomicBool::new(true),
            read_only: Mutex::new(HashSet::new()),
        }
    }

    /// Simular que el backend deja de estar disponible (o vuelve)
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("memory store offline".to_string()))
        }
    }

    /// Hacer fallar (o no) las escrituras de una colección
    pub fn set_writable(&self, collection: Collection, writable: bool) {
        let mut read_only = self.read_only.lock().unwrap_or_else(|e| e.into_inner());
        if writable {
            read_only.remove(&collection);
        } else {
            read_only.insert(collection);
        }
    }

    fn ensure_writable(&self, collection: Collection) -> Result<(), StoreError> {
        self.ensure_available()?;
        let read_only = self.read_only.lock().unwrap_or_else(|e| e.into_inner());
        if read_only.contains(&collection) {
            Err(StoreError::Unavailable(format!("{} is read-only", collection)))
        } else {
            Ok(())
        }
    }

    fn key(user_id: &str, collection: Collection) -> Key {
        (user_id.to_string(), collection)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list(&self, user_id: &str, collection: Collection) -> Result<Snapshot, StoreError> {
        self.ensure_available()?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(&Self::key(user_id, collection))
            .cloned()
            .unwrap_or_default())
    }

    async fn get(
        &self,
        user_id: &str,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        self.ensure_available()?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(&Self::key(user_id, collection))
            .and_then(|docs| docs.iter().find(|doc| doc.id == id))
            .cloned())
    }

    async fn create(
        &self,
        user_id: &str,
        collection: Collection,
        fields: Fields,
    ) -> Result<String, StoreError> {
        self.ensure_writable(collection)?;
        let id = Uuid::new_v4().simple().to_string();
        {
            let mut collections = self.collections.write().await;
            collections
                .entry(Self::key(user_id, collection))
                .or_default()
                .push(Document::new(id.clone(), fields));
        }
        self.hub.notify(user_id, collection);
        Ok(id)
    }

    async fn update(
        &self,
        user_id: &str,
        collection: Collection,
        id: &str,
        fields: Fields,
    ) -> Result<(), StoreError> {
        self.ensure_writable(collection)?;
        {
            let mut collections = self.collections.write().await;
            let doc = collections
                .get_mut(&Self::key(user_id, collection))
                .and_then(|docs| docs.iter_mut().find(|doc| doc.id == id))
                .ok_or_else(|| StoreError::NotFound {
                    collection,
                    id: id.to_string(),
                })?;
            for (name, value) in fields {
                doc.fields.insert(name, value);
            }
        }
        self.hub.notify(user_id, collection);
        Ok(())
    }

    async fn delete(&self, user_id: &str, collection: Collection, id: &str) -> Result<(), StoreError> {
        self.ensure_writable(collection)?;
        let removed = {
            let mut collections = self.collections.write().await;
            match collections.get_mut(&Self::key(user_id, collection)) {
                Some(docs) => {
                    let before = docs.len();
                    docs.retain(|doc| doc.id != id);
                    docs.len() != before
                }
                None => false,
            }
        };
        if removed {
            self.hub.notify(user_id, collection);
        }
        Ok(())
    }

    async fn query(
        &self,
        user_id: &str,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> Result<Snapshot, StoreError> {
        self.ensure_available()?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(&Self::key(user_id, collection))
            .map(|docs| {
                docs.iter()
                    .filter(|doc| doc.field(field) == Some(value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn changes(&self, user_id: &str, collection: Collection) -> broadcast::Receiver<()> {
        self.hub.receiver(user_id, collection)
    }
}
