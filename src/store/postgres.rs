//! Store de documentos sobre PostgreSQL
//!
//! Cada documento es una fila de la tabla `documents` con sus campos en
//! JSONB. Los cambios se publican con `pg_notify` y un listener los
//! reenvía a los suscriptores locales, así otros dispositivos (otras
//! instancias) también ven los snapshots nuevos.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgListener;
use sqlx::types::Json;
use sqlx::PgPool;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::changes::ChangeHub;
use super::{Collection, Document, DocumentStore, Fields, Snapshot, StoreError};

const CHANGE_CHANNEL: &str = "document_changes";

#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
    hub: Arc<ChangeHub>,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            hub: Arc::new(ChangeHub::new()),
        }
    }

    /// Arrancar el listener de `pg_notify` en segundo plano
    pub async fn spawn_change_listener(&self) -> Result<(), StoreError> {
        let mut listener = PgListener::connect_with(&self.pool).await?;
        listener.listen(CHANGE_CHANNEL).await?;
        info!("👂 Escuchando cambios de documentos en '{}'", CHANGE_CHANNEL);

        let hub = self.hub.clone();
        tokio::spawn(async move {
            loop {
                match listener.recv().await {
                    Ok(notification) => match parse_payload(notification.payload()) {
                        Some((collection, user_id)) => hub.notify(user_id, collection),
                        None => warn!("⚠️ Payload de cambio inválido: {}", notification.payload()),
                    },
                    Err(e) => {
                        // PgListener reconecta solo en el siguiente recv
                        error!("❌ Error recibiendo cambios de documentos: {}", e);
                    }
                }
            }
        });

        Ok(())
    }

    async fn publish(&self, user_id: &str, collection: Collection) {
        let payload = format!("{}|{}", collection.as_str(), user_id);
        if let Err(e) = sqlx::query("SELECT pg_notify($1, $2)")
            .bind(CHANGE_CHANNEL)
            .bind(&payload)
            .execute(&self.pool)
            .await
        {
            // El cambio ya está guardado; sólo se pierde el aviso en vivo
            warn!("⚠️ No se pudo publicar el cambio {}: {}", payload, e);
        }
    }
}

fn parse_payload(payload: &str) -> Option<(Collection, &str)> {
    let (collection, user_id) = payload.split_once('|')?;
    Some((Collection::from_str(collection)?, user_id))
}

fn map_sqlx_error(e: sqlx::Error) -> StoreError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StoreError::Unavailable(e.to_string())
        }
        other => StoreError::Database(other),
    }
}

fn into_documents(rows: Vec<(String, Json<Fields>)>) -> Snapshot {
    rows.into_iter()
        .map(|(id, Json(fields))| Document::new(id, fields))
        .collect()
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn list(&self, user_id: &str, collection: Collection) -> Result<Snapshot, StoreError> {
        let rows = sqlx::query_as::<_, (String, Json<Fields>)>(
            "SELECT id, fields FROM documents WHERE user_id = $1 AND collection = $2 ORDER BY seq",
        )
        .bind(user_id)
        .bind(collection.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(into_documents(rows))
    }

    async fn get(
        &self,
        user_id: &str,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query_as::<_, (String, Json<Fields>)>(
            "SELECT id, fields FROM documents WHERE user_id = $1 AND collection = $2 AND id = $3",
        )
        .bind(user_id)
        .bind(collection.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(|(id, Json(fields))| Document::new(id, fields)))
    }

    async fn create(
        &self,
        user_id: &str,
        collection: Collection,
        fields: Fields,
    ) -> Result<String, StoreError> {
        let id = Uuid::new_v4().simple().to_string();

        sqlx::query(
            r#"
            INSERT INTO documents (user_id, collection, id, fields)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(user_id)
        .bind(collection.as_str())
        .bind(&id)
        .bind(Json(fields))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        debug!("📄 Documento creado {}/{} para {}", collection, id, user_id);
        self.publish(user_id, collection).await;
        Ok(id)
    }

    async fn update(
        &self,
        user_id: &str,
        collection: Collection,
        id: &str,
        fields: Fields,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET fields = fields || $4, updated_at = NOW()
            WHERE user_id = $1 AND collection = $2 AND id = $3
            "#,
        )
        .bind(user_id)
        .bind(collection.as_str())
        .bind(id)
        .bind(Json(fields))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                collection,
                id: id.to_string(),
            });
        }

        self.publish(user_id, collection).await;
        Ok(())
    }

    async fn delete(&self, user_id: &str, collection: Collection, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query(
            "DELETE FROM documents WHERE user_id = $1 AND collection = $2 AND id = $3",
        )
        .bind(user_id)
        .bind(collection.as_str())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() > 0 {
            debug!("🗑️ Documento eliminado {}/{} para {}", collection, id, user_id);
            self.publish(user_id, collection).await;
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
        let rows = sqlx::query_as::<_, (String, Json<Fields>)>(
            r#"
            SELECT id, fields FROM documents
            WHERE user_id = $1 AND collection = $2 AND fields -> $3 = $4
            ORDER BY seq
            "#,
        )
        .bind(user_id)
        .bind(collection.as_str())
        .bind(field)
        .bind(Json(value))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(into_documents(rows))
    }

    fn changes(&self, user_id: &str, collection: Collection) -> broadcast::Receiver<()> {
        self.hub.receiver(user_id, collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_payload() {
        assert_eq!(
            parse_payload("fuel_records|user:42"),
            Some((Collection::FuelRecords, "user:42"))
        );
        assert_eq!(parse_payload("cars|user"), None);
        assert_eq!(parse_payload("no-separator"), None);
    }
}
