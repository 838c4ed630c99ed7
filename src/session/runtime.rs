//! Bucle de la sesión en vivo
//!
//! Une las suscripciones de las tres colecciones en un único flujo de
//! mensajes y lo pliega con `update`, produciendo un `AppModel` por cambio.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future;
use futures::stream::{self, BoxStream, StreamExt};

use crate::models::{FuelRecord, MaintenanceRecord, Vehicle};
use crate::repositories::{decode_all, StoredRecord};
use crate::services::auth_service::UserIdentity;
use crate::store::{subscribe, Collection, DocumentStore};

use super::model::{update, AppModel, Msg};

/// Modelos sucesivos de la sesión de `user`.
///
/// El primer modelo es el de la sesión recién iniciada (todo cargando);
/// después llega uno por cada snapshot de cualquiera de las colecciones.
pub fn watch_model<F>(store: Arc<dyn DocumentStore>, user: UserIdentity, now_fn: F) -> BoxStream<'static, AppModel>
where
    F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
{
    let user_id = user.user_id.clone();

    let messages = stream::select_all(vec![
        collection_messages::<Vehicle>(store.clone(), &user_id, Msg::VehiclesLoaded),
        collection_messages::<FuelRecord>(store.clone(), &user_id, Msg::FuelRecordsLoaded),
        collection_messages::<MaintenanceRecord>(store, &user_id, Msg::MaintenanceRecordsLoaded),
    ]);

    let mut initial = AppModel::default();
    update(&mut initial, Msg::SignedIn(user), now_fn());

    let models = messages.scan(initial.clone(), move |model, msg| {
        update(model, msg, now_fn());
        future::ready(Some(model.clone()))
    });

    stream::once(future::ready(initial)).chain(models).boxed()
}

fn collection_messages<T>(
    store: Arc<dyn DocumentStore>,
    user_id: &str,
    loaded: fn(Vec<T>) -> Msg,
) -> BoxStream<'static, Msg>
where
    T: StoredRecord + 'static,
{
    let collection: Collection = T::COLLECTION;
    subscribe(store, user_id, collection)
        .map(move |snapshot| match snapshot.and_then(|docs| decode_all::<T>(&docs)) {
            Ok(records) => loaded(records),
            Err(e) => Msg::SubscriptionFailed {
                collection,
                message: e.to_string(),
            },
        })
        .boxed()
}
