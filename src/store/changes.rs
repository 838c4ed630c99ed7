//! Notificaciones de cambio por colección
//!
//! Un canal `broadcast` por par (usuario, colección). Los suscriptores sólo
//! reciben el aviso de que algo cambió; el snapshot lo relistan ellos.

use std::collections::HashMap;
use std::sync::Mutex;

use tokio::sync::broadcast;

use super::Collection;

const CHANNEL_CAPACITY: usize = 64;

#[derive(Default)]
pub struct ChangeHub {
    senders: Mutex<HashMap<(String, Collection), broadcast::Sender<()>>>,
}

impl ChangeHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Obtener un receptor para los cambios de la colección
    pub fn receiver(&self, user_id: &str, collection: Collection) -> broadcast::Receiver<()> {
        let mut senders = self.senders.lock().unwrap_or_else(|e| e.into_inner());
        senders
            .entry((user_id.to_string(), collection))
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Avisar a los suscriptores de la colección. Un canal sin receptores
    /// se elimina.
    pub fn notify(&self, user_id: &str, collection: Collection) {
        let mut senders = self.senders.lock().unwrap_or_else(|e| e.into_inner());
        let key = (user_id.to_string(), collection);
        let abandoned = match senders.get(&key) {
            Some(sender) => sender.send(()).is_err(),
            None => false,
        };
        if abandoned {
            senders.remove(&key);
        }
    }

    #[cfg(test)]
    fn channel_count(&self) -> usize {
        self.senders.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_notify_reaches_only_matching_receivers() {
        let hub = ChangeHub::new();
        let mut vehicles = hub.receiver("user-1", Collection::Vehicles);
        let mut other_user = hub.receiver("user-2", Collection::Vehicles);

        hub.notify("user-1", Collection::Vehicles);

        assert!(vehicles.recv().await.is_ok());
        assert!(other_user.try_recv().is_err());
    }

    #[test]
    fn test_notify_without_receivers_is_noop() {
        let hub = ChangeHub::new();
        hub.notify("nobody", Collection::FuelRecords);
        assert_eq!(hub.channel_count(), 0);
    }

    #[tokio::test]
    async fn test_channel_dropped_once_receivers_are_gone() {
        let hub = ChangeHub::new();
        let receiver = hub.receiver("user-1", Collection::Vehicles);
        let mut kept = hub.receiver("user-1", Collection::FuelRecords);
        assert_eq!(hub.channel_count(), 2);

        drop(receiver);
        hub.notify("user-1", Collection::Vehicles);
        hub.notify("user-1", Collection::FuelRecords);

        assert_eq!(hub.channel_count(), 1);
        assert!(kept.recv().await.is_ok());

        // Una suscripción nueva vuelve a crear el canal
        let mut again = hub.receiver("user-1", Collection::Vehicles);
        hub.notify("user-1", Collection::Vehicles);
        assert!(again.recv().await.is_ok());
    }
}
