use serde_json::json;

use crate::models::Vehicle;
use crate::store::{Collection, Fields, StoreError};

use super::{Repository, StoredRecord};

pub type VehicleRepository = Repository<Vehicle>;

impl StoredRecord for Vehicle {
    const COLLECTION: Collection = Collection::Vehicles;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl Repository<Vehicle> {
    /// Actualizar sólo el kilometraje del vehículo
    pub async fn update_mileage(&self, user_id: &str, id: &str, mileage: i64) -> Result<(), StoreError> {
        let mut fields = Fields::new();
        fields.insert("mileage".to_string(), json!(mileage));
        self.update_fields(user_id, id, fields).await
    }
}
