use serde_json::Value;

use crate::models::{FuelRecord, VEHICLE_ID_FIELD};
use crate::store::{Collection, StoreError};

use super::{Repository, StoredRecord};

pub type FuelRecordRepository = Repository<FuelRecord>;

impl StoredRecord for FuelRecord {
    const COLLECTION: Collection = Collection::FuelRecords;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl Repository<FuelRecord> {
    /// Todos los repostajes de un vehículo
    pub async fn find_by_vehicle(&self, user_id: &str, vehicle_id: &str) -> Result<Vec<FuelRecord>, StoreError> {
        self.find_where(user_id, VEHICLE_ID_FIELD, Value::String(vehicle_id.to_string()))
            .await
    }
}
