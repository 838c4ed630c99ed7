use serde_json::Value;

use crate::models::{MaintenanceRecord, VEHICLE_ID_FIELD};
use crate::store::{Collection, StoreError};

use super::{Repository, StoredRecord};

pub type MaintenanceRecordRepository = Repository<MaintenanceRecord>;

impl StoredRecord for MaintenanceRecord {
    const COLLECTION: Collection = Collection::MaintenanceRecords;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl Repository<MaintenanceRecord> {
    pub async fn find_by_vehicle(
        &self,
        user_id: &str,
        vehicle_id: &str,
    ) -> Result<Vec<MaintenanceRecord>, StoreError> {
        self.find_where(user_id, VEHICLE_ID_FIELD, Value::String(vehicle_id.to_string()))
            .await
    }
}
