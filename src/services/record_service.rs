//! Servicio de registros
//!
//! Mantiene coherentes vehículos, repostajes y mantenimientos:
//! - el kilometraje del vehículo sigue al máximo de sus repostajes
//! - borrar un vehículo borra sus registros dependientes
//! - `is_planned` se calcula al guardar cada mantenimiento
//!
//! Nada de esto es transaccional. Un fallo a mitad de camino se registra
//! en el log y se devuelve, sin reintentos ni rollback.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use tracing::{debug, error, info, warn};

use crate::models::fuel_record::max_mileage;
use crate::models::maintenance_record::is_planned_at;
use crate::models::{FuelRecord, MaintenanceRecord, Vehicle};
use crate::repositories::{FuelRecordRepository, MaintenanceRecordRepository, VehicleRepository};
use crate::store::{DocumentStore, StoreError};
use crate::utils::errors::{AppError, AppResult};

/// Resultado del borrado en cascada de un vehículo
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct CascadeReport {
    pub fuel_records_deleted: usize,
    pub maintenance_records_deleted: usize,
    pub failures: usize,
}

#[derive(Clone)]
pub struct RecordService {
    vehicles: VehicleRepository,
    fuel_records: FuelRecordRepository,
    maintenance_records: MaintenanceRecordRepository,
}

impl RecordService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            vehicles: VehicleRepository::new(store.clone()),
            fuel_records: FuelRecordRepository::new(store.clone()),
            maintenance_records: MaintenanceRecordRepository::new(store),
        }
    }

    // ==================== VEHÍCULOS ====================

    pub async fn list_vehicles(&self, user_id: &str) -> AppResult<Vec<Vehicle>> {
        self.vehicles
            .list(user_id)
            .await
            .map_err(|e| logged("listar vehículos", e))
    }

    pub async fn get_vehicle(&self, user_id: &str, id: &str) -> AppResult<Vehicle> {
        self.vehicles
            .get(user_id, id)
            .await
            .map_err(|e| logged("obtener vehículo", e))
    }

    pub async fn create_vehicle(&self, user_id: &str, vehicle: Vehicle) -> AppResult<Vehicle> {
        let vehicle = self
            .vehicles
            .create(user_id, vehicle)
            .await
            .map_err(|e| logged("crear vehículo", e))?;
        info!("🚗 Vehículo creado: {} ({})", vehicle.name, vehicle.id);
        Ok(vehicle)
    }

    /// Guardar el vehículo completo; tiene que existir
    pub async fn update_vehicle(&self, user_id: &str, vehicle: &Vehicle) -> AppResult<()> {
        self.vehicles
            .save(user_id, vehicle)
            .await
            .map_err(|e| logged("actualizar vehículo", e))?;
        info!("🚗 Vehículo actualizado: {}", vehicle.id);
        Ok(())
    }

    /// Borrar el vehículo y después todos sus registros.
    ///
    /// Los borrados dependientes se lanzan a la vez y se esperan todos. Si
    /// alguno falla se devuelve `Internal`; lo ya borrado no se restaura.
    pub async fn delete_vehicle(&self, user_id: &str, id: &str) -> AppResult<CascadeReport> {
        self.vehicles
            .get(user_id, id)
            .await
            .map_err(|e| logged("obtener vehículo a borrar", e))?;
        self.vehicles
            .delete(user_id, id)
            .await
            .map_err(|e| logged("borrar vehículo", e))?;

        let fuel_records = self
            .fuel_records
            .find_by_vehicle(user_id, id)
            .await
            .map_err(|e| logged("buscar repostajes del vehículo borrado", e))?;
        let maintenance_records = self
            .maintenance_records
            .find_by_vehicle(user_id, id)
            .await
            .map_err(|e| logged("buscar mantenimientos del vehículo borrado", e))?;

        let fuel_results = join_all(
            fuel_records
                .iter()
                .map(|record| self.fuel_records.delete(user_id, &record.id)),
        );
        let maintenance_results = join_all(
            maintenance_records
                .iter()
                .map(|record| self.maintenance_records.delete(user_id, &record.id)),
        );
        let (fuel_results, maintenance_results) = futures::join!(fuel_results, maintenance_results);

        let mut report = CascadeReport::default();
        for result in fuel_results {
            match result {
                Ok(()) => report.fuel_records_deleted += 1,
                Err(e) => {
                    error!("❌ Error borrando repostaje del vehículo {}: {}", id, e);
                    report.failures += 1;
                }
            }
        }
        for result in maintenance_results {
            match result {
                Ok(()) => report.maintenance_records_deleted += 1,
                Err(e) => {
                    error!("❌ Error borrando mantenimiento del vehículo {}: {}", id, e);
                    report.failures += 1;
                }
            }
        }

        if report.failures > 0 {
            return Err(AppError::Internal(format!(
                "Vehicle {} deleted but {} dependent records could not be deleted",
                id, report.failures
            )));
        }

        info!(
            "🗑️ Vehículo {} borrado con {} repostajes y {} mantenimientos",
            id, report.fuel_records_deleted, report.maintenance_records_deleted
        );
        Ok(report)
    }

    // ==================== COMBUSTIBLE ====================

    pub async fn list_fuel_records(&self, user_id: &str) -> AppResult<Vec<FuelRecord>> {
        self.fuel_records
            .list(user_id)
            .await
            .map_err(|e| logged("listar repostajes", e))
    }

    pub async fn get_fuel_record(&self, user_id: &str, id: &str) -> AppResult<FuelRecord> {
        self.fuel_records
            .get(user_id, id)
            .await
            .map_err(|e| logged("obtener repostaje", e))
    }

    /// Guardar un repostaje nuevo. El kilometraje del vehículo sólo sube.
    pub async fn add_fuel_record(&self, user_id: &str, record: FuelRecord) -> AppResult<FuelRecord> {
        self.ensure_vehicle(user_id, &record.vehicle_id).await?;

        let record = self
            .fuel_records
            .create(user_id, record)
            .await
            .map_err(|e| logged("crear repostaje", e))?;

        let vehicle = self
            .vehicles
            .get(user_id, &record.vehicle_id)
            .await
            .map_err(|e| logged("leer vehículo tras repostaje", e))?;

        if record.mileage > vehicle.mileage {
            self.vehicles
                .update_mileage(user_id, &vehicle.id, record.mileage)
                .await
                .map_err(|e| logged("subir kilometraje", e))?;
            debug!(
                "Kilometraje de {} actualizado {} -> {}",
                vehicle.id, vehicle.mileage, record.mileage
            );
        }

        Ok(record)
    }

    /// Guardar la edición y recalcular el kilometraje del vehículo.
    ///
    /// Si el repostaje cambia de vehículo se recalculan los dos.
    pub async fn edit_fuel_record(&self, user_id: &str, record: &FuelRecord) -> AppResult<()> {
        let previous = self.get_fuel_record(user_id, &record.id).await?;
        self.ensure_vehicle(user_id, &record.vehicle_id).await?;

        self.fuel_records
            .save(user_id, record)
            .await
            .map_err(|e| logged("editar repostaje", e))?;

        self.reconcile_mileage(user_id, &record.vehicle_id).await?;
        if previous.vehicle_id != record.vehicle_id {
            info!(
                "⛽ Repostaje {} movido de {} a {}",
                record.id, previous.vehicle_id, record.vehicle_id
            );
            self.reconcile_orphaned(user_id, &record.id, &previous.vehicle_id).await?;
        }
        Ok(())
    }

    /// Borrar el repostaje y recalcular el kilometraje del vehículo
    pub async fn delete_fuel_record(&self, user_id: &str, id: &str) -> AppResult<()> {
        let record = self.get_fuel_record(user_id, id).await?;

        self.fuel_records
            .delete(user_id, id)
            .await
            .map_err(|e| logged("borrar repostaje", e))?;

        self.reconcile_orphaned(user_id, id, &record.vehicle_id).await
    }

    // Recalcular un vehículo que puede haber desaparecido
    async fn reconcile_orphaned(&self, user_id: &str, record_id: &str, vehicle_id: &str) -> AppResult<()> {
        match self.reconcile_mileage(user_id, vehicle_id).await {
            Err(AppError::Store(StoreError::NotFound { .. })) => {
                warn!("Repostaje {} sin vehículo {}", record_id, vehicle_id);
                Ok(())
            }
            other => other.map(|_| ()),
        }
    }

    /// Fijar el kilometraje del vehículo al máximo de sus repostajes (0 si no hay).
    /// Devuelve el kilometraje resultante.
    pub async fn reconcile_mileage(&self, user_id: &str, vehicle_id: &str) -> AppResult<i64> {
        let records = self
            .fuel_records
            .find_by_vehicle(user_id, vehicle_id)
            .await
            .map_err(|e| logged("recalcular kilometraje", e))?;
        let mileage = max_mileage(&records);

        let vehicle = self
            .vehicles
            .get(user_id, vehicle_id)
            .await
            .map_err(|e| logged("leer vehículo para recalcular kilometraje", e))?;

        if vehicle.mileage != mileage {
            self.vehicles
                .update_mileage(user_id, vehicle_id, mileage)
                .await
                .map_err(|e| logged("guardar kilometraje recalculado", e))?;
            debug!(
                "Kilometraje de {} recalculado {} -> {}",
                vehicle_id, vehicle.mileage, mileage
            );
        }

        Ok(mileage)
    }

    // ==================== MANTENIMIENTO ====================

    pub async fn list_maintenance_records(&self, user_id: &str) -> AppResult<Vec<MaintenanceRecord>> {
        self.maintenance_records
            .list(user_id)
            .await
            .map_err(|e| logged("listar mantenimientos", e))
    }

    pub async fn get_maintenance_record(&self, user_id: &str, id: &str) -> AppResult<MaintenanceRecord> {
        self.maintenance_records
            .get(user_id, id)
            .await
            .map_err(|e| logged("obtener mantenimiento", e))
    }

    pub async fn add_maintenance_record(
        &self,
        user_id: &str,
        mut record: MaintenanceRecord,
        now: DateTime<Utc>,
    ) -> AppResult<MaintenanceRecord> {
        self.ensure_vehicle(user_id, &record.vehicle_id).await?;

        record.is_planned = is_planned_at(record.date, now);
        let record = self
            .maintenance_records
            .create(user_id, record)
            .await
            .map_err(|e| logged("crear mantenimiento", e))?;

        info!(
            "🔧 Mantenimiento {} guardado ({})",
            record.id,
            if record.is_planned { "planificado" } else { "realizado" }
        );
        Ok(record)
    }

    pub async fn edit_maintenance_record(
        &self,
        user_id: &str,
        record: &mut MaintenanceRecord,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        self.ensure_vehicle(user_id, &record.vehicle_id).await?;

        record.is_planned = is_planned_at(record.date, now);
        self.maintenance_records
            .save(user_id, record)
            .await
            .map_err(|e| logged("editar mantenimiento", e))
    }

    pub async fn delete_maintenance_record(&self, user_id: &str, id: &str) -> AppResult<()> {
        self.get_maintenance_record(user_id, id).await?;
        self.maintenance_records
            .delete(user_id, id)
            .await
            .map_err(|e| logged("borrar mantenimiento", e))
    }

    async fn ensure_vehicle(&self, user_id: &str, vehicle_id: &str) -> AppResult<()> {
        self.vehicles
            .get(user_id, vehicle_id)
            .await
            .map(|_| ())
            .map_err(|e| logged("comprobar vehículo del registro", e))
    }
}

fn logged(operation: &str, e: StoreError) -> AppError {
    match &e {
        StoreError::NotFound { .. } => warn!("⚠️ {}: {}", operation, e),
        _ => error!("❌ Error al {}: {}", operation, e),
    }
    AppError::Store(e)
}
