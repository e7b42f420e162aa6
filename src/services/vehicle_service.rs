//! Servicio de vehículos
//!
//! Operaciones de negocio sobre la colección `cars`: validación de entrada,
//! traducción de nombres de campo y lecturas filtradas.

use std::sync::Arc;

use futures::TryStreamExt;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

use crate::database::{DocumentStore, FieldFilter, StoreError};
use crate::models::record;
use crate::models::vehicle::{
    Vehicle, VehicleCreate, VehicleFilters, VehicleUpdate, COLLECTION_NAME, FIELD_MAPPING,
};
use crate::utils::errors::AppResult;

#[derive(Clone)]
pub struct VehicleService {
    store: Arc<dyn DocumentStore>,
}

impl VehicleService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Registrar un vehículo nuevo; el id lo asigna el almacén
    #[instrument(skip(self, input), fields(vin = %input.vin))]
    pub async fn create(&self, input: VehicleCreate) -> AppResult<Vehicle> {
        let mut vehicle = Vehicle::new(input)?;
        vehicle.id = self.store.put(COLLECTION_NAME, vehicle.to_record()).await?;

        info!("🚗 Vehículo creado: {} {} ({})", vehicle.brand, vehicle.model, vehicle.id);
        Ok(vehicle)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> AppResult<Option<Vehicle>> {
        let data = self.store.get(COLLECTION_NAME, id).await?;
        Ok(data.map(|data| Vehicle::from_record(&data, id)))
    }

    /// Listado con filtros de igualdad; `status` y `manager` se combinan con AND
    #[instrument(skip(self))]
    pub async fn list(&self, filters: VehicleFilters) -> AppResult<Vec<Vehicle>> {
        let mut conditions = Vec::new();
        if let Some(status) = filters.status {
            conditions.push(FieldFilter::eq("status", status));
        }
        if let Some(manager) = filters.manager {
            conditions.push(FieldFilter::eq("manager", manager));
        }

        let vehicles: Vec<Vehicle> = self
            .store
            .stream(COLLECTION_NAME, conditions, filters.limit)
            .map_ok(|doc| Vehicle::from_record(&doc.data, &doc.id))
            .try_collect()
            .await?;

        debug!("📋 {} vehículos listados", vehicles.len());
        Ok(vehicles)
    }

    pub async fn list_by_manager(&self, manager: &str) -> AppResult<Vec<Vehicle>> {
        self.list(VehicleFilters {
            manager: Some(manager.to_string()),
            ..VehicleFilters::default()
        })
        .await
    }

    /// Actualización parcial: solo se escriben los campos presentes en `patch`.
    /// Comprobación, escritura y relectura son tres llamadas independientes al almacén.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: &str, patch: VehicleUpdate) -> AppResult<Option<Vehicle>> {
        patch.validate()?;

        if self.store.get(COLLECTION_NAME, id).await?.is_none() {
            debug!("🔍 Vehículo {} no existe, nada que actualizar", id);
            return Ok(None);
        }

        let fields = record::to_store_fields(FIELD_MAPPING, patch.into_fields());
        if !fields.is_empty() {
            match self.store.update(COLLECTION_NAME, id, fields).await {
                Ok(()) => {}
                Err(StoreError::NotFound { .. }) => {
                    warn!("⚠️ Vehículo {} eliminado durante la actualización", id);
                    return Ok(None);
                }
                Err(e) => return Err(e.into()),
            }
        }

        let updated = self.get(id).await?;
        match &updated {
            Some(_) => info!("✏️ Vehículo actualizado: {}", id),
            None => warn!("⚠️ Vehículo {} desapareció tras la actualización", id),
        }
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let deleted = self.store.delete(COLLECTION_NAME, id).await?;
        if deleted {
            info!("🗑️ Vehículo eliminado: {}", id);
        }
        Ok(deleted)
    }
}
