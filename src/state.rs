//! Shared application state
//!
//! Estado compartido que se pasa a través del router de Axum: la
//! configuración, el almacén y los servicios construidos sobre él.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::database::DocumentStore;
use crate::services::{StaffService, VehicleService};

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub store: Arc<dyn DocumentStore>,
    pub vehicles: VehicleService,
    pub staff: StaffService,
}

impl AppState {
    /// El mismo handle del almacén se inyecta en cada servicio
    pub fn new(config: EnvironmentConfig, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            vehicles: VehicleService::new(store.clone()),
            staff: StaffService::new(store.clone()),
            config,
            store,
        }
    }
}
