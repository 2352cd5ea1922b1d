//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. Los servicios no saben qué backend hay
//! detrás de los repositorios.

use sqlx::PgPool;
use std::sync::Arc;

use crate::config::environment::{EnvironmentConfig, StorageBackend};
use crate::repositories::{
    DriverRepository, InMemoryDriverRepository, InMemoryPassengerRepository, InMemoryRideRepository,
    PassengerRepository, PgDriverRepository, PgPassengerRepository, PgRideRepository, RideRepository,
};
use crate::services::{DriverService, PassengerService, RideService};

#[derive(Clone)]
pub struct AppState {
    pub rides: Arc<RideService>,
    pub passengers: Arc<PassengerService>,
    pub drivers: Arc<DriverService>,
    pub backend: StorageBackend,
    pub config: Arc<EnvironmentConfig>,
}

impl AppState {
    /// Montar los servicios sobre un juego de repositorios
    pub fn new(
        config: EnvironmentConfig,
        backend: StorageBackend,
        rides: Arc<dyn RideRepository>,
        passengers: Arc<dyn PassengerRepository>,
        drivers: Arc<dyn DriverRepository>,
    ) -> Self {
        Self {
            rides: Arc::new(RideService::new(rides, passengers.clone(), drivers.clone())),
            passengers: Arc::new(PassengerService::new(passengers)),
            drivers: Arc::new(DriverService::new(drivers)),
            backend,
            config: Arc::new(config),
        }
    }

    /// Estado con todos los repositorios en memoria
    pub fn in_memory(config: EnvironmentConfig) -> Self {
        Self::new(
            config,
            StorageBackend::Memory,
            Arc::new(InMemoryRideRepository::new()),
            Arc::new(InMemoryPassengerRepository::new()),
            Arc::new(InMemoryDriverRepository::new()),
        )
    }

    /// Estado con todos los repositorios sobre PostgreSQL
    pub fn postgres(config: EnvironmentConfig, pool: PgPool) -> Self {
        Self::new(
            config,
            StorageBackend::Postgres,
            Arc::new(PgRideRepository::new(pool.clone())),
            Arc::new(PgPassengerRepository::new(pool.clone())),
            Arc::new(PgDriverRepository::new(pool)),
        )
    }
}
