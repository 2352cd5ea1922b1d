//! Repositorio de viajes
//!
//! Dueño de los registros canónicos de `Ride`. Asigna los ids y aplica las
//! escrituras de forma atómica por registro. Las reglas de negocio no viven
//! aquí: el servicio entrega un guard que el repositorio evalúa dentro del
//! mismo ámbito atómico que la escritura.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::context::RequestContext;
use crate::models::{DriverId, NewRide, Ride, RideId, RideStatus};
use crate::utils::errors::{AppError, AppResult};

/// Regla evaluada sobre el registro actual antes de cambiar su estado
pub type StatusGuard = dyn Fn(&Ride) -> AppResult<()> + Send + Sync;

/// Regla evaluada sobre el registro actual y el viaje activo del conductor
pub type AssignmentGuard = dyn Fn(&Ride, Option<&Ride>) -> AppResult<()> + Send + Sync;

/// Guard que acepta cualquier cambio de estado
#[cfg(test)]
pub(crate) fn allow_any_status(_: &Ride) -> AppResult<()> {
    Ok(())
}

/// Guard que acepta cualquier asignación
#[cfg(test)]
pub(crate) fn allow_any_assignment(_: &Ride, _: Option<&Ride>) -> AppResult<()> {
    Ok(())
}

/// Contrato común de los backends de viajes (memoria y PostgreSQL).
///
/// Todas las operaciones verifican el contexto antes de tomar locks o de
/// abrir una transacción.
#[async_trait]
pub trait RideRepository: Send + Sync {
    /// Guarda el viaje como `pending` y devuelve el siguiente id secuencial
    async fn create(&self, ctx: &RequestContext, ride: NewRide) -> AppResult<RideId>;

    async fn get_by_id(&self, ctx: &RequestContext, id: RideId) -> AppResult<Ride>;

    /// Snapshot de todos los viajes, sin orden garantizado
    async fn list_all(&self, ctx: &RequestContext) -> AppResult<Vec<Ride>>;

    /// Sobrescribe sólo el estado si `guard` acepta el registro actual
    async fn update_status(
        &self,
        ctx: &RequestContext,
        id: RideId,
        status: RideStatus,
        guard: &StatusGuard,
    ) -> AppResult<()>;

    /// Guarda el conductor y pasa el viaje a `accepted` en una sola escritura
    async fn assign_driver(
        &self,
        ctx: &RequestContext,
        id: RideId,
        driver_id: DriverId,
        guard: &AssignmentGuard,
    ) -> AppResult<()>;

    /// Primer viaje `pending` o `accepted` de este conductor
    async fn find_active_by_driver(&self, ctx: &RequestContext, driver_id: DriverId) -> AppResult<Ride>;
}

#[derive(Debug)]
struct RideTable {
    rides: HashMap<RideId, Ride>,
    next_id: RideId,
}

impl RideTable {
    fn active_for(&self, driver_id: DriverId) -> Option<&Ride> {
        self.rides.values().find(|ride| ride.is_active_for(driver_id))
    }
}

/// Backend en memoria: un mapa y su contador detrás de un único RwLock
#[derive(Debug)]
pub struct InMemoryRideRepository {
    table: RwLock<RideTable>,
}

impl InMemoryRideRepository {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(RideTable {
                rides: HashMap::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for InMemoryRideRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RideRepository for InMemoryRideRepository {
    async fn create(&self, ctx: &RequestContext, ride: NewRide) -> AppResult<RideId> {
        ctx.check()?;
        let mut table = self.table.write().await;

        let ride_id = table.next_id;
        table.next_id += 1;
        table.rides.insert(ride_id, ride.into_ride(ride_id));

        debug!("💾 Viaje {} guardado en memoria", ride_id);
        Ok(ride_id)
    }

    async fn get_by_id(&self, ctx: &RequestContext, id: RideId) -> AppResult<Ride> {
        ctx.check()?;
        let table = self.table.read().await;
        table.rides.get(&id).cloned().ok_or(AppError::RideNotFound)
    }

    async fn list_all(&self, ctx: &RequestContext) -> AppResult<Vec<Ride>> {
        ctx.check()?;
        let table = self.table.read().await;
        Ok(table.rides.values().cloned().collect())
    }

    async fn update_status(
        &self,
        ctx: &RequestContext,
        id: RideId,
        status: RideStatus,
        guard: &StatusGuard,
    ) -> AppResult<()> {
        ctx.check()?;
        let mut table = self.table.write().await;

        let ride = table.rides.get_mut(&id).ok_or(AppError::RideNotFound)?;
        guard(ride)?;
        ride.status = status;
        Ok(())
    }

    async fn assign_driver(
        &self,
        ctx: &RequestContext,
        id: RideId,
        driver_id: DriverId,
        guard: &AssignmentGuard,
    ) -> AppResult<()> {
        ctx.check()?;
        let mut table = self.table.write().await;

        {
            let ride = table.rides.get(&id).ok_or(AppError::RideNotFound)?;
            guard(ride, table.active_for(driver_id))?;
        }

        let ride = table.rides.get_mut(&id).ok_or(AppError::RideNotFound)?;
        ride.driver_id = Some(driver_id);
        ride.status = RideStatus::Accepted;
        Ok(())
    }

    async fn find_active_by_driver(&self, ctx: &RequestContext, driver_id: DriverId) -> AppResult<Ride> {
        ctx.check()?;
        let table = self.table.read().await;
        table
            .active_for(driver_id)
            .cloned()
            .ok_or(AppError::RideNotFound)
    }
}
