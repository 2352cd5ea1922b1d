use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use super::unavailable;
use crate::context::RequestContext;
use crate::models::{DriverId, NewRide, Ride, RideId, RideStatus};
use crate::repositories::ride_repository::{AssignmentGuard, RideRepository, StatusGuard};
use crate::utils::errors::{AppError, AppResult};

const RIDE_COLUMNS: &str = "ride_id, passenger_id, driver_id, origin, destination, status";

// Fila tal como está en la tabla rides; el estado se guarda como TEXT
#[derive(Debug, sqlx::FromRow)]
struct RideRow {
    ride_id: i64,
    passenger_id: i64,
    driver_id: Option<i64>,
    origin: String,
    destination: String,
    status: String,
}

impl TryFrom<RideRow> for Ride {
    type Error = AppError;

    fn try_from(row: RideRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<RideStatus>()
            .map_err(|e| AppError::RepositoryUnavailable(sqlx::Error::Decode(Box::new(e))))?;

        Ok(Ride {
            ride_id: row.ride_id,
            passenger_id: row.passenger_id,
            driver_id: row.driver_id,
            origin: row.origin,
            destination: row.destination,
            status,
        })
    }
}

/// Backend de viajes sobre PostgreSQL.
///
/// Los check-then-act corren en una transacción: `FOR UPDATE` sobre la fila
/// del viaje y, para asignaciones, un advisory lock por conductor que
/// serializa la regla de un viaje activo por conductor.
#[derive(Debug, Clone)]
pub struct PgRideRepository {
    pool: PgPool,
}

impl PgRideRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn lock_ride(tx: &mut Transaction<'static, Postgres>, id: RideId) -> AppResult<Ride> {
        let row = sqlx::query_as::<_, RideRow>(&format!(
            "SELECT {} FROM rides WHERE ride_id = $1 FOR UPDATE",
            RIDE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| unavailable("lock_ride", e))?;

        row.ok_or(AppError::RideNotFound)?.try_into()
    }
}

#[async_trait]
impl RideRepository for PgRideRepository {
    async fn create(&self, ctx: &RequestContext, ride: NewRide) -> AppResult<RideId> {
        ctx.check()?;

        let (ride_id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO rides (passenger_id, driver_id, origin, destination, status)
            VALUES ($1, NULL, $2, $3, $4)
            RETURNING ride_id
            "#,
        )
        .bind(ride.passenger_id)
        .bind(ride.origin)
        .bind(ride.destination)
        .bind(RideStatus::Pending.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unavailable("create_ride", e))?;

        Ok(ride_id)
    }

    async fn get_by_id(&self, ctx: &RequestContext, id: RideId) -> AppResult<Ride> {
        ctx.check()?;

        let row = sqlx::query_as::<_, RideRow>(&format!(
            "SELECT {} FROM rides WHERE ride_id = $1",
            RIDE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| unavailable("find_ride", e))?;

        row.ok_or(AppError::RideNotFound)?.try_into()
    }

    async fn list_all(&self, ctx: &RequestContext) -> AppResult<Vec<Ride>> {
        ctx.check()?;

        let rows = sqlx::query_as::<_, RideRow>(&format!("SELECT {} FROM rides", RIDE_COLUMNS))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| unavailable("list_rides", e))?;

        rows.into_iter().map(Ride::try_from).collect()
    }

    async fn update_status(
        &self,
        ctx: &RequestContext,
        id: RideId,
        status: RideStatus,
        guard: &StatusGuard,
    ) -> AppResult<()> {
        ctx.check()?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| unavailable("begin_update_status", e))?;

        let ride = Self::lock_ride(&mut tx, id).await?;
        guard(&ride)?;

        sqlx::query("UPDATE rides SET status = $1 WHERE ride_id = $2")
            .bind(status.as_str())
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| unavailable("update_status", e))?;

        tx.commit()
            .await
            .map_err(|e| unavailable("commit_update_status", e))
    }

    async fn assign_driver(
        &self,
        ctx: &RequestContext,
        id: RideId,
        driver_id: DriverId,
        guard: &AssignmentGuard,
    ) -> AppResult<()> {
        ctx.check()?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| unavailable("begin_assign_driver", e))?;

        // Orden fijo: primero el conductor, luego la fila del viaje
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(driver_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| unavailable("lock_driver", e))?;

        let ride = Self::lock_ride(&mut tx, id).await?;

        let active = sqlx::query_as::<_, RideRow>(&format!(
            "SELECT {} FROM rides WHERE driver_id = $1 AND status IN ('pending', 'accepted') LIMIT 1",
            RIDE_COLUMNS
        ))
        .bind(driver_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| unavailable("find_active_for_assignment", e))?
        .map(Ride::try_from)
        .transpose()?;

        guard(&ride, active.as_ref())?;

        sqlx::query("UPDATE rides SET driver_id = $1, status = $2 WHERE ride_id = $3")
            .bind(driver_id)
            .bind(RideStatus::Accepted.as_str())
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| unavailable("assign_driver", e))?;

        tx.commit()
            .await
            .map_err(|e| unavailable("commit_assign_driver", e))
    }

    async fn find_active_by_driver(&self, ctx: &RequestContext, driver_id: DriverId) -> AppResult<Ride> {
        ctx.check()?;

        let row = sqlx::query_as::<_, RideRow>(&format!(
            "SELECT {} FROM rides WHERE driver_id = $1 AND status IN ('pending', 'accepted') LIMIT 1",
            RIDE_COLUMNS
        ))
        .bind(driver_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| unavailable("find_active_by_driver", e))?;

        row.ok_or(AppError::RideNotFound)?.try_into()
    }
}
