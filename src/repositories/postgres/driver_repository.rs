use async_trait::async_trait;
use sqlx::PgPool;

use super::{is_unique_violation, unavailable};
use crate::context::RequestContext;
use crate::models::{Driver, DriverId, NewDriver};
use crate::repositories::driver_repository::DriverRepository;
use crate::utils::errors::{AppError, AppResult};

const DRIVER_COLUMNS: &str =
    "id, first_name, last_name, phone_number, car_type, license_plate, is_available";

/// Directorio de conductores sobre PostgreSQL
#[derive(Debug, Clone)]
pub struct PgDriverRepository {
    pool: PgPool,
}

impl PgDriverRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DriverRepository for PgDriverRepository {
    async fn register(&self, ctx: &RequestContext, driver: NewDriver) -> AppResult<Driver> {
        ctx.check()?;

        sqlx::query_as::<_, Driver>(&format!(
            r#"
            INSERT INTO drivers (first_name, last_name, phone_number, car_type, license_plate, is_available)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            DRIVER_COLUMNS
        ))
        .bind(driver.first_name)
        .bind(driver.last_name)
        .bind(driver.phone_number)
        .bind(driver.car_type)
        .bind(driver.license_plate)
        .bind(driver.is_available)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::PhoneNumberExists
            } else {
                unavailable("register_driver", e)
            }
        })
    }

    async fn get_by_id(&self, ctx: &RequestContext, id: DriverId) -> AppResult<Driver> {
        ctx.check()?;

        sqlx::query_as::<_, Driver>(&format!("SELECT {} FROM drivers WHERE id = $1", DRIVER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| unavailable("find_driver", e))?
            .ok_or(AppError::DriverNotFound)
    }

    async fn list_all(&self, ctx: &RequestContext) -> AppResult<Vec<Driver>> {
        ctx.check()?;

        sqlx::query_as::<_, Driver>(&format!("SELECT {} FROM drivers", DRIVER_COLUMNS))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| unavailable("list_drivers", e))
    }

    async fn delete(&self, ctx: &RequestContext, id: DriverId) -> AppResult<()> {
        ctx.check()?;

        let result = sqlx::query("DELETE FROM drivers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| unavailable("delete_driver", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::DriverNotFound);
        }
        Ok(())
    }

    async fn find_by_phone(&self, ctx: &RequestContext, phone_number: i64) -> AppResult<Driver> {
        ctx.check()?;

        sqlx::query_as::<_, Driver>(&format!(
            "SELECT {} FROM drivers WHERE phone_number = $1",
            DRIVER_COLUMNS
        ))
        .bind(phone_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| unavailable("find_driver_by_phone", e))?
        .ok_or(AppError::DriverNotFound)
    }
}
