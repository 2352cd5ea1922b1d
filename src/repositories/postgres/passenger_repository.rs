use async_trait::async_trait;
use sqlx::PgPool;

use super::{is_unique_violation, unavailable};
use crate::context::RequestContext;
use crate::models::{NewPassenger, Passenger, PassengerId};
use crate::repositories::passenger_repository::PassengerRepository;
use crate::utils::errors::{AppError, AppResult};

/// Directorio de pasajeros sobre PostgreSQL; `phone_number` es UNIQUE
#[derive(Debug, Clone)]
pub struct PgPassengerRepository {
    pool: PgPool,
}

impl PgPassengerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PassengerRepository for PgPassengerRepository {
    async fn register(&self, ctx: &RequestContext, passenger: NewPassenger) -> AppResult<Passenger> {
        ctx.check()?;

        sqlx::query_as::<_, Passenger>(
            r#"
            INSERT INTO passengers (first_name, last_name, phone_number)
            VALUES ($1, $2, $3)
            RETURNING id, first_name, last_name, phone_number
            "#,
        )
        .bind(passenger.first_name)
        .bind(passenger.last_name)
        .bind(passenger.phone_number)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::PhoneNumberExists
            } else {
                unavailable("register_passenger", e)
            }
        })
    }

    async fn get_by_id(&self, ctx: &RequestContext, id: PassengerId) -> AppResult<Passenger> {
        ctx.check()?;

        sqlx::query_as::<_, Passenger>(
            "SELECT id, first_name, last_name, phone_number FROM passengers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| unavailable("find_passenger", e))?
        .ok_or(AppError::PassengerNotFound)
    }

    async fn list_all(&self, ctx: &RequestContext) -> AppResult<Vec<Passenger>> {
        ctx.check()?;

        sqlx::query_as::<_, Passenger>("SELECT id, first_name, last_name, phone_number FROM passengers")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| unavailable("list_passengers", e))
    }

    async fn delete(&self, ctx: &RequestContext, id: PassengerId) -> AppResult<()> {
        ctx.check()?;

        let result = sqlx::query("DELETE FROM passengers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| unavailable("delete_passenger", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::PassengerNotFound);
        }
        Ok(())
    }

    async fn find_by_phone(&self, ctx: &RequestContext, phone_number: i64) -> AppResult<Passenger> {
        ctx.check()?;

        sqlx::query_as::<_, Passenger>(
            "SELECT id, first_name, last_name, phone_number FROM passengers WHERE phone_number = $1",
        )
        .bind(phone_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| unavailable("find_passenger_by_phone", e))?
        .ok_or(AppError::PassengerNotFound)
    }
}
