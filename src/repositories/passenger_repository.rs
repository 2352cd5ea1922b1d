//! Directorio de pasajeros
//!
//! CRUD por id con búsqueda por teléfono. La unicidad del teléfono se
//! comprueba dentro del mismo lock que la inserción.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::context::RequestContext;
use crate::models::{NewPassenger, Passenger, PassengerId};
use crate::utils::errors::{AppError, AppResult};

#[async_trait]
pub trait PassengerRepository: Send + Sync {
    async fn register(&self, ctx: &RequestContext, passenger: NewPassenger) -> AppResult<Passenger>;
    async fn get_by_id(&self, ctx: &RequestContext, id: PassengerId) -> AppResult<Passenger>;
    async fn list_all(&self, ctx: &RequestContext) -> AppResult<Vec<Passenger>>;
    async fn delete(&self, ctx: &RequestContext, id: PassengerId) -> AppResult<()>;
    async fn find_by_phone(&self, ctx: &RequestContext, phone_number: i64) -> AppResult<Passenger>;
}

#[derive(Debug)]
struct PassengerTable {
    passengers: HashMap<PassengerId, Passenger>,
    next_id: PassengerId,
}

#[derive(Debug)]
pub struct InMemoryPassengerRepository {
    table: RwLock<PassengerTable>,
}

impl InMemoryPassengerRepository {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(PassengerTable {
                passengers: HashMap::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for InMemoryPassengerRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PassengerRepository for InMemoryPassengerRepository {
    async fn register(&self, ctx: &RequestContext, passenger: NewPassenger) -> AppResult<Passenger> {
        ctx.check()?;
        let mut table = self.table.write().await;

        if table
            .passengers
            .values()
            .any(|p| p.phone_number == passenger.phone_number)
        {
            return Err(AppError::PhoneNumberExists);
        }

        let id = table.next_id;
        table.next_id += 1;
        let passenger = passenger.into_passenger(id);
        table.passengers.insert(id, passenger.clone());
        Ok(passenger)
    }

    async fn get_by_id(&self, ctx: &RequestContext, id: PassengerId) -> AppResult<Passenger> {
        ctx.check()?;
        let table = self.table.read().await;
        table
            .passengers
            .get(&id)
            .cloned()
            .ok_or(AppError::PassengerNotFound)
    }

    async fn list_all(&self, ctx: &RequestContext) -> AppResult<Vec<Passenger>> {
        ctx.check()?;
        let table = self.table.read().await;
        Ok(table.passengers.values().cloned().collect())
    }

    async fn delete(&self, ctx: &RequestContext, id: PassengerId) -> AppResult<()> {
        ctx.check()?;
        let mut table = self.table.write().await;
        table
            .passengers
            .remove(&id)
            .map(|_| ())
            .ok_or(AppError::PassengerNotFound)
    }

    async fn find_by_phone(&self, ctx: &RequestContext, phone_number: i64) -> AppResult<Passenger> {
        ctx.check()?;
        let table = self.table.read().await;
        table
            .passengers
            .values()
            .find(|p| p.phone_number == phone_number)
            .cloned()
            .ok_or(AppError::PassengerNotFound)
    }
}
