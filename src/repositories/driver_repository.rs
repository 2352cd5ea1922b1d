//! Directorio de conductores

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::context::RequestContext;
use crate::models::{Driver, DriverId, NewDriver};
use crate::utils::errors::{AppError, AppResult};

#[async_trait]
pub trait DriverRepository: Send + Sync {
    async fn register(&self, ctx: &RequestContext, driver: NewDriver) -> AppResult<Driver>;
    async fn get_by_id(&self, ctx: &RequestContext, id: DriverId) -> AppResult<Driver>;
    async fn list_all(&self, ctx: &RequestContext) -> AppResult<Vec<Driver>>;
    async fn delete(&self, ctx: &RequestContext, id: DriverId) -> AppResult<()>;
    async fn find_by_phone(&self, ctx: &RequestContext, phone_number: i64) -> AppResult<Driver>;
}

#[derive(Debug)]
struct DriverTable {
    drivers: HashMap<DriverId, Driver>,
    next_id: DriverId,
}

#[derive(Debug)]
pub struct InMemoryDriverRepository {
    table: RwLock<DriverTable>,
}

impl InMemoryDriverRepository {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(DriverTable {
                drivers: HashMap::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for InMemoryDriverRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DriverRepository for InMemoryDriverRepository {
    async fn register(&self, ctx: &RequestContext, driver: NewDriver) -> AppResult<Driver> {
        ctx.check()?;
        let mut table = self.table.write().await;

        if table
            .drivers
            .values()
            .any(|d| d.phone_number == driver.phone_number)
        {
            return Err(AppError::PhoneNumberExists);
        }

        let id = table.next_id;
        table.next_id += 1;
        let driver = driver.into_driver(id);
        table.drivers.insert(id, driver.clone());
        Ok(driver)
    }

    async fn get_by_id(&self, ctx: &RequestContext, id: DriverId) -> AppResult<Driver> {
        ctx.check()?;
        let table = self.table.read().await;
        table.drivers.get(&id).cloned().ok_or(AppError::DriverNotFound)
    }

    async fn list_all(&self, ctx: &RequestContext) -> AppResult<Vec<Driver>> {
        ctx.check()?;
        let table = self.table.read().await;
        Ok(table.drivers.values().cloned().collect())
    }

    async fn delete(&self, ctx: &RequestContext, id: DriverId) -> AppResult<()> {
        ctx.check()?;
        let mut table = self.table.write().await;
        table
            .drivers
            .remove(&id)
            .map(|_| ())
            .ok_or(AppError::DriverNotFound)
    }

    async fn find_by_phone(&self, ctx: &RequestContext, phone_number: i64) -> AppResult<Driver> {
        ctx.check()?;
        let table = self.table.read().await;
        table
            .drivers
            .values()
            .find(|d| d.phone_number == phone_number)
            .cloned()
            .ok_or(AppError::DriverNotFound)
    }
}
