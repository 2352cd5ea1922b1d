//! Servicio de conductores

use std::sync::Arc;
use tracing::{debug, info};

use crate::context::RequestContext;
use crate::models::{Driver, DriverId, NewDriver};
use crate::repositories::DriverRepository;
use crate::utils::errors::{AppError, AppResult};

pub struct DriverService {
    repository: Arc<dyn DriverRepository>,
}

impl DriverService {
    pub fn new(repository: Arc<dyn DriverRepository>) -> Self {
        Self { repository }
    }

    /// Registrar un conductor; nombre, vehículo y teléfono son obligatorios
    pub async fn register(&self, ctx: &RequestContext, driver: NewDriver) -> AppResult<Driver> {
        if driver.first_name.is_empty() {
            return Err(AppError::FirstNameRequired);
        }
        if driver.last_name.is_empty() {
            return Err(AppError::LastNameRequired);
        }
        if driver.car_type.is_empty() {
            return Err(AppError::CarTypeRequired);
        }
        if driver.license_plate == 0 {
            return Err(AppError::LicensePlateRequired);
        }
        if driver.phone_number == 0 {
            return Err(AppError::PhoneNumberRequired);
        }

        // El alta vuelve a comprobar el teléfono bajo su propio lock
        match self.repository.find_by_phone(ctx, driver.phone_number).await {
            Ok(existing) => {
                debug!("📵 Teléfono ya registrado por el conductor {}", existing.id);
                return Err(AppError::PhoneNumberExists);
            }
            Err(AppError::DriverNotFound) => {}
            Err(e) => return Err(e),
        }

        let driver = self.repository.register(ctx, driver).await?;
        info!("🚗 Conductor {} registrado ({})", driver.id, driver.car_type);
        Ok(driver)
    }

    pub async fn get(&self, ctx: &RequestContext, id: DriverId) -> AppResult<Driver> {
        if id == 0 {
            return Err(AppError::DriverNotFound);
        }
        self.repository.get_by_id(ctx, id).await
    }

    pub async fn list(&self, ctx: &RequestContext) -> AppResult<Vec<Driver>> {
        self.repository.list_all(ctx).await
    }

    pub async fn delete(&self, ctx: &RequestContext, id: DriverId) -> AppResult<()> {
        if id == 0 {
            return Err(AppError::DriverNotFound);
        }
        self.repository.delete(ctx, id).await?;
        info!("🗑️ Conductor {} eliminado", id);
        Ok(())
    }
}
