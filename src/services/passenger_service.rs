//! Servicio de pasajeros

use std::sync::Arc;
use tracing::{debug, info};

use crate::context::RequestContext;
use crate::models::{NewPassenger, Passenger, PassengerId};
use crate::repositories::PassengerRepository;
use crate::utils::errors::{AppError, AppResult};

pub struct PassengerService {
    repository: Arc<dyn PassengerRepository>,
}

impl PassengerService {
    pub fn new(repository: Arc<dyn PassengerRepository>) -> Self {
        Self { repository }
    }

    /// Registrar un pasajero; el teléfono debe ser único en el directorio
    pub async fn register(&self, ctx: &RequestContext, passenger: NewPassenger) -> AppResult<Passenger> {
        if passenger.first_name.is_empty() {
            return Err(AppError::FirstNameRequired);
        }
        if passenger.last_name.is_empty() {
            return Err(AppError::LastNameRequired);
        }
        if passenger.phone_number == 0 {
            return Err(AppError::PhoneNumberRequired);
        }

        // El alta vuelve a comprobar el teléfono bajo su propio lock
        match self.repository.find_by_phone(ctx, passenger.phone_number).await {
            Ok(existing) => {
                debug!("📵 Teléfono ya registrado por el pasajero {}", existing.id);
                return Err(AppError::PhoneNumberExists);
            }
            Err(AppError::PassengerNotFound) => {}
            Err(e) => return Err(e),
        }

        let passenger = self.repository.register(ctx, passenger).await?;
        info!("🧍 Pasajero {} registrado", passenger.id);
        Ok(passenger)
    }

    pub async fn get(&self, ctx: &RequestContext, id: PassengerId) -> AppResult<Passenger> {
        if id == 0 {
            return Err(AppError::PassengerNotFound);
        }
        self.repository.get_by_id(ctx, id).await
    }

    pub async fn list(&self, ctx: &RequestContext) -> AppResult<Vec<Passenger>> {
        self.repository.list_all(ctx).await
    }

    pub async fn delete(&self, ctx: &RequestContext, id: PassengerId) -> AppResult<()> {
        if id == 0 {
            return Err(AppError::PassengerNotFound);
        }
        self.repository.delete(ctx, id).await?;
        info!("🗑️ Pasajero {} eliminado", id);
        Ok(())
    }
}
