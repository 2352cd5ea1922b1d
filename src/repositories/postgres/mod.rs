//! Backend PostgreSQL
//!
//! Los errores de sqlx se traducen a `AppError::RepositoryUnavailable`,
//! salvo "sin filas" (NotFound) y violaciones de unicidad del teléfono.

pub mod driver_repository;
pub mod passenger_repository;
pub mod ride_repository;

pub use driver_repository::PgDriverRepository;
pub use passenger_repository::PgPassengerRepository;
pub use ride_repository::PgRideRepository;

use tracing::error;

use crate::utils::errors::AppError;

const UNIQUE_VIOLATION: &str = "23505";

/// Violación de unicidad (p. ej. teléfono duplicado)
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.code().as_deref() == Some(UNIQUE_VIOLATION),
        _ => false,
    }
}

/// Registrar y envolver un fallo del backend
pub(crate) fn unavailable(operation: &str, err: sqlx::Error) -> AppError {
    error!("❌ Error de base de datos en {}: {}", operation, err);
    AppError::RepositoryUnavailable(err)
}
