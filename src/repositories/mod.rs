//! Repositorios
//!
//! Cada entidad tiene un trait de almacenamiento con dos implementaciones
//! de semántica idéntica: en memoria y PostgreSQL.

pub mod driver_repository;
pub mod passenger_repository;
pub mod postgres;
pub mod ride_repository;

pub use driver_repository::{DriverRepository, InMemoryDriverRepository};
pub use passenger_repository::{InMemoryPassengerRepository, PassengerRepository};
pub use postgres::{PgDriverRepository, PgPassengerRepository, PgRideRepository};
pub use ride_repository::{AssignmentGuard, InMemoryRideRepository, RideRepository, StatusGuard};
