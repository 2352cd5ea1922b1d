//! Services module
//!
//! Lógica de negocio: el motor del ciclo de vida de los viajes y los
//! directorios de pasajeros y conductores.

pub mod driver_service;
pub mod passenger_service;
pub mod ride_service;

pub use driver_service::DriverService;
pub use passenger_service::PassengerService;
pub use ride_service::{check_assignment, check_status_change, RideService};
