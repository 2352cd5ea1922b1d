//! Modelos del sistema
//!
//! Entidades canónicas tal como las guardan los repositorios.

pub mod driver;
pub mod passenger;
pub mod ride;

pub use driver::{Driver, DriverId, NewDriver};
pub use passenger::{NewPassenger, Passenger, PassengerId};
pub use ride::{EnrichedRide, NewRide, Ride, RideId, RideStatus};
