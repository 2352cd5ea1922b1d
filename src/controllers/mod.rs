pub mod driver_controller;
pub mod passenger_controller;
pub mod ride_controller;
