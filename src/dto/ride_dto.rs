use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Driver, DriverId, EnrichedRide, Passenger, RideId, RideStatus};

// Request para crear un viaje
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRideRequest {
    #[serde(default)]
    pub passenger_id: i64,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub origin: String,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub destination: String,
}

#[derive(Debug, Deserialize)]
pub struct AssignDriverRequest {
    #[serde(default)]
    pub driver_id: DriverId,
}

// El estado llega como texto libre; lo interpreta el servicio
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStatusRequest {
    #[serde(default)]
    #[validate(length(max = 255))]
    pub status: String,
}

/// Viaje tal como lo ve el cliente: los ids van dentro de los snapshots
#[derive(Debug, Serialize)]
pub struct RideResponse {
    pub ride_id: RideId,
    pub origin: String,
    pub destination: String,
    pub status: RideStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passenger: Option<Passenger>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver: Option<Driver>,
}

impl From<EnrichedRide> for RideResponse {
    fn from(enriched: EnrichedRide) -> Self {
        Self {
            ride_id: enriched.ride.ride_id,
            origin: enriched.ride.origin,
            destination: enriched.ride.destination,
            status: enriched.ride.status,
            passenger: enriched.passenger,
            driver: enriched.driver,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AssignDriverResponse {
    pub message: String,
    pub ride_id: RideId,
    pub driver_id: DriverId,
}

#[derive(Debug, Serialize)]
pub struct StatusUpdateResponse {
    pub message: String,
    pub ride_id: RideId,
    pub status: RideStatus,
}
