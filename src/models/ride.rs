//! Modelo de Ride
//!
//! Este módulo contiene el registro canónico de un viaje y su estado.
//! Los snapshots de pasajero y conductor sólo viven en `EnrichedRide`,
//! nunca en el registro guardado.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::driver::{Driver, DriverId};
use crate::models::passenger::{Passenger, PassengerId};

pub type RideId = i64;

/// Estado del viaje
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RideStatus {
    Pending,
    Accepted,
    Completed,
    Cancelled,
}

impl RideStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RideStatus::Pending => "pending",
            RideStatus::Accepted => "accepted",
            RideStatus::Completed => "completed",
            RideStatus::Cancelled => "cancelled",
        }
    }

    /// Un viaje activo todavía ocupa a su conductor
    pub fn is_active(&self) -> bool {
        matches!(self, RideStatus::Pending | RideStatus::Accepted)
    }
}

impl fmt::Display for RideStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error al interpretar un estado desconocido
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown ride status '{0}'")]
pub struct UnknownRideStatus(pub String);

impl FromStr for RideStatus {
    type Err = UnknownRideStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(RideStatus::Pending),
            "accepted" => Ok(RideStatus::Accepted),
            "completed" => Ok(RideStatus::Completed),
            "cancelled" => Ok(RideStatus::Cancelled),
            other => Err(UnknownRideStatus(other.to_string())),
        }
    }
}

/// Registro canónico de un viaje
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ride {
    pub ride_id: RideId,
    pub passenger_id: PassengerId,
    pub driver_id: Option<DriverId>,
    pub origin: String,
    pub destination: String,
    pub status: RideStatus,
}

impl Ride {
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// El viaje está activo y pertenece a este conductor
    pub fn is_active_for(&self, driver_id: DriverId) -> bool {
        self.driver_id == Some(driver_id) && self.is_active()
    }
}

/// Viaje aún sin id; siempre nace `pending` y sin conductor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRide {
    pub passenger_id: PassengerId,
    pub origin: String,
    pub destination: String,
}

impl NewRide {
    pub fn new(passenger_id: PassengerId, origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            passenger_id,
            origin: origin.into(),
            destination: destination.into(),
        }
    }

    pub(crate) fn into_ride(self, ride_id: RideId) -> Ride {
        Ride {
            ride_id,
            passenger_id: self.passenger_id,
            driver_id: None,
            origin: self.origin,
            destination: self.destination,
            status: RideStatus::Pending,
        }
    }
}

/// Copia transitoria del viaje con los snapshots adjuntos para la respuesta
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedRide {
    pub ride: Ride,
    pub passenger: Option<Passenger>,
    pub driver: Option<Driver>,
}

#[cfg(test)]
impl EnrichedRide {
    pub(crate) fn bare(ride: Ride) -> Self {
        Self {
            ride,
            passenger: None,
            driver: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parsing() {
        for status in [
            RideStatus::Pending,
            RideStatus::Accepted,
            RideStatus::Completed,
            RideStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<RideStatus>(), Ok(status));
        }

        assert!("Pending".parse::<RideStatus>().is_err());
        assert!("".parse::<RideStatus>().is_err());
        assert_eq!(
            "finished".parse::<RideStatus>(),
            Err(UnknownRideStatus("finished".to_string()))
        );
    }

    #[test]
    fn test_active_statuses() {
        assert!(RideStatus::Pending.is_active());
        assert!(RideStatus::Accepted.is_active());
        assert!(!RideStatus::Completed.is_active());
        assert!(!RideStatus::Cancelled.is_active());
    }

    #[test]
    fn test_new_ride_starts_pending_without_driver() {
        let ride = NewRide::new(7, "A", "B").into_ride(3);
        assert_eq!(ride.ride_id, 3);
        assert_eq!(ride.passenger_id, 7);
        assert_eq!(ride.driver_id, None);
        assert_eq!(ride.status, RideStatus::Pending);
        assert!(!ride.is_active_for(1));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&RideStatus::Cancelled).unwrap();
        assert_eq!(json, "\"cancelled\"");
    }
}
