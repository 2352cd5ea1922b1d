//! Modelo de Driver

use serde::{Deserialize, Serialize};

pub type DriverId = i64;

/// Conductor registrado en el directorio
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Driver {
    pub id: DriverId,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: i64,
    pub car_type: String,
    pub license_plate: i64,
    pub is_available: bool,
}

/// Datos de registro, el directorio asigna el `id`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDriver {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: i64,
    pub car_type: String,
    pub license_plate: i64,
    pub is_available: bool,
}

impl NewDriver {
    pub(crate) fn into_driver(self, id: DriverId) -> Driver {
        Driver {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            phone_number: self.phone_number,
            car_type: self.car_type,
            license_plate: self.license_plate,
            is_available: self.is_available,
        }
    }
}
