//! Modelo de Passenger

use serde::{Deserialize, Serialize};

pub type PassengerId = i64;

/// Pasajero registrado en el directorio
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Passenger {
    pub id: PassengerId,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: i64,
}

/// Datos de registro, el directorio asigna el `id`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPassenger {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: i64,
}

impl NewPassenger {
    pub(crate) fn into_passenger(self, id: PassengerId) -> Passenger {
        Passenger {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            phone_number: self.phone_number,
        }
    }
}
