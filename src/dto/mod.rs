//! DTOs de la API HTTP
//!
//! Cuerpos de petición (validados con `validator`) y de respuesta.

pub mod driver_dto;
pub mod passenger_dto;
pub mod ride_dto;

use serde::{Deserialize, Serialize};

/// Confirmación de borrado en los directorios
#[derive(Debug, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub message: String,
    pub id: i64,
}

impl DeletedResponse {
    pub fn new(message: &str, id: i64) -> Self {
        Self {
            message: message.to_string(),
            id,
        }
    }
}
