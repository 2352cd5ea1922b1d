use serde::Deserialize;
use validator::Validate;

use crate::models::NewPassenger;

// Request para registrar un pasajero; los campos ausentes llegan vacíos
// y los rechaza el servicio
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterPassengerRequest {
    #[serde(default)]
    #[validate(length(max = 255))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub last_name: String,
    #[serde(default)]
    pub phone_number: i64,
}

impl From<RegisterPassengerRequest> for NewPassenger {
    fn from(request: RegisterPassengerRequest) -> Self {
        NewPassenger {
            first_name: request.first_name,
            last_name: request.last_name,
            phone_number: request.phone_number,
        }
    }
}
