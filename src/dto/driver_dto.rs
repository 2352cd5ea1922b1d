use serde::Deserialize;
use validator::Validate;

use crate::models::NewDriver;

// Request para registrar un conductor
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterDriverRequest {
    #[serde(default)]
    #[validate(length(max = 255))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub last_name: String,
    #[serde(default)]
    pub phone_number: i64,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub car_type: String,
    #[serde(default)]
    pub license_plate: i64,
}

// Todo conductor nuevo entra disponible
impl From<RegisterDriverRequest> for NewDriver {
    fn from(request: RegisterDriverRequest) -> Self {
        NewDriver {
            first_name: request.first_name,
            last_name: request.last_name,
            phone_number: request.phone_number,
            car_type: request.car_type,
            license_plate: request.license_plate,
            is_available: true,
        }
    }
}
