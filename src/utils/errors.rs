//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Clasificación de los errores por tipo (no por identidad)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Campo requerido ausente o valor inválido, nunca se reintenta
    Validation,
    NotFound,
    /// El llamador puede releer el estado y reintentar la operación de negocio
    Conflict,
    /// El llamador debe cambiar de intención
    Precondition,
    Cancelled,
    Unavailable,
}

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("ride ID is required")]
    RideIdRequired,

    #[error("passenger ID is required")]
    PassengerIdRequired,

    #[error("driver ID is required")]
    DriverIdRequired,

    #[error("origin is required")]
    OriginRequired,

    #[error("destination is required")]
    DestinationRequired,

    #[error("invalid ride status")]
    InvalidRideStatus,

    #[error("first name is required")]
    FirstNameRequired,

    #[error("last name is required")]
    LastNameRequired,

    #[error("phone number is required")]
    PhoneNumberRequired,

    #[error("car type is required")]
    CarTypeRequired,

    #[error("license plate is required")]
    LicensePlateRequired,

    #[error("invalid payload: {0}")]
    InvalidPayload(#[from] validator::ValidationErrors),

    #[error("invalid JSON body: {0}")]
    InvalidJson(#[from] JsonRejection),

    #[error("invalid path: {0}")]
    InvalidPath(#[from] PathRejection),

    #[error("ride not found")]
    RideNotFound,

    #[error("passenger not found")]
    PassengerNotFound,

    #[error("driver not found")]
    DriverNotFound,

    #[error("ride already assigned")]
    RideAlreadyAssigned,

    #[error("driver already assigned to this ride")]
    DriverAlreadyAssignedToRide,

    #[error("phone number exists")]
    PhoneNumberExists,

    #[error("cannot change completed ride")]
    CannotChangeCompletedRide,

    #[error("cannot assign driver to non-pending ride")]
    CannotAssignDriverToNonPendingRide,

    #[error("driver already on active ride")]
    DriverAlreadyOnActiveRide,

    #[error("operation cancelled")]
    Cancelled,

    #[error("repository unavailable: {0}")]
    RepositoryUnavailable(#[from] sqlx::Error),
}

impl AppError {
    /// Tipo del error, usado por el transporte HTTP y por los tests
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::RideIdRequired
            | AppError::PassengerIdRequired
            | AppError::DriverIdRequired
            | AppError::OriginRequired
            | AppError::DestinationRequired
            | AppError::InvalidRideStatus
            | AppError::FirstNameRequired
            | AppError::LastNameRequired
            | AppError::PhoneNumberRequired
            | AppError::CarTypeRequired
            | AppError::LicensePlateRequired
            | AppError::InvalidPayload(_)
            | AppError::InvalidJson(_)
            | AppError::InvalidPath(_) => ErrorKind::Validation,

            AppError::RideNotFound | AppError::PassengerNotFound | AppError::DriverNotFound => {
                ErrorKind::NotFound
            }

            AppError::RideAlreadyAssigned
            | AppError::DriverAlreadyAssignedToRide
            | AppError::PhoneNumberExists => ErrorKind::Conflict,

            AppError::CannotChangeCompletedRide
            | AppError::CannotAssignDriverToNonPendingRide
            | AppError::DriverAlreadyOnActiveRide => ErrorKind::Precondition,

            AppError::Cancelled => ErrorKind::Cancelled,

            AppError::RepositoryUnavailable(_) => ErrorKind::Unavailable,
        }
    }

    /// Código estable para los clientes de la API
    pub fn code(&self) -> &'static str {
        match self {
            AppError::RideIdRequired => "RIDE_ID_REQUIRED",
            AppError::PassengerIdRequired => "PASSENGER_ID_REQUIRED",
            AppError::DriverIdRequired => "DRIVER_ID_REQUIRED",
            AppError::OriginRequired => "ORIGIN_REQUIRED",
            AppError::DestinationRequired => "DESTINATION_REQUIRED",
            AppError::InvalidRideStatus => "INVALID_RIDE_STATUS",
            AppError::FirstNameRequired => "FIRST_NAME_REQUIRED",
            AppError::LastNameRequired => "LAST_NAME_REQUIRED",
            AppError::PhoneNumberRequired => "PHONE_NUMBER_REQUIRED",
            AppError::CarTypeRequired => "CAR_TYPE_REQUIRED",
            AppError::LicensePlateRequired => "LICENSE_PLATE_REQUIRED",
            AppError::InvalidPayload(_) => "VALIDATION_ERROR",
            AppError::InvalidJson(_) => "INVALID_JSON",
            AppError::InvalidPath(_) => "INVALID_PATH",
            AppError::RideNotFound => "RIDE_NOT_FOUND",
            AppError::PassengerNotFound => "PASSENGER_NOT_FOUND",
            AppError::DriverNotFound => "DRIVER_NOT_FOUND",
            AppError::RideAlreadyAssigned => "RIDE_ALREADY_ASSIGNED",
            AppError::DriverAlreadyAssignedToRide => "DRIVER_ALREADY_ASSIGNED_TO_RIDE",
            AppError::PhoneNumberExists => "PHONE_NUMBER_EXISTS",
            AppError::CannotChangeCompletedRide => "CANNOT_CHANGE_COMPLETED_RIDE",
            AppError::CannotAssignDriverToNonPendingRide => "RIDE_NOT_PENDING",
            AppError::DriverAlreadyOnActiveRide => "DRIVER_ALREADY_ON_ACTIVE_RIDE",
            AppError::Cancelled => "CANCELLED",
            AppError::RepositoryUnavailable(_) => "REPOSITORY_UNAVAILABLE",
        }
    }
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    code: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, label) = match self.kind() {
            ErrorKind::Validation => (StatusCode::BAD_REQUEST, "Validation Error"),
            ErrorKind::NotFound => (StatusCode::NOT_FOUND, "Not Found"),
            ErrorKind::Conflict => (StatusCode::CONFLICT, "Conflict"),
            ErrorKind::Precondition => (StatusCode::UNPROCESSABLE_ENTITY, "Precondition Failed"),
            ErrorKind::Cancelled => (StatusCode::REQUEST_TIMEOUT, "Cancelled"),
            ErrorKind::Unavailable => (StatusCode::SERVICE_UNAVAILABLE, "Service Unavailable"),
        };

        let details = match &self {
            AppError::InvalidPayload(e) => Some(json!(e)),
            _ => None,
        };

        // Los errores del backend no se exponen al cliente
        let message = match &self {
            AppError::RepositoryUnavailable(e) => {
                error!("❌ Repositorio no disponible: {}", e);
                "The storage backend is currently unavailable".to_string()
            }
            other => {
                warn!("⚠️ Petición rechazada ({}): {}", other.code(), other);
                other.to_string()
            }
        };

        let body = ErrorResponse {
            error: label.to_string(),
            message,
            details,
            code: self.code().to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;
