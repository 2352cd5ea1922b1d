//! ride_dispatch
//!
//! Registro de viajes de un servicio de taxis: directorios de pasajeros y
//! conductores, y el ciclo de vida de cada viaje con sus reglas de
//! asignación, detrás de una API HTTP.

pub mod config;
pub mod context;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use context::{CancelHandle, RequestContext};
pub use routes::create_router;
pub use state::AppState;
