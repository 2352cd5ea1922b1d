//! Configuración de conexión a PostgreSQL
//!
//! Este módulo abre el pool de conexiones y crea el schema si no existe.

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

use crate::config::database::DatabaseConfig;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS passengers (
        id BIGSERIAL PRIMARY KEY,
        first_name VARCHAR(255) NOT NULL,
        last_name VARCHAR(255) NOT NULL,
        phone_number BIGINT NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS drivers (
        id BIGSERIAL PRIMARY KEY,
        first_name VARCHAR(255) NOT NULL,
        last_name VARCHAR(255) NOT NULL,
        phone_number BIGINT NOT NULL UNIQUE,
        car_type VARCHAR(255) NOT NULL,
        license_plate BIGINT NOT NULL,
        is_available BOOLEAN NOT NULL DEFAULT TRUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS rides (
        ride_id BIGSERIAL PRIMARY KEY,
        passenger_id BIGINT NOT NULL,
        driver_id BIGINT,
        origin VARCHAR(255) NOT NULL,
        destination VARCHAR(255) NOT NULL,
        status VARCHAR(16) NOT NULL
            CHECK (status IN ('pending', 'accepted', 'completed', 'cancelled'))
    )
    "#,
    "CREATE INDEX IF NOT EXISTS rides_driver_status_idx ON rides (driver_id, status)",
];

/// Crear un pool de conexiones a la base de datos
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    info!("🔗 Conectando a PostgreSQL: {}", mask_database_url(&config.url));
    let pool = config
        .create_pool()
        .await
        .context("No se pudo conectar a PostgreSQL")?;

    Ok(pool)
}

/// Crear las tablas si todavía no existen
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(*statement)
            .execute(pool)
            .await
            .context("Error creando el schema")?;
    }
    info!("✅ Schema de base de datos verificado");
    Ok(())
}

/// Función helper para enmascarar la URL de la base de datos en logs
pub fn mask_database_url(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if url[..at_pos].rfind(':').is_some() {
            let protocol = &url[..url.find("://").map_or(0, |pos| pos + 3)];
            let host = &url[at_pos + 1..];
            format!("{}***:***@{}", protocol, host)
        } else {
            url.to_string()
        }
    } else {
        url.to_string()
    }
}
