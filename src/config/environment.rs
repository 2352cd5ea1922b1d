//! Configuración de variables de entorno
//!
//! Este módulo lee la configuración del servicio. Todas las variables tienen
//! un valor por defecto salvo `DATABASE_URL` con el backend `postgres`.

use anyhow::{bail, Context, Result};
use std::env;
use std::str::FromStr;

use crate::config::database::DatabaseConfig;

/// Backend de almacenamiento de los repositorios
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Postgres,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Memory => "memory",
            StorageBackend::Postgres => "postgres",
        }
    }
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            other => bail!("unknown STORAGE_BACKEND '{}'", other),
        }
    }
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub host: String,
    pub port: u16,
    pub storage_backend: StorageBackend,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub log_level: tracing::Level,
}

impl EnvironmentConfig {
    /// Leer la configuración de las variables de entorno del proceso
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construir la configuración a partir de una fuente de variables
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = match lookup("PORT") {
            Some(value) => value.parse().context("PORT must be a valid number")?,
            None => 8080,
        };

        let storage_backend = match lookup("STORAGE_BACKEND") {
            Some(value) => value.parse()?,
            None => StorageBackend::Memory,
        };

        let database_url = lookup("DATABASE_URL");
        if storage_backend == StorageBackend::Postgres && database_url.is_none() {
            bail!("DATABASE_URL must be set when STORAGE_BACKEND=postgres");
        }

        let database_max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(value) => value
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a valid number")?,
            None => 10,
        };

        let log_level = match lookup("LOG_LEVEL") {
            Some(value) => value
                .parse()
                .map_err(|_| anyhow::anyhow!("LOG_LEVEL '{}' is not a valid level", value))?,
            None => tracing::Level::INFO,
        };

        Ok(Self {
            host,
            port,
            storage_backend,
            database_url,
            database_max_connections,
            log_level,
        })
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Configuración del pool, sólo si hay `DATABASE_URL`
    pub fn database_config(&self) -> Option<DatabaseConfig> {
        self.database_url.as_deref().map(|url| {
            let mut config = DatabaseConfig::with_url(url);
            config.max_connections = self.database_max_connections;
            config
        })
    }
}
