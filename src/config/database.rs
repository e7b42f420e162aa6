//! Configuración de base de datos
//!
//! Este módulo maneja la conexión y configuración de PostgreSQL con SQLx
//! para el backend persistente del almacén de documentos.

use std::env;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use sqlx::postgres::{PgPool, PgPoolOptions};

/// Configuración de la base de datos
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl DatabaseConfig {
    /// Leer `DATABASE_URL` y el tamaño del pool desde el entorno
    pub fn from_env() -> Result<Self> {
        let url = env::var("DATABASE_URL")
            .map_err(|_| anyhow!("DATABASE_URL must be set when STORE_BACKEND=postgres"))?;

        let config = Self {
            url,
            max_connections: read_u32("DATABASE_MAX_CONNECTIONS", 20)?,
            min_connections: read_u32("DATABASE_MIN_CONNECTIONS", 5)?,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(300),
            max_lifetime: Duration::from_secs(3600),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("DATABASE_URL must start with postgres:// or postgresql://"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!(
                "DATABASE_MAX_CONNECTIONS ({}) must be >= DATABASE_MIN_CONNECTIONS ({})",
                self.max_connections,
                self.min_connections
            ));
        }
        Ok(())
    }

    /// Crear un nuevo pool de conexiones
    pub async fn create_pool(&self) -> Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.connect_timeout)
            .idle_timeout(self.idle_timeout)
            .max_lifetime(self.max_lifetime)
            .connect(&self.url)
            .await
    }
}

fn read_u32(key: &str, default: u32) -> Result<u32> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{} must be a valid number, got '{}'", key, raw)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str) -> DatabaseConfig {
        DatabaseConfig {
            url: url.to_string(),
            max_connections: 20,
            min_connections: 5,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(300),
            max_lifetime: Duration::from_secs(3600),
        }
    }

    #[test]
    fn test_validate_url_scheme() {
        assert!(config("postgres://user:pw@localhost/cars").validate().is_ok());
        assert!(config("mysql://localhost/cars").validate().is_err());
    }

    #[test]
    fn test_validate_pool_bounds() {
        let mut cfg = config("postgres://localhost/cars");
        cfg.min_connections = 30;
        assert!(cfg.validate().is_err());
    }
}
