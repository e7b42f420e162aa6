//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};

/// Backend del almacén de documentos
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Postgres,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "in_memory" => Ok(StoreBackend::Memory),
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            other => Err(anyhow!("STORE_BACKEND desconocido: '{}'", other)),
        }
    }
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
    pub store_backend: StoreBackend,
    pub log_level: Option<String>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 8000,
            host: "0.0.0.0".to_string(),
            cors_origins: Vec::new(),
            store_backend: StoreBackend::Memory,
            log_level: None,
        }
    }
}

impl EnvironmentConfig {
    /// Leer la configuración desde variables de entorno, con valores por defecto de desarrollo
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("PORT must be a valid number, got '{}'", raw))?,
            Err(_) => defaults.port,
        };

        let store_backend = match env::var("STORE_BACKEND") {
            Ok(raw) => raw.parse()?,
            Err(_) => defaults.store_backend,
        };

        Ok(Self {
            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            port,
            host: env::var("HOST").unwrap_or(defaults.host),
            cors_origins: env::var("CORS_ORIGINS")
                .map(|raw| parse_origins(&raw))
                .unwrap_or_default(),
            store_backend,
            log_level: env::var("LOG_LEVEL").ok(),
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Nivel de log efectivo: `LOG_LEVEL` o debug en desarrollo, info en el resto
    pub fn tracing_level(&self) -> tracing::Level {
        self.log_level
            .as_deref()
            .and_then(|level| level.parse().ok())
            .unwrap_or(if self.is_development() {
                tracing::Level::DEBUG
            } else {
                tracing::Level::INFO
            })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_backend_parse() {
        assert_eq!("memory".parse::<StoreBackend>().unwrap(), StoreBackend::Memory);
        assert_eq!("Postgres".parse::<StoreBackend>().unwrap(), StoreBackend::Postgres);
        assert!("firestore".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins("http://localhost:5173, https://admin.example.com,"),
            vec!["http://localhost:5173", "https://admin.example.com"]
        );
        assert!(parse_origins("").is_empty());
    }

    #[test]
    fn test_tracing_level() {
        let mut config = EnvironmentConfig::default();
        assert_eq!(config.tracing_level(), tracing::Level::DEBUG);

        config.environment = "production".to_string();
        assert_eq!(config.tracing_level(), tracing::Level::INFO);

        config.log_level = Some("warn".to_string());
        assert_eq!(config.tracing_level(), tracing::Level::WARN);
    }

    #[test]
    fn test_server_url() {
        let config = EnvironmentConfig::default();
        assert_eq!(config.server_url(), "0.0.0.0:8000");
    }
}
